//! Build script for depth-capture
//!
//! Links the OAK depth shim when the `oak` feature is enabled.

fn main() {
    println!("cargo:rerun-if-env-changed=OAK_DEPTH_LIB_DIR");

    if std::env::var_os("CARGO_FEATURE_OAK").is_none() {
        return;
    }

    if let Some(dir) = std::env::var_os("OAK_DEPTH_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }
    println!("cargo:rustc-link-lib=oak_depth");
}
