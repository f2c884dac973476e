//! Build script for storefront crate.
//!
//! Fingerprints the stylesheet so templates can link an immutable,
//! cache-busting file name.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    hash_css();
}

/// Hash main.css and copy it to `static/css/derived/main.<hash>.css`.
///
/// Sets `CSS_HASH` for use with `env!("CSS_HASH")`.
fn hash_css() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = match fs::read(&css_path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read main.css: {e}");
            println!("cargo:rustc-env=CSS_HASH=");
            return;
        }
    };

    // First 8 hex chars of the SHA-256
    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash = hash.get(..8).unwrap_or(&hash);

    println!("cargo:rustc-env=CSS_HASH={short_hash}");

    let derived_dir = Path::new(&manifest_dir).join("static/css/derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived CSS directory");
    fs::copy(&css_path, derived_dir.join(format!("main.{short_hash}.css")))
        .expect("Failed to copy CSS to derived directory");
}
