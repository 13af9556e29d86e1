//! Build script for the beatsync CLI.
//!
//! Copies the `.env.example` configuration template into the local data
//! directory (`<data_local_dir>/beatsync/.env.example`) so users find a ready
//! template next to the `.env` file the binary loads at startup.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root into the local data directory.
///
/// A missing template or an unwritable data directory only produces a cargo
/// warning; neither fails the build.
///
/// # Environment Variables Used
///
/// - `CARGO_MANIFEST_DIR` - Path to the crate root directory (provided by cargo)
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("beatsync");

    let copied = fs::create_dir_all(&out_dir)
        .and_then(|_| fs::copy(&env_example_path, out_dir.join(".env.example")));
    if let Err(e) = copied {
        println!(
            "cargo:warning=could not copy .env.example to {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}
