//! Godot Android Exporter - rebrands and re-signs a template APK.
//!
//! Reads `properties.gae` from the working directory and produces
//! `{app_name}_{version_code}.apk`.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match gae_exporter::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
