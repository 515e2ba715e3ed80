use std::{env, error::Error, fs, path::PathBuf};

use counter_config_compiler::generate_from_path;

const CONFIG_PATH_ENV: &str = "DOORWAY_COUNTER_CONFIG";

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-env-changed={CONFIG_PATH_ENV}");

    // A relative override resolves against the package root.
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let config_path = match env::var_os(CONFIG_PATH_ENV) {
        Some(path) => manifest_dir.join(path),
        None => manifest_dir.join("config").join("counter.toml"),
    };
    println!("cargo:rerun-if-changed={}", config_path.display());

    let generated = generate_from_path(&config_path)
        .map_err(|e| format!("counter config {}: {e}", config_path.display()))?;
    let out_file = PathBuf::from(env::var("OUT_DIR")?).join("counter_config.rs");
    fs::write(&out_file, generated)?;
    Ok(())
}
