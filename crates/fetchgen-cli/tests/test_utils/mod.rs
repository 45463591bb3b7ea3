//! Test utilities for fetchgen CLI integration tests

// Internal imports (std, crate)
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// External imports (alphabetized)
use tempfile::TempDir;

/// Creates a temporary directory for test outputs
pub fn create_temp_dir() -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = tempfile::tempdir()?;
    let temp_path = temp_dir.path().to_path_buf();
    Ok((temp_dir, temp_path))
}

/// Path to a shared description fixture
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures/openapi")
        .join(name)
}

/// Run the fetchgen binary with `args`
pub fn run_fetchgen<I, S>(args: I) -> anyhow::Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Ok(Command::new(env!("CARGO_BIN_EXE_fetchgen"))
        .args(args)
        .env("RUST_LOG", "info")
        .output()?)
}

/// Names of every async client method, `request` included, in emission order
pub fn generated_method_names(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| line.strip_prefix("  async "))
        .filter_map(|rest| rest.split('(').next())
        .map(String::from)
        .collect()
}

/// Read a generated file to a string
pub fn read(path: &Path) -> anyhow::Result<String> {
    Ok(std::fs::read_to_string(path)?)
}
