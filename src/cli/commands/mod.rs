//! CLI subcommands

pub mod plan;
pub mod train;

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Normalise a user-supplied summary path: directories get `default_name`
/// appended and other paths are forced to a `.json` extension.
pub(crate) fn sanitize_summary_path(raw: &Path, default_name: &str) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    if raw_str.ends_with(MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push(default_name);
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Serialize `value` as pretty JSON at `path`, creating parent directories
pub(crate) fn write_summary<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    println!("\nSummary written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_paths_are_normalized() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/run"), "summary.json"),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.JSON"), "summary.json"),
            PathBuf::from("out/run.JSON")
        );
        let dir = format!("out{MAIN_SEPARATOR}");
        assert_eq!(
            sanitize_summary_path(Path::new(&dir), "summary.json"),
            PathBuf::from("out").join("summary.json")
        );
    }
}
