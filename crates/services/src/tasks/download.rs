use std::path::{Path, PathBuf};

use crate::error::TaskError;

/// Local name for a server-named export: the last path component, never a
/// directory hop.
pub(crate) fn local_file_name(server_name: &str) -> Result<&str, TaskError> {
    let invalid = || TaskError::InvalidFilename(server_name.to_string());
    let parts = server_name.trim().split(['/', '\\']);
    if parts.clone().any(|part| part == "..") {
        return Err(invalid());
    }
    match parts.last() {
        Some(name) if !name.is_empty() && name != "." => Ok(name),
        _ => Err(invalid()),
    }
}

/// Write `contents` to `dir/name`, creating `dir` if needed.
pub(crate) async fn save_export(
    dir: &Path,
    name: &str,
    contents: &[u8],
) -> Result<PathBuf, TaskError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| TaskError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    let path = dir.join(name);
    tokio::fs::write(&path, contents)
        .await
        .map_err(|source| TaskError::Io {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_last_component() {
        assert_eq!(local_file_name("export_7.csv").unwrap(), "export_7.csv");
        assert_eq!(local_file_name("exports/2024/export.csv").unwrap(), "export.csv");
        assert_eq!(local_file_name("C:\\tmp\\export.csv").unwrap(), "export.csv");
    }

    #[test]
    fn rejects_traversal_and_empty_names() {
        for name in ["", "  ", "../etc/passwd", "a/../b.csv", "exports/", ".", ".."] {
            assert!(
                matches!(local_file_name(name), Err(TaskError::InvalidFilename(_))),
                "{name:?} should be rejected"
            );
        }
    }
}
