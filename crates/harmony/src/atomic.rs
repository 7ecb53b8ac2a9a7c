//! Whole-file writes that either complete or leave nothing behind.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{HarmonyError, Result};

/// Write `path` through a temporary file in the same directory.
///
/// The temporary file is renamed over `path` only after `write` succeeds and
/// the buffer is flushed; on error it is removed and `path` is untouched.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| HarmonyError::io(parent, e))?;
    }

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| HarmonyError::io(parent, e))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush().map_err(|e| HarmonyError::io(path, e))?;
    }
    temp.persist(path)
        .map_err(|e| HarmonyError::io(path, e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomically_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old").unwrap();

        write_atomically(&path, |w| {
            w.write_all(b"new").map_err(|e| HarmonyError::io("out.txt", e))
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_failed_write_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");

        let result = write_atomically(&path, |w| {
            w.write_all(b"partial")
                .map_err(|e| HarmonyError::io("out.bin", e))?;
            Err(HarmonyError::UnknownColumn("missing".to_string()))
        });

        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        fs::write(&path, "previous").unwrap();

        let result = write_atomically(&path, |_| {
            Err(HarmonyError::UnknownColumn("missing".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
    }
}
