use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

/// Write a file.
pub(crate) fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, contents)
        .with_context(|| format!("Unable to write to {}", path.display()))
}

/// Read a file to a `String`.
pub(crate) fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Deserialize a JSON file into type `T`.
pub(crate) fn deserialize<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = read(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

pub(crate) fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path)
        .with_context(|| format!("Unable to create directory {}", path.display()))
}

/// Overwrite an existing file without replacing it: open read-write, seek to
/// the start, write the new contents, truncate to the new length. Fails if
/// the file does not already exist.
pub(crate) fn rewrite_in_place(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    let contents = contents.as_ref();
    let mut f = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .with_context(|| format!("Unable to open {} for rewriting", path.display()))?;
    f.seek(SeekFrom::Start(0))
        .with_context(|| format!("Unable to seek in {}", path.display()))?;
    f.write_all(contents)
        .with_context(|| format!("Unable to write data to {}", path.display()))?;
    f.set_len(contents.len() as u64)
        .with_context(|| format!("Unable to truncate {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rewrite_in_place_shrinks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.json");
        std::fs::write(&path, "a long piece of original content").unwrap();
        rewrite_in_place(&path, "short").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn test_rewrite_in_place_requires_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");
        assert!(rewrite_in_place(&path, "data").is_err());
    }
}
