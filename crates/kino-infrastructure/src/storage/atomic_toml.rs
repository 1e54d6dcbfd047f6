//! Atomic file writes and TOML documents built on them.

use kino_core::error::{KinoError, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Writes `content` to `path` all-or-nothing.
///
/// The bytes go to a hidden sibling temp file, are synced to disk, then the
/// temp file is renamed over the target. Parent directories are created.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| KinoError::io(format!("Path has no parent directory: {}", path.display())))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| KinoError::io(format!("Path has no file name: {}", path.display())))?;

    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = parent.join(format!(".{}.tmp", file_name.to_string_lossy()));
    let mut tmp_file = File::create(&tmp_path)?;
    tmp_file.write_all(content)?;

    // Ensure data is written to disk
    tmp_file.sync_all()?;
    drop(tmp_file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// A handle to a TOML document that is always replaced atomically.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the TOML file and deserializes it.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data = toml::from_str(&content).map_err(|e| KinoError::file_parse(&self.path, e))?;
        Ok(Some(data))
    }

    /// Saves data to the TOML file atomically.
    pub fn save(&self, data: &T) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(data).map_err(|e| KinoError::serialization("TOML", e))?;
        write_atomic(&self.path, toml_string.as_bytes())
    }

    /// Loads the current document (or `default_value`), applies `f`, and
    /// writes the result back.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<T>
    where
        F: FnOnce(&mut T),
        T: Clone,
    {
        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data);
        self.save(&data)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn test_load_missing_and_empty_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.toml");
        let file = AtomicTomlFile::<Doc>::new(path.clone());
        assert_eq!(file.load().unwrap(), None);

        fs::write(&path, "   \n").unwrap();
        assert_eq!(file.load().unwrap(), None);
    }

    #[test]
    fn test_save_creates_parents_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("doc.toml");
        let file = AtomicTomlFile::new(path.clone());

        let doc = Doc {
            name: "kino".into(),
            count: 2,
        };
        file.save(&doc).unwrap();

        assert_eq!(file.load().unwrap(), Some(doc));
        assert!(!path.with_file_name(".doc.toml.tmp").exists());
    }

    #[test]
    fn test_update_starts_from_default() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::new(temp_dir.path().join("doc.toml"));

        let updated = file.update(Doc::default(), |doc| doc.count += 1).unwrap();
        assert_eq!(updated.count, 1);
        let updated = file.update(Doc::default(), |doc| doc.count += 1).unwrap();
        assert_eq!(updated.count, 2);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.toml");
        fs::write(&path, "name = ").unwrap();

        let result = AtomicTomlFile::<Doc>::new(path).load();
        assert!(matches!(result, Err(KinoError::FileParse { .. })));
    }
}
