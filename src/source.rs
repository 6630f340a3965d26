//! @ai:module:intent Load raw season payloads from JSON files on disk
//! @ai:module:layer infrastructure
//! @ai:module:public_api PayloadLoader, PayloadLoaderTrait
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Trait for loading raw payloads
pub trait PayloadLoaderTrait: Send + Sync {
    /// @ai:intent Load payloads from a file or every JSON file under a directory
    fn load(&self, path: &Path) -> Result<Vec<Value>>;
}

/// @ai:intent Reads payload objects from JSON files
pub struct PayloadLoader;

impl PayloadLoader {
    /// @ai:intent Create a new payload loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Parse one file holding an object, an array of objects, or a {"data": [...]} envelope
    /// @ai:effects fs:read
    fn load_file(path: &Path) -> Result<Vec<Value>> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let value: Value = serde_json::from_str(&content)?;
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    map.insert("data".to_string(), other);
                    vec![Value::Object(map)]
                }
                None => vec![Value::Object(map)],
            },
            _ => {
                return Err(Error::InvalidPayload {
                    path: path.to_path_buf(),
                    index: 0,
                })
            }
        };

        if let Some(index) = items.iter().position(|v| !v.is_object()) {
            return Err(Error::InvalidPayload {
                path: path.to_path_buf(),
                index,
            });
        }

        Ok(items)
    }

    /// @ai:intent Find JSON files in sorted path order
    /// @ai:effects fs:read
    fn find_payload_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<_> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();
        files
    }
}

impl Default for PayloadLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadLoaderTrait for PayloadLoader {
    /// @ai:effects fs:read
    fn load(&self, path: &Path) -> Result<Vec<Value>> {
        if !path.is_dir() {
            return Self::load_file(path);
        }

        let mut payloads = Vec::new();
        for file in Self::find_payload_files(path) {
            let items = Self::load_file(&file)?;
            tracing::debug!("Loaded {} payloads from {}", items.len(), file.display());
            payloads.extend(items);
        }
        Ok(payloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_single_object() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("season.json");
        std::fs::write(&path, r#"{"season": 2023, "pts": 20}"#).unwrap();

        let payloads = PayloadLoader::new().load(&path).unwrap();
        assert_eq!(payloads, vec![json!({"season": 2023, "pts": 20})]);
    }

    #[test]
    fn test_load_data_envelope() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("averages.json");
        std::fs::write(&path, r#"{"data": [{"season": 2022}, {"season": 2023}]}"#).unwrap();

        let payloads = PayloadLoader::new().load(&path).unwrap();
        assert_eq!(payloads.len(), 2);
    }

    #[test]
    fn test_load_directory_in_path_order() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("b.json"), r#"[{"season": "b"}]"#).unwrap();
        std::fs::write(temp.path().join("a.json"), r#"[{"season": "a"}]"#).unwrap();
        std::fs::write(temp.path().join("sub").join("c.json"), r#"{"season": "c"}"#).unwrap();
        std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let payloads = PayloadLoader::new().load(temp.path()).unwrap();
        let seasons: Vec<_> = payloads.iter().map(|p| p["season"].clone()).collect();
        assert_eq!(seasons, vec![json!("a"), json!("b"), json!("c")]);
    }

    #[test]
    fn test_non_object_entry_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        std::fs::write(&path, r#"[{"season": 2023}, 42]"#).unwrap();

        let err = PayloadLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidPayload { index: 1, .. }));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = PayloadLoader::new()
            .load(Path::new("/nonexistent/season.json"))
            .unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
