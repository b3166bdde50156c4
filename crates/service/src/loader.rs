//! Input file loading.

use std::io::ErrorKind;
use std::path::Path;

use catalog_import_core::json_kind;
use serde_json::Value;

use crate::error::ImportError;

/// Read `path` as UTF-8 and parse it as a JSON array.
///
/// Elements are returned as raw values; whether each one is a usable record
/// is decided per record by the importer.
pub fn load(path: &Path) -> Result<Vec<Value>, ImportError> {
    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ImportError::NotFound(path.to_path_buf()),
        _ => ImportError::Io { path: path.to_path_buf(), source },
    })?;

    let parsed: Value = serde_json::from_str(&content)
        .map_err(|e| ImportError::Format { path: path.to_path_buf(), reason: e.to_string() })?;

    match parsed {
        Value::Array(records) => Ok(records),
        other => Err(ImportError::Format {
            path: path.to_path_buf(),
            reason: format!("expected a JSON array of records, found {}", json_kind(&other)),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test code")]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_temp(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn loads_array_elements_verbatim() {
        let file = write_temp(
            br#"[{"university_name":"Acme U","name":"MS CS"}, 42, {"name":"Orphan"}]"#,
        );
        let records = load(file.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1], Value::from(42));
    }

    #[test]
    fn empty_array_is_valid() {
        let file = write_temp(b"[]");
        assert!(load(file.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ImportError::NotFound(_)), "got {err:?}");
    }

    #[test]
    fn invalid_json_is_format_error() {
        let file = write_temp(b"[{\"university_name\": ");
        assert!(matches!(load(file.path()).unwrap_err(), ImportError::Format { .. }));
    }

    #[test]
    fn non_array_is_format_error() {
        let file = write_temp(br#"{"university_name":"Acme U","name":"MS CS"}"#);
        let err = load(file.path()).unwrap_err();
        assert!(err.to_string().contains("expected a JSON array of records, found an object"));
    }

    #[test]
    fn invalid_utf8_is_io_error() {
        let file = write_temp(&[b'[', 0xff, 0xfe, b']']);
        assert!(matches!(load(file.path()).unwrap_err(), ImportError::Io { .. }));
    }
}
