//! Scene path declarations
//!
//! A scene file holds either a bare list of path records or a map with a
//! `paths` list, in JSON or RON.

use std::fs;
use std::path::Path;

use serde_json::Value;

use super::format::{FileFormat, extension_of};
use crate::nav::{DecodeError, PathDescriptor, PathSet, PathSetError};

/// Errors that can occur while loading scene paths
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("unsupported scene file extension `{0}`")]
    UnsupportedFormat(String),
    #[error("expected a list of paths")]
    NotAList,
    #[error("path #{index}: {source}")]
    Path {
        index: usize,
        #[source]
        source: DecodeError,
    },
    #[error(transparent)]
    PathSet(#[from] PathSetError),
}

/// Decode every path record in `document`, keeping declaration order.
///
/// # Errors
///
/// Fails on the first record that does not decode; the error carries the
/// record's index.
pub fn decode_paths(document: &Value) -> Result<Vec<PathDescriptor>, SceneError> {
    let records = match document {
        Value::Array(records) => records,
        Value::Object(fields) => match fields.get("paths") {
            Some(Value::Array(records)) => records,
            _ => return Err(SceneError::NotAList),
        },
        _ => return Err(SceneError::NotAList),
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            PathDescriptor::decode(record).map_err(|source| {
                log::warn!("Rejected path record #{index}: {source}");
                SceneError::Path { index, source }
            })
        })
        .collect()
}

/// Decode paths from a JSON string
///
/// # Errors
///
/// Returns an error if the text is not JSON or a record does not decode
pub fn paths_from_json_str(text: &str) -> Result<Vec<PathDescriptor>, SceneError> {
    let document: Value = serde_json::from_str(text)?;
    decode_paths(&document)
}

/// Decode paths from a RON string
///
/// # Errors
///
/// Returns an error if the text is not RON or a record does not decode
pub fn paths_from_ron_str(text: &str) -> Result<Vec<PathDescriptor>, SceneError> {
    let document: Value = ron::from_str(text)?;
    decode_paths(&document)
}

/// Load paths from a JSON file
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoding fails
pub fn load_paths_json(path: impl AsRef<Path>) -> Result<Vec<PathDescriptor>, SceneError> {
    let content = fs::read_to_string(path)?;
    paths_from_json_str(&content)
}

/// Load paths from a RON file
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoding fails
pub fn load_paths_ron(path: impl AsRef<Path>) -> Result<Vec<PathDescriptor>, SceneError> {
    let content = fs::read_to_string(path)?;
    paths_from_ron_str(&content)
}

/// Load paths from a `.json` or `.ron` file
///
/// # Errors
///
/// Returns an error for other extensions, unreadable files, or records that
/// do not decode
pub fn load_paths(path: impl AsRef<Path>) -> Result<Vec<PathDescriptor>, SceneError> {
    let path = path.as_ref();
    let paths = match FileFormat::from_path(path) {
        Some(FileFormat::Json) => load_paths_json(path)?,
        Some(FileFormat::Ron) => load_paths_ron(path)?,
        None => return Err(SceneError::UnsupportedFormat(extension_of(path))),
    };
    log::info!("Loaded {} paths from {}", paths.len(), path.display());
    Ok(paths)
}

/// Load a scene file into a name-indexed [`PathSet`]
///
/// # Errors
///
/// As [`load_paths`], plus duplicate path names
pub fn load_path_set(path: impl AsRef<Path>) -> Result<PathSet, SceneError> {
    Ok(PathSet::from_paths(load_paths(path)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::Orientation;
    use serde_json::json;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("steerpath-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_decode_list_in_order() {
        let document = json!([
            {"name": "A", "forwardDirection": true, "isCyclical": false, "orientation": "horizontal"},
            {"name": "B", "forwardDirection": false, "isCyclical": true, "orientation": "verticle"},
            {"name": "C", "forwardDirection": true, "isCyclical": true, "orientation": "diagonal"},
        ]);

        let paths = decode_paths(&document).unwrap();
        assert_eq!(paths.len(), 3);

        assert_eq!(paths[0].name(), "A");
        assert!(paths[0].forward_direction());
        assert!(!paths[0].is_cyclical());
        assert_eq!(paths[0].orientation(), Orientation::Horizontal);

        assert_eq!(paths[1].name(), "B");
        assert!(!paths[1].forward_direction());
        assert!(paths[1].is_cyclical());
        assert_eq!(paths[1].orientation(), Orientation::Vertical);

        assert_eq!(paths[2].name(), "C");
        assert_eq!(paths[2].orientation(), Orientation::Diagonal);
    }

    #[test]
    fn test_decode_wrapped_list() {
        let document = json!({
            "scene": "Level1",
            "paths": [
                {"name": "MainHall", "forwardDirection": true, "isCyclical": false, "orientation": "horizontal"}
            ]
        });

        assert_eq!(decode_paths(&document).unwrap().len(), 1);
        assert!(matches!(
            decode_paths(&json!({"scene": "Level1"})),
            Err(SceneError::NotAList)
        ));
        assert!(matches!(decode_paths(&json!("paths")), Err(SceneError::NotAList)));
    }

    #[test]
    fn test_bad_record_reports_index() {
        let document = json!([
            {"name": "A", "forwardDirection": true, "isCyclical": false, "orientation": "horizontal"},
            {"name": "B", "forwardDirection": true, "orientation": "horizontal"},
        ]);

        match decode_paths(&document) {
            Err(SceneError::Path { index, source }) => {
                assert_eq!(index, 1);
                assert_eq!(source, DecodeError::MissingField("isCyclical"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_paths_from_ron() {
        let text = r#"[
            {"name": "Ring", "forwardDirection": true, "isCyclical": true, "orientation": "diagonal"},
        ]"#;

        let paths = paths_from_ron_str(text).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].name(), "Ring");
        assert!(paths[0].is_cyclical());
    }

    #[test]
    fn test_paths_from_ron_structs() {
        let text = r#"[
            (name: "Ring", forwardDirection: true, isCyclical: true, orientation: "diagonal"),
            Path(name: "Ladder", forwardDirection: false, isCyclical: false, orientation: "verticle"),
        ]"#;

        let paths = paths_from_ron_str(text).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].name(), "Ring");
        assert_eq!(paths[0].orientation(), Orientation::Diagonal);
        assert!(!paths[1].forward_direction());
        assert_eq!(paths[1].orientation(), Orientation::Vertical);

        let wrapped = r#"(paths: [
            (name: "Ring", forwardDirection: true, isCyclical: true, orientation: "diagonal"),
        ])"#;
        assert_eq!(paths_from_ron_str(wrapped).unwrap()[0], paths[0]);
    }

    #[test]
    fn test_bad_ron_record_reports_index() {
        let text = r#"[
            (name: "Ring", forwardDirection: true, isCyclical: true, orientation: "diagonal"),
            (name: "Arc", forwardDirection: true, isCyclical: false, orientation: "curved"),
        ]"#;

        match paths_from_ron_str(text) {
            Err(SceneError::Path { index, source }) => {
                assert_eq!(index, 1);
                assert_eq!(source, DecodeError::UnrecognizedOrientation("curved".to_string()));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let missing = r#"[(name: "Arc", forwardDirection: true, orientation: "horizontal")]"#;
        assert!(matches!(
            paths_from_ron_str(missing),
            Err(SceneError::Path { index: 0, source: DecodeError::MissingField("isCyclical") })
        ));
    }

    #[test]
    fn test_demo_ron_scene() {
        let file = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/level2.ron");
        let set = load_path_set(file).unwrap();

        let names: Vec<_> = set.iter().map(PathDescriptor::name).collect();
        assert_eq!(names, ["Catwalk", "Ladder", "Ring"]);
        assert_eq!(set.with_orientation(Orientation::Vertical).count(), 1);
    }

    #[test]
    fn test_load_path_set_from_file() {
        let file = temp_file(
            "scene.json",
            r#"{"paths": [
                {"name": "MainHall", "forwardDirection": true, "isCyclical": false, "orientation": "horizontal"},
                {"name": "Stairs", "forwardDirection": true, "isCyclical": false, "orientation": "verticle"}
            ]}"#,
        );

        let set = load_path_set(&file).unwrap();
        fs::remove_file(&file).unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.get("Stairs").is_some());
    }

    #[test]
    fn test_duplicate_names_in_file() {
        let file = temp_file(
            "dupes.json",
            r#"[
                {"name": "MainHall", "forwardDirection": true, "isCyclical": false, "orientation": "horizontal"},
                {"name": "MainHall", "forwardDirection": false, "isCyclical": false, "orientation": "horizontal"}
            ]"#,
        );

        let result = load_path_set(&file);
        fs::remove_file(&file).unwrap();

        assert!(matches!(
            result,
            Err(SceneError::PathSet(PathSetError::DuplicateName(name))) if name == "MainHall"
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            load_paths("level1.plist"),
            Err(SceneError::UnsupportedFormat(ext)) if ext == "plist"
        ));
        assert!(matches!(load_paths("missing-steerpath-scene.json"), Err(SceneError::Io(_))));
    }
}
