//! Writing the merged collection to disk.

use std::path::{Path, PathBuf};

use geojson::FeatureCollection;

use crate::SourceError;

/// Serializes `collection` as `GeoJSON` and writes it to `path`.
///
/// The document is written to a sibling `.partial` file first and then
/// renamed over `path`, so an interrupted or failed run never leaves a
/// truncated output file behind. Missing parent directories are created.
///
/// # Errors
///
/// Returns [`SourceError::Json`] if serialization fails and
/// [`SourceError::Io`] if the file cannot be written or renamed.
pub fn write_feature_collection(
    path: &Path,
    collection: &FeatureCollection,
) -> Result<(), SourceError> {
    let bytes = serde_json::to_vec(collection)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let partial = partial_path(path);
    if let Err(e) = std::fs::write(&partial, &bytes).and_then(|()| std::fs::rename(&partial, path))
    {
        let _ = std::fs::remove_file(&partial);
        return Err(e.into());
    }

    log::info!(
        "Wrote {} features ({} bytes) to {}",
        collection.features.len(),
        bytes.len(),
        path.display()
    );
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use geojson::{Feature, GeoJson, Geometry, Value};

    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "arda_output_test_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn point(x: f64, y: f64) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![x, y]))),
            id: None,
            properties: Some(
                serde_json::json!({"STATE": "IN"})
                    .as_object()
                    .cloned()
                    .unwrap(),
            ),
            foreign_members: None,
        }
    }

    #[test]
    fn writes_readable_geojson() {
        let dir = temp_dir("readable");
        let path = dir.join("nested").join("indiana.geojson");
        let collection = FeatureCollection {
            bbox: None,
            features: vec![point(-86.15, 39.77), point(-86.2, 39.8)],
            foreign_members: None,
        };

        write_feature_collection(&path, &collection).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let GeoJson::FeatureCollection(read_back) = text.parse::<GeoJson>().unwrap() else {
            panic!("expected a FeatureCollection");
        };
        assert_eq!(read_back, collection);
        assert!(!partial_path(&path).exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_collection_is_valid() {
        let dir = temp_dir("empty");
        let path = dir.join("empty.geojson");
        let collection = FeatureCollection {
            bbox: None,
            features: Vec::new(),
            foreign_members: None,
        };

        write_feature_collection(&path, &collection).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"], serde_json::json!([]));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = temp_dir("failed");
        std::fs::create_dir_all(&dir).unwrap();
        // A directory in the way makes the rename fail.
        let path = dir.join("taken");
        std::fs::create_dir_all(path.join("child")).unwrap();
        let collection = FeatureCollection {
            bbox: None,
            features: vec![point(0.0, 0.0)],
            foreign_members: None,
        };

        let err = write_feature_collection(&path, &collection).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
        assert!(!partial_path(&path).exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn partial_path_is_sibling() {
        assert_eq!(
            partial_path(Path::new("out/indiana.geojson")),
            PathBuf::from("out/indiana.geojson.partial")
        );
    }
}
