use crate::export::DEFAULT_FILE_NAME;
use crate::paginate::ExportMode;
use crate::LabelError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_FILE_NAME)
}

/// Settings for writing an export to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    #[serde(default)]
    pub mode: ExportMode,
    /// Where the PDF is written
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Stored in the PDF's document information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            mode: ExportMode::default(),
            output: default_output(),
            title: None,
        }
    }
}

impl ExportConfig {
    pub fn from_json(json: &str) -> Result<ExportConfig, LabelError> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Read a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ExportConfig, LabelError> {
        let json = std::fs::read_to_string(path)?;
        ExportConfig::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paginate::PageGeometry;

    #[test]
    fn missing_fields_take_defaults() {
        let config = ExportConfig::from_json("{}").unwrap();
        assert_eq!(config, ExportConfig::default());
        assert_eq!(config.output, Path::new("labels.pdf"));
    }

    #[test]
    fn reads_grid_settings() {
        let config = ExportConfig::from_json(
            r#"{
                "mode": {"type": "multiple", "pageSettings": {
                    "width": 8.5, "height": 11, "unit": "in",
                    "marginTop": 0.5, "marginRight": 0.25, "marginBottom": 0.5, "marginLeft": 0.25,
                    "spacing": 0.125
                }},
                "output": "out/shelf.pdf",
                "title": "Shelf labels"
            }"#,
        )
        .unwrap();

        let ExportMode::GridPerPage(geometry) = config.mode else {
            panic!("expected grid mode");
        };
        assert_eq!(geometry.unit, crate::units::Unit::Inch);
        assert_eq!(geometry.margin_left, 0.25);
        assert_ne!(geometry, PageGeometry::default());
        assert_eq!(config.output, Path::new("out/shelf.pdf"));
        assert_eq!(config.title.as_deref(), Some("Shelf labels"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = ExportConfig::from_json("{\"mode\": 3}").unwrap_err();
        assert!(matches!(err, LabelError::Json(_)));
    }

    #[test]
    fn missing_files_are_io_errors() {
        let err = ExportConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LabelError::Io(_)));
    }
}
