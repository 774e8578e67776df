use std::path::Path;

use crate::{
    foundation::error::{ConformError, ConformResult},
    project::model::TRACK_NAME_PROPERTY,
};

/// How a project file is read into tracks.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Playlists whose id starts with this are tracks; the rest (e.g. "main bin") are not.
    pub track_prefix: String,
    /// Hoisted property holding a track's display name.
    pub track_name_property: String,
    /// Attributes tried, in order, to key producers and playlists.
    pub id_keys: Vec<String>,
    pub force_include_empty: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            track_prefix: "playlist".to_string(),
            track_name_property: TRACK_NAME_PROPERTY.to_string(),
            id_keys: vec!["id".to_string(), "name".to_string()],
            force_include_empty: false,
        }
    }
}

impl ProjectConfig {
    pub fn from_json_str(s: &str) -> ConformResult<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| ConformError::config(format!("parse config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> ConformResult<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> ConformResult<()> {
        if self.id_keys.is_empty() {
            return Err(ConformError::config("id_keys must not be empty"));
        }
        if self.track_prefix.is_empty() {
            return Err(ConformError::config("track_prefix must not be empty"));
        }
        Ok(())
    }

    pub(crate) fn id_keys(&self) -> Vec<&str> {
        self.id_keys.iter().map(String::as_str).collect()
    }
}

/// Per-call conform settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConformOptions<T> {
    /// Written to every output frame not covered by a clip.
    pub fill_value: T,
}

impl<T: Default> Default for ConformOptions<T> {
    fn default() -> Self {
        Self {
            fill_value: T::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let c = ProjectConfig::from_json_str(r#"{ "track_prefix": "track" }"#).unwrap();
        assert_eq!(c.track_prefix, "track");
        assert_eq!(c.track_name_property, "kdenlive:track_name");
        assert_eq!(c.id_keys, ["id", "name"]);
        assert!(!c.force_include_empty);
    }

    #[test]
    fn rejects_empty_id_keys() {
        let err = ProjectConfig::from_json_str(r#"{ "id_keys": [] }"#).unwrap_err();
        assert!(matches!(err, ConformError::Config(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ProjectConfig::from_json_str("{"),
            Err(ConformError::Config(_))
        ));
    }

    #[test]
    fn default_fill_is_zero() {
        assert_eq!(ConformOptions::<f64>::default().fill_value, 0.0);
        assert_eq!(ConformOptions::<u8>::default().fill_value, 0);
    }
}
