//! Converter configuration

use serde::{Deserialize, Serialize};
use svgkit_markup::{ParserConfig, DEFAULT_MAX_DEPTH};

/// Scene conversion settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Reject attributes a tag does not accept. When off they are skipped
    /// with a warning.
    pub strict_attributes: bool,

    /// Require the SVG namespace on the root element
    pub require_namespace: bool,

    /// Maximum element nesting depth
    pub max_depth: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            strict_attributes: true,
            require_namespace: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SceneConfig {
    /// Lenient settings for inputs from less careful producers.
    pub fn lenient() -> Self {
        Self {
            strict_attributes: false,
            require_namespace: false,
            ..Self::default()
        }
    }

    /// Load from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parser-side slice of these settings.
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            max_depth: self.max_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_strict() {
        let config = SceneConfig::default();
        assert!(config.strict_attributes);
        assert!(config.require_namespace);
        assert_eq!(config.parser_config().max_depth, 256);
    }

    #[test]
    fn test_partial_json() {
        let config = SceneConfig::from_json_str(r#"{"strict_attributes": false}"#).unwrap();
        assert!(!config.strict_attributes);
        assert!(config.require_namespace);
        assert_eq!(config.max_depth, 256);
    }

    #[test]
    fn test_invalid_json() {
        assert!(SceneConfig::from_json_str(r#"{"max_depth": "deep"}"#).is_err());
    }

    #[test]
    fn test_round_trip_json() {
        let config = SceneConfig::lenient();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SceneConfig::from_json_str(&json).unwrap(), config);
    }
}
