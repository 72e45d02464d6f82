//! Configuration, driven by environment variables.

use std::env;

/// Runtime configuration for the Top Sites client.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSitesConfig {
    /// Host requests are sent to.
    pub endpoint_host: String,
    /// Value of the signed `host` header.
    pub signing_host: String,
    /// Path of the JSON snapshot.
    pub output_path: String,
    /// Log level.
    pub log_level: String,
}

impl Default for TopSitesConfig {
    fn default() -> Self {
        Self {
            endpoint_host: "ats.amazonaws.com".to_owned(),
            signing_host: "ats.us-west-1.amazonaws.com".to_owned(),
            output_path: "top_alexa.json".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl TopSitesConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("TOPSITES_ENDPOINT") {
            config.endpoint_host = v;
        }
        if let Some(v) = lookup("TOPSITES_SIGNING_HOST") {
            config.signing_host = v;
        }
        if let Some(v) = lookup("TOPSITES_OUTPUT") {
            config.output_path = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Render the configuration as JSON for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the configuration cannot be encoded.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = TopSitesConfig::default();
        assert_eq!(config.endpoint_host, "ats.amazonaws.com");
        assert_eq!(config.signing_host, "ats.us-west-1.amazonaws.com");
        assert_eq!(config.output_path, "top_alexa.json");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_should_override_from_lookup() {
        let config = TopSitesConfig::from_lookup(|key| match key {
            "TOPSITES_OUTPUT" => Some("/tmp/ranking.json".to_owned()),
            "LOG_LEVEL" => Some("debug".to_owned()),
            _ => None,
        });
        assert_eq!(config.output_path, "/tmp/ranking.json");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.endpoint_host, "ats.amazonaws.com");
    }

    #[test]
    fn test_should_render_config_as_camel_case_json() {
        let config = TopSitesConfig::default();
        let json = config.to_json().unwrap();
        assert!(json.contains(r#""endpointHost":"ats.amazonaws.com""#));
        assert!(json.contains(r#""outputPath":"top_alexa.json""#));

        let parsed: TopSitesConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.signing_host, config.signing_host);
        assert_eq!(parsed.log_level, config.log_level);
    }
}
