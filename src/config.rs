//! Client configuration, as served in `config.json` next to the application.
//!
//! The configuration is loaded once by the host and passed to whatever needs it;
//! nothing in this crate caches it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.backend.url.trim_end_matches('/'), endpoint)
    }
}

/// Routes exposed by the analysis engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SyntaxCheck,
    ToDot,
    ToJson,
    SynchronizedProduct,
    Reachability,
    Liveness,
    Compare,
    Simulate,
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let path = match self {
            Endpoint::SyntaxCheck => "tck_syntax/check",
            Endpoint::ToDot => "tck_syntax/to_dot",
            Endpoint::ToJson => "tck_syntax/to_json",
            Endpoint::SynchronizedProduct => "tck_syntax/create_synchronized_product",
            Endpoint::Reachability => "tck_reach",
            Endpoint::Liveness => "tck_liveness",
            Endpoint::Compare => "tck_compare",
            Endpoint::Simulate => "tck_simulate/simulate",
        };
        write!(f, "{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_reads_backend_url() {
        // given
        let json = r#"{ "backend": { "url": "http://localhost:5001" } }"#;

        // when
        let config = AppConfig::from_json(json).unwrap();

        // then
        assert_eq!(config.backend.url, "http://localhost:5001");
    }

    #[test]
    fn from_json_returns_err_when_backend_is_missing() {
        // when
        let result = AppConfig::from_json("{}");

        // then
        assert!(result.is_err());
    }

    #[test]
    fn endpoint_url_tolerates_trailing_slash() {
        // given
        let config = AppConfig {
            backend: BackendConfig {
                url: String::from("https://engine.example/api/"),
            },
        };

        // when
        let url = config.endpoint_url(Endpoint::Simulate);

        // then
        assert_eq!(url, "https://engine.example/api/tck_simulate/simulate");
    }

    #[test]
    fn endpoint_url_joins_analysis_routes() {
        // given
        let config = AppConfig {
            backend: BackendConfig {
                url: String::from("http://engine"),
            },
        };

        // when / then
        assert_eq!(config.endpoint_url(Endpoint::Reachability), "http://engine/tck_reach");
        assert_eq!(
            config.endpoint_url(Endpoint::SyntaxCheck),
            "http://engine/tck_syntax/check"
        );
    }
}
