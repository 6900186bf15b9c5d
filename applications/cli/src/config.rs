/// Client configuration
use cadence_catalog::CatalogConfig;
use cadence_playback::{PlaybackConfig, SimulatedOutputConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_NAME: &str = "cadence";

/// Prefix of environment overrides, e.g. `CADENCE__CATALOG__BASE_URL`
pub const ENV_PREFIX: &str = "CADENCE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Simulated audio engine
    #[serde(default)]
    pub engine: SimulatedOutputConfig,
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment
    ///
    /// An explicit `path` must exist; otherwise `cadence.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }
}

fn default_database_url() -> String {
    "sqlite://./data/cadence.db".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            catalog: CatalogConfig::default(),
            playback: PlaybackConfig::default(),
            engine: SimulatedOutputConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_playback::LoadFailurePolicy;
    use std::io::Write;

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
database_url = "sqlite://./test.db"

[catalog]
base_url = "http://localhost:3000"

[playback]
load_failure_policy = "skip_to_next"

[engine]
status_interval_ms = 250
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.database_url, "sqlite://./test.db");
        assert_eq!(config.catalog.base_url, "http://localhost:3000");
        assert_eq!(config.catalog.timeout_secs, CatalogConfig::default().timeout_secs);
        assert_eq!(
            config.playback.load_failure_policy,
            LoadFailurePolicy::SkipToNext
        );
        assert_eq!(config.engine.status_interval_ms, 250);
        assert_eq!(
            config.engine.default_duration_ms,
            SimulatedOutputConfig::default().default_duration_ms
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
