use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{client::ApiClient, error::Error};

/// The period of the user list refresh if nothing else is configured.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

/// The configuration used for running a panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the backend lives, for example `http://localhost:5000`.
    /// The endpoints `/api/users` and `/api/content/<user>` are resolved below it.
    pub base_url: String,

    /// How often the list of users is refreshed, in milliseconds.
    pub poll_interval_ms: u64,

    /// How many recent events the panel remembers.
    pub event_log_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            event_log_size: 100,
        }
    }
}

impl Config {
    fn ron() -> ron::Options {
        ron::Options::default()
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
            .with_default_extension(ron::extensions::Extensions::UNWRAP_NEWTYPES)
    }

    /// Deserialize a .ron file's contents.
    pub fn deserialize(input: &str) -> Result<Self, Error> {
        Self::ron()
            .from_str::<Config>(input)
            .map_err(|e| Error::BadConfig(e.to_string()))
    }

    /// Setup a new configuration from a RON file.
    pub fn new_from_path<P: AsRef<Path>>(p: P) -> Result<Self, Error> {
        let p = p.as_ref();
        let s = std::fs::read_to_string(p)
            .map_err(|e| Error::BadConfig(format!("Could not read `{}`: {e}", p.display())))?;

        Self::deserialize(&s)
    }

    /// An example configuration with all fields filled in.
    pub fn example() -> Self {
        Self {
            base_url: "http://192.168.1.20:5000".into(),
            ..Default::default()
        }
    }

    /// Serialize the configuration in a "pretty" (i.e. non-compact) fashion.
    pub fn serialize_pretty(&self) -> String {
        Self::ron()
            .to_string_pretty(self, ron::ser::PrettyConfig::default())
            .expect("Config is always serializable")
    }

    /// The period of the user list refresh.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn check_base_url(&self) -> Result<(), Error> {
        ApiClient::new(&self.base_url)
            .map(|_| ())
            .map_err(|e| Error::BadConfig(e.to_string()))
    }

    fn check_poll_interval(&self) -> Result<(), Error> {
        if self.poll_interval_ms == 0 {
            Err(Error::BadConfig(
                "The poll interval must be above zero milliseconds.".into(),
            ))
        } else {
            Ok(())
        }
    }

    /// Check that a panel can be run with this configuration.
    pub fn validate(&self) -> Result<(), Error> {
        self.check_base_url()?;
        self.check_poll_interval()?;

        Ok(())
    }
}
