//! Configuration file support.

use {
    crate::error::ConfigError,
    serde_derive::Deserialize,
    std::{convert::TryInto, fs, path::Path, str::FromStr},
};


/// Settings read from a `wasm-pages.toml` file.
///
/// Every field is optional; command-line flags take precedence over anything set here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatchConfig {
    initial_pages: Option<u64>,
}

impl PatchConfig {
    /// The initial page count to patch in, if one is configured.
    pub fn initial_pages(&self) -> Option<u64> {
        self.initial_pages
    }

    /// Parse a `wasm-pages.toml` file into a `PatchConfig`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        fs::read_to_string(path.as_ref())
            .map_err(|err| ConfigError::IoError {
                path: path.as_ref().display().to_string(),
                err,
            })
            .and_then(Self::from_str)
    }

    /// Parse a string containing TOML data into a `PatchConfig`.
    fn from_str(toml: impl AsRef<str>) -> Result<Self, ConfigError> {
        toml::from_str::<'_, TomlPatchConfig>(toml.as_ref())
            .map_err(Into::into)
            .and_then(TryInto::try_into)
    }
}

impl FromStr for PatchConfig {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s)
    }
}

/// Internal deserializer used to read data from a `wasm-pages.toml` file.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlPatchConfig {
    memory: Option<RawMemoryConfig>,
}

/// The `[memory]` table.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMemoryConfig {
    initial_pages: Option<u64>,
}

impl TryInto<PatchConfig> for TomlPatchConfig {
    type Error = ConfigError;
    fn try_into(self) -> Result<PatchConfig, Self::Error> {
        let Self { memory } = self;
        Ok(PatchConfig {
            initial_pages: memory.and_then(|memory| memory.initial_pages),
        })
    }
}
