//! `mamematic.toml` settings, read from the working directory.
//!
//! ```toml
//! [mame]
//! exec = "/usr/games/mame"
//! genres = "catver.ini"
//! output = "machines.json"
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CliError;

/// Settings file name, relative to the working directory.
pub(crate) const CONFIG_FILE: &str = "mamematic.toml";

/// INI settings file used by older releases. Not read, only reported.
pub(crate) const LEGACY_CONFIG_FILE: &str = "mamematic.ini";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Settings {
    #[serde(default)]
    pub(crate) mame: MameSettings,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MameSettings {
    /// Emulator executable (or a dumped `-listxml` file).
    pub(crate) exec: Option<PathBuf>,
    /// Genre side file in `catver.ini` format.
    pub(crate) genres: Option<PathBuf>,
    /// Where to save the JSON snapshot.
    pub(crate) output: Option<PathBuf>,
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub(crate) fn load(path: &Path) -> Result<Self, CliError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents)
                .map_err(|e| CliError::config(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No {} found, using defaults", path.display());
                if let Some(legacy) = legacy_config(path) {
                    log::warn!(
                        "Ignoring {}: settings are now read from {} (same [mame] keys, values in quotes)",
                        legacy.display(),
                        path.display()
                    );
                }
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// The legacy INI file next to `path`, if one exists.
fn legacy_config(path: &Path) -> Option<PathBuf> {
    let legacy = path.with_file_name(LEGACY_CONFIG_FILE);
    legacy.is_file().then_some(legacy)
}
