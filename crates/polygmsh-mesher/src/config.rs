use crate::{MesherError, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_ENV_VAR: &str = "POLYGMSH_CONFIG";
const CONFIG_DIR_NAME: &str = "polygmsh";
const CONFIG_FILE_NAME: &str = "mesher.json";

/// Persisted location of the gmsh installation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MesherConfig {
    /// Either the gmsh executable or the directory containing it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmsh_path: Option<PathBuf>,
}

impl MesherConfig {
    pub fn with_gmsh_path(path: impl Into<PathBuf>) -> Self {
        Self {
            gmsh_path: Some(path.into()),
        }
    }

    /// `$POLYGMSH_CONFIG`, else `$XDG_CONFIG_HOME/polygmsh/mesher.json`,
    /// else `$HOME/.config/polygmsh/mesher.json`.
    pub fn default_path() -> Option<PathBuf> {
        config_path_from(|key| std::env::var_os(key))
    }

    /// Reads the config at `path`; a missing file yields the empty config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no mesher config, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&text).map_err(|source| MesherError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|source| MesherError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

fn config_path_from(lookup: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

    if let Some(explicit) = non_empty(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(explicit));
    }
    let base = match non_empty("XDG_CONFIG_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(non_empty("HOME")?).join(".config"),
    };
    Some(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
