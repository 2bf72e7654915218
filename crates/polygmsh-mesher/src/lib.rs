use std::path::PathBuf;
use thiserror::Error;

pub mod config;
pub mod format;
pub mod invoke;
pub mod options;

pub use config::{CONFIG_ENV_VAR, MesherConfig};
pub use format::MeshFormat;
pub use invoke::{GMSH_EXECUTABLE, Mesher};
pub use options::MeshOptions;

#[derive(Error, Debug)]
pub enum MesherError {
    #[error("gmsh is not configured and was not found on PATH (run `polygmsh set-gmsh-path <path>`)")]
    NotConfigured,
    #[error("gmsh not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("gmsh exited with status {code}")]
    Failed { code: i32 },
    #[error("gmsh was terminated without an exit status")]
    Terminated,
    #[error("invalid mesh option: {0}")]
    InvalidOption(String),
    #[error("unknown mesh format `{0}`")]
    UnknownFormat(String),
    #[error("config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MesherError>;
