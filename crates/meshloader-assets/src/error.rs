use std::path::PathBuf;

/// Errors that can occur while importing a model file.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("model not found: {0}")]
    NotFound(PathBuf),

    #[error("no importer for '{0}'")]
    UnsupportedFormat(PathBuf),

    #[error("failed to load glTF file '{0}': {1}")]
    Gltf(PathBuf, #[source] gltf::Error),

    #[error("failed to load OBJ file '{0}': {1}")]
    Obj(PathBuf, #[source] tobj::LoadError),

    #[error("failed to load STL file '{0}': {1}")]
    Stl(PathBuf, #[source] std::io::Error),

    #[error("I/O error loading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

/// Errors that prevent a load from producing mesh data.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("scene is incomplete")]
    IncompleteScene,

    #[error("scene has no root node")]
    MissingRoot,
}

/// Errors reading or writing a loader configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading config '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown post-process flag '{0}'")]
    UnknownFlag(String),

    #[error("unknown attribute layout '{0}' (expected 'padded' or 'ragged')")]
    UnknownLayout(String),
}
