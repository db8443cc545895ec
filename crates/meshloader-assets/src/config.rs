//! Loader configuration
//!
//! The FFI entry point uses [`LoaderConfig::default`]. Tools and tests can
//! load alternate settings from TOML:
//!
//! ```toml
//! post_process = "TRIANGULATE | FLIP_UVS"
//! attribute_layout = "ragged"
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

bitflags! {
    /// Post-processing steps applied to a scene after import.
    ///
    /// Bit values follow the common importer convention so hosts can pass
    /// the same masks they already use.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PostProcess: u32 {
        /// Split polygons with more than three indices into triangles.
        const TRIANGULATE = 0x8;
        /// Generate smooth per-vertex normals for meshes that have none.
        const GEN_SMOOTH_NORMALS = 0x40;
        /// Flip the V texture coordinate (`v' = 1 - v`).
        const FLIP_UVS = 0x80_0000;
    }
}

impl PostProcess {
    /// The step set used by `load_mesh_data`.
    pub const DEFAULT: Self = Self::TRIANGULATE
        .union(Self::FLIP_UVS)
        .union(Self::GEN_SMOOTH_NORMALS);

    /// Parse a comma separated list such as `triangulate,flip-uvs`.
    ///
    /// Names are case-insensitive and `-` is accepted for `_`. An empty
    /// string or `none` yields no steps.
    pub fn from_names(list: &str) -> Result<Self, ConfigError> {
        let mut flags = Self::empty();
        for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if token.eq_ignore_ascii_case("none") {
                continue;
            }
            let name = token.replace('-', "_").to_ascii_uppercase();
            let flag =
                Self::from_name(&name).ok_or_else(|| ConfigError::UnknownFlag(token.to_string()))?;
            flags |= flag;
        }
        Ok(flags)
    }
}

impl Default for PostProcess {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How per-vertex attribute buffers relate to the vertex buffer when some
/// meshes in a load lack an attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeLayout {
    /// Once any mesh declares an attribute, vertices of meshes without it
    /// receive a default value so the buffer stays index-aligned with the
    /// vertex buffer.
    #[default]
    Padded,
    /// Attributes are appended only for meshes that declare them.
    Ragged,
}

impl fmt::Display for AttributeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeLayout::Padded => write!(f, "padded"),
            AttributeLayout::Ragged => write!(f, "ragged"),
        }
    }
}

impl FromStr for AttributeLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "padded" => Ok(AttributeLayout::Padded),
            "ragged" => Ok(AttributeLayout::Ragged),
            other => Err(ConfigError::UnknownLayout(other.to_string())),
        }
    }
}

/// Settings for a single load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Post-processing steps requested from the importer
    pub post_process: PostProcess,
    /// Attribute buffer alignment policy
    pub attribute_layout: AttributeLayout,
}

impl LoaderConfig {
    /// Config with the default layout and the given post-process steps.
    pub fn with_post_process(post_process: PostProcess) -> Self {
        Self {
            post_process,
            ..Default::default()
        }
    }

    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&content)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
