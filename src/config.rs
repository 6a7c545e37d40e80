use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;
use voxmesh_assets::Registry;
use voxmesh_core::{BlockId, ChunkDims};
use voxmesh_mesher::MesherOptions;
use voxmesh_world::BorderFill;

use crate::scene::SceneKind;

pub const DEFAULT_CONFIG_PATH: &str = "config/voxmesh.toml";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Block/material pack to load.
    pub registry: PathBuf,
    pub world: WorldConfig,
    pub border: BorderConfig,
    pub mesher: MesherConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    /// Chunks generated in each direction around the origin.
    pub radius: i32,
    pub scene: SceneKind,
    pub seed: u64,
}

/// Block names standing in for data the world does not have.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BorderConfig {
    pub placeholder: String,
    pub floor: String,
    pub ceiling: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MesherConfig {
    pub vertical_reduction: bool,
    /// 1 meshes on the main thread; 0 uses one worker per core.
    pub workers: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub chunk_metrics: PathBuf,
    pub report: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            registry: PathBuf::from("config/registry.json"),
            world: WorldConfig::default(),
            border: BorderConfig::default(),
            mesher: MesherConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        let dims = ChunkDims::default();
        Self {
            width: dims.width(),
            height: dims.height(),
            radius: 2,
            scene: SceneKind::Terrain,
            seed: 1337,
        }
    }
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            placeholder: "air".into(),
            floor: "air".into(),
            ceiling: "air".into(),
        }
    }
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            vertical_reduction: MesherOptions::default().vertical_reduction,
            workers: 0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            chunk_metrics: PathBuf::from("target/mesh_metrics.json"),
            report: PathBuf::from("target/mesh_report.json"),
        }
    }
}

impl AppConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    AppConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                AppConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Validated chunk dimensions.
    pub fn dims(&self) -> Result<ChunkDims> {
        ChunkDims::new(self.world.width, self.world.height).with_context(|| {
            format!(
                "invalid chunk size {}x{}",
                self.world.width, self.world.height
            )
        })
    }

    pub fn mesher_options(&self) -> MesherOptions {
        MesherOptions {
            vertical_reduction: self.mesher.vertical_reduction,
        }
    }

    /// Resolve the border block names against `registry`.
    pub fn border_fill(&self, registry: &Registry) -> Result<BorderFill> {
        Ok(BorderFill {
            placeholder: block_named(registry, &self.border.placeholder, "border.placeholder")?,
            floor: block_named(registry, &self.border.floor, "border.floor")?,
            ceiling: block_named(registry, &self.border.ceiling, "border.ceiling")?,
        })
    }
}

fn block_named(registry: &Registry, name: &str, key: &str) -> Result<BlockId> {
    registry
        .id_by_name(name)
        .with_context(|| format!("{key}: unknown block {name:?}"))
}
