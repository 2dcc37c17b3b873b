//! Runtime configuration.
//!
//! Read from a TOML file (`yawolf.toml` by default). Every key is optional;
//! missing sections or keys fall back to the values below.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "yawolf.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub sim: SimConfig,
    pub assets: AssetsConfig,
}

// ── [render] ──

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub fov_deg: f32,
    /// Edge of every wall / floor / ceiling texture. Power of two.
    pub texture_size: usize,
    /// Distance at which walls fade to black.
    pub max_shade_distance: f32,
    /// Extra darkening for Y-facing walls.
    pub side_shade_bias: f32,
    pub floor_shade: f32,
    pub ceiling_shade: f32,
    /// Tolerance (cell units) of the sprite-vs-wall depth test.
    pub sprite_depth_epsilon: f32,
    pub sprite_scale: f32,
    pub parallel: bool,
    pub minimap: bool,
    pub minimap_cell_px: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov_deg: 60.0,
            texture_size: 64,
            max_shade_distance: 20.0,
            side_shade_bias: 0.2,
            floor_shade: 0.7,
            ceiling_shade: 0.6,
            sprite_depth_epsilon: 0.1,
            sprite_scale: 1.0,
            parallel: true,
            minimap: true,
            minimap_cell_px: 5,
        }
    }
}

impl RenderConfig {
    pub fn fov(&self) -> f32 {
        self.fov_deg.to_radians()
    }
}

// ── [sim] ──

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub tick_rate: u32,
    /// World units per map cell.
    pub cell_size: f32,
    pub move_step: f32,
    pub rotation_step_deg: f32,
    pub collision_buffer: f32,
    pub enemy_step: f32,
    pub enemy_turn_deg: f32,
    /// Animation frames advance once every this many ticks.
    pub anim_ticks: u32,
    pub shot_range_cells: f32,
    pub shot_cone_deg: f32,
    pub shoot_frames: usize,
    pub dying_frames: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30,
            cell_size: 5.0,
            move_step: 0.5,
            rotation_step_deg: 2.0,
            collision_buffer: 0.2,
            enemy_step: 0.1,
            enemy_turn_deg: 10.0,
            anim_ticks: 7,
            shot_range_cells: 8.0,
            shot_cone_deg: 10.0,
            shoot_frames: 6,
            dying_frames: 5,
        }
    }
}

impl SimConfig {
    /// Shot range in world units.
    pub fn shot_range(&self) -> f32 {
        self.shot_range_cells * self.cell_size
    }
}

// ── [assets] ──

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetsConfig {
    pub dir: PathBuf,
    /// Text map; the built-in level is used when absent.
    pub map: Option<PathBuf>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            map: None,
        }
    }
}

// ── Loading ──

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Load `path`. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let cfg = Self::from_toml(&text, path)?;
        log::info!("config loaded from {}", path.display());
        Ok(cfg)
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_FILE`] when it exists,
    /// else the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let p = Path::new(DEFAULT_CONFIG_FILE);
                if p.is_file() {
                    Self::load(p)
                } else {
                    log::debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
