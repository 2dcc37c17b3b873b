// ──────────────────────────────────────────────────────────────────────────
// assets/loader.rs
//
//  *   <dir>/textures/{wall1,wall2,wall3,door,exit,floor,ceiling}.ppm ──╮
//  *   <dir>/sprites/{enemy,pistol}.ppm                                  │ ---> Assets
//  *   optional text map                                                ──╯      + Map
// ──────────────────────────────────────────────────────────────────────────

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{Assets, CEILING, FLOOR, RawAssets, WALL_TEXTURES, ppm};
use crate::world::map::{Map, MapError};
use crate::world::sprite::SheetError;
use crate::world::texture::TextureError;

pub const GUARD_SHEET: &str = "sprites/enemy.ppm";
pub const PISTOL_SHEET: &str = "sprites/pistol.ppm";

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("texture `{path}`: {source}")]
    Ppm {
        path: PathBuf,
        #[source]
        source: ppm::PpmError,
    },

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("texture size {0} is not a power of two")]
    TextureSize(usize),

    #[error("texture `{name}` is {w}x{h}, expected {size}x{size}")]
    WrongSize {
        name: String,
        w: usize,
        h: usize,
        size: usize,
    },

    #[error("required texture `{0}` missing from the asset set")]
    Missing(String),

    #[error("{what} animation is configured for {configured} frames, the sheet has {available}")]
    FrameCount {
        what: &'static str,
        configured: usize,
        available: usize,
    },

    #[error("map uses cell code {0} but no texture is bound to it")]
    UnboundCell(i32),

    #[error("cannot read map `{path}`: {source}")]
    MapIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("map `{path}`: {source}")]
    Map {
        path: PathBuf,
        #[source]
        source: MapError,
    },
}

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

/// Decode the full asset set under `dir`. Any missing or malformed file
/// aborts the load.
pub fn load_assets(dir: &Path, texture_size: usize) -> Result<Assets, LoadError> {
    let read = |rel: PathBuf| {
        let path = dir.join(rel);
        log::debug!("decoding {}", path.display());
        ppm::load(&path).map_err(|source| LoadError::Ppm { path, source })
    };

    let textures = WALL_TEXTURES
        .iter()
        .chain([FLOOR, CEILING].iter())
        .map(|name| read(Path::new("textures").join(format!("{name}.ppm"))))
        .collect::<Result<Vec<_>, _>>()?;

    let raw = RawAssets {
        textures,
        guard_sheet: read(PathBuf::from(GUARD_SHEET))?,
        pistol_sheet: read(PathBuf::from(PISTOL_SHEET))?,
    };
    let assets = Assets::assemble(raw, texture_size)?;
    log::info!(
        "loaded {} textures from {}",
        assets.bank.len(),
        dir.display()
    );
    Ok(assets)
}

/// Parse a text map file.
pub fn load_map(path: &Path) -> Result<Map, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::MapIo {
        path: path.to_owned(),
        source,
    })?;
    Map::parse(&text).map_err(|source| LoadError::Map {
        path: path.to_owned(),
        source,
    })
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
