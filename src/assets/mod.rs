//! Everything the renderer samples, decoded once at startup.
//!
//! * [`loader`] reads the set from an asset directory of `P3` images.
//! * [`procedural`] paints an equivalent set in memory (headless runs, tests).
//!
//! Both funnel into [`Assets::assemble`], which validates sizes, fills the
//! [`TextureBank`] and binds map cell codes to wall textures.

pub mod loader;
pub mod ppm;
pub mod procedural;

pub use loader::{LoadError, load_assets, load_map};

use crate::config::SimConfig;
use crate::world::map::Map;
use crate::world::sprite::{GuardSheet, PistolSheet, Sprite};
use crate::world::texture::{Texture, TextureBank, TextureId};

/// Wall textures, by file stem.
pub const WALL_TEXTURES: [&str; 5] = ["wall1", "wall2", "wall3", "door", "exit"];
pub const FLOOR: &str = "floor";
pub const CEILING: &str = "ceiling";

/// Map cell code → wall texture. Secret walls pass for plain ones.
pub const CELL_BINDINGS: [(i32, &str); 6] = [
    (1, "wall1"),
    (2, "wall2"),
    (3, "wall3"),
    (7, "wall1"),
    (8, "exit"),
    (9, "door"),
];

/// Decoded but not yet validated inputs of [`Assets::assemble`].
pub struct RawAssets {
    /// Walls plus floor and ceiling, keyed by name.
    pub textures: Vec<Texture>,
    pub guard_sheet: Texture,
    pub pistol_sheet: Texture,
}

pub struct Assets {
    pub bank: TextureBank,
    pub floor: TextureId,
    pub ceiling: TextureId,
    pub guard: GuardSheet,
    pub pistol: PistolSheet,
    pub texture_size: usize,
}

impl Assets {
    pub fn assemble(raw: RawAssets, texture_size: usize) -> Result<Self, LoadError> {
        if !texture_size.is_power_of_two() {
            return Err(LoadError::TextureSize(texture_size));
        }

        let mut bank = TextureBank::new();
        for tex in raw.textures {
            if tex.w != texture_size || tex.h != texture_size {
                return Err(LoadError::WrongSize {
                    name: tex.name,
                    w: tex.w,
                    h: tex.h,
                    size: texture_size,
                });
            }
            bank.insert(tex.name.clone(), tex)?;
        }

        let require = |name: &str| bank.id(name).ok_or_else(|| LoadError::Missing(name.to_owned()));
        let floor = require(FLOOR)?;
        let ceiling = require(CEILING)?;
        let bindings = CELL_BINDINGS
            .iter()
            .map(|&(code, name)| Ok((code, require(name)?)))
            .collect::<Result<Vec<_>, LoadError>>()?;
        for (code, id) in bindings {
            bank.bind_cell(code, id)?;
        }

        Ok(Self {
            bank,
            floor,
            ceiling,
            guard: GuardSheet::from_sheet(&raw.guard_sheet)?,
            pistol: PistolSheet::from_sheet(&raw.pistol_sheet)?,
            texture_size,
        })
    }

    /// Every positive code in `map` must have a wall texture.
    pub fn check_map(&self, map: &Map) -> Result<(), LoadError> {
        match map.wall_codes().into_iter().find(|&c| !self.bank.is_bound(c)) {
            Some(code) => Err(LoadError::UnboundCell(code)),
            None => Ok(()),
        }
    }

    /// Animation lengths in `cfg` must fit the loaded sheets.
    pub fn check_animations(&self, cfg: &SimConfig) -> Result<(), LoadError> {
        let checks = [
            ("shooting", cfg.shoot_frames, self.pistol.frame_count()),
            ("dying", cfg.dying_frames, self.guard.dying_frames()),
        ];
        match checks.into_iter().find(|&(_, configured, available)| configured > available) {
            Some((what, configured, available)) => Err(LoadError::FrameCount {
                what,
                configured,
                available,
            }),
            None => Ok(()),
        }
    }

    pub fn floor(&self) -> &Texture {
        self.texture(self.floor)
    }

    pub fn ceiling(&self) -> &Texture {
        self.texture(self.ceiling)
    }

    /// Wall texture for map code `code`.
    ///
    /// Panics when nothing is bound: the map and the asset set disagree,
    /// which [`Assets::check_map`] exists to catch at load time.
    pub fn wall(&self, code: i32) -> &Texture {
        match self.bank.cell_texture(code) {
            Ok(tex) => tex,
            Err(e) => panic!("wall lookup failed: {e}"),
        }
    }

    fn texture(&self, id: TextureId) -> &Texture {
        match self.bank.texture(id) {
            Ok(tex) => tex,
            Err(e) => panic!("texture lookup failed: {e}"),
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_set_binds_every_builtin_code() {
        let assets = procedural::assets(64);
        assets.check_map(&Map::builtin()).unwrap();
        assert_eq!(assets.floor().w, 64);
        assert_eq!(assets.wall(7), assets.wall(1));
        assert_ne!(assets.wall(8), assets.wall(9));
    }

    #[test]
    fn unbound_code_is_rejected_at_load() {
        let assets = procedural::assets(16);
        let map = Map::parse("1 1 1\n1 5 1\n1 1 1").unwrap();
        assert!(matches!(assets.check_map(&map), Err(LoadError::UnboundCell(5))));
    }

    #[test]
    #[should_panic(expected = "wall lookup failed")]
    fn unbound_code_panics_at_render_time() {
        let assets = procedural::assets(16);
        assets.wall(4);
    }

    #[test]
    fn texture_size_must_match() {
        let mut raw = procedural::raw(32);
        raw.textures[0] = Texture::checker("wall1", 16, 4, [0; 3], [9; 3]);
        assert!(matches!(
            Assets::assemble(raw, 32),
            Err(LoadError::WrongSize { w: 16, .. })
        ));
        assert!(matches!(
            Assets::assemble(procedural::raw(24), 24),
            Err(LoadError::TextureSize(24))
        ));
    }

    #[test]
    fn animation_lengths_must_fit_the_sheets() {
        let assets = procedural::assets(16);
        assets.check_animations(&SimConfig::default()).unwrap();

        let cfg = SimConfig {
            dying_frames: 6,
            ..SimConfig::default()
        };
        assert!(matches!(
            assets.check_animations(&cfg),
            Err(LoadError::FrameCount {
                what: "dying",
                configured: 6,
                available: 5
            })
        ));

        let cfg = SimConfig {
            shoot_frames: 7,
            ..SimConfig::default()
        };
        assert!(matches!(
            assets.check_animations(&cfg),
            Err(LoadError::FrameCount {
                what: "shooting",
                configured: 7,
                available: 6
            })
        ));
    }

    #[test]
    fn missing_floor_is_reported() {
        let mut raw = procedural::raw(16);
        raw.textures.retain(|t| t.name != FLOOR);
        assert!(matches!(
            Assets::assemble(raw, 16),
            Err(LoadError::Missing(ref n)) if n == FLOOR
        ));
    }
}
