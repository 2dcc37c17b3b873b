use crate::{
    assets::Assets,
    config::RenderConfig,
    renderer::{Renderer, Rgba, Screen, software::sprites::VisSprite},
    sim::Game,
    world::ray::WallHit,
};

/// Ray-casting back-end.
///
/// Scratch buffers survive across frames and are only reallocated when
/// the resolution changes.
pub struct Software {
    pub(super) cfg: RenderConfig,
    pub(super) screen: Screen,
    /// Column-major: column `x` owns `columns[x*h .. (x+1)*h]`.
    pub(super) columns: Vec<Rgba>,
    /// Uncorrected ray distance per column, cell units.
    pub(super) depth: Vec<f32>,
    pub(super) hits: Vec<Option<WallHit>>,
    pub(super) sprites: Vec<VisSprite>,

    pub(super) width: usize,
    pub(super) height: usize,
}

impl Default for Software {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl Software {
    pub fn new(cfg: RenderConfig) -> Self {
        Self {
            cfg,
            screen: Screen::default(),
            columns: Vec::new(),
            depth: Vec::new(),
            hits: Vec::new(),
            sprites: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Wall distance per column of the last frame.
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    /// Wall hit per column of the last frame.
    pub fn hits(&self) -> &[Option<WallHit>] {
        &self.hits
    }

    /// Billboards drawn in the last frame, far to near.
    pub fn visible_sprites(&self) -> &[VisSprite] {
        &self.sprites
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.screen.resize(w, h);
            self.columns.resize(w * h, 0);
            self.depth.resize(w, f32::INFINITY);
            self.hits.resize(w, None);
        }

        // dark-grey clear
        self.screen.clear(0x00_20_20_20);
        self.depth.fill(f32::INFINITY);
        self.hits.fill(None);
        self.sprites.clear();
    }

    fn draw_level(&mut self, game: &Game, assets: &Assets) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let camera = game.camera(self.cfg.fov());

        // walls, floor and ceiling; returns after every column is done
        self.cast_columns(&camera, game.map(), assets);
        self.present_columns();

        self.draw_sprites(&camera, game, assets);
        self.draw_hud(game, assets);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(self.screen.pixels(), self.width, self.height);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assets::procedural,
        config::SimConfig,
        renderer::{RendererExt, software::wall_span},
        world::{map::Map, ray::Side},
    };
    use glam::Vec2;

    const W: usize = 64;
    const H: usize = 48;

    /// 8×8 sealed room, player at cell (2,2) looking +X at a wall at (5,2).
    const ROOM: &str = "
        1 1 1 1 1 1 1 1
        1 0 0 0 0 0 0 1
        1 0 -1 0 0 3 0 1
        1 0 0 0 0 0 0 1
        1 0 0 0 0 0 0 1
        1 0 0 0 0 0 0 1
        1 0 0 0 0 0 0 1
        1 1 1 1 1 1 1 1
    ";

    fn cfg(parallel: bool) -> RenderConfig {
        RenderConfig {
            parallel,
            minimap: false,
            ..RenderConfig::default()
        }
    }

    fn render(sw: &mut Software, game: &Game) -> Vec<Rgba> {
        let assets = procedural::assets(16);
        let mut out = Vec::new();
        sw.draw_frame(W, H, game, &assets, |fb, w, h| {
            assert_eq!((w, h), (W, H));
            out = fb.to_vec();
        });
        out
    }

    fn room() -> Game {
        Game::new(Map::parse(ROOM).unwrap(), SimConfig::default()).unwrap()
    }

    #[test]
    fn centre_column_hits_the_wall_ahead() {
        let game = room();
        assert_eq!(game.player().pos, Vec2::new(12.5, 12.5));
        let mut sw = Software::new(cfg(true));
        render(&mut sw, &game);

        let hit = sw.hits()[W / 2].unwrap();
        assert_eq!(hit.code, 3);
        assert_eq!(hit.side, Side::X);
        assert!((hit.distance - 2.5).abs() < 1e-5, "{}", hit.distance);
        assert!((sw.depth()[W / 2] - 2.5).abs() < 1e-5);

        let span = wall_span(H, hit.corrected(game.player().rotation, game.player().rotation));
        assert!((span.line - H as f32 / 2.5).abs() < 1e-4);
    }

    #[test]
    fn every_column_gets_a_hit_and_depth() {
        let game = room();
        let mut sw = Software::new(cfg(true));
        render(&mut sw, &game);
        assert!(sw.hits().iter().all(|h| h.is_some_and(|h| h.code > 0)));
        assert!(sw.depth().iter().all(|d| d.is_finite() && *d > 0.0));
    }

    #[test]
    fn parallel_and_serial_frames_match() {
        let game = room();
        let a = render(&mut Software::new(cfg(true)), &game);
        let b = render(&mut Software::new(cfg(false)), &game);
        assert_eq!(a, b);
    }

    #[test]
    fn frame_is_fully_overwritten() {
        let game = room();
        let mut sw = Software::new(cfg(false));
        let first = render(&mut sw, &game);
        let second = render(&mut sw, &game);
        assert_eq!(first, second);
        // nothing keeps the clear colour
        assert!(!first.contains(&0x00_20_20_20));
    }

    /// Same room with a pillar at (4,2); the player stands at (1.5, 2.5).
    const PILLAR: &str = "
        1 1 1 1 1 1 1 1 1 1 1 1
        1 -1 0 0 0 0 0 0 0 0 0 1
        1 0 0 0 2 0 0 0 0 0 0 1
        1 0 0 0 0 0 0 0 0 0 0 1
        1 1 1 1 1 1 1 1 1 1 1 1
    ";

    fn pillar_game(enemy_at: Option<Vec2>) -> Game {
        let mut game = Game::new(Map::parse(PILLAR).unwrap(), SimConfig::default()).unwrap();
        let cs = game.config().cell_size;
        // face the pillar from (1.5, 2.5)
        game.player_mut().pos = Vec2::new(1.5, 2.5) * cs;
        if let Some(p) = enemy_at {
            game.spawn_enemy(p * cs, std::f32::consts::PI);
        }
        game
    }

    #[test]
    fn sprite_behind_wall_is_hidden() {
        let empty = render(&mut Software::new(cfg(true)), &pillar_game(None));
        let hidden = render(
            &mut Software::new(cfg(true)),
            &pillar_game(Some(Vec2::new(8.5, 2.5))),
        );
        assert_eq!(empty, hidden);
    }

    #[test]
    fn sprite_in_front_of_wall_is_drawn() {
        let empty = render(&mut Software::new(cfg(true)), &pillar_game(None));
        let mut sw = Software::new(cfg(true));
        let shown = render(&mut sw, &pillar_game(Some(Vec2::new(3.0, 2.5))));
        assert_eq!(sw.visible_sprites().len(), 1);
        assert_ne!(empty, shown);
        // drawn over the wall columns in the upper half
        let changed = (0..H / 2)
            .flat_map(|y| (0..W).map(move |x| y * W + x))
            .filter(|&i| empty[i] != shown[i])
            .count();
        assert!(changed > 0);
    }

    #[test]
    fn sprite_behind_the_player_is_culled() {
        let mut sw = Software::new(cfg(true));
        render(&mut sw, &pillar_game(Some(Vec2::new(1.5, 3.5))));
        assert!(sw.visible_sprites().is_empty());
    }

    #[test]
    fn sprites_sort_far_to_near() {
        let mut game = pillar_game(Some(Vec2::new(3.0, 2.2)));
        let cs = game.config().cell_size;
        game.spawn_enemy(Vec2::new(2.5, 2.8) * cs, 0.0);
        game.spawn_enemy(Vec2::new(3.5, 2.6) * cs, 0.0);
        let mut sw = Software::new(cfg(true));
        render(&mut sw, &game);
        let d: Vec<f32> = sw.visible_sprites().iter().map(|s| s.dist).collect();
        assert_eq!(d.len(), 3);
        assert!(d.windows(2).all(|w| w[0] >= w[1]), "{d:?}");
    }
}
