use super::Software;
use crate::{
    assets::Assets,
    renderer::{Rgba, Screen},
    sim::{Actor, ActorState, Game},
    world::{
        map::{CellKind, Map},
        sprite::Sprite,
    },
};

const WALL: Rgba = 0x00_FF_FF_FF;
const FLOOR: Rgba = 0x00_00_00_00;
const DOOR: Rgba = 0x00_8C_A0_C8;
const EXIT: Rgba = 0x00_24_C8_40;
const PLAYER: Rgba = 0x00_00_FF_FF;
const ENEMY: Rgba = 0x00_FF_00_00;
const CORPSE: Rgba = 0x00_60_00_00;
const CROSSHAIR: Rgba = 0x00_F0_F0_F0;

const MARGIN: i32 = 4;
/// Vertical weapon offset per walking frame, in 1/48ths of the screen height.
const BOB: [i32; 4] = [0, 1, 2, 1];

fn cell_colour(code: i32) -> Rgba {
    match CellKind::of_code(code) {
        CellKind::Wall | CellKind::Secret => WALL,
        CellKind::Door => DOOR,
        CellKind::Exit => EXIT,
        CellKind::None => FLOOR,
    }
}

impl Software {
    pub(super) fn draw_hud(&mut self, game: &Game, assets: &Assets) {
        if self.cfg.minimap {
            draw_minimap(&mut self.screen, game, self.cfg.minimap_cell_px);
        }
        draw_weapon(&mut self.screen, game.player(), assets);
        draw_crosshair(&mut self.screen);
    }
}

/// Top-left corner of the minimap: lower-left of the screen.
fn minimap_origin(screen: &Screen, map: &Map, px: usize) -> (i32, i32) {
    let h = (map.height() * px) as i32;
    (MARGIN, screen.height() as i32 - h - MARGIN)
}

fn draw_minimap(screen: &mut Screen, game: &Game, px: usize) {
    let map = game.map();
    let (ox, oy) = minimap_origin(screen, map, px);
    for (i, &code) in map.cells().iter().enumerate() {
        let (cx, cy) = ((i % map.width()) as i32, (i / map.width()) as i32);
        screen.fill_rect(ox + cx * px as i32, oy + cy * px as i32, px, px, cell_colour(code));
    }

    let scale = px as f32 / game.config().cell_size;
    let marker = |screen: &mut Screen, a: &Actor, col: Rgba| {
        let x = ox + (a.pos.x * scale) as i32;
        let y = oy + (a.pos.y * scale) as i32;
        screen.fill_rect(x - 1, y - 1, 3, 3, col);
        let reach = 2.0 * px as f32;
        let (s, c) = a.rotation.sin_cos();
        screen.draw_line(x, y, x + (c * reach) as i32, y + (s * reach) as i32, col);
    };

    for (_, a) in game.world().query::<&Actor>().iter() {
        if a.is_alive() {
            marker(screen, a, ENEMY);
        } else {
            let x = ox + (a.pos.x * scale) as i32;
            let y = oy + (a.pos.y * scale) as i32;
            screen.fill_rect(x - 1, y - 1, 3, 3, CORPSE);
        }
    }
    marker(screen, game.player(), PLAYER);
}

/// Held pistol, bottom centre, half the screen tall.
fn draw_weapon(screen: &mut Screen, player: &Actor, assets: &Assets) {
    let (w, h) = (screen.width() as i32, screen.height() as i32);
    let size = screen.height() / 2;
    let bob = match player.state {
        ActorState::Walking => BOB[player.walking_frame % BOB.len()] * h / 48,
        _ => 0,
    };
    let tex = assets.pistol.texture(0, player.pose());
    let key = assets.pistol.transparent();
    // a narrow screen clips the sprite on both sides
    screen.blit_keyed(
        tex,
        key,
        (w - size as i32) / 2,
        h - size as i32 + bob,
        size,
        size,
        1.0,
    );
}

fn draw_crosshair(screen: &mut Screen) {
    let (cx, cy) = (screen.width() as i32 / 2, screen.height() as i32 / 2);
    screen.fill_rect(cx - 1, cy - 1, 3, 3, CROSSHAIR);
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
