//! Billboard compositor.
//!
//! Runs after the column pass has joined: every live or dead actor in view
//! becomes a [`VisSprite`], the list is painted far to near, and each screen
//! column of a billboard is kept only where it is nearer than the wall the
//! column pass recorded there.

use std::f32::consts::FRAC_PI_2;

use super::{MIN_DIST, Software};
use crate::{
    assets::Assets,
    config::RenderConfig,
    renderer::{Screen, shade},
    sim::{Actor, Game, SpriteKind},
    world::{
        camera::{Camera, normalize_angle},
        sprite::{DIRECTIONS, Sprite, direction_bucket},
    },
};

/// An actor that survived frustum culling this frame.
#[derive(Clone, Debug)]
pub struct VisSprite {
    /// Distance from the camera, cell units.
    pub dist: f32,
    /// Angle off the view direction, radians.
    pub bearing: f32,
    /// Rotation bucket facing the camera.
    pub direction: usize,
    pub actor: Actor,
    pub kind: SpriteKind,
}

/// Depth test of one billboard column against the wall in that column.
#[inline(always)]
pub fn visible_in_column(dist: f32, wall_depth: f32, eps: f32) -> bool {
    dist < wall_depth + eps
}

fn sheet(assets: &Assets, kind: SpriteKind) -> &dyn Sprite {
    match kind {
        SpriteKind::Guard => &assets.guard,
    }
}

impl Software {
    pub(super) fn draw_sprites(&mut self, camera: &Camera, game: &Game, assets: &Assets) {
        self.collect_sprites(camera, game);
        for s in &self.sprites {
            draw_billboard(&mut self.screen, &self.depth, s, camera, assets, &self.cfg);
        }
    }

    /// Gather the actors in view, farthest first.
    pub(super) fn collect_sprites(&mut self, camera: &Camera, game: &Game) {
        let cs = game.config().cell_size;
        let player = game.player();
        let half_fov = camera.fov() * 0.5;
        let half_width = 0.5 * self.cfg.sprite_scale;

        self.sprites.clear();
        for (_, (actor, &kind)) in game.world().query::<(&Actor, &SpriteKind)>().iter() {
            let (dist, bearing) = camera.bearing_to(actor.pos / cs);
            if bearing.abs() >= FRAC_PI_2 || dist < MIN_DIST {
                continue;
            }
            // angular half-width keeps billboards straddling the edge
            if bearing.abs() - (half_width / dist).atan() > half_fov {
                continue;
            }
            let facing = normalize_angle(actor.rotation - actor.angle_to(player.pos));
            self.sprites.push(VisSprite {
                dist,
                bearing,
                direction: direction_bucket(facing, DIRECTIONS),
                actor: actor.clone(),
                kind,
            });
        }
        self.sprites.sort_by(|a, b| b.dist.total_cmp(&a.dist));
        log::trace!("{} sprites in view", self.sprites.len());
    }
}

/// Paint one billboard, scaled by perpendicular distance and centred on the
/// horizon.
fn draw_billboard(
    screen: &mut Screen,
    depth: &[f32],
    s: &VisSprite,
    camera: &Camera,
    assets: &Assets,
    cfg: &RenderConfig,
) {
    let sheet = sheet(assets, s.kind);
    let tex = sheet.texture(s.direction, s.actor.pose());
    let key = sheet.transparent();

    let (w, h) = (screen.width() as f32, screen.height() as f32);
    let perp = (s.dist * s.bearing.cos()).max(MIN_DIST);
    let size = h / perp * cfg.sprite_scale;
    let left = camera.column_of_bearing(s.bearing, screen.width()) - size * 0.5;
    let top = (h - size) * 0.5;
    let intensity = 1.0 - (s.dist / cfg.max_shade_distance).clamp(0.0, 1.0);

    let x0 = left.clamp(0.0, w) as usize;
    let x1 = (left + size).clamp(0.0, w) as usize;
    let y0 = top.clamp(0.0, h) as usize;
    let y1 = (top + size).clamp(0.0, h) as usize;

    for x in x0..x1 {
        if !visible_in_column(s.dist, depth[x], cfg.sprite_depth_epsilon) {
            continue;
        }
        let tx = (((x as f32 - left) / size * tex.w as f32) as usize).min(tex.w - 1);
        for y in y0..y1 {
            let ty = (((y as f32 - top) / size * tex.h as f32) as usize).min(tex.h - 1);
            let texel = tex.rgb(tx, ty);
            if texel != key {
                screen.set(x as i32, y as i32, shade(texel, intensity));
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
