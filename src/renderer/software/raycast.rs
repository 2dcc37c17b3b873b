//! Wall column pass.

use rayon::prelude::*;

use super::{MIN_DIST, Software, planes};
use crate::{
    assets::Assets,
    config::RenderConfig,
    renderer::{Rgba, shade},
    world::{
        camera::Camera,
        map::Map,
        ray::{Side, WallHit, cast_ray},
    },
};

/// Vertical extent of one wall slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSpan {
    /// Unclipped projected height in pixels.
    pub line: f32,
    /// First covered row.
    pub start: usize,
    /// One past the last covered row.
    pub end: usize,
}

/// Project a wall at perpendicular distance `perp` (cell units) onto a
/// screen `h` rows tall, centred on the horizon.
#[inline]
pub fn wall_span(h: usize, perp: f32) -> WallSpan {
    let hf = h as f32;
    let line = hf / perp.max(MIN_DIST);
    WallSpan {
        line,
        start: ((hf - line) * 0.5).max(0.0) as usize,
        end: ((hf + line) * 0.5).min(hf) as usize,
    }
}

/// Read-only state shared by every column of a frame.
pub(super) struct ColumnCtx<'a> {
    pub camera: &'a Camera,
    pub map: &'a Map,
    pub assets: &'a Assets,
    pub cfg: &'a RenderConfig,
    pub width: usize,
}

/// Distance fade plus the flat darkening of Y-facing walls.
#[inline]
fn wall_intensity(perp: f32, side: Side, cfg: &RenderConfig) -> f32 {
    let bias = match side {
        Side::X => 0.0,
        Side::Y => cfg.side_shade_bias,
    };
    1.0 - (perp / cfg.max_shade_distance + bias).clamp(0.0, 1.0)
}

/// Fill one column (`column.len()` rows, top to bottom) and return its hit.
pub(super) fn render_column(x: usize, column: &mut [Rgba], ctx: &ColumnCtx) -> WallHit {
    let h = column.len();
    let angle = ctx.camera.ray_angle(x, ctx.width);
    let hit = cast_ray(ctx.map, ctx.camera.pos(), angle);
    let perp = hit.corrected(angle, ctx.camera.yaw());
    let span = wall_span(h, perp);

    let size = ctx.assets.texture_size;
    let tex = ctx.assets.wall(hit.code);
    let tx = hit.tex_x(size);
    let intensity = wall_intensity(perp, hit.side, ctx.cfg);

    let step = size as f32 / span.line;
    let mut tex_pos = (span.start as f32 - h as f32 * 0.5 + span.line * 0.5) * step;
    for px in &mut column[span.start..span.end] {
        let ty = tex_pos as usize & (size - 1);
        tex_pos += step;
        *px = shade(tex.rgb(tx, ty), intensity);
    }

    planes::fill_planes(column, span, hit.dir, (angle - ctx.camera.yaw()).cos(), ctx);
    hit
}

impl Software {
    /// Render every column into the column-major scratch and record the
    /// per-column depth and hit.
    pub(super) fn cast_columns(&mut self, camera: &Camera, map: &Map, assets: &Assets) {
        let h = self.height;
        let ctx = ColumnCtx {
            camera,
            map,
            assets,
            cfg: &self.cfg,
            width: self.width,
        };

        let store = |x: usize, col: &mut [Rgba], depth: &mut f32, slot: &mut Option<WallHit>| {
            let hit = render_column(x, col, &ctx);
            *depth = hit.distance;
            *slot = Some(hit);
        };

        if self.cfg.parallel {
            self.columns
                .par_chunks_mut(h)
                .zip(self.depth.par_iter_mut())
                .zip(self.hits.par_iter_mut())
                .enumerate()
                .for_each(|(x, ((col, depth), slot))| store(x, col, depth, slot));
        } else {
            self.columns
                .chunks_mut(h)
                .zip(self.depth.iter_mut())
                .zip(self.hits.iter_mut())
                .enumerate()
                .for_each(|(x, ((col, depth), slot))| store(x, col, depth, slot));
        }
    }

    /// Transpose the column scratch into the row-major screen.
    pub(super) fn present_columns(&mut self) {
        let (w, h) = (self.width, self.height);
        let columns = &self.columns;
        let copy_row = |y: usize, row: &mut [Rgba]| {
            for (x, px) in row.iter_mut().enumerate() {
                *px = columns[x * h + y];
            }
        };

        if self.cfg.parallel {
            self.screen
                .pixels_mut()
                .par_chunks_mut(w)
                .enumerate()
                .for_each(|(y, row)| copy_row(y, row));
        } else {
            self.screen
                .pixels_mut()
                .chunks_mut(w)
                .enumerate()
                .for_each(|(y, row)| copy_row(y, row));
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
