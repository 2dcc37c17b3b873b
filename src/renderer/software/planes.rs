use glam::Vec2;

use super::raycast::{ColumnCtx, WallSpan};
use crate::renderer::{Rgba, shade};
use crate::world::texture::Texture;

/// Perpendicular distance (cell units) of the floor seen through row `y`
/// of an `h`-row screen, sampled at the pixel centre. `None` on and above
/// the horizon.
#[inline]
pub(super) fn row_distance(h: usize, y: usize) -> Option<f32> {
    let denom = (2 * y + 1) as f32 - h as f32;
    (denom > 0.0).then(|| h as f32 / denom)
}

#[inline(always)]
fn sample(tex: &Texture, p: Vec2, size: usize) -> [u8; 3] {
    let tx = ((p.x - p.x.floor()) * size as f32) as usize & (size - 1);
    let ty = ((p.y - p.y.floor()) * size as f32) as usize & (size - 1);
    tex.rgb(tx, ty)
}

/// Floor below the wall slice, ceiling above it.
///
/// `dir` is the unit ray direction, `cos_delta` the cosine of its angle to
/// the view direction. The ceiling reuses the floor distance of the mirrored
/// row.
pub(super) fn fill_planes(
    column: &mut [Rgba],
    span: WallSpan,
    dir: Vec2,
    cos_delta: f32,
    ctx: &ColumnCtx,
) {
    let h = column.len();
    let size = ctx.assets.texture_size;
    let origin = ctx.camera.pos();
    let cos_delta = cos_delta.max(super::MIN_DIST);

    let floor = ctx.assets.floor();
    let ceiling = ctx.assets.ceiling();

    let point = |row: usize| row_distance(h, row).map(|d| origin + dir * (d / cos_delta));

    for (y, px) in column.iter_mut().enumerate().skip(span.end) {
        *px = match point(y) {
            Some(p) => shade(sample(floor, p, size), ctx.cfg.floor_shade),
            None => 0,
        };
    }
    for (y, px) in column[..span.start].iter_mut().enumerate() {
        *px = match point(h - 1 - y) {
            Some(p) => shade(sample(ceiling, p, size), ctx.cfg.ceiling_shade),
            None => 0,
        };
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assets::{Assets, CEILING, FLOOR, procedural},
        config::RenderConfig,
        renderer::software::raycast::wall_span,
        world::{Camera, Map},
    };

    /// Every texel distinct; `tag` tells floor from ceiling.
    fn gradient(name: &str, size: usize, tag: u8) -> Texture {
        let pixels = (0..size * size)
            .flat_map(|i| [(i % size * 16) as u8, (i / size * 16) as u8, tag])
            .collect();
        Texture::new(name, size, size, pixels)
    }

    fn gradient_assets() -> Assets {
        let mut raw = procedural::raw(16);
        raw.textures.retain(|t| t.name != FLOOR && t.name != CEILING);
        raw.textures.push(gradient(FLOOR, 16, 10));
        raw.textures.push(gradient(CEILING, 16, 200));
        Assets::assemble(raw, 16).unwrap()
    }

    fn texel(p: Vec2) -> (usize, usize) {
        let f = |v: f32| ((v - v.floor()) * 16.0) as usize % 16;
        (f(p.x), f(p.y))
    }

    #[test]
    fn horizon_rows_have_no_distance() {
        assert_eq!(row_distance(48, 0), None);
        assert_eq!(row_distance(48, 23), None);
        assert_eq!(row_distance(48, 24), Some(48.0));
        // odd height: the centre row sits exactly on the horizon
        assert_eq!(row_distance(5, 2), None);
        assert_eq!(row_distance(5, 3), Some(2.5));
    }

    #[test]
    fn distance_shrinks_towards_the_bottom() {
        let h = 480;
        let d: Vec<f32> = (h / 2..h).filter_map(|y| row_distance(h, y)).collect();
        assert_eq!(d.len(), h / 2);
        assert!(d.windows(2).all(|w| w[0] > w[1]));
        // bottom row is a little over half a cell away
        assert!((d[d.len() - 1] - 480.0 / 479.0).abs() < 1e-4);
    }

    #[test]
    fn sampling_wraps_per_cell() {
        let tex = Texture::checker("t", 8, 4, [1; 3], [2; 3]);
        let a = sample(&tex, Vec2::new(0.1, 0.1), 8);
        let b = sample(&tex, Vec2::new(5.1, -2.9), 8);
        assert_eq!(a, b);
        assert_ne!(a, sample(&tex, Vec2::new(0.6, 0.1), 8));
    }

    #[test]
    fn oblique_rows_sample_the_back_projected_floor_point() {
        let assets = gradient_assets();
        let cfg = RenderConfig::default();
        let map = Map::builtin();
        let camera = Camera::new(Vec2::new(2.3, 2.7), 0.4, cfg.fov());
        let ctx = ColumnCtx {
            camera: &camera,
            map: &map,
            assets: &assets,
            cfg: &cfg,
            width: 32,
        };

        // a ray 0.35 rad off the view direction, wall four cells out
        let h = 48;
        let angle = camera.yaw() + 0.35;
        let dir = Vec2::new(angle.cos(), angle.sin());
        let cos_delta = 0.35f32.cos();
        let span = wall_span(h, 4.0);
        let mut column = vec![u32::MAX; h];
        fill_planes(&mut column, span, dir, cos_delta, &ctx);

        let mut straight_misses = 0;
        for y in span.end..h {
            let d = row_distance(h, y).unwrap();
            let p = camera.pos() + dir * (d / cos_delta);
            let (tx, ty) = texel(p);
            let floor = shade(assets.floor().rgb(tx, ty), cfg.floor_shade);
            let ceiling = shade(assets.ceiling().rgb(tx, ty), cfg.ceiling_shade);
            assert_eq!(column[y], floor, "floor row {y}");
            assert_eq!(column[h - 1 - y], ceiling, "ceiling row {}", h - 1 - y);

            // the uncorrected distance lands on a different texel for most rows
            let (sx, sy) = texel(camera.pos() + dir * d);
            if shade(assets.floor().rgb(sx, sy), cfg.floor_shade) != column[y] {
                straight_misses += 1;
            }
        }
        assert!(straight_misses > (h - span.end) / 2, "{straight_misses}");
    }
}
