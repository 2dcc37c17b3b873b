//! Grid ray traversal (Amanatides–Woo DDA).
//!
//! Everything here is in **cell units**: the origin is a world position
//! divided by the cell size, so cell `(cx, cy)` spans `[cx, cx+1) × [cy, cy+1)`.

use glam::{IVec2, Vec2};

use super::map::Map;

/// Which family of grid lines the ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Stepped along X: the face is a vertical (X-facing) wall.
    X,
    /// Stepped along Y: the face is a horizontal (Y-facing) wall.
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallHit {
    pub side: Side,
    /// Map code of the cell that stopped the ray (`> 0`).
    pub code: i32,
    pub cell: IVec2,
    /// Distance along the ray to the face. Not fish-eye corrected.
    pub distance: f32,
    /// Unit ray direction.
    pub dir: Vec2,
    /// Where along the face the ray struck, in `[0, 1)`.
    pub wall_x: f32,
    /// Cells visited before the hit.
    pub steps: u32,
}

#[inline(always)]
fn inv_abs(v: f32) -> f32 {
    if v == 0.0 { f32::INFINITY } else { (1.0 / v).abs() }
}

/// March from `origin` along `angle` until a cell with a positive code.
///
/// Cells outside the grid read as [`super::map::DEFAULT_WALL`], so the loop
/// terminates after at most `width + height` steps for an origin inside the
/// grid, whatever the map border looks like.
pub fn cast_ray(map: &Map, origin: Vec2, angle: f32) -> WallHit {
    let dir = Vec2::from_angle(angle);
    let delta = Vec2::new(inv_abs(dir.x), inv_abs(dir.y));
    let mut cell = origin.floor().as_ivec2();
    let step = IVec2::new(
        if dir.x < 0.0 { -1 } else { 1 },
        if dir.y < 0.0 { -1 } else { 1 },
    );

    // a zero component never crosses a line of its own axis; assign INF
    // directly instead of 0·INF
    let first = |d: f32, o: f32, c: i32, dd: f32| {
        if d == 0.0 {
            f32::INFINITY
        } else if d < 0.0 {
            (o - c as f32) * dd
        } else {
            (c as f32 + 1.0 - o) * dd
        }
    };
    let mut side_dist = Vec2::new(
        first(dir.x, origin.x, cell.x, delta.x),
        first(dir.y, origin.y, cell.y, delta.y),
    );

    let mut side;
    let mut steps = 0u32;
    let code = loop {
        if side_dist.x < side_dist.y {
            side_dist.x += delta.x;
            cell.x += step.x;
            side = Side::X;
        } else {
            side_dist.y += delta.y;
            cell.y += step.y;
            side = Side::Y;
        }
        steps += 1;

        let code = map.solid_code(cell.x, cell.y);
        if code > 0 {
            break code;
        }
    };

    let distance = match side {
        Side::X => (cell.x as f32 - origin.x + (1 - step.x) as f32 * 0.5) / dir.x,
        Side::Y => (cell.y as f32 - origin.y + (1 - step.y) as f32 * 0.5) / dir.y,
    };
    let along = match side {
        Side::X => origin.y + distance * dir.y,
        Side::Y => origin.x + distance * dir.x,
    };

    WallHit {
        side,
        code,
        cell,
        distance,
        dir,
        wall_x: along - along.floor(),
        steps,
    }
}

impl WallHit {
    /// Distance projected onto the view direction (removes fish-eye).
    #[inline]
    pub fn corrected(&self, ray_angle: f32, yaw: f32) -> f32 {
        self.distance * (ray_angle - yaw).cos()
    }

    /// Texture column for a `size`-wide texture.
    ///
    /// Mirrored for faces seen from +X or −Y so every face reads the same
    /// way round whichever side it is approached from.
    pub fn tex_x(&self, size: usize) -> usize {
        let tx = ((self.wall_x * size as f32) as usize).min(size - 1);
        let mirror = match self.side {
            Side::X => self.dir.x > 0.0,
            Side::Y => self.dir.y < 0.0,
        };
        if mirror { size - tx - 1 } else { tx }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
