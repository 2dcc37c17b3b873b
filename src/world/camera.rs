use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Wrap an angle into `(-π, π]`.
#[inline]
pub fn normalize_angle(a: f32) -> f32 {
    let r = (a + PI).rem_euclid(TAU) - PI;
    if r <= -PI { r + TAU } else { r }
}

/// Player view-point on the tile grid.
///
/// * Position is in **cell units** (world units / cell size) so the DDA can
///   index the map directly.
/// * Only yaw is simulated; the horizon sits at the screen centre.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pos: Vec2,
    yaw: f32, // radians, 0 = +X, grows towards +Y (screen-down on the minimap)
    fov: f32, // horizontal FoV, radians
}

impl Camera {
    /// Create a camera at `pos` (cell units), facing `yaw`, with FoV `fov`.
    pub fn new(pos: Vec2, yaw: f32, fov: f32) -> Self {
        Self { pos, yaw, fov }
    }

    /// Camera for an actor standing at world position `pos`.
    pub fn from_world(pos: Vec2, yaw: f32, fov: f32, cell_size: f32) -> Self {
        Self::new(pos / cell_size, yaw, fov)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks.
    #[inline(always)]
    pub fn forward(self) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        Vec2::new(c, s)
    }

    /// Unit vector pointing to the camera's right (screen +x).
    #[inline(always)]
    pub fn right(self) -> Vec2 {
        self.forward().perp()
    }

    /*───────────────── projection helpers ─────────────────*/

    /// Angle of the ray through screen column `x`:
    /// `yaw − fov/2 + x·fov/width`.
    #[inline(always)]
    pub fn ray_angle(self, x: usize, width: usize) -> f32 {
        self.yaw - self.fov * 0.5 + x as f32 * (self.fov / width as f32)
    }

    /// Inverse of [`Camera::ray_angle`]: fractional column of a bearing
    /// measured relative to the view direction.
    #[inline]
    pub fn column_of_bearing(self, bearing: f32, width: usize) -> f32 {
        (bearing + self.fov * 0.5) * width as f32 / self.fov
    }

    /// Distance and view-relative bearing (in `(-π, π]`) of point `p`.
    pub fn bearing_to(self, p: Vec2) -> (f32, f32) {
        let rel = p - self.pos;
        let bearing = normalize_angle(rel.y.atan2(rel.x) - self.yaw);
        (rel.length(), bearing)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
