//! Rendering abstraction layer.
//!
//! *The simulation never touches a pixel buffer directly.*
//! A type implementing [`Renderer`] reads the [`Game`] state and the decoded
//! [`Assets`] and produces one finished frame per tick.
//!
//! * Back-ends can be swapped without changing game logic.
//! * A helper blanket‐impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

use crate::assets::Assets;
use crate::sim::Game;

pub mod screen;
pub mod software;

pub use screen::Screen;
pub use software::Software;

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

#[inline(always)]
pub fn pack([r, g, b]: [u8; 3]) -> Rgba {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

#[inline(always)]
pub fn unpack(px: Rgba) -> [u8; 3] {
    [(px >> 16) as u8, (px >> 8) as u8, px as u8]
}

/// Scale every channel by `intensity` (`0.0‥=1.0`) and pack.
#[inline(always)]
pub fn shade([r, g, b]: [u8; 3], intensity: f32) -> Rgba {
    let k = intensity.clamp(0.0, 1.0);
    pack([
        (r as f32 * k) as u8,
        (g as f32 * k) as u8,
        (b as f32 * k) as u8,
    ])
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Walls, floor and ceiling, sprites, then the HUD, as seen by the player.
    fn draw_level(&mut self, game: &Game, assets: &Assets);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(&mut self, width: usize, height: usize, game: &Game, assets: &Assets, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        self.draw_level(game, assets);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_round_trip_and_shading() {
        let c = [200, 100, 50];
        assert_eq!(pack(c), 0x00_C8_64_32);
        assert_eq!(unpack(pack(c)), c);
        assert_eq!(shade(c, 1.0), pack(c));
        assert_eq!(shade(c, 0.5), pack([100, 50, 25]));
        assert_eq!(shade(c, -3.0), 0);
    }
}
