use super::{Rgba, pack, shade};
use crate::world::texture::Texture;

/// W×H frame-buffer, row-major, with the handful of 2-D primitives the
/// HUD and the sprite compositor need. Writes outside the buffer are
/// silently clipped.
#[derive(Clone, Debug, Default)]
pub struct Screen {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Screen {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Change the resolution; contents are unspecified afterwards.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.resize(width * height, 0);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    pub fn clear(&mut self, col: Rgba) {
        self.pixels.fill(col);
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    #[inline(always)]
    pub fn set(&mut self, x: i32, y: i32, col: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = col;
        }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: usize, h: usize, col: Rgba) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x + w as i32).clamp(0, self.width as i32) as usize;
        let y1 = (y + h as i32).clamp(0, self.height as i32) as usize;
        for row in y0..y1 {
            let base = row * self.width;
            self.pixels[base + x0.min(x1)..base + x1].fill(col);
        }
    }

    /// Integer Bresenham; both endpoints are drawn.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, col: Rgba) {
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set(x, y, col);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Nearest-neighbour blit of `tex` scaled into the `w`×`h` rectangle at
    /// `(x, y)`, skipping texels equal to `key`.
    #[allow(clippy::too_many_arguments)]
    pub fn blit_keyed(
        &mut self,
        tex: &Texture,
        key: [u8; 3],
        x: i32,
        y: i32,
        w: usize,
        h: usize,
        intensity: f32,
    ) {
        if w == 0 || h == 0 {
            return;
        }
        for dy in 0..h {
            let ty = dy * tex.h / h;
            for dx in 0..w {
                let texel = tex.rgb(dx * tex.w / w, ty);
                if texel == key {
                    continue;
                }
                let col = if intensity >= 1.0 {
                    pack(texel)
                } else {
                    shade(texel, intensity)
                };
                self.set(x + dx as i32, y + dy as i32, col);
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
