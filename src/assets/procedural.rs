//! In-memory asset set: the same names, sizes and sheet layouts as the
//! on-disk one, painted from simple patterns.

use super::{Assets, CEILING, FLOOR, RawAssets};
use crate::world::sprite::{
    DIRECTIONS, GUARD_FRAME, GUARD_KEY, GUARD_PADDING, PISTOL_FRAME, PISTOL_KEY,
};
use crate::world::texture::Texture;

type Rgb = [u8; 3];

fn paint(name: &str, w: usize, h: usize, f: impl Fn(usize, usize) -> Rgb) -> Texture {
    let mut pixels = Vec::with_capacity(w * h * 3);
    for y in 0..h {
        for x in 0..w {
            pixels.extend_from_slice(&f(x, y));
        }
    }
    Texture::new(name, w, h, pixels)
}

/*──────────────────────────── surfaces ────────────────────────────*/

fn bricks(name: &str, size: usize, brick: Rgb, mortar: Rgb) -> Texture {
    let course = (size / 8).max(1);
    let length = (size / 4).max(1);
    paint(name, size, size, |x, y| {
        let row = y / course;
        let shift = if row % 2 == 1 { length / 2 } else { 0 };
        if y % course == 0 || (x + shift) % length == 0 {
            mortar
        } else {
            brick
        }
    })
}

fn planks(name: &str, size: usize) -> Texture {
    let plank = (size / 4).max(1);
    paint(name, size, size, |x, y| {
        if x % plank == 0 {
            [60, 36, 18]
        } else {
            let grain = ((y * 7 + x * 3) % 11) as u8;
            [120 + grain, 78 + grain / 2, 40]
        }
    })
}

fn door(size: usize) -> Texture {
    let edge = (size / 16).max(1);
    paint("door", size, size, |x, y| {
        let border = x < edge || y < edge || x >= size - edge || y >= size - edge;
        if border || x == size / 2 {
            [50, 60, 72]
        } else if (y % (size / 4).max(1)) == size / 8 && (x % 4) == 2 {
            [200, 200, 210] // rivets
        } else {
            [96, 116, 136]
        }
    })
}

fn exit(size: usize) -> Texture {
    let band = (size / 8).max(1);
    paint("exit", size, size, |_, y| {
        if (y / band) % 2 == 0 {
            [36, 140, 64]
        } else {
            [220, 200, 40]
        }
    })
}

/*──────────────────────────── guard ───────────────────────────────*/

const UNIFORM: Rgb = [112, 96, 56];
const SKIN: Rgb = [220, 170, 130];
const BOOTS: Rgb = [40, 30, 20];
const BLOOD: Rgb = [150, 0, 0];

#[inline]
fn within(v: usize, lo: usize, hi: usize) -> bool {
    (lo..hi).contains(&v)
}

/// Upright guard. `face` nudges the nose dot to show the rotation,
/// `stride` spreads the legs.
fn guard_upright(direction: usize, stride: isize, lx: usize, ly: usize) -> Option<Rgb> {
    const FACE: [isize; DIRECTIONS] = [0, 4, 6, 4, 0, -4, -6, -4];
    let dx = lx as isize - 32;
    let dy = ly as isize - 12;

    if dx * dx + dy * dy < 49 {
        let nose = 32 + FACE[direction];
        // no face from behind
        if direction != 4 && ly == 12 && lx as isize == nose {
            return Some([0, 0, 0]);
        }
        return Some(SKIN);
    }
    if within(ly, 20, 44) && within(lx, 22, 42) {
        return Some(if within(ly, 40, 42) { BOOTS } else { UNIFORM });
    }
    if within(ly, 22, 40) && (within(lx, 18, 22) || within(lx, 42, 46)) {
        return Some(UNIFORM);
    }
    if within(ly, 44, 62) {
        let left = (24 + stride) as usize;
        let right = (33 - stride) as usize;
        if within(lx, left, left + 7) || within(lx, right, right + 7) {
            return Some(if ly >= 58 { BOOTS } else { UNIFORM });
        }
    }
    None
}

/// Collapsing guard, `frame` 0‥4; the last frame lies flat.
fn guard_dying(frame: usize, lx: usize, ly: usize) -> Option<Rgb> {
    if frame == 4 {
        return match (lx, ly) {
            (8..=15, 52..=61) => Some(BLOOD),
            (16..=55, 52..=61) => Some(UNIFORM),
            _ => None,
        };
    }
    let top = 8 + frame * 11;
    if ly < top {
        return None;
    }
    // compress the upright figure into the rows below `top`
    let src = (ly - top) * 64 / (64 - top);
    guard_upright(0, 0, lx, src.min(63)).map(|c| if frame >= 2 && src < 30 { BLOOD } else { c })
}

/// 8 × 6 grid of 64-px frames with 1-px dividers.
pub fn guard_sheet() -> Texture {
    let pitch = GUARD_FRAME + GUARD_PADDING;
    let w = DIRECTIONS * pitch - GUARD_PADDING;
    let h = 6 * pitch - GUARD_PADDING;
    let mut pixels = GUARD_KEY.repeat(w * h);

    for row in 0..6 {
        for col in 0..DIRECTIONS {
            for ly in 0..GUARD_FRAME {
                for lx in 0..GUARD_FRAME {
                    let texel = match row {
                        0 => guard_upright(col, 0, lx, ly),
                        1..=4 => guard_upright(col, [2, 0, -2, 0][row - 1], lx, ly),
                        _ if col < 5 => guard_dying(col, lx, ly),
                        _ => None,
                    };
                    if let Some(c) = texel {
                        let i = ((row * pitch + ly) * w + col * pitch + lx) * 3;
                        pixels[i..i + 3].copy_from_slice(&c);
                    }
                }
            }
        }
    }
    Texture::new("enemy", w, h, pixels)
}

/*──────────────────────────── pistol ──────────────────────────────*/

fn pistol_texel(frame: usize, lx: usize, ly: usize) -> Option<Rgb> {
    let kick = if matches!(frame, 1 | 2) { 8 } else { 0 };
    let ly = ly + kick;

    if matches!(frame, 1 | 2) {
        let dx = lx as isize - 64;
        let dy = ly as isize - 48 - kick as isize;
        if dx * dx + dy * dy < 144 {
            return Some([255, 230, 80]);
        }
    }
    match (lx, ly) {
        (56..=71, 60..=99) => Some([60, 60, 64]),
        (48..=79, 100..=127) if lx < 52 || lx > 75 => Some(SKIN),
        (52..=75, 100..=127) => Some([90, 60, 30]),
        _ => None,
    }
}

/// 3 × 2 grid of 128-px frames, no dividers.
pub fn pistol_sheet() -> Texture {
    let w = 3 * PISTOL_FRAME;
    let h = 2 * PISTOL_FRAME;
    paint("pistol", w, h, |x, y| {
        let frame = (y / PISTOL_FRAME) * 3 + x / PISTOL_FRAME;
        pistol_texel(frame, x % PISTOL_FRAME, y % PISTOL_FRAME).unwrap_or(PISTOL_KEY)
    })
}

/*──────────────────────────── sets ────────────────────────────────*/

/// Undecorated set, same shape as the loader's input.
pub fn raw(size: usize) -> RawAssets {
    let cell = (size / 4).max(1);
    RawAssets {
        textures: vec![
            bricks("wall1", size, [124, 124, 124], [72, 72, 72]),
            bricks("wall2", size, [40, 60, 150], [20, 30, 80]),
            planks("wall3", size),
            door(size),
            exit(size),
            Texture::checker(FLOOR, size, cell, [72, 72, 72], [92, 92, 92]),
            Texture::checker(CEILING, size, size, [56, 56, 60], [56, 56, 60]),
        ],
        guard_sheet: guard_sheet(),
        pistol_sheet: pistol_sheet(),
    }
}

/// Ready-to-render procedural set with `size`² surface textures.
///
/// `size` must be a power of two.
pub fn assets(size: usize) -> Assets {
    match Assets::assemble(raw(size), size) {
        Ok(a) => a,
        Err(e) => panic!("procedural asset set rejected: {e}"),
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::sprite::Sprite;

    #[test]
    fn sheets_have_the_expected_layout() {
        let g = guard_sheet();
        assert_eq!((g.w, g.h), (519, 389));
        // dividers and unused dying slots stay transparent
        assert_eq!(g.rgb(64, 10), GUARD_KEY);
        assert_eq!(g.rgb(6 * 65 + 30, 5 * 65 + 30), GUARD_KEY);

        let p = pistol_sheet();
        assert_eq!((p.w, p.h), (384, 256));
    }

    #[test]
    fn frames_contain_both_key_and_figure() {
        let a = assets(16);
        for i in 0..a.guard.frame_count() {
            let f = a.guard.frame(i);
            let keyed = (0..64 * 64).filter(|&k| f.rgb(k % 64, k / 64) == GUARD_KEY).count();
            assert!(keyed > 0 && keyed < 64 * 64, "guard frame {i}");
        }
        for i in 0..a.pistol.frame_count() {
            let f = a.pistol.frame(i);
            assert_eq!(f.rgb(0, 0), PISTOL_KEY);
            assert_ne!(f.rgb(64, 110), PISTOL_KEY, "pistol frame {i}");
        }
    }

    #[test]
    fn directions_render_differently() {
        let a = assets(16);
        assert_ne!(a.guard.frame(0).pixels, a.guard.frame(2).pixels);
        assert_ne!(a.guard.frame(8).pixels, a.guard.frame(10).pixels);
    }
}
