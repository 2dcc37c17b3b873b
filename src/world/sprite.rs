//! Sprite sheets and the frame-selection rules that sit on top of them.
//!
//! Two layouts exist:
//! * **Guard** – eight rendered rotations per pose (directional + animated).
//! * **Pistol** – a plain run of frames indexed by the shooting animation.
//!
//! Both are reached through the [`Sprite`] trait so the compositor and the
//! HUD never care which one they hold.

use std::f32::consts::TAU;

use thiserror::Error;

use super::texture::Texture;

/// Rendered rotations per directional pose.
pub const DIRECTIONS: usize = 8;

pub const GUARD_FRAME: usize = 64;
pub const GUARD_PADDING: usize = 1;
pub const GUARD_KEY: [u8; 3] = [152, 0, 136];
const GUARD_WALK_ROWS: usize = 4;
const GUARD_DYING_FRAMES: usize = 5;

pub const PISTOL_FRAME: usize = 128;
pub const PISTOL_KEY: [u8; 3] = [0, 255, 255];
const PISTOL_COLS: usize = 3;
const PISTOL_ROWS: usize = 2;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("sheet `{name}` is {w}x{h}, layout needs at least {need_w}x{need_h}")]
pub struct SheetError {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub need_w: usize,
    pub need_h: usize,
}

/// Which of the `num` rotations faces the camera.
///
/// `angle_diff` is the angle between the sprite's own heading and the
/// direction towards the viewer:
///
/// ```text
/// index = n − (((diff / 2π)·n + n) mod n)      (wrapped to 0..n)
/// ```
pub fn direction_bucket(angle_diff: f32, num: usize) -> usize {
    let n = num as f32;
    let slot = ((angle_diff / TAU) * n + n).rem_euclid(n).floor() as usize;
    (num - slot.min(num - 1)) % num
}

/// Animation pose of whatever holds a sheet, with the frame inside it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pose {
    #[default]
    Standing,
    Walking(usize),
    Shooting(usize),
    /// Dying and dead bodies share the dying row.
    Dying(usize),
}

/// A sprite-sheet adaptor: answers "which texture do I draw?".
pub trait Sprite: Send + Sync {
    /// Chroma key; texels of this colour are not drawn.
    fn transparent(&self) -> [u8; 3];

    /// Edge length of one square frame.
    fn size(&self) -> usize;

    /// Frame for `pose` seen from rotation bucket `direction`.
    fn texture(&self, direction: usize, pose: Pose) -> &Texture;

    /// Raw frame by index. Panics when `index` is outside the sheet.
    fn frame(&self, index: usize) -> &Texture;

    fn frame_count(&self) -> usize;
}

/*──────────────────────────── guard ────────────────────────────*/

/// Guard sheet: row 0 standing, rows 1‥4 walking, row 5 dying.
pub struct GuardSheet {
    frames: Vec<Texture>,
}

impl GuardSheet {
    pub fn from_sheet(sheet: &Texture) -> Result<Self, SheetError> {
        let pitch = GUARD_FRAME + GUARD_PADDING;
        let rows = 2 + GUARD_WALK_ROWS;
        let need_w = DIRECTIONS * pitch - GUARD_PADDING;
        let need_h = rows * pitch - GUARD_PADDING;
        if sheet.w < need_w || sheet.h < need_h {
            return Err(SheetError {
                name: sheet.name.clone(),
                w: sheet.w,
                h: sheet.h,
                need_w,
                need_h,
            });
        }

        let sheet_width = DIRECTIONS * GUARD_FRAME;
        let mut frames = Vec::with_capacity((rows - 1) * DIRECTIONS + GUARD_DYING_FRAMES);
        for row in 0..rows {
            let cols = if row == rows - 1 {
                GUARD_DYING_FRAMES
            } else {
                DIRECTIONS
            };
            for col in 0..cols {
                frames.push(sheet.frame(col, row, GUARD_FRAME, sheet_width, GUARD_PADDING));
            }
        }
        Ok(Self { frames })
    }

    /// Frames in the dying row.
    pub fn dying_frames(&self) -> usize {
        GUARD_DYING_FRAMES
    }

    fn standing(&self, direction: usize) -> &Texture {
        self.frame(direction)
    }

    fn walking(&self, direction: usize, walking_frame: usize) -> &Texture {
        assert!(
            walking_frame < GUARD_WALK_ROWS,
            "walking frame {walking_frame} outside the {GUARD_WALK_ROWS} loaded"
        );
        self.frame((1 + walking_frame) * DIRECTIONS + direction)
    }

    fn dying(&self, dying_frame: usize) -> &Texture {
        assert!(
            dying_frame < GUARD_DYING_FRAMES,
            "dying frame {dying_frame} outside the {GUARD_DYING_FRAMES} loaded"
        );
        self.frame((1 + GUARD_WALK_ROWS) * DIRECTIONS + dying_frame)
    }
}

impl Sprite for GuardSheet {
    fn transparent(&self) -> [u8; 3] {
        GUARD_KEY
    }

    fn size(&self) -> usize {
        GUARD_FRAME
    }

    fn texture(&self, direction: usize, pose: Pose) -> &Texture {
        assert!(direction < DIRECTIONS, "direction {direction} out of range");
        match pose {
            Pose::Walking(frame) => self.walking(direction, frame),
            Pose::Dying(frame) => self.dying(frame),
            Pose::Standing | Pose::Shooting(_) => self.standing(direction),
        }
    }

    fn frame(&self, index: usize) -> &Texture {
        assert!(
            index < self.frames.len(),
            "guard frame {index} outside the {} loaded",
            self.frames.len()
        );
        &self.frames[index]
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/*──────────────────────────── pistol ───────────────────────────*/

/// Held weapon: six 128-px frames on a 3×2 grid, no dividers.
pub struct PistolSheet {
    frames: Vec<Texture>,
}

impl PistolSheet {
    pub fn from_sheet(sheet: &Texture) -> Result<Self, SheetError> {
        let need_w = PISTOL_COLS * PISTOL_FRAME;
        let need_h = PISTOL_ROWS * PISTOL_FRAME;
        if sheet.w != need_w || sheet.h < need_h {
            return Err(SheetError {
                name: sheet.name.clone(),
                w: sheet.w,
                h: sheet.h,
                need_w,
                need_h,
            });
        }

        let frames = (0..PISTOL_ROWS)
            .flat_map(|row| (0..PISTOL_COLS).map(move |col| (col, row)))
            .map(|(col, row)| sheet.frame(col, row, PISTOL_FRAME, need_w, 0))
            .collect();
        Ok(Self { frames })
    }
}

impl Sprite for PistolSheet {
    fn transparent(&self) -> [u8; 3] {
        PISTOL_KEY
    }

    fn size(&self) -> usize {
        PISTOL_FRAME
    }

    fn texture(&self, _direction: usize, pose: Pose) -> &Texture {
        match pose {
            Pose::Shooting(frame) => self.frame(frame),
            _ => self.frame(0),
        }
    }

    fn frame(&self, index: usize) -> &Texture {
        assert!(
            index < self.frames.len(),
            "pistol frame {index} outside the {} loaded",
            self.frames.len()
        );
        &self.frames[index]
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
