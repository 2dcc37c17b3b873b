// Format-agnostic repository of textures decoded by the asset loader.
// The renderer and world logic interact through `TextureId` and map cell
// codes only.

use std::collections::HashMap;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// CPU-side storage: packed **RGB** triples in row-major order,
/// `pixels.len() == w * h * 3`.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u8>,
}

impl Texture {
    pub fn new<S: Into<String>>(name: S, w: usize, h: usize, pixels: Vec<u8>) -> Self {
        assert_eq!(pixels.len(), w * h * 3, "RGB buffer does not match {w}x{h}");
        Self {
            name: name.into(),
            w,
            h,
            pixels,
        }
    }

    /// Two-colour checkerboard with `cell`-sized squares.
    pub fn checker(name: &str, size: usize, cell: usize, a: [u8; 3], b: [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity(size * size * 3);
        for y in 0..size {
            for x in 0..size {
                let c = if ((x / cell) ^ (y / cell)) & 1 == 0 { a } else { b };
                pixels.extend_from_slice(&c);
            }
        }
        Self::new(name, size, size, pixels)
    }

    /// Texel at `(x, y)`; coordinates are *not* wrapped.
    #[inline(always)]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.w + x) * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Slice frame `(col, row)` out of a sprite sheet, see [`extract_frame`].
    pub fn frame(
        &self,
        col: usize,
        row: usize,
        frame_size: usize,
        sheet_width: usize,
        padding: usize,
    ) -> Texture {
        Texture {
            name: format!("{}[{col},{row}]", self.name),
            w: frame_size,
            h: frame_size,
            pixels: extract_frame(&self.pixels, col, row, frame_size, sheet_width, padding),
        }
    }
}

/// Copy one `frame_size`² sub-image out of a flat RGB sprite sheet.
///
/// Sheets are laid out eight frames per row with `padding`-pixel dividers
/// between neighbours, so a full row is `sheet_width + 7 * padding` pixels
/// wide where `sheet_width` excludes the dividers.
///
/// ```text
/// src = ((row·(size+pad) + ly)·(sheet_width + 7·pad) + col·(size+pad) + lx)·3
/// ```
///
/// Panics when the requested frame reaches past the end of `sheet`.
pub fn extract_frame(
    sheet: &[u8],
    col: usize,
    row: usize,
    frame_size: usize,
    sheet_width: usize,
    padding: usize,
) -> Vec<u8> {
    let stride = sheet_width + 7 * padding;
    let pitch = frame_size + padding;
    let mut out = vec![0u8; frame_size * frame_size * 3];

    for ly in 0..frame_size {
        let src_row = (row * pitch + ly) * stride + col * pitch;
        let src = src_row * 3;
        let end = src + frame_size * 3;
        assert!(
            end <= sheet.len(),
            "frame ({col},{row}) of size {frame_size} lies outside a {}-byte sheet",
            sheet.len()
        );
        let dst = ly * frame_size * 3;
        out[dst..dst + frame_size * 3].copy_from_slice(&sheet[src..end]);
    }
    out
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// A map cell code has no wall texture bound to it.
    #[error("no texture bound to map cell code {0}")]
    Unbound(i32),
}

/// A format-agnostic cache of textures.
///
/// * Does **not** know about PPM or windows; decoding lives in `assets`.
/// * Stores exactly one copy of every name.
/// * Map cell codes (`1..=9`) are bound to ids with [`TextureBank::bind_cell`];
///   there is deliberately no fallback texture.
#[derive(Default)]
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    by_cell: HashMap<i32, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of textures stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Borrow a texture by name.
    pub fn named(&self, name: &str) -> Option<&Texture> {
        self.id(name).and_then(|id| self.data.get(id as usize))
    }

    /// Wall texture drawn for map cell `code`.
    pub fn cell_texture(&self, code: i32) -> Result<&Texture, TextureError> {
        let id = self
            .by_cell
            .get(&code)
            .copied()
            .ok_or(TextureError::Unbound(code))?;
        self.texture(id)
    }

    pub fn is_bound(&self, code: i32) -> bool {
        self.by_cell.contains_key(&code)
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Make map cells holding `code` render with texture `id`.
    pub fn bind_cell(&mut self, code: i32, id: TextureId) -> Result<(), TextureError> {
        self.texture(id)?;
        self.by_cell.insert(code, id);
        Ok(())
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
