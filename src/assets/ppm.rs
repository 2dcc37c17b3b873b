//! Plain-text RGB image decoder (`P3`).
//!
//! ```text
//! P3
//! # comment
//! <width> <height>
//! <maxval>
//! r g b  r g b  …           (width·height triples)
//! ```
//!
//! `#` starts a comment that runs to the end of its line and may appear
//! anywhere a token is expected. Samples are rescaled from `0..=maxval` to
//! `0..=255`.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::world::texture::Texture;

const MAGIC: &str = "P3";

#[derive(Error, Debug)]
pub enum PpmError {
    #[error("cannot read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("expected `P3` header, found `{0}`")]
    BadMagic(String),

    #[error("`{token}` is not a valid {what}")]
    BadToken { what: &'static str, token: String },

    #[error("bad image dimensions {w}x{h} (maxval {maxval})")]
    BadDimensions { w: usize, h: usize, maxval: u32 },

    #[error("truncated image: expected {expected} samples, found {found}")]
    Truncated { expected: usize, found: usize },
}

/// Whitespace tokens with `#…` comments removed.
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|l| l.split_once('#').map_or(l, |(code, _)| code))
        .flat_map(str::split_whitespace)
}

fn number<'a>(
    it: &mut impl Iterator<Item = &'a str>,
    what: &'static str,
    expected: usize,
    found: usize,
) -> Result<u32, PpmError> {
    let token = it.next().ok_or(PpmError::Truncated { expected, found })?;
    token.parse().map_err(|_| PpmError::BadToken {
        what,
        token: token.to_owned(),
    })
}

/// Decode an in-memory `P3` image.
pub fn decode(name: &str, text: &str) -> Result<Texture, PpmError> {
    let mut it = tokens(text);

    match it.next() {
        Some(MAGIC) => {}
        other => return Err(PpmError::BadMagic(other.unwrap_or("").to_owned())),
    }

    // header fields count as the first three "samples" when truncated
    let w = number(&mut it, "width", 3, 0)? as usize;
    let h = number(&mut it, "height", 3, 1)? as usize;
    let maxval = number(&mut it, "maxval", 3, 2)?;
    if w == 0 || h == 0 || maxval == 0 || maxval > u16::MAX as u32 {
        return Err(PpmError::BadDimensions { w, h, maxval });
    }

    let expected = w
        .checked_mul(h)
        .and_then(|n| n.checked_mul(3))
        .ok_or(PpmError::BadDimensions { w, h, maxval })?;
    // every sample takes at least two bytes of text, so a lying header
    // cannot reserve more than the input could fill
    let mut pixels = Vec::with_capacity(expected.min(text.len() / 2));
    for found in 0..expected {
        let v = number(&mut it, "sample", expected, found)?;
        if v > maxval {
            return Err(PpmError::BadToken {
                what: "sample",
                token: v.to_string(),
            });
        }
        pixels.push(if maxval == 255 {
            v as u8
        } else {
            (v * 255 / maxval) as u8
        });
    }

    Ok(Texture::new(name, w, h, pixels))
}

/// Read and decode `path`; the texture is named after the file stem.
pub fn load(path: &Path) -> Result<Texture, PpmError> {
    let text = std::fs::read_to_string(path).map_err(|source| PpmError::Io {
        path: path.to_owned(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    decode(&name, &text)
}

/// Encode `tex` as `P3`; used to write asset fixtures.
pub fn encode(tex: &Texture) -> String {
    let mut out = format!("{MAGIC}\n{} {}\n255\n", tex.w, tex.h);
    for row in tex.pixels.chunks(tex.w * 3) {
        let line: Vec<String> = row.iter().map(u8::to_string).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_with_comments_everywhere() {
        let text = "P3 # plain rgb
            # size follows
            2 # width
            1
            255 # maxval
            255 0 0 # red
            0 # green starts
            255 0";
        let tex = decode("t", text).unwrap();
        assert_eq!((tex.w, tex.h), (2, 1));
        assert_eq!(tex.rgb(0, 0), [255, 0, 0]);
        assert_eq!(tex.rgb(1, 0), [0, 255, 0]);
    }

    #[test]
    fn rescales_small_maxval() {
        let tex = decode("t", "P3 1 1 15 15 0 5").unwrap();
        assert_eq!(tex.rgb(0, 0), [255, 0, 85]);
    }

    #[test]
    fn wrong_magic() {
        let err = decode("t", "P6 1 1 255 0 0 0").unwrap_err();
        assert!(matches!(err, PpmError::BadMagic(ref m) if m == "P6"));
        assert!(matches!(decode("t", "# nothing").unwrap_err(), PpmError::BadMagic(_)));
    }

    #[test]
    fn short_data_is_truncated() {
        let err = decode("t", "P3 2 2 255 1 2 3 4 5 6").unwrap_err();
        assert!(matches!(
            err,
            PpmError::Truncated {
                expected: 12,
                found: 6
            }
        ));
        assert!(matches!(decode("t", "P3 2").unwrap_err(), PpmError::Truncated { .. }));
    }

    #[test]
    fn garbage_and_bad_sizes() {
        assert!(matches!(
            decode("t", "P3 1 1 255 1 x 3").unwrap_err(),
            PpmError::BadToken { what: "sample", .. }
        ));
        assert!(matches!(
            decode("t", "P3 0 4 255").unwrap_err(),
            PpmError::BadDimensions { .. }
        ));
        assert!(matches!(
            decode("t", "P3 1 1 15 16 0 0").unwrap_err(),
            PpmError::BadToken { .. }
        ));
    }

    #[test]
    fn oversized_headers_fail_before_reading_samples() {
        assert!(matches!(
            decode("t", "P3 4294967295 4294967295 255 0 0 0").unwrap_err(),
            PpmError::BadDimensions {
                w: 4294967295,
                h: 4294967295,
                maxval: 255
            }
        ));
        // fits in usize but would need 30 GB; runs out of samples instead
        assert!(matches!(
            decode("t", "P3 100000 100000 255 1 2 3").unwrap_err(),
            PpmError::Truncated {
                expected: 30_000_000_000,
                found: 3
            }
        ));
    }

    #[test]
    fn file_round_trip_through_disk() {
        let tex = Texture::checker("wall", 8, 2, [10, 20, 30], [200, 100, 0]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.ppm");
        std::fs::write(&path, encode(&tex)).unwrap();

        let back = load(&path).unwrap();
        assert_eq!(back, tex);

        let err = load(&dir.path().join("missing.ppm")).unwrap_err();
        assert!(matches!(err, PpmError::Io { .. }));
    }
}
