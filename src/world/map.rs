use glam::Vec2;
use thiserror::Error;

/*──────────────────────── cell codes ─────────────────────────*/

pub const EMPTY: i32 = 0;
/// Texture used for cells outside the grid.
pub const DEFAULT_WALL: i32 = 1;
pub const SECRET: i32 = 7;
pub const EXIT: i32 = 8;
pub const DOOR: i32 = 9;
pub const PLAYER_SPAWN: i32 = -1;
pub const GUARD_SPAWN: i32 = -2;

/// What occupies a world position, as far as movement is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    None,
    Wall,
    Door,
    Secret,
    Exit,
}

impl CellKind {
    pub fn of_code(code: i32) -> Self {
        match code {
            DOOR => CellKind::Door,
            EXIT => CellKind::Exit,
            SECRET => CellKind::Secret,
            c if c > 0 => CellKind::Wall,
            _ => CellKind::None,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: `{token}` is not a cell code")]
    BadToken { line: usize, token: String },

    #[error("{width}x{height} map needs {} cells, got {found}", .width * .height)]
    SizeMismatch {
        width: usize,
        height: usize,
        found: usize,
    },

    #[error("map has no player spawn (code -1)")]
    NoPlayerSpawn,
}

/// Spawn markers consumed from the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Spawns {
    /// World-space cell centre.
    pub player: Vec2,
    pub guards: Vec<Vec2>,
}

/// Flat row-major tile grid.
///
/// Only door / secret opening and spawn consumption mutate it after load.
#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

impl Map {
    pub fn new(width: usize, height: usize, cells: Vec<i32>) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }
        if cells.len() != width * height {
            return Err(MapError::SizeMismatch {
                width,
                height,
                found: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parse the text format: one row per line, cells separated by commas
    /// and/or whitespace, `#` comments, blank lines ignored.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut cells = Vec::new();
        let mut width = 0;
        let mut height = 0;

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("");
            let mut row = 0;
            for token in line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
            {
                let code = token.parse::<i32>().map_err(|_| MapError::BadToken {
                    line: line_no + 1,
                    token: token.to_owned(),
                })?;
                cells.push(code);
                row += 1;
            }
            if row == 0 {
                continue;
            }
            if height == 0 {
                width = row;
            } else if row != width {
                return Err(MapError::Ragged {
                    row: height,
                    expected: width,
                    found: row,
                });
            }
            height += 1;
        }

        Self::new(width, height, cells)
    }

    /// Sealed 16×16 level with doors, a secret wall, an exit and guards.
    pub fn builtin() -> Self {
        const LEVEL: &str = "
            1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1
            1 -1 0 0 0 1 0 0 0 0 0 2 0 0 0 1
            1 0 0 0 0 1 0 -2 0 0 0 2 0 -2 0 1
            1 0 0 0 0 9 0 0 0 0 0 9 0 0 0 1
            1 0 0 0 0 1 0 0 0 0 0 2 0 0 0 1
            1 1 9 1 1 1 0 0 3 0 0 2 2 9 2 2
            1 0 0 0 0 1 0 0 0 0 0 0 0 0 0 1
            1 0 -2 0 0 1 0 0 0 0 0 0 0 -2 0 1
            1 0 0 0 0 7 0 0 0 3 3 0 0 0 0 1
            1 0 0 0 0 1 0 0 0 3 3 0 0 0 0 1
            1 1 1 9 1 1 0 -2 0 0 0 0 0 0 0 1
            1 0 0 0 0 1 1 1 9 1 1 1 1 9 1 1
            1 0 0 0 0 0 0 1 0 0 0 1 0 0 0 1
            1 0 0 -2 0 0 0 1 0 -2 0 1 0 0 0 1
            1 0 0 0 0 0 0 1 0 0 0 1 0 0 0 8
            1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1
        ";
        match Self::parse(LEVEL) {
            Ok(map) => map,
            Err(e) => unreachable!("built-in level is malformed: {e}"),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    /// Code at integer cell `(cx, cy)`, `None` outside the grid.
    #[inline(always)]
    pub fn get(&self, cx: i32, cy: i32) -> Option<i32> {
        if cx < 0 || cy < 0 || cx as usize >= self.width || cy as usize >= self.height {
            return None;
        }
        Some(self.cells[cy as usize * self.width + cx as usize])
    }

    /// Code the ray caster sees: out-of-grid cells read as a solid wall.
    #[inline(always)]
    pub fn solid_code(&self, cx: i32, cy: i32) -> i32 {
        self.get(cx, cy).unwrap_or(DEFAULT_WALL)
    }

    /// Integer cell containing world position `(x, y)`.
    #[inline]
    pub fn cell_of(x: f32, y: f32, cell_size: f32) -> (i32, i32) {
        ((x / cell_size).floor() as i32, (y / cell_size).floor() as i32)
    }

    /// Classify a continuous world position. Out-of-bounds is a wall.
    pub fn classify(&self, x: f32, y: f32, cell_size: f32) -> CellKind {
        let (cx, cy) = Self::cell_of(x, y, cell_size);
        match self.get(cx, cy) {
            Some(code) => CellKind::of_code(code),
            None => CellKind::Wall,
        }
    }

    /// Classify the position an actor steps into; doors and secret walls
    /// are opened for good and reported with their original kind.
    pub fn step_into(&mut self, x: f32, y: f32, cell_size: f32) -> CellKind {
        let kind = self.classify(x, y, cell_size);
        if matches!(kind, CellKind::Door | CellKind::Secret) {
            let (cx, cy) = Self::cell_of(x, y, cell_size);
            self.cells[cy as usize * self.width + cx as usize] = EMPTY;
        }
        kind
    }

    /// Rewrite spawn markers to empty and return their positions.
    ///
    /// The first player marker in row-major order wins.
    pub fn take_spawns(&mut self, cell_size: f32) -> Result<Spawns, MapError> {
        let mut player = None;
        let mut guards = Vec::new();

        for (idx, code) in self.cells.iter_mut().enumerate() {
            let centre = Vec2::new(
                ((idx % self.width) as f32 + 0.5) * cell_size,
                ((idx / self.width) as f32 + 0.5) * cell_size,
            );
            match *code {
                PLAYER_SPAWN => {
                    player.get_or_insert(centre);
                    *code = EMPTY;
                }
                GUARD_SPAWN => {
                    guards.push(centre);
                    *code = EMPTY;
                }
                _ => {}
            }
        }

        Ok(Spawns {
            player: player.ok_or(MapError::NoPlayerSpawn)?,
            guards,
        })
    }

    /// Distinct positive codes present in the grid.
    pub fn wall_codes(&self) -> Vec<i32> {
        let mut codes: Vec<i32> = self.cells.iter().copied().filter(|&c| c > 0).collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
