//! Tetromino shapes and rotation.

use serde::{Deserialize, Serialize};

/// The seven four-cell piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind; one full bag.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Edge length of the square box the shape rotates inside.
    #[must_use]
    pub const fn box_size(self) -> i32 {
        match self {
            PieceKind::I => 4,
            PieceKind::O => 2,
            _ => 3,
        }
    }

    /// Cells at rotation 0 as (row, col) inside the box.
    const fn base_cells(self) -> [(i32, i32); 4] {
        match self {
            PieceKind::I => [(1, 0), (1, 1), (1, 2), (1, 3)],
            PieceKind::O => [(0, 0), (0, 1), (1, 0), (1, 1)],
            PieceKind::T => [(0, 1), (1, 0), (1, 1), (1, 2)],
            PieceKind::S => [(0, 1), (0, 2), (1, 0), (1, 1)],
            PieceKind::Z => [(0, 0), (0, 1), (1, 1), (1, 2)],
            PieceKind::J => [(0, 0), (1, 0), (1, 1), (1, 2)],
            PieceKind::L => [(0, 2), (1, 0), (1, 1), (1, 2)],
        }
    }

    /// Cells after `rotation` clockwise quarter turns.
    #[must_use]
    pub fn cells(self, rotation: u8) -> [(i32, i32); 4] {
        let n = self.box_size();
        let mut cells = self.base_cells();
        for _ in 0..(rotation % 4) {
            for cell in &mut cells {
                *cell = (cell.1, n - 1 - cell.0);
            }
        }
        cells
    }
}

/// A piece placed on the board: kind, rotation and box origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: u8,
    pub row: i32,
    pub col: i32,
}

impl Piece {
    #[must_use]
    pub fn new(kind: PieceKind, rotation: u8, row: i32, col: i32) -> Self {
        Self {
            kind,
            rotation: rotation % 4,
            row,
            col,
        }
    }

    /// Absolute board cells as (row, col).
    #[must_use]
    pub fn cells(&self) -> [(i32, i32); 4] {
        let mut cells = self.kind.cells(self.rotation);
        for cell in &mut cells {
            cell.0 += self.row;
            cell.1 += self.col;
        }
        cells
    }

    /// Same piece shifted by (d_row, d_col).
    #[must_use]
    pub fn shifted(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
            ..*self
        }
    }

    /// Same piece rotated one quarter turn clockwise.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % 4,
            ..*self
        }
    }
}
