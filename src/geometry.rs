//! Grid geometry — cell coordinates, footprints and bounds.
//!
//! Stateless helpers shared by the engine, the render contract and the
//! display adapters. Coordinates are signed so that "one step past the edge"
//! is representable while testing bounds.

/// One character cell: column `x`, row `y`. Row 0 is the score header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The full cell grid a session is drawn onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Playfield {
    pub width: u16,
    pub height: u16,
}

impl Playfield {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width as i32 && cell.y < self.height as i32
    }

    /// Linear address of `cell` in a row-major cell map (the same layout as a
    /// colour-attribute map), or `None` when the cell lies off the grid.
    pub fn address(&self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.y as usize * self.width as usize + cell.x as usize)
        } else {
            None
        }
    }

    /// Inverse of [`Playfield::address`].
    pub fn cell_at(&self, address: usize) -> Option<Cell> {
        if address >= self.len() {
            return None;
        }
        let w = self.width as usize;
        Some(Cell::new((address % w) as i32, (address / w) as i32))
    }

    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inclusive column range `[left, right]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub left: i32,
    pub right: i32,
}

impl Span {
    pub const fn new(left: i32, right: i32) -> Self {
        Self { left, right }
    }

    /// True when a sprite `width` cells wide with its left edge at `x`
    /// lies entirely inside the span.
    pub fn holds(&self, x: i32, width: i32) -> bool {
        x >= self.left && x as i64 + width as i64 - 1 <= self.right as i64
    }
}

/// The cells covered by a sprite `width` columns wide whose left edge is at
/// `origin`.
pub fn footprint(origin: Cell, width: i32) -> impl Iterator<Item = Cell> {
    (0..width.max(0)).map(move |dx| origin.offset(dx, 0))
}

/// True when `target` lies inside the footprint starting at `origin`.
pub fn footprint_contains(origin: Cell, width: i32, target: Cell) -> bool {
    target.y == origin.y && target.x >= origin.x && target.x < origin.x + width
}

/// Screen cell of formation slot `(row, column)` for a formation anchored at
/// `anchor`.
pub fn slot_cell(anchor: Cell, row: usize, column: usize, h_spacing: i32, v_spacing: i32) -> Cell {
    anchor.offset(column as i32 * h_spacing, row as i32 * v_spacing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_row_major() {
        let pf = Playfield::new(32, 24);
        assert_eq!(pf.address(Cell::new(0, 0)), Some(0));
        assert_eq!(pf.address(Cell::new(5, 2)), Some(69));
        assert_eq!(pf.address(Cell::new(31, 23)), Some(767));
        assert_eq!(pf.cell_at(69), Some(Cell::new(5, 2)));
    }

    #[test]
    fn address_rejects_off_grid_cells() {
        let pf = Playfield::new(32, 24);
        assert_eq!(pf.address(Cell::new(-1, 0)), None);
        assert_eq!(pf.address(Cell::new(32, 0)), None);
        assert_eq!(pf.address(Cell::new(0, 24)), None);
        assert_eq!(pf.cell_at(768), None);
    }

    #[test]
    fn wide_footprint_covers_two_cells() {
        let cells: Vec<Cell> = footprint(Cell::new(7, 3), 2).collect();
        assert_eq!(cells, vec![Cell::new(7, 3), Cell::new(8, 3)]);
        assert!(footprint_contains(Cell::new(7, 3), 2, Cell::new(8, 3)));
        assert!(!footprint_contains(Cell::new(7, 3), 1, Cell::new(8, 3)));
        assert!(!footprint_contains(Cell::new(7, 3), 2, Cell::new(7, 4)));
    }

    #[test]
    fn span_holds_accounts_for_width() {
        let span = Span::new(1, 30);
        assert!(span.holds(30, 1));
        assert!(!span.holds(30, 2));
        assert!(span.holds(29, 2));
        assert!(!span.holds(0, 1));
        assert!(!span.holds(i32::MAX, 2));
    }

    #[test]
    fn slot_cell_applies_spacing() {
        let anchor = Cell::new(4, 2);
        assert_eq!(slot_cell(anchor, 0, 0, 3, 2), Cell::new(4, 2));
        assert_eq!(slot_cell(anchor, 2, 7, 3, 2), Cell::new(25, 6));
    }
}
