use crate::cell::CellState;

pub const GRID_COLUMNS: u32 = 30;
pub const GRID_ROWS: u32 = 30;
pub const CELL_COUNT: usize = (GRID_COLUMNS * GRID_ROWS) as usize;
/// Size of one cell in level coordinates
pub const CELL_SIZE: u32 = 40;

#[derive(Debug, Clone)]
pub struct GridState {
    pub width: u32,
    pub height: u32,
    pub cursor_x: u32,
    pub cursor_y: u32,
    cells: Vec<CellState>, // row-major, never resized
}

impl GridState {
    pub fn new() -> Self {
        Self {
            width: GRID_COLUMNS,
            height: GRID_ROWS,
            cursor_x: 0,
            cursor_y: 0,
            cells: vec![CellState::new(); CELL_COUNT],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, index: usize) -> Option<&CellState> {
        self.cells.get(index)
    }

    pub fn cell_mut(&mut self, index: usize) -> Option<&mut CellState> {
        self.cells.get_mut(index)
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, &CellState)> {
        self.cells.iter().enumerate()
    }

    /// (row, col) of an index
    pub fn position(&self, index: usize) -> (u32, u32) {
        let index = index as u32;
        (index / self.width, index % self.width)
    }

    /// Level coordinates of the top-left corner of a cell
    pub fn pixel_position(&self, index: usize) -> (u32, u32) {
        let (row, col) = self.position(index);
        (col * CELL_SIZE, row * CELL_SIZE)
    }

    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let new_x = (self.cursor_x as i32 + dx).max(0) as u32;
        let new_y = (self.cursor_y as i32 + dy).max(0) as u32;

        self.cursor_x = new_x.min(self.width - 1);
        self.cursor_y = new_y.min(self.height - 1);
    }

    pub fn set_cursor(&mut self, index: usize) {
        if index < self.cells.len() {
            let (row, col) = self.position(index);
            self.cursor_x = col;
            self.cursor_y = row;
        }
    }

    pub fn cursor_index(&self) -> usize {
        (self.cursor_y * self.width + self.cursor_x) as usize
    }
}

impl Default for GridState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_has_fixed_size() {
        let grid = GridState::new();
        assert_eq!(grid.len(), 900);
        assert!(grid.cells().all(|(_, cell)| *cell == CellState::new()));
        assert!(grid.cell(900).is_none());
    }

    #[test]
    fn test_positions() {
        let grid = GridState::new();
        assert_eq!(grid.position(30), (1, 0));
        assert_eq!(grid.position(899), (29, 29));
        assert_eq!(grid.pixel_position(30), (0, 40));
        assert_eq!(grid.pixel_position(31), (40, 40));
    }

    #[test]
    fn test_cursor_clamps_to_grid() {
        let mut grid = GridState::new();
        grid.move_cursor(-3, -1);
        assert_eq!((grid.cursor_x, grid.cursor_y), (0, 0));

        grid.move_cursor(100, 2);
        assert_eq!((grid.cursor_x, grid.cursor_y), (29, 2));
        assert_eq!(grid.cursor_index(), 2 * 30 + 29);

        grid.set_cursor(31);
        assert_eq!((grid.cursor_x, grid.cursor_y), (1, 1));
    }
}
