use pixels::{Pixels, SurfaceTexture};
use winit::window::Window;

use crate::cell::{CellState, Shape};
use crate::grid::GridState;
use crate::palette::Tool;
use crate::session::EditorSession;

pub const GRID_PADDING: u32 = 10;
pub const SWATCH_SIZE: u32 = 32;
const SWATCH_GAP: u32 = 6;
const SECTION_GAP: u32 = 18; // between tool and brush swatches

const BACKGROUND: [u8; 4] = [32, 32, 32, 255];
const EMPTY_CELL: [u8; 4] = [64, 64, 64, 255];
const GRID_LINE: [u8; 4] = [96, 96, 96, 255];
const CURSOR: [u8; 4] = [255, 255, 255, 255];
const SELECTED: [u8; 4] = [255, 220, 0, 255];
const UNKNOWN_COLOR: [u8; 4] = [200, 0, 200, 255];

/// Something under the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Cell(usize),
    Tool(usize),
    Brush(usize),
}

/// Where the grid and the palette column sit in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub grid_columns: u32,
    pub grid_rows: u32,
    pub tile_size: u32,
    pub grid_x: u32,
    pub grid_y: u32,
    pub palette_x: u32,
    pub tool_count: usize,
    pub brush_count: usize,
}

impl Layout {
    pub fn new(width: u32, height: u32, grid: &GridState, tool_count: usize, brush_count: usize) -> Self {
        let palette_width = SWATCH_SIZE + GRID_PADDING * 2;
        let available_width = width.saturating_sub(palette_width + GRID_PADDING * 2);
        let available_height = height.saturating_sub(GRID_PADDING * 2);

        let tile_size = (available_width / grid.width)
            .min(available_height / grid.height)
            .max(1);
        let grid_pixel_height = grid.height * tile_size;

        let grid_x = GRID_PADDING;
        let grid_y = GRID_PADDING + available_height.saturating_sub(grid_pixel_height) / 2;

        Self {
            width,
            height,
            grid_columns: grid.width,
            grid_rows: grid.height,
            tile_size,
            grid_x,
            grid_y,
            palette_x: grid_x + grid.width * tile_size + GRID_PADDING * 2,
            tool_count,
            brush_count,
        }
    }

    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let index = index as u32;
        let col = index % self.grid_columns;
        let row = index / self.grid_columns;
        (self.grid_x + col * self.tile_size, self.grid_y + row * self.tile_size)
    }

    pub fn tool_origin(&self, slot: usize) -> (u32, u32) {
        (self.palette_x, GRID_PADDING + slot as u32 * (SWATCH_SIZE + SWATCH_GAP))
    }

    pub fn brush_origin(&self, slot: usize) -> (u32, u32) {
        let (_, tools_end) = self.tool_origin(self.tool_count);
        (self.palette_x, tools_end + SECTION_GAP + slot as u32 * (SWATCH_SIZE + SWATCH_GAP))
    }

    pub fn hit_test(&self, x: f64, y: f64) -> Option<Hit> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);

        let grid_right = self.grid_x + self.grid_columns * self.tile_size;
        let grid_bottom = self.grid_y + self.grid_rows * self.tile_size;
        if x >= self.grid_x && x < grid_right && y >= self.grid_y && y < grid_bottom {
            let col = (x - self.grid_x) / self.tile_size;
            let row = (y - self.grid_y) / self.tile_size;
            return Some(Hit::Cell((row * self.grid_columns + col) as usize));
        }

        let inside = |(sx, sy): (u32, u32)| x >= sx && x < sx + SWATCH_SIZE && y >= sy && y < sy + SWATCH_SIZE;
        if let Some(slot) = (0..self.tool_count).find(|&i| inside(self.tool_origin(i))) {
            return Some(Hit::Tool(slot));
        }
        (0..self.brush_count)
            .find(|&i| inside(self.brush_origin(i)))
            .map(Hit::Brush)
    }
}

pub struct GraphicsRenderer {
    pixels: Pixels,
    width: u32,
    height: u32,
}

impl GraphicsRenderer {
    pub fn new(window: &Window, width: u32, height: u32) -> Result<Self, pixels::Error> {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, window);
        let pixels = Pixels::new(width, height, surface_texture)?;

        Ok(Self { pixels, width, height })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;

        if let Err(err) = self.pixels.resize_surface(width, height) {
            log::error!("Failed to resize surface: {}", err);
        }
        if let Err(err) = self.pixels.resize_buffer(width, height) {
            log::error!("Failed to resize buffer: {}", err);
        }
    }

    pub fn layout(&self, session: &EditorSession) -> Layout {
        Layout::new(
            self.width,
            self.height,
            session.grid(),
            session.palette().tools().len(),
            session.palette().brushes().len(),
        )
    }

    pub fn render(&mut self, session: &EditorSession) {
        let layout = self.layout(session);
        let (width, height) = (self.width, self.height);
        let frame = self.pixels.frame_mut();

        for pixel in frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&BACKGROUND);
        }

        let grid = session.grid();
        for (index, cell) in grid.cells() {
            let (x, y) = layout.cell_origin(index);
            Self::draw_rect_static(frame, x, y, layout.tile_size, layout.tile_size, EMPTY_CELL, width, height);
            Self::draw_cell_content_static(frame, cell, x, y, layout.tile_size, width, height);
        }
        Self::draw_grid_lines_static(frame, &layout, width, height);

        let (cursor_x, cursor_y) = layout.cell_origin(grid.cursor_index());
        Self::draw_outline_static(frame, cursor_x, cursor_y, layout.tile_size, CURSOR, width, height);

        Self::render_palette_static(frame, session, &layout, width, height);
    }

    pub fn present(&mut self) -> Result<(), pixels::Error> {
        self.pixels.render()
    }

    fn draw_cell_content_static(frame: &mut [u8], cell: &CellState, x: u32, y: u32, tile_size: u32, width: u32, height: u32) {
        let Some(color) = cell.color() else {
            return;
        };
        let rgba = parse_color(color).unwrap_or(UNKNOWN_COLOR);
        match cell.shape() {
            Some(Shape::Circle) => {
                let radius = tile_size / 2;
                Self::draw_circle_static(frame, x + radius, y + radius, radius.saturating_sub(1), rgba, width, height);
            }
            Some(Shape::Triangle) => {
                Self::draw_triangle_static(frame, x, y, tile_size, cell.rotation(), rgba, width, height);
            }
            Some(Shape::Square) | None => {
                Self::draw_rect_static(frame, x, y, tile_size, tile_size, rgba, width, height);
            }
        }
    }

    fn render_palette_static(frame: &mut [u8], session: &EditorSession, layout: &Layout, width: u32, height: u32) {
        let controller = session.controller();

        for (slot, tool) in session.palette().tools().iter().enumerate() {
            let (x, y) = layout.tool_origin(slot);
            Self::draw_rect_static(frame, x, y, SWATCH_SIZE, SWATCH_SIZE, EMPTY_CELL, width, height);
            let inner = SWATCH_SIZE / 2;
            let (ix, iy) = (x + inner / 2, y + inner / 2);
            match tool {
                Tool::Paint => Self::draw_rect_static(frame, ix, iy, inner, inner, CURSOR, width, height),
                Tool::Erase => Self::draw_outline_static(frame, ix, iy, inner, CURSOR, width, height),
                Tool::Flip => Self::draw_triangle_static(frame, ix, iy, inner, 90, CURSOR, width, height),
            }
            if controller.tool() == *tool {
                Self::draw_outline_static(frame, x, y, SWATCH_SIZE, SELECTED, width, height);
            }
        }

        for (slot, brush) in session.palette().brushes().iter().enumerate() {
            let (x, y) = layout.brush_origin(slot);
            let mut rgba = parse_color(&brush.color).unwrap_or(UNKNOWN_COLOR);
            // Dim brushes that reached their limit
            if brush.is_capped() && controller.counters().count(&brush.tag) >= brush.max_count {
                for channel in rgba.iter_mut().take(3) {
                    *channel /= 3;
                }
            }

            Self::draw_rect_static(frame, x, y, SWATCH_SIZE, SWATCH_SIZE, EMPTY_CELL, width, height);
            match brush.shape {
                Some(Shape::Circle) => {
                    let radius = SWATCH_SIZE / 2;
                    Self::draw_circle_static(frame, x + radius, y + radius, radius - 2, rgba, width, height);
                }
                Some(Shape::Triangle) => Self::draw_triangle_static(frame, x, y, SWATCH_SIZE, 0, rgba, width, height),
                _ => Self::draw_rect_static(frame, x, y, SWATCH_SIZE, SWATCH_SIZE, rgba, width, height),
            }
            if controller.selected_brush() == Some(slot) {
                Self::draw_outline_static(frame, x, y, SWATCH_SIZE, SELECTED, width, height);
            }
        }
    }

    fn put_pixel_static(frame: &mut [u8], px: u32, py: u32, color: [u8; 4], width: u32, height: u32) {
        if px < width && py < height {
            let index = ((py * width + px) * 4) as usize;
            if index + 3 < frame.len() {
                frame[index..index + 4].copy_from_slice(&color);
            }
        }
    }

    fn draw_rect_static(frame: &mut [u8], x: u32, y: u32, w: u32, h: u32, color: [u8; 4], width: u32, height: u32) {
        for dy in 0..h {
            for dx in 0..w {
                Self::put_pixel_static(frame, x + dx, y + dy, color, width, height);
            }
        }
    }

    fn draw_outline_static(frame: &mut [u8], x: u32, y: u32, size: u32, color: [u8; 4], width: u32, height: u32) {
        if size == 0 {
            return;
        }
        for i in 0..size {
            Self::put_pixel_static(frame, x + i, y, color, width, height);
            Self::put_pixel_static(frame, x + i, y + size - 1, color, width, height);
            Self::put_pixel_static(frame, x, y + i, color, width, height);
            Self::put_pixel_static(frame, x + size - 1, y + i, color, width, height);
        }
    }

    fn draw_circle_static(frame: &mut [u8], center_x: u32, center_y: u32, radius: u32, color: [u8; 4], width: u32, height: u32) {
        let r = radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    let px = center_x as i32 + dx;
                    let py = center_y as i32 + dy;
                    if px >= 0 && py >= 0 {
                        Self::put_pixel_static(frame, px as u32, py as u32, color, width, height);
                    }
                }
            }
        }
    }

    /// Triangle pointing up at rotation 0, turned clockwise by `rotation`.
    fn draw_triangle_static(frame: &mut [u8], x: u32, y: u32, size: u32, rotation: u16, color: [u8; 4], width: u32, height: u32) {
        if size == 0 {
            return;
        }
        let last = size - 1;
        for v in 0..size {
            // Half-width of the row grows from the tip towards the base
            let half = v / 2;
            let (lo, hi) = ((size / 2).saturating_sub(half), (size / 2 + half).min(last));
            for u in lo..=hi {
                let (px, py) = match rotation {
                    90 => (last - v, u),
                    180 => (u, last - v),
                    270 => (v, u),
                    _ => (u, v),
                };
                Self::put_pixel_static(frame, x + px, y + py, color, width, height);
            }
        }
    }

    fn draw_grid_lines_static(frame: &mut [u8], layout: &Layout, width: u32, height: u32) {
        let grid_pixel_width = layout.grid_columns * layout.tile_size;
        let grid_pixel_height = layout.grid_rows * layout.tile_size;

        for col in 0..=layout.grid_columns {
            let line_x = layout.grid_x + col * layout.tile_size;
            for y in 0..grid_pixel_height {
                Self::put_pixel_static(frame, line_x, layout.grid_y + y, GRID_LINE, width, height);
            }
        }
        for row in 0..=layout.grid_rows {
            let line_y = layout.grid_y + row * layout.tile_size;
            for x in 0..grid_pixel_width {
                Self::put_pixel_static(frame, layout.grid_x + x, line_y, GRID_LINE, width, height);
            }
        }
    }
}

/// Reads color names, `#rgb`, `#rrggbb` and `rgb(r, g, b)`.
pub fn parse_color(color: &str) -> Option<[u8; 4]> {
    let color = color.trim().to_lowercase();

    if let Some(hex) = color.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        return match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    rgb[i] = v * 17;
                }
                Some([rgb[0], rgb[1], rgb[2], 255])
            }
            6 => Some([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?, 255]),
            _ => None,
        };
    }

    if let Some(args) = color.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        let values: Vec<u8> = args
            .split(',')
            .map(|v| v.trim().parse::<u8>().ok())
            .collect::<Option<_>>()?;
        return match values.as_slice() {
            [r, g, b] => Some([*r, *g, *b, 255]),
            _ => None,
        };
    }

    let rgba = match color.as_str() {
        "red" => [255, 0, 0, 255],
        "blue" => [0, 0, 255, 255],
        "green" => [0, 128, 0, 255],
        "lime" => [0, 255, 0, 255],
        "yellow" => [255, 255, 0, 255],
        "gold" => [255, 215, 0, 255],
        "orange" => [255, 165, 0, 255],
        "purple" => [128, 0, 128, 255],
        "pink" => [255, 192, 203, 255],
        "cyan" => [0, 255, 255, 255],
        "magenta" => [255, 0, 255, 255],
        "white" => [255, 255, 255, 255],
        "black" => [0, 0, 0, 255],
        "gray" | "grey" => [128, 128, 128, 255],
        "brown" => [165, 42, 42, 255],
        "saddlebrown" => [139, 69, 19, 255],
        _ => return None,
    };
    Some(rgba)
}
