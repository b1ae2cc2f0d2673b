use std::collections::HashMap;

use crate::grid::GridState;
use crate::palette::{Palette, Tool};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Click,
    Hover,
}

/// Number of painted cells per brush tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagCounters {
    counts: HashMap<String, u32>,
}

impl TagCounters {
    pub fn new(palette: &Palette) -> Self {
        let counts = palette
            .brushes()
            .iter()
            .map(|brush| (brush.tag.clone(), 0))
            .collect();
        Self { counts }
    }

    pub fn count(&self, tag: &str) -> u32 {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, tag: &str) {
        *self.counts.entry(tag.to_string()).or_insert(0) += 1;
    }

    pub fn decrement(&mut self, tag: &str) {
        if let Some(count) = self.counts.get_mut(tag) {
            *count = count.saturating_sub(1);
        }
    }

    /// Releases one use of the brush painting with `color`, if any.
    pub fn release_color(&mut self, palette: &Palette, color: &str) {
        if let Some(brush) = palette.brush_for_color(color) {
            self.decrement(&brush.tag);
        }
    }

    /// Rebuilds every count from the painted cells of `grid`.
    pub fn recount(&mut self, palette: &Palette, grid: &GridState) {
        for count in self.counts.values_mut() {
            *count = 0;
        }
        for (_, cell) in grid.cells() {
            if let Some(brush) = cell.color().and_then(|c| palette.brush_for_color(c)) {
                self.increment(&brush.tag);
            }
        }
    }

    /// Counter text shown next to a brush: "n/max" when capped, "n" otherwise.
    pub fn label(&self, tag: &str, max_count: u32) -> String {
        let count = self.count(tag);
        if max_count > 0 {
            format!("{}/{}", count, max_count)
        } else {
            format!("{}", count)
        }
    }
}

/// Applies the selected tool and brush to grid cells.
#[derive(Debug, Clone)]
pub struct ToolController {
    palette: Palette,
    tool: Tool,
    selected_brush: Option<usize>,
    is_dragging: bool,
    counters: TagCounters,
}

impl ToolController {
    pub fn new(palette: Palette) -> Self {
        let counters = TagCounters::new(&palette);
        let tool = palette.tools().first().copied().unwrap_or(Tool::Paint);
        Self {
            palette,
            tool,
            selected_brush: None,
            is_dragging: false,
            counters,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Only tools offered by the palette can be picked.
    pub fn select_tool(&mut self, tool: Tool) -> bool {
        if !self.palette.tools().contains(&tool) {
            return false;
        }
        if self.tool != tool {
            log::debug!("Tool: {}", tool.name());
        }
        self.tool = tool;
        true
    }

    pub fn selected_brush(&self) -> Option<usize> {
        self.selected_brush
    }

    pub fn select_brush(&mut self, index: usize) -> bool {
        match self.palette.brush(index) {
            Some(brush) => {
                log::debug!("Brush: {}", brush.tag);
                self.selected_brush = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn counters(&self) -> &TagCounters {
        &self.counters
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn pointer_down(&mut self) {
        self.is_dragging = true;
    }

    pub fn pointer_up(&mut self) {
        self.is_dragging = false;
    }

    /// Counters must follow the grid after it was changed behind our back.
    pub fn recount(&mut self, grid: &GridState) {
        self.counters.recount(&self.palette, grid);
    }

    /// Dispatches a pointer event on cell `index`. Hover only counts while
    /// the pointer is held down. Returns true when the cell changed.
    pub fn handle(&mut self, event: PointerEvent, index: usize, grid: &mut GridState) -> bool {
        if event == PointerEvent::Hover && !self.is_dragging {
            return false;
        }

        match self.tool {
            Tool::Erase => self.erase(index, grid),
            Tool::Paint => self.paint(index, grid),
            Tool::Flip => self.flip(index, grid),
        }
    }

    fn erase(&mut self, index: usize, grid: &mut GridState) -> bool {
        let Some(cell) = grid.cell_mut(index) else {
            return false;
        };
        let Some(color) = cell.color() else {
            return false;
        };

        self.counters.release_color(&self.palette, color);
        cell.reset();
        true
    }

    fn paint(&mut self, index: usize, grid: &mut GridState) -> bool {
        let Some(brush) = self.selected_brush.and_then(|i| self.palette.brush(i)) else {
            return false;
        };
        let Some(cell) = grid.cell_mut(index) else {
            return false;
        };

        if cell.color() == Some(brush.color.as_str()) {
            return false;
        }

        let had_color = match cell.color() {
            Some(old) => {
                self.counters.release_color(&self.palette, old);
                true
            }
            None => false,
        };

        if brush.max_count == 0 || self.counters.count(&brush.tag) < brush.max_count {
            cell.reset();
            cell.set_color(Some(brush.color.clone()));
            cell.apply_shape(brush.shape);
            cell.add_tag(&brush.tag);
            self.counters.increment(&brush.tag);
            true
        } else {
            log::info!("{} limit of {} reached", brush.tag, brush.max_count);
            // The old paint is gone either way
            if had_color {
                cell.reset();
            }
            had_color
        }
    }

    fn flip(&mut self, index: usize, grid: &mut GridState) -> bool {
        grid.cell_mut(index).map_or(false, |cell| cell.rotate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{tags, Shape};

    fn controller_with(tag: &str) -> ToolController {
        let mut controller = ToolController::new(Palette::default());
        let index = controller
            .palette()
            .brushes()
            .iter()
            .position(|b| b.tag == tag)
            .unwrap();
        controller.select_brush(index);
        controller
    }

    #[test]
    fn test_paint_sets_brush_attributes() {
        let mut grid = GridState::new();
        let mut controller = controller_with(tags::SPIKE);

        assert!(controller.handle(PointerEvent::Click, 5, &mut grid));
        let cell = grid.cell(5).unwrap();
        assert_eq!(cell.color(), Some("gray"));
        assert_eq!(cell.shape(), Some(Shape::Triangle));
        assert!(cell.is_spike());
        assert_eq!(controller.counters().count(tags::SPIKE), 1);
    }

    #[test]
    fn test_repaint_is_idempotent() {
        let mut grid = GridState::new();
        let mut controller = controller_with(tags::COIN);

        controller.handle(PointerEvent::Click, 0, &mut grid);
        let before = grid.cell(0).unwrap().clone();
        assert!(!controller.handle(PointerEvent::Click, 0, &mut grid));
        assert_eq!(grid.cell(0).unwrap(), &before);
        assert_eq!(controller.counters().count(tags::COIN), 1);
    }

    #[test]
    fn test_hover_only_paints_while_dragging() {
        let mut grid = GridState::new();
        let mut controller = controller_with(tags::SOLID_GROUND);

        assert!(!controller.handle(PointerEvent::Hover, 1, &mut grid));
        assert!(!grid.cell(1).unwrap().is_painted());

        controller.pointer_down();
        assert!(controller.handle(PointerEvent::Hover, 1, &mut grid));
        controller.pointer_up();
        assert!(!controller.handle(PointerEvent::Hover, 2, &mut grid));
        assert!(grid.cell(1).unwrap().is_painted());
        assert!(!grid.cell(2).unwrap().is_painted());
    }

    #[test]
    fn test_paint_without_brush_does_nothing() {
        let mut grid = GridState::new();
        let mut controller = ToolController::new(Palette::default());
        assert!(!controller.handle(PointerEvent::Click, 0, &mut grid));
        assert!(!controller.select_brush(99));
        assert_eq!(controller.selected_brush(), None);
    }

    #[test]
    fn test_capped_brush_blanks_target() {
        let mut grid = GridState::new();
        let mut controller = controller_with(tags::COIN);
        controller.handle(PointerEvent::Click, 1, &mut grid);

        let spawn = controller
            .palette()
            .brushes()
            .iter()
            .position(|b| b.tag == tags::PLAYER_SPAWN)
            .unwrap();
        controller.select_brush(spawn);
        controller.handle(PointerEvent::Click, 0, &mut grid);
        assert_eq!(controller.counters().count(tags::PLAYER_SPAWN), 1);

        // Second spawn over the coin: coin is removed, no spawn is added
        assert!(controller.handle(PointerEvent::Click, 1, &mut grid));
        let cell = grid.cell(1).unwrap();
        assert!(!cell.is_painted());
        assert!(cell.tags().is_empty());
        assert_eq!(controller.counters().count(tags::PLAYER_SPAWN), 1);
        assert_eq!(controller.counters().count(tags::COIN), 0);
    }

    #[test]
    fn test_erase_releases_counter() {
        let mut grid = GridState::new();
        let mut controller = controller_with(tags::END);
        controller.handle(PointerEvent::Click, 10, &mut grid);
        assert_eq!(controller.counters().label(tags::END, 1), "1/1");

        controller.select_tool(Tool::Erase);
        assert!(controller.handle(PointerEvent::Click, 10, &mut grid));
        assert!(!controller.handle(PointerEvent::Click, 10, &mut grid));
        assert_eq!(grid.cell(10).unwrap(), &crate::cell::CellState::new());
        assert_eq!(controller.counters().label(tags::END, 1), "0/1");
    }

    #[test]
    fn test_flip_rotates_spikes_only() {
        let mut grid = GridState::new();
        let mut controller = controller_with(tags::SPIKE);
        controller.handle(PointerEvent::Click, 3, &mut grid);
        let coin = controller.palette().brushes().iter().position(|b| b.tag == tags::COIN).unwrap();
        controller.select_brush(coin);
        controller.handle(PointerEvent::Click, 4, &mut grid);

        controller.select_tool(Tool::Flip);
        assert!(controller.handle(PointerEvent::Click, 3, &mut grid));
        assert!(!controller.handle(PointerEvent::Click, 4, &mut grid));
        assert_eq!(grid.cell(3).unwrap().rotation(), 90);
        assert_eq!(grid.cell(4).unwrap().assigned_rotation(), None);
    }

    #[test]
    fn test_only_configured_tools_are_selectable() {
        let palette = Palette::new(Palette::default().brushes().to_vec(), vec![Tool::Paint, Tool::Erase]);
        let mut controller = ToolController::new(palette);
        assert!(!controller.select_tool(Tool::Flip));
        assert_eq!(controller.tool(), Tool::Paint);
        assert!(controller.select_tool(Tool::Erase));
        assert_eq!(controller.tool(), Tool::Erase);
    }

    #[test]
    fn test_default_tool_comes_from_palette() {
        let palette = Palette::new(Palette::default().brushes().to_vec(), vec![Tool::Erase, Tool::Flip]);
        let mut controller = ToolController::new(palette);
        assert_eq!(controller.tool(), Tool::Erase);
        assert!(controller.select_tool(Tool::Flip));
        assert!(controller.select_tool(Tool::Erase));
    }

    #[test]
    fn test_recount_follows_grid() {
        let mut grid = GridState::new();
        grid.cell_mut(0).unwrap().set_color(Some("gold".to_string()));
        grid.cell_mut(1).unwrap().set_color(Some("gold".to_string()));
        grid.cell_mut(2).unwrap().set_color(Some("blue".to_string()));
        grid.cell_mut(3).unwrap().set_color(Some("#123456".to_string()));

        let mut controller = ToolController::new(Palette::default());
        controller.recount(&grid);
        assert_eq!(controller.counters().count(tags::COIN), 2);
        assert_eq!(controller.counters().count(tags::PLAYER_SPAWN), 1);
        assert_eq!(controller.counters().count(tags::ENEMY), 0);
    }
}
