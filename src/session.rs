use std::path::Path;

use crate::config::EditorConfig;
use crate::controller::{PointerEvent, ToolController};
use crate::error::EditorError;
use crate::grid::GridState;
use crate::grid_file::{self, LoadSummary};
use crate::level_export::{self, LevelDocument};
use crate::palette::{Palette, Tool};

/// Everything one editing session owns: the grid, the palette and the
/// current tool selection.
pub struct EditorSession {
    grid: GridState,
    controller: ToolController,
    dirty: bool,
}

impl EditorSession {
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_palette(Palette::from_config(config))
    }

    /// Reads the brush and tool config at `path` and starts an empty session.
    pub fn open_config<P: AsRef<Path>>(path: P) -> Result<Self, EditorError> {
        let config = EditorConfig::load(path)?;
        Ok(Self::new(&config))
    }

    pub fn with_palette(palette: Palette) -> Self {
        Self {
            grid: GridState::new(),
            controller: ToolController::new(palette),
            dirty: false,
        }
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridState {
        &mut self.grid
    }

    pub fn controller(&self) -> &ToolController {
        &self.controller
    }

    pub fn palette(&self) -> &Palette {
        self.controller.palette()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn select_tool(&mut self, tool: Tool) -> bool {
        self.controller.select_tool(tool)
    }

    pub fn select_brush(&mut self, index: usize) -> bool {
        self.controller.select_brush(index)
    }

    pub fn pointer_down(&mut self) {
        self.controller.pointer_down();
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    pub fn pointer_event(&mut self, event: PointerEvent, index: usize) -> bool {
        let changed = self.controller.handle(event, index, &mut self.grid);
        if changed {
            self.grid.set_cursor(index);
            self.dirty = true;
        }
        changed
    }

    /// Clicks the cell under the keyboard cursor.
    pub fn click_cursor(&mut self) -> bool {
        let index = self.grid.cursor_index();
        self.pointer_event(PointerEvent::Click, index)
    }

    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<(), EditorError> {
        let path = path.as_ref();
        grid_file::save_to_file(&self.grid, path).map_err(|e| EditorError::io(path, e))?;
        self.dirty = false;
        Ok(())
    }

    pub fn load_text(&mut self, content: &str) -> LoadSummary {
        let summary = grid_file::load_from_str(&mut self.grid, content);
        self.controller.recount(&self.grid);
        summary
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadSummary, EditorError> {
        let path = path.as_ref();
        let summary =
            grid_file::load_from_file(&mut self.grid, path).map_err(|e| EditorError::io(path, e))?;
        self.controller.recount(&self.grid);
        self.dirty = false;
        Ok(summary)
    }

    pub fn build_level(&self) -> Result<LevelDocument, EditorError> {
        Ok(level_export::build_level(&self.grid)?)
    }

    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<LevelDocument, EditorError> {
        Ok(level_export::export_level(&self.grid, path)?)
    }

    /// One-line summary for the window title.
    pub fn status(&self) -> String {
        let tool = self.controller.tool().name();
        let brush = self
            .controller
            .selected_brush()
            .and_then(|i| self.palette().brush(i));

        let mut status = match brush {
            Some(brush) => format!(
                "{} | {} {}",
                tool,
                brush.title,
                self.controller.counters().label(&brush.tag, brush.max_count)
            ),
            None => tool.to_string(),
        };
        if self.dirty {
            status.push_str(" *");
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::tags;

    fn brush_index(session: &EditorSession, tag: &str) -> usize {
        session.palette().brushes().iter().position(|b| b.tag == tag).unwrap()
    }

    #[test]
    fn test_load_recounts_caps() {
        let mut session = EditorSession::new(&EditorConfig::default());
        let spawn = brush_index(&session, tags::PLAYER_SPAWN);
        session.load_text("C10:\nclass: playerSpawn\ncolor: blue\nshape: circle\n");

        // The loaded spawn uses up the only slot
        session.select_brush(spawn);
        assert!(!session.pointer_event(PointerEvent::Click, 0));
        assert_eq!(session.controller().counters().count(tags::PLAYER_SPAWN), 1);
    }

    #[test]
    fn test_open_config_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ \"buttons\": 3 }").unwrap();

        let err = EditorSession::open_config(&path).err().unwrap();
        assert!(matches!(err, EditorError::Config(_)));
        assert!(!err.is_validation());

        let session = EditorSession::open_config(dir.path().join("missing.json")).unwrap();
        assert_eq!(session.palette().brushes().len(), 9);
    }

    #[test]
    fn test_status_line() {
        let mut session = EditorSession::new(&EditorConfig::default());
        assert_eq!(session.status(), "paint");

        let end = brush_index(&session, tags::END);
        session.select_brush(end);
        session.grid_mut().move_cursor(2, 1);
        assert!(session.click_cursor());
        assert_eq!(session.status(), "paint | End 1/1 *");
        assert!(session.grid().cell(32).unwrap().has_tag(tags::END));
    }

    #[test]
    fn test_save_export_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EditorSession::new(&EditorConfig::default());

        let err = session.export(dir.path().join("level1.json")).unwrap_err();
        assert!(err.is_validation());

        for (tag, index) in [(tags::PLAYER_SPAWN, 0), (tags::END, 29), (tags::SOLID_GROUND, 30)] {
            let brush = brush_index(&session, tag);
            session.select_brush(brush);
            session.pointer_event(PointerEvent::Click, index);
        }
        let save_path = dir.path().join("grid-data.txt");
        session.save(&save_path).unwrap();
        assert!(!session.is_dirty());

        let mut reloaded = EditorSession::new(&EditorConfig::default());
        reloaded.load(&save_path).unwrap();
        let exported = reloaded.export(dir.path().join("level1.json")).unwrap();
        assert_eq!(exported, session.build_level().unwrap());
        assert_eq!(reloaded.controller().counters().count(tags::END), 1);
    }
}
