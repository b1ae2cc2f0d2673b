//! Builds the `level1.json` document read by the platformer.

use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::cell::tags;
use crate::grid::{GridState, CELL_SIZE};

pub const LEVEL_FILE_NAME: &str = "level1.json";

const DEFAULT_PLAYER: Point = Point { x: 80, y: 320 };
const DEFAULT_TARGET: Point = Point { x: 2860, y: 240 };
const CLOUD_MIN_Y: u32 = 60;
const CLOUD_MAX_Y: u32 = 180;
const CLOUD_X: [i32; 6] = [-100, 400, 900, 1440, 1600, 2000];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("The level needs at least one start and one end (start: {has_player_spawn}, end: {has_end})")]
    MissingMarkers { has_player_spawn: bool, has_end: bool },
    #[error("Cannot encode level: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Cannot write level file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Platform {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OneWayPlatform {
    pub x: u32,
    pub y: u32,
    pub width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Spike {
    pub x: u32,
    pub y: u32,
    pub dir: u16, // quarter turns
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clouds {
    pub y: Range,
    pub x: Vec<i32>,
}

impl Default for Clouds {
    fn default() -> Self {
        Self {
            y: Range { min: CLOUD_MIN_Y, max: CLOUD_MAX_Y },
            x: CLOUD_X.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub world: Size,
    pub player: Point,
    pub target: Point,
    pub hills: Vec<Point>,
    pub hills_front: Vec<Point>,
    pub clouds: Clouds,
    pub platforms: Vec<Platform>,
    pub one_way_platforms: Vec<OneWayPlatform>,
    pub enemies: Vec<Point>,
    pub spikes: Vec<Spike>,
    pub coins: Vec<Point>,
    pub falling_blocks: Vec<Point>,
    pub spiky_balls: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelDocument {
    pub level1: Level,
}

impl LevelDocument {
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Walks the grid in index order and collects every placed object.
///
/// Fails when there is no player spawn or no end cell. When several exist,
/// the last one in scan order wins.
pub fn build_level(grid: &GridState) -> Result<LevelDocument, ExportError> {
    let has_player_spawn = grid.cells().any(|(_, c)| c.has_tag(tags::PLAYER_SPAWN));
    let has_end = grid.cells().any(|(_, c)| c.has_tag(tags::END));
    if !has_player_spawn || !has_end {
        return Err(ExportError::MissingMarkers { has_player_spawn, has_end });
    }

    let mut level = Level {
        world: Size { width: 0, height: 0 },
        player: DEFAULT_PLAYER,
        target: DEFAULT_TARGET,
        hills: Vec::new(),
        hills_front: Vec::new(),
        clouds: Clouds::default(),
        platforms: Vec::new(),
        one_way_platforms: Vec::new(),
        enemies: Vec::new(),
        spikes: Vec::new(),
        coins: Vec::new(),
        falling_blocks: Vec::new(),
        spiky_balls: Vec::new(),
    };
    let mut max_x = 0;
    let mut max_y = 0;

    for (index, cell) in grid.cells() {
        let (x, y) = grid.pixel_position(index);

        let extends_world = [tags::SOLID_GROUND, tags::ENEMY, tags::SPIKE, tags::PLAYER_SPAWN]
            .iter()
            .any(|tag| cell.has_tag(tag));
        if extends_world {
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        if cell.has_tag(tags::SOLID_GROUND) {
            level.platforms.push(Platform { x, y, width: CELL_SIZE, height: CELL_SIZE });
        } else if cell.has_tag(tags::SPIKE) {
            level.spikes.push(Spike { x, y, dir: cell.rotation() / 90 });
        } else if cell.has_tag(tags::PLAYER_SPAWN) {
            level.player = Point { x, y };
        }

        if cell.has_tag(tags::END) {
            level.target = Point { x, y };
        }
        if cell.has_tag(tags::ENEMY) {
            level.enemies.push(Point { x, y });
        }
        if cell.has_tag(tags::FALLING_BLOCK) {
            level.falling_blocks.push(Point { x, y });
        }
        if cell.has_tag(tags::SPIKY_BALL) {
            level.spiky_balls.push(Point { x, y });
        }
        if cell.has_tag(tags::COIN) {
            level.coins.push(Point { x, y });
        }
        if cell.has_tag(tags::ONE_WAY_PLATFORM) {
            level.one_way_platforms.push(OneWayPlatform { x, y, width: CELL_SIZE });
        }
    }

    level.world = Size { width: max_x + CELL_SIZE, height: max_y + CELL_SIZE };
    log::debug!(
        "Level built: {} platforms, {} spikes, {} enemies, world {}x{}",
        level.platforms.len(),
        level.spikes.len(),
        level.enemies.len(),
        level.world.width,
        level.world.height
    );

    Ok(LevelDocument { level1: level })
}

/// Validates, encodes and writes the level. Nothing is written on failure.
pub fn export_level<P: AsRef<Path>>(grid: &GridState, path: P) -> Result<LevelDocument, ExportError> {
    let document = build_level(grid)?;
    let json = document.to_json()?;
    fs::write(path.as_ref(), json)?;
    log::info!("Level exported to {}", path.as_ref().display());
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(grid: &mut GridState, index: usize, tag: &str) {
        grid.cell_mut(index).unwrap().add_tag(tag);
    }

    fn minimal_grid() -> GridState {
        let mut grid = GridState::new();
        tag(&mut grid, 0, tags::PLAYER_SPAWN);
        tag(&mut grid, 1, tags::END);
        grid
    }

    #[test]
    fn test_missing_markers_fail() {
        let grid = GridState::new();
        match build_level(&grid) {
            Err(ExportError::MissingMarkers { has_player_spawn, has_end }) => {
                assert!(!has_player_spawn);
                assert!(!has_end);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let mut grid = GridState::new();
        tag(&mut grid, 0, tags::PLAYER_SPAWN);
        assert!(matches!(
            build_level(&grid),
            Err(ExportError::MissingMarkers { has_player_spawn: true, has_end: false })
        ));
    }

    #[test]
    fn test_export_writes_nothing_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LEVEL_FILE_NAME);
        assert!(export_level(&GridState::new(), &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_platform_position_and_world() {
        let mut grid = minimal_grid();
        tag(&mut grid, 30, tags::SOLID_GROUND);

        let level = build_level(&grid).unwrap().level1;
        assert_eq!(level.platforms, vec![Platform { x: 0, y: 40, width: 40, height: 40 }]);
        assert!(level.world.height >= 80);
        assert_eq!(level.world, Size { width: 40, height: 80 });
        assert_eq!(level.player, Point { x: 0, y: 0 });
        assert_eq!(level.target, Point { x: 40, y: 0 });
    }

    #[test]
    fn test_last_end_wins() {
        let mut grid = minimal_grid();
        tag(&mut grid, 95, tags::END);
        let level = build_level(&grid).unwrap().level1;
        assert_eq!(level.target, Point { x: 5 * 40, y: 3 * 40 });
    }

    #[test]
    fn test_spike_direction_and_categories() {
        let mut grid = minimal_grid();
        tag(&mut grid, 40, tags::SPIKE);
        grid.cell_mut(40).unwrap().set_rotation(Some(270));
        tag(&mut grid, 41, tags::SOLID_GROUND);
        tag(&mut grid, 41, tags::SPIKE);
        tag(&mut grid, 42, tags::COIN);
        tag(&mut grid, 43, tags::ONE_WAY_PLATFORM);
        tag(&mut grid, 44, tags::FALLING_BLOCK);
        tag(&mut grid, 45, tags::SPIKY_BALL);
        tag(&mut grid, 899, tags::ENEMY);

        let level = build_level(&grid).unwrap().level1;
        assert_eq!(level.spikes, vec![Spike { x: 400, y: 40, dir: 3 }]);
        assert_eq!(level.platforms.len(), 1);
        assert_eq!(level.coins, vec![Point { x: 480, y: 40 }]);
        assert_eq!(level.one_way_platforms, vec![OneWayPlatform { x: 520, y: 40, width: 40 }]);
        assert_eq!(level.falling_blocks, vec![Point { x: 560, y: 40 }]);
        assert_eq!(level.spiky_balls, vec![Point { x: 600, y: 40 }]);
        assert_eq!(level.enemies, vec![Point { x: 1160, y: 1160 }]);
        assert_eq!(level.world, Size { width: 1200, height: 1200 });
    }

    #[test]
    fn test_json_layout() {
        let json = build_level(&minimal_grid()).unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let level = &value["level1"];

        assert_eq!(level["world"]["width"], 40);
        assert_eq!(level["clouds"]["y"]["min"], 60);
        assert_eq!(level["clouds"]["x"][0], -100);
        assert!(level["hillsFront"].as_array().unwrap().is_empty());
        assert!(level["oneWayPlatforms"].is_array());
        assert!(level["spikyBalls"].is_array());
        assert!(json.starts_with("{\n  \"level1\": {\n    \"world\""));
    }
}
