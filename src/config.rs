//! `config.json` loading: the brush and tool buttons shown next to the grid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {0}: {1}")]
    Io(String, #[source] io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonConfig {
    pub class: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    pub color: String,
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub max: u32, // 0 = unlimited
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    pub class: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub buttons: Vec<ButtonConfig>,
    #[serde(default)]
    pub tools: Vec<ToolConfig>,
}

impl EditorConfig {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads the config file, falling back to the built-in palette when the
    /// file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_json(&content)?;
                log::info!(
                    "Loaded {} brushes and {} tools from {}",
                    config.buttons.len(),
                    config.tools.len(),
                    path.display()
                );
                Ok(config)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::warn!("{} not found, using the built-in palette", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Io(path.display().to_string(), err)),
        }
    }
}

fn button(class: &str, title: &str, description: &str, color: &str, shape: &str, max: u32) -> ButtonConfig {
    ButtonConfig {
        class: class.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        image: Some(format!("images/{}.png", class)),
        color: color.to_string(),
        shape: Some(shape.to_string()),
        max,
    }
}

fn tool(class: &str, image: &str) -> ToolConfig {
    ToolConfig {
        class: class.to_string(),
        image: Some(image.to_string()),
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            buttons: vec![
                button("solButton", "Ground", "Solid ground block", "saddlebrown", "square", 0),
                button("spike", "Spike", "Hurts the player, can be flipped", "gray", "triangle", 0),
                button("enemy", "Enemy", "Walking enemy", "red", "circle", 0),
                button("playerSpawn", "Start", "Where the player appears", "blue", "circle", 1),
                button("end", "End", "Level goal", "green", "square", 1),
                button("coin", "Coin", "Collectible coin", "gold", "circle", 0),
                button("fall", "Falling block", "Falls when stepped on", "orange", "square", 0),
                button("spikyBall", "Spiky ball", "Moving hazard", "purple", "circle", 0),
                button("oneway", "One-way platform", "Can be jumped through from below", "cyan", "square", 0),
            ],
            tools: vec![
                tool("paintTool", "images/paint.png"),
                tool("eraseTool", "images/erase.png"),
                tool("flipTool", "images/flip.png"),
            ],
        }
    }
}
