use crate::cell::Shape;
use crate::config::{ButtonConfig, EditorConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Paint,
    Erase,
    Flip,
}

impl Tool {
    pub fn from_class(class: &str) -> Option<Self> {
        match class {
            "paintTool" => Some(Tool::Paint),
            "eraseTool" => Some(Tool::Erase),
            "flipTool" => Some(Tool::Flip),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Paint => "paint",
            Tool::Erase => "erase",
            Tool::Flip => "flip",
        }
    }
}

/// A paintable entry of the palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub tag: String,
    pub title: String,
    pub color: String,
    pub shape: Option<Shape>,
    pub max_count: u32, // 0 = unlimited
}

impl Brush {
    /// `None` for classes named like a shape: the save format reads those
    /// back as the cell shape, so they could never survive as tags.
    pub fn from_config(button: &ButtonConfig) -> Option<Self> {
        if Shape::from_name(&button.class).is_some() {
            log::warn!("Ignoring brush {:?}: class names a shape", button.class);
            return None;
        }

        let shape_name = button.shape.as_deref().unwrap_or("square");
        let shape = Shape::from_name(shape_name);
        if shape.is_none() {
            log::warn!("Brush {} has unknown shape {:?}", button.class, shape_name);
        }

        Some(Self {
            tag: button.class.clone(),
            title: button.title.clone(),
            color: button.color.clone(),
            shape,
            max_count: button.max,
        })
    }

    pub fn is_capped(&self) -> bool {
        self.max_count > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    brushes: Vec<Brush>,
    tools: Vec<Tool>,
}

impl Palette {
    pub fn new(brushes: Vec<Brush>, tools: Vec<Tool>) -> Self {
        Self { brushes, tools }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        let brushes = config.buttons.iter().filter_map(Brush::from_config).collect();

        let mut tools = Vec::new();
        for tool in &config.tools {
            match Tool::from_class(&tool.class) {
                Some(kind) if !tools.contains(&kind) => tools.push(kind),
                Some(_) => {}
                None => log::warn!("Ignoring unknown tool class {:?}", tool.class),
            }
        }

        Self { brushes, tools }
    }

    pub fn brushes(&self) -> &[Brush] {
        &self.brushes
    }

    pub fn brush(&self, index: usize) -> Option<&Brush> {
        self.brushes.get(index)
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// First brush painting with `color`; counters are released through it.
    pub fn brush_for_color(&self, color: &str) -> Option<&Brush> {
        self.brushes.iter().find(|b| b.color == color)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}
