use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub node_fill: String,
    pub node_stroke: String,
    pub node_stroke_width: f32,
    pub node_corner_radius: f32,
    pub node_text_color: String,
    pub line_color: String,
    pub line_width: f32,
    pub anchor_color: String,
    pub anchor_radius: f32,
    pub background: String,
}

impl Theme {
    pub fn matrix_default() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            node_fill: "#ffffff".to_string(),
            node_stroke: "#2d578b".to_string(),
            node_stroke_width: 2.0,
            node_corner_radius: 4.0,
            node_text_color: "#2d578b".to_string(),
            line_color: "#2d578b".to_string(),
            line_width: 2.0,
            anchor_color: "#2d578b".to_string(),
            anchor_radius: 0.0,
            background: "#ffffff".to_string(),
        }
    }

    pub fn blueprint() -> Self {
        Self {
            font_family: "ui-monospace, SFMono-Regular, Menlo, monospace".to_string(),
            font_size: 11.0,
            node_fill: "#1c3f6e".to_string(),
            node_stroke: "#e8f0fb".to_string(),
            node_stroke_width: 1.5,
            node_corner_radius: 0.0,
            node_text_color: "#e8f0fb".to_string(),
            line_color: "#9fc2ef".to_string(),
            line_width: 1.5,
            anchor_color: "#9fc2ef".to_string(),
            anchor_radius: 2.5,
            background: "#123058".to_string(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" | "matrix" | "base" => Some(Self::matrix_default()),
            "blueprint" | "dark" => Some(Self::blueprint()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::matrix_default()
    }
}
