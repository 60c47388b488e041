use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridLayoutConfig {
    pub cell_size: f64,
    pub padding: f64,
}

impl Default for GridLayoutConfig {
    fn default() -> Self {
        Self {
            cell_size: 50.0,
            padding: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Draw the default marker at the node end of every straight edge.
    pub arrowheads: bool,
    pub background: Option<String>,
    pub png_scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            arrowheads: false,
            background: None,
            png_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: GridLayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    node_fill: Option<String>,
    node_stroke: Option<String>,
    node_stroke_width: Option<f32>,
    node_corner_radius: Option<f32>,
    node_text_color: Option<String>,
    line_color: Option<String>,
    line_width: Option<f32>,
    anchor_color: Option<String>,
    anchor_radius: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    cell_size: Option<f64>,
    padding: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    arrowheads: Option<bool>,
    background: Option<String>,
    png_scale: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::from_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => tracing::warn!(theme = theme_name, "unknown theme name, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars);
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.cell_size {
            config.layout.cell_size = v;
        }
        if let Some(v) = layout.padding {
            config.layout.padding = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.arrowheads {
            config.render.arrowheads = v;
        }
        if let Some(v) = render.background {
            config.render.background = Some(v);
        }
        if let Some(v) = render.png_scale {
            config.render.png_scale = v;
        }
    }

    Ok(config)
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.font_size {
        theme.font_size = v;
    }
    if let Some(v) = vars.node_fill {
        theme.node_fill = v;
    }
    if let Some(v) = vars.node_stroke {
        theme.node_stroke = v;
    }
    if let Some(v) = vars.node_stroke_width {
        theme.node_stroke_width = v;
    }
    if let Some(v) = vars.node_corner_radius {
        theme.node_corner_radius = v;
    }
    if let Some(v) = vars.node_text_color {
        theme.node_text_color = v;
    }
    if let Some(v) = vars.line_color {
        theme.line_color = v;
    }
    if let Some(v) = vars.line_width {
        theme.line_width = v;
    }
    if let Some(v) = vars.anchor_color {
        theme.anchor_color = v;
    }
    if let Some(v) = vars.anchor_radius {
        theme.anchor_radius = v;
    }
    if let Some(v) = vars.background {
        theme.background = v;
    }
}
