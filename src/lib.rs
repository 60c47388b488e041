#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod interaction;
pub mod ir;
pub mod layout;
pub mod render;
pub mod scene_dump;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, GridLayoutConfig, RenderConfig, load_config};
pub use error::GraphError;
pub use interaction::{Interactions, PointerEvent, PointerKind};
pub use ir::{Grid, GridDocument, GridNode, parse_grid_document};
pub use layout::{
    CellGeometry, Direction, Edge, HitTarget, IconPlacement, NodeGroup, Scene, Side, classify,
    compose_scene, resolve_edge,
};
pub use render::{DefaultNodeIcon, EdgeRouter, LabeledIcon, NodeIcon, StraightEdges, render_svg};
pub use theme::Theme;
