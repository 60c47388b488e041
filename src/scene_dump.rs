use crate::layout::{Direction, Scene};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDump {
    pub width: f64,
    pub height: f64,
    pub cell_size: f64,
    pub padding: f64,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub cell: [u32; 2],
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub incomes: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub key: String,
    pub node: String,
    pub income: String,
    pub direction: &'static str,
    pub node_is_anchor: bool,
    pub income_is_anchor: bool,
    pub line: [f64; 4],
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Top => "top",
        Direction::Bottom => "bottom",
        Direction::Left => "left",
        Direction::Right => "right",
    }
}

impl SceneDump {
    pub fn from_scene<T>(scene: &Scene<'_, T>) -> Self {
        let nodes = scene
            .groups
            .iter()
            .map(|group| NodeDump {
                id: group.node.id.clone(),
                cell: [group.node.x, group.node.y],
                x: group.icon.x,
                y: group.icon.y,
                size: group.icon.width,
                incomes: group.incomes.iter().map(|n| n.id.clone()).collect(),
            })
            .collect();

        let edges = scene
            .edges()
            .map(|edge| EdgeDump {
                key: edge.key(),
                node: edge.node.id.clone(),
                income: edge.income.id.clone(),
                direction: direction_name(edge.direction),
                node_is_anchor: edge.node.is_anchor,
                income_is_anchor: edge.income.is_anchor,
                line: edge.line,
            })
            .collect();

        SceneDump {
            width: scene.width,
            height: scene.height,
            cell_size: scene.geometry.cell_size(),
            padding: scene.geometry.padding(),
            nodes,
            edges,
        }
    }
}

pub fn write_scene_dump<T>(path: &Path, scene: &Scene<'_, T>) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = SceneDump::from_scene(scene);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
