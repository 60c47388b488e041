use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{GraphError, Result};

/// A node placed on the layout grid.
///
/// `x` and `y` are cell indices, not pixels. `incomes` lists the ids of the
/// nodes an edge is drawn from into this node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridNode<T> {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub is_anchor: bool,
    pub incomes: Vec<String>,
    pub payload: T,
}

impl<T> GridNode<T> {
    pub fn new(id: impl Into<String>, x: u32, y: u32, payload: T) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            is_anchor: false,
            incomes: Vec::new(),
            payload,
        }
    }

    pub fn anchor(id: impl Into<String>, x: u32, y: u32, payload: T) -> Self {
        Self {
            is_anchor: true,
            ..Self::new(id, x, y, payload)
        }
    }

    pub fn with_incomes<I, S>(mut self, incomes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.incomes = incomes.into_iter().map(Into::into).collect();
        self
    }

    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }
}

/// Node set keyed by id, iterated in insertion order.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    nodes: IndexMap<String, GridNode<T>>,
}

impl<T> Grid<T> {
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }

    /// Inserts a node, replacing (in place) any node with the same id.
    pub fn insert(&mut self, node: GridNode<T>) -> Option<GridNode<T>> {
        self.nodes.insert(node.id.clone(), node)
    }

    pub fn get(&self, id: &str) -> Option<&GridNode<T>> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GridNode<T>> {
        self.nodes.values()
    }

    /// Resolves a node's income ids against this grid, in listed order.
    /// Ids with no matching node are skipped.
    pub fn incomes_of<'a>(&'a self, node: &GridNode<T>) -> Vec<&'a GridNode<T>> {
        node.incomes
            .iter()
            .filter_map(|id| {
                let income = self.nodes.get(id);
                if income.is_none() {
                    tracing::warn!(node = %node.id, income = %id, "income id not found in grid");
                }
                income
            })
            .collect()
    }
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<GridNode<T>> for Grid<T> {
    fn from_iter<I: IntoIterator<Item = GridNode<T>>>(iter: I) -> Self {
        let mut grid = Grid::new();
        for node in iter {
            grid.insert(node);
        }
        grid
    }
}

impl<T> From<IndexMap<String, GridNode<T>>> for Grid<T> {
    fn from(nodes: IndexMap<String, GridNode<T>>) -> Self {
        Self { nodes }
    }
}

/// On-disk grid description (JSON5).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDocument {
    pub width_in_cells: u32,
    pub height_in_cells: u32,
    #[serde(default)]
    pub cell_size: Option<f64>,
    #[serde(default)]
    pub padding: Option<f64>,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub x: u32,
    pub y: u32,
    #[serde(default)]
    pub is_anchor: bool,
    #[serde(default, deserialize_with = "deserialize_ids")]
    pub incomes: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Ids may be written as strings or integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(i64),
}

impl From<IdRepr> for String {
    fn from(repr: IdRepr) -> Self {
        match repr {
            IdRepr::Text(text) => text,
            IdRepr::Number(value) => value.to_string(),
        }
    }
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    IdRepr::deserialize(deserializer).map(String::from)
}

fn deserialize_ids<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    let ids = Vec::<IdRepr>::deserialize(deserializer)?;
    Ok(ids.into_iter().map(String::from).collect())
}

impl GridDocument {
    /// Builds the node grid; every extra node key ends up in the payload.
    pub fn into_grid(self) -> Result<Grid<Value>> {
        let mut grid = Grid::new();
        for spec in self.nodes {
            if grid.get(&spec.id).is_some() {
                return Err(GraphError::DuplicateNode { id: spec.id });
            }
            grid.insert(GridNode {
                id: spec.id,
                x: spec.x,
                y: spec.y,
                is_anchor: spec.is_anchor,
                incomes: spec.incomes,
                payload: Value::Object(spec.extra),
            });
        }
        Ok(grid)
    }
}

pub fn parse_grid_document(input: &str) -> Result<GridDocument> {
    let value = json5::from_str::<Value>(input)?;
    serde_json::from_value(value).map_err(|err| GraphError::Document {
        message: err.to_string(),
    })
}
