use crate::ir::GridNode;

use super::geometry::CellGeometry;

/// Cardinal direction an edge travels, seen from the owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// A resolved straight segment between a node and one of its incomes.
///
/// `line` is `[x1, y1, x2, y2]` with the node endpoint first.
#[derive(Debug)]
pub struct Edge<'a, T> {
    pub node: &'a GridNode<T>,
    pub income: &'a GridNode<T>,
    pub direction: Direction,
    pub line: [f64; 4],
}

// Manual impls: the payload type does not need to be Clone/Copy.
impl<T> Clone for Edge<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Edge<'_, T> {}

impl<T> PartialEq for Edge<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.node.id == other.node.id
            && self.income.id == other.income.id
            && self.direction == other.direction
            && self.line.map(f64::to_bits) == other.line.map(f64::to_bits)
    }
}

impl<'a, T> Edge<'a, T> {
    pub fn start(&self) -> (f64, f64) {
        (self.line[0], self.line[1])
    }

    pub fn end(&self) -> (f64, f64) {
        (self.line[2], self.line[3])
    }

    /// The segment in travel order, from the income into the node.
    pub fn flow(&self) -> [f64; 4] {
        [self.line[2], self.line[3], self.line[0], self.line[1]]
    }

    pub fn key(&self) -> String {
        format!("line-{}-{}", self.node.id, self.income.id)
    }
}

/// Where a node icon is drawn: the inset box of its cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconPlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl IconPlacement {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// One non-anchor node together with its icon and edges.
#[derive(Debug)]
pub struct NodeGroup<'a, T> {
    pub node: &'a GridNode<T>,
    pub incomes: Vec<&'a GridNode<T>>,
    pub icon: IconPlacement,
    pub edges: Vec<Edge<'a, T>>,
}

/// Something a pointer can land on, with the nodes an interaction reports.
#[derive(Debug)]
pub enum HitTarget<'s, 'a, T> {
    Node(&'s NodeGroup<'a, T>),
    Edge(&'s Edge<'a, T>),
}

impl<'a, T> HitTarget<'_, 'a, T> {
    /// The `(node, incomes)` pair handed to interaction callbacks.
    pub fn subject(&self) -> (&'a GridNode<T>, Vec<&'a GridNode<T>>) {
        match self {
            HitTarget::Node(group) => (group.node, group.incomes.clone()),
            HitTarget::Edge(edge) => (edge.node, vec![edge.income]),
        }
    }
}

/// A fully composed rendering pass of fixed pixel size.
#[derive(Debug)]
pub struct Scene<'a, T> {
    pub width: f64,
    pub height: f64,
    pub geometry: CellGeometry,
    pub groups: Vec<NodeGroup<'a, T>>,
}

impl<'a, T> Scene<'a, T> {
    pub fn edges(&self) -> impl Iterator<Item = &Edge<'a, T>> {
        self.groups.iter().flat_map(|group| group.edges.iter())
    }

    pub fn group(&self, id: &str) -> Option<&NodeGroup<'a, T>> {
        self.groups.iter().find(|group| group.node.id == id)
    }

    /// Topmost icon or edge under `(px, py)`. Later groups paint over earlier
    /// ones, and within a group the edges are drawn after the icon.
    pub fn hit_test(&self, px: f64, py: f64, tolerance: f64) -> Option<HitTarget<'_, 'a, T>> {
        for group in self.groups.iter().rev() {
            if let Some(edge) = group
                .edges
                .iter()
                .rev()
                .find(|edge| distance_to_segment((px, py), edge.line) <= tolerance)
            {
                return Some(HitTarget::Edge(edge));
            }
            if group.icon.contains(px, py) {
                return Some(HitTarget::Node(group));
            }
        }
        None
    }
}

fn distance_to_segment(point: (f64, f64), line: [f64; 4]) -> f64 {
    let [x1, y1, x2, y2] = line;
    let (dx, dy) = (x2 - x1, y2 - y1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq <= f64::EPSILON {
        0.0
    } else {
        (((point.0 - x1) * dx + (point.1 - y1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (x1 + t * dx, y1 + t * dy);
    ((point.0 - cx).powi(2) + (point.1 - cy).powi(2)).sqrt()
}
