use crate::ir::GridNode;

use super::geometry::{CellGeometry, Side};
use super::types::{Direction, Edge};

/// Classifies which side of the `from` cell faces the `to` cell.
///
/// The dominant axis wins; equal deltas prefer the horizontal axis, and
/// identical positions fall back to `Right`.
pub fn classify(from_x: u32, from_y: u32, to_x: u32, to_y: u32) -> Direction {
    let dx = to_x as i64 - from_x as i64;
    let dy = to_y as i64 - from_y as i64;
    if dy.abs() > dx.abs() {
        if dy < 0 { Direction::Top } else { Direction::Bottom }
    } else if dx < 0 {
        Direction::Left
    } else {
        Direction::Right
    }
}

/// Side of the owning node's cell an edge leaves through.
pub const fn node_side(direction: Direction) -> Side {
    match direction {
        Direction::Top => Side::Top,
        Direction::Bottom => Side::Bottom,
        Direction::Left => Side::Left,
        Direction::Right => Side::Right,
    }
}

/// Orders a (owner, income) pair so routing always starts at the non-anchor
/// end: an anchor owner is swapped with its income.
pub fn normalize_pair<'a, T>(
    owner: &'a GridNode<T>,
    income: &'a GridNode<T>,
) -> (&'a GridNode<T>, &'a GridNode<T>) {
    if owner.is_anchor {
        (income, owner)
    } else {
        (owner, income)
    }
}

fn endpoint<T>(geometry: &CellGeometry, node: &GridNode<T>, side: Side) -> (f64, f64) {
    if node.is_anchor {
        geometry.cell_center(node.x, node.y)
    } else {
        geometry.entry(side, node.x, node.y)
    }
}

pub fn resolve_edge<'a, T>(
    geometry: &CellGeometry,
    node: &'a GridNode<T>,
    income: &'a GridNode<T>,
) -> Edge<'a, T> {
    if node.position() == income.position() {
        tracing::debug!(node = %node.id, income = %income.id, "edge endpoints share a cell");
    }
    let direction = classify(node.x, node.y, income.x, income.y);
    let side = node_side(direction);
    let (x1, y1) = endpoint(geometry, node, side);
    let (x2, y2) = endpoint(geometry, income, side.opposite());
    Edge {
        node,
        income,
        direction,
        line: [x1, y1, x2, y2],
    }
}

/// Resolves every edge of `owner`, normalizing each pair first.
pub fn resolve_edges<'a, T>(
    geometry: &CellGeometry,
    owner: &'a GridNode<T>,
    incomes: &[&'a GridNode<T>],
) -> Vec<Edge<'a, T>> {
    incomes
        .iter()
        .map(|&income| {
            let (node, income) = normalize_pair(owner, income);
            resolve_edge(geometry, node, income)
        })
        .collect()
}
