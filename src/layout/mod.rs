mod geometry;
mod routing;
mod types;

pub use geometry::{CellGeometry, Side};
pub use routing::{classify, node_side, normalize_pair, resolve_edge, resolve_edges};
pub use types::*;

use crate::error::Result;
use crate::ir::{Grid, GridNode};

/// Composes one rendering pass over `grid`.
///
/// Geometry parameters are validated before anything else; the canvas is
/// always `width_in_cells * cell_size` by `height_in_cells * cell_size`.
pub fn compose_scene<T>(
    grid: &Grid<T>,
    cell_size: f64,
    padding: f64,
    width_in_cells: u32,
    height_in_cells: u32,
) -> Result<Scene<'_, T>> {
    let geometry = CellGeometry::new(cell_size, padding)?;
    Ok(compose_with_geometry(
        grid,
        geometry,
        width_in_cells,
        height_in_cells,
    ))
}

pub fn compose_with_geometry<T>(
    grid: &Grid<T>,
    geometry: CellGeometry,
    width_in_cells: u32,
    height_in_cells: u32,
) -> Scene<'_, T> {
    let (width, height) = geometry.extent(width_in_cells, height_in_cells);
    let groups: Vec<_> = grid
        .nodes()
        .filter(|node| !node.is_anchor)
        .map(|node| compose_group(grid, &geometry, node))
        .collect();

    tracing::debug!(
        nodes = grid.len(),
        groups = groups.len(),
        width,
        height,
        "composed scene"
    );

    Scene {
        width,
        height,
        geometry,
        groups,
    }
}

fn compose_group<'a, T>(
    grid: &'a Grid<T>,
    geometry: &CellGeometry,
    node: &'a GridNode<T>,
) -> NodeGroup<'a, T> {
    let incomes = grid.incomes_of(node);
    let edges = resolve_edges(geometry, node, &incomes);
    NodeGroup {
        node,
        incomes,
        icon: icon_placement(geometry, node),
        edges,
    }
}

pub fn icon_placement<T>(geometry: &CellGeometry, node: &GridNode<T>) -> IconPlacement {
    let (x, y) = geometry.inset_origin(node.x, node.y);
    let size = geometry.inset_size();
    IconPlacement {
        x,
        y,
        width: size,
        height: size,
    }
}
