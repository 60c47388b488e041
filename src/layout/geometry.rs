use crate::error::{GraphError, Result};

/// A cell boundary side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const fn opposite(self) -> Self {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Pixel metrics of the grid: cell size and the inset applied on every side.
///
/// Construction validates `cell_size > 0` and `0 <= padding < cell_size / 2`,
/// so every accessor works on a non-degenerate inset box. Coordinates are
/// `f64` so any `u32` cell index maps to an exact pixel offset.
///
/// Entry points sit on the inset box frame. With zero padding the bottom and
/// right entries therefore land on the cell's closed outer frame, the line
/// shared with the next cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    cell_size: f64,
    padding: f64,
}

impl CellGeometry {
    pub fn new(cell_size: f64, padding: f64) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GraphError::InvalidCellSize { cell_size });
        }
        let half = cell_size / 2.0;
        if !padding.is_finite() || padding < 0.0 || padding >= half {
            return Err(GraphError::InvalidPadding {
                cell_size,
                padding,
                half,
            });
        }
        Ok(Self { cell_size, padding })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Top-left corner of the inset box.
    pub fn inset_origin(&self, x: u32, y: u32) -> (f64, f64) {
        (
            f64::from(x) * self.cell_size + self.padding,
            f64::from(y) * self.cell_size + self.padding,
        )
    }

    /// Edge length of the (square) inset box.
    pub fn inset_size(&self) -> f64 {
        self.cell_size - self.padding * 2.0
    }

    pub fn cell_center(&self, x: u32, y: u32) -> (f64, f64) {
        let (left, top) = self.inset_origin(x, y);
        let half = self.inset_size() / 2.0;
        (left + half, top + half)
    }

    pub fn top_entry(&self, x: u32, y: u32) -> (f64, f64) {
        let (cx, _) = self.cell_center(x, y);
        let (_, top) = self.inset_origin(x, y);
        (cx, top)
    }

    pub fn bottom_entry(&self, x: u32, y: u32) -> (f64, f64) {
        let (cx, _) = self.cell_center(x, y);
        let (_, top) = self.inset_origin(x, y);
        (cx, top + self.inset_size())
    }

    pub fn left_entry(&self, x: u32, y: u32) -> (f64, f64) {
        let (_, cy) = self.cell_center(x, y);
        let (left, _) = self.inset_origin(x, y);
        (left, cy)
    }

    pub fn right_entry(&self, x: u32, y: u32) -> (f64, f64) {
        let (_, cy) = self.cell_center(x, y);
        let (left, _) = self.inset_origin(x, y);
        (left + self.inset_size(), cy)
    }

    pub fn entry(&self, side: Side, x: u32, y: u32) -> (f64, f64) {
        match side {
            Side::Top => self.top_entry(x, y),
            Side::Bottom => self.bottom_entry(x, y),
            Side::Left => self.left_entry(x, y),
            Side::Right => self.right_entry(x, y),
        }
    }

    /// Pixel extent of a `width × height` cell grid.
    pub fn extent(&self, width_in_cells: u32, height_in_cells: u32) -> (f64, f64) {
        (
            f64::from(width_in_cells) * self.cell_size,
            f64::from(height_in_cells) * self.cell_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIDES: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    /// Half-open cell bounds, closed on the far side when padding is zero.
    fn within_cell(geometry: &CellGeometry, x: u32, y: u32, point: (f64, f64)) -> bool {
        let c = geometry.cell_size();
        let (left, top) = (f64::from(x) * c, f64::from(y) * c);
        let (right, bottom) = (left + c, top + c);
        let (px, py) = point;
        if geometry.padding() == 0.0 {
            px >= left && px <= right && py >= top && py <= bottom
        } else {
            px >= left && px < right && py >= top && py < bottom
        }
    }

    #[test]
    fn entries_sit_on_inset_box_midpoints() {
        let geometry = CellGeometry::new(40.0, 5.0).unwrap();
        assert_eq!(geometry.cell_center(0, 0), (20.0, 20.0));
        assert_eq!(geometry.top_entry(0, 1), (20.0, 45.0));
        assert_eq!(geometry.bottom_entry(0, 0), (20.0, 35.0));
        assert_eq!(geometry.left_entry(2, 0), (85.0, 20.0));
        assert_eq!(geometry.right_entry(2, 0), (115.0, 20.0));
        assert_eq!(geometry.inset_origin(1, 2), (45.0, 85.0));
        assert_eq!(geometry.inset_size(), 30.0);
    }

    #[test]
    fn every_point_stays_inside_its_cell() {
        let params = [(50.0, 0.0), (50.0, 24.9), (40.0, 5.0), (7.0, 3.0), (1.0, 0.25)];
        for (cell_size, padding) in params {
            let geometry = CellGeometry::new(cell_size, padding).unwrap();
            let far = [u32::MAX - 1, 20_000_001, 16_777_217];
            for x in (0..6).chain(far) {
                for y in (0..6).chain(far) {
                    assert!(within_cell(&geometry, x, y, geometry.cell_center(x, y)));
                    for side in SIDES {
                        let point = geometry.entry(side, x, y);
                        assert!(
                            within_cell(&geometry, x, y, point),
                            "{side:?} entry {point:?} escapes cell ({x}, {y}) at size {cell_size}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn zero_padding_puts_entries_on_cell_frame() {
        let geometry = CellGeometry::new(10.0, 0.0).unwrap();
        assert_eq!(geometry.top_entry(1, 1), (15.0, 10.0));
        assert_eq!(geometry.left_entry(1, 1), (10.0, 15.0));
        assert_eq!(geometry.bottom_entry(1, 1), (15.0, 20.0));
        assert_eq!(geometry.right_entry(1, 1), (20.0, 15.0));
        // Shared with the neighbour's opposite entry.
        assert_eq!(geometry.bottom_entry(1, 1), geometry.top_entry(1, 2));
    }

    #[test]
    fn far_cells_keep_distinct_side_entries() {
        let geometry = CellGeometry::new(1.0, 0.25).unwrap();
        let x = 20_000_001;
        assert_eq!(geometry.left_entry(x, 0), (20_000_001.25, 0.5));
        assert_eq!(geometry.right_entry(x, 0), (20_000_001.75, 0.5));
        assert_eq!(geometry.cell_center(x, 0), (20_000_001.5, 0.5));

        let geometry = CellGeometry::new(50.0, 5.0).unwrap();
        let (width, height) = geometry.extent(u32::MAX, 1);
        assert_eq!(width, f64::from(u32::MAX) * 50.0);
        assert_eq!(height, 50.0);
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(matches!(
            CellGeometry::new(0.0, 0.0),
            Err(GraphError::InvalidCellSize { .. })
        ));
        assert!(matches!(
            CellGeometry::new(-4.0, 0.0),
            Err(GraphError::InvalidCellSize { .. })
        ));
        assert!(matches!(
            CellGeometry::new(f64::NAN, 0.0),
            Err(GraphError::InvalidCellSize { .. })
        ));
        assert!(matches!(
            CellGeometry::new(40.0, 20.0),
            Err(GraphError::InvalidPadding { .. })
        ));
        assert!(matches!(
            CellGeometry::new(40.0, -1.0),
            Err(GraphError::InvalidPadding { .. })
        ));
    }

    #[test]
    fn opposite_is_an_involution() {
        for side in SIDES {
            assert_ne!(side.opposite(), side);
            assert_eq!(side.opposite().opposite(), side);
        }
    }
}
