// Spatial hash grid for circle overlap detection.
//
// Instead of checking a candidate against every placed bubble, placed circles
// are bucketed by the cells their bounding boxes cover. Two circles can only
// be closer than `gap` if their gap-expanded boxes share a cell.

use super::Circle;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    /// Size of each cell in the grid.
    cell_size: f64,
    /// Map from cell coordinates to indices into `circles`.
    cells: HashMap<(i64, i64), Vec<usize>>,
    circles: Vec<Circle>,
}

impl SpatialGrid {
    /// Cell size should be roughly the largest expected diameter.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: if cell_size.is_finite() && cell_size >= 1.0 { cell_size } else { 1.0 },
            cells: HashMap::new(),
            circles: Vec::new(),
        }
    }

    /// Cells touched by the circle's bounding box grown by `margin`.
    fn cell_range(&self, c: &Circle, margin: f64) -> Vec<(i64, i64)> {
        let reach = c.r + margin.max(0.0);
        let to_cell = |v: f64| (v / self.cell_size).floor() as i64;
        let (min_x, max_x) = (to_cell(c.cx - reach), to_cell(c.cx + reach));
        let (min_y, max_y) = (to_cell(c.cy - reach), to_cell(c.cy + reach));

        let mut cells = Vec::new();
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                cells.push((cx, cy));
            }
        }
        cells
    }

    pub fn insert(&mut self, circle: Circle) {
        let idx = self.circles.len();
        self.circles.push(circle);
        for cell in self.cell_range(&circle, 0.0) {
            self.cells.entry(cell).or_default().push(idx);
        }
    }

    /// Circles that might come within `gap` of `circle`.
    /// May include false positives; caller does the exact check.
    pub fn query(&self, circle: &Circle, gap: f64) -> Vec<Circle> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for cell in self.cell_range(circle, gap) {
            if let Some(indices) = self.cells.get(&cell) {
                for &i in indices {
                    if seen.insert(i) {
                        result.push(self.circles[i]);
                    }
                }
            }
        }
        result
    }

    /// True if `circle` comes closer than `gap` to any placed circle.
    pub fn overlaps_any(&self, circle: &Circle, gap: f64) -> bool {
        self.query(circle, gap).iter().any(|other| circle.overlaps(other, gap))
    }

    /// True if the center of `circle` is within `min_separation` of any placed center.
    pub fn near_center(&self, circle: &Circle, min_separation: f64) -> bool {
        let probe = Circle { r: 0.0, ..*circle };
        self.query(&probe, min_separation)
            .iter()
            .any(|other| probe.distance_to(other) < min_separation)
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }
}
