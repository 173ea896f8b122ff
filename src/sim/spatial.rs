//! Uniform-grid spatial index for enemy proximity queries
//!
//! Rebuilt from scratch every tick. No enemy→cell mapping survives between
//! ticks; the grid only holds indices into the current enemy pool.

use glam::Vec2;
use rustc_hash::FxHashMap;

/// Anything the grid can bucket: a centre and a collision radius
pub trait Bounded {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Grid of pool indices keyed by `floor(pos / cell_size)`
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    pub cell_size: f32,
    cells: FxHashMap<(i32, i32), Vec<usize>>,
    /// Largest radius inserted since the last rebuild (widens the broad phase)
    max_radius: f32,
    /// Number of indexed entries
    count: usize,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: FxHashMap::default(),
            max_radius: 0.0,
            count: 0,
        }
    }

    /// Drop every entry but keep cell allocations for reuse
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.max_radius = 0.0;
        self.count = 0;
    }

    #[inline]
    fn cell_key(&self, p: Vec2) -> (i32, i32) {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    /// Clear and re-insert every entity, index = position in the iterator
    pub fn rebuild<'a, T, I>(&mut self, entities: I)
    where
        T: Bounded + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        self.clear();
        for (idx, e) in entities.into_iter().enumerate() {
            let key = self.cell_key(e.center());
            self.cells.entry(key).or_default().push(idx);
            self.max_radius = self.max_radius.max(e.radius());
            self.count += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Broad phase: every index in the cells overlapping the query box.
    /// Each entity lives in exactly one cell, so the result has no duplicates.
    pub fn candidates_into(&self, point: Vec2, radius: f32, buf: &mut Vec<usize>) {
        buf.clear();
        // Small slack keeps rounding at cell borders on the inclusive side
        let reach = radius.max(0.0) + self.max_radius + 0.5;
        let (x0, y0) = self.cell_key(point - Vec2::splat(reach));
        let (x1, y1) = self.cell_key(point + Vec2::splat(reach));
        let box_cells = (x1 as i64 - x0 as i64 + 1) * (y1 as i64 - y0 as i64 + 1);
        if box_cells > self.cells.len() as i64 {
            // Query box covers more cells than exist: scan occupied cells instead
            for (&(ix, iy), ids) in &self.cells {
                if (x0..=x1).contains(&ix) && (y0..=y1).contains(&iy) {
                    buf.extend_from_slice(ids);
                }
            }
            return;
        }
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                if let Some(ids) = self.cells.get(&(ix, iy)) {
                    buf.extend_from_slice(ids);
                }
            }
        }
    }

    /// Broad + narrow phase: indices of entities with
    /// `distance(point, center) <= radius + entity.radius`
    pub fn query_into<T: Bounded>(
        &self,
        entities: impl Fn(usize) -> Option<T>,
        point: Vec2,
        radius: f32,
        buf: &mut Vec<usize>,
    ) {
        self.candidates_into(point, radius, buf);
        buf.retain(|&idx| match entities(idx) {
            Some(e) => {
                let reach = radius + e.radius();
                e.center().distance_squared(point) <= reach * reach
            }
            None => false,
        });
    }

    /// Closest entity (by centre distance) within `radius + entity.radius`
    pub fn nearest<T: Bounded>(
        &self,
        entities: impl Fn(usize) -> Option<T>,
        point: Vec2,
        radius: f32,
        buf: &mut Vec<usize>,
    ) -> Option<usize> {
        self.query_into(&entities, point, radius, buf);
        buf.iter()
            .copied()
            .filter_map(|idx| entities(idx).map(|e| (idx, e.center().distance_squared(point))))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(idx, _)| idx)
    }
}

/// Lightweight copy of an entity's collision shape for query closures
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Bounded for Circle {
    fn center(&self) -> Vec2 {
        self.center
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn brute_force(circles: &[Circle], p: Vec2, r: f32) -> Vec<usize> {
        circles
            .iter()
            .enumerate()
            .filter(|(_, c)| c.center.distance_squared(p) <= (r + c.radius) * (r + c.radius))
            .map(|(i, _)| i)
            .collect()
    }

    fn query(grid: &SpatialGrid, circles: &[Circle], p: Vec2, r: f32) -> Vec<usize> {
        let mut buf = Vec::new();
        grid.query_into(|i| circles.get(i).copied(), p, r, &mut buf);
        buf.sort_unstable();
        buf
    }

    #[test]
    fn test_query_finds_neighbors_only() {
        let circles = vec![
            Circle { center: Vec2::new(10.0, 10.0), radius: 5.0 },
            Circle { center: Vec2::new(100.0, 10.0), radius: 5.0 },
            Circle { center: Vec2::new(-300.0, 40.0), radius: 5.0 },
        ];
        let mut grid = SpatialGrid::new(64.0);
        grid.rebuild(&circles);
        assert_eq!(grid.len(), 3);
        assert_eq!(query(&grid, &circles, Vec2::new(0.0, 0.0), 20.0), vec![0]);
        assert_eq!(query(&grid, &circles, Vec2::new(55.0, 10.0), 45.0), vec![0, 1]);
    }

    #[test]
    fn test_large_entity_found_from_neighbouring_cells() {
        // Centre sits several cells away but its radius reaches the query point
        let circles = vec![Circle { center: Vec2::new(200.0, 0.0), radius: 150.0 }];
        let mut grid = SpatialGrid::new(32.0);
        grid.rebuild(&circles);
        assert_eq!(query(&grid, &circles, Vec2::new(45.0, 0.0), 10.0), vec![0]);
    }

    #[test]
    fn test_rebuild_forgets_previous_positions() {
        let mut circles = vec![Circle { center: Vec2::new(0.0, 0.0), radius: 4.0 }];
        let mut grid = SpatialGrid::new(50.0);
        grid.rebuild(&circles);
        circles[0].center = Vec2::new(1000.0, 1000.0);
        grid.rebuild(&circles);
        assert!(query(&grid, &circles, Vec2::ZERO, 10.0).is_empty());
        assert_eq!(query(&grid, &circles, Vec2::new(1000.0, 1000.0), 1.0), vec![0]);
    }

    #[test]
    fn test_nearest() {
        let circles = vec![
            Circle { center: Vec2::new(50.0, 0.0), radius: 5.0 },
            Circle { center: Vec2::new(20.0, 0.0), radius: 5.0 },
            Circle { center: Vec2::new(500.0, 0.0), radius: 5.0 },
        ];
        let mut grid = SpatialGrid::new(64.0);
        grid.rebuild(&circles);
        let mut buf = Vec::new();
        let found = grid.nearest(|i| circles.get(i).copied(), Vec2::ZERO, 100.0, &mut buf);
        assert_eq!(found, Some(1));
        let none = grid.nearest(|i| circles.get(i).copied(), Vec2::new(-900.0, 0.0), 50.0, &mut buf);
        assert_eq!(none, None);
    }

    proptest! {
        #[test]
        fn prop_query_matches_brute_force(
            raw in prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0, 1.0f32..40.0), 0..120),
            px in -600.0f32..600.0,
            py in -600.0f32..600.0,
            r in 0.0f32..250.0,
            cell in 8.0f32..128.0,
        ) {
            let circles: Vec<Circle> = raw
                .iter()
                .map(|&(x, y, rad)| Circle { center: Vec2::new(x, y), radius: rad })
                .collect();
            let mut grid = SpatialGrid::new(cell);
            grid.rebuild(&circles);
            let p = Vec2::new(px, py);
            prop_assert_eq!(query(&grid, &circles, p, r), brute_force(&circles, p, r));
        }
    }
}
