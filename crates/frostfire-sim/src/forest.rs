//! Deterministic tree placement for the car scene.

use std::collections::HashMap;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// One placed tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeInstance {
    pub x: f32,
    pub z: f32,
    /// Uniform scale in `[1, 2)`.
    pub scale: f32,
    pub rotation_degrees: f32,
    /// Index into the tree mesh variants.
    pub variant: u32,
}

impl TreeInstance {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }
}

/// Parameters of [`generate_forest`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub seed: u64,
    pub count: usize,
    /// Sampling area as `(min, max)` corners on the xz plane.
    pub min: Vec2,
    pub max: Vec2,
    /// No two trees are closer than this.
    pub minimal_gap: f32,
    pub variants: u32,
    /// Attempts allowed per requested tree before giving up.
    pub attempts_per_tree: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            seed: 0,
            count: 1499,
            min: Vec2::new(-29.0, 2.0),
            max: Vec2::new(29.0, 14.0),
            minimal_gap: 0.5,
            variants: 6,
            attempts_per_tree: 1000,
        }
    }
}

/// Uniform grid with cell size equal to the gap, so a conflict can only sit
/// in the 3×3 neighbourhood of a candidate's cell.
struct GapGrid {
    cell: f32,
    cells: HashMap<(i32, i32), Vec<Vec2>>,
}

impl GapGrid {
    fn new(cell: f32) -> Self {
        Self { cell: cell.max(f32::EPSILON), cells: HashMap::new() }
    }

    fn key(&self, p: Vec2) -> (i32, i32) {
        ((p.x / self.cell).floor() as i32, (p.y / self.cell).floor() as i32)
    }

    fn is_free(&self, p: Vec2, gap: f32) -> bool {
        let (cx, cy) = self.key(p);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let Some(points) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                if points.iter().any(|q| q.distance(p) < gap) {
                    return false;
                }
            }
        }
        true
    }

    fn insert(&mut self, p: Vec2) {
        let key = self.key(p);
        self.cells.entry(key).or_default().push(p);
    }
}

/// Rejection-samples `params.count` trees.
///
/// Deterministic for given params. Fails with [`LayoutError::Exhausted`] when
/// the area cannot hold that many trees at the requested gap.
pub fn generate_forest(params: &ForestParams) -> Result<Vec<TreeInstance>, LayoutError> {
    if !(params.min.x < params.max.x && params.min.y < params.max.y) || params.variants == 0 {
        return Err(LayoutError::DegenerateArea);
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut grid = GapGrid::new(params.minimal_gap);
    let mut trees = Vec::with_capacity(params.count);
    let max_attempts = params.count.saturating_mul(params.attempts_per_tree);
    let mut attempts = 0usize;

    while trees.len() < params.count {
        if attempts >= max_attempts {
            return Err(LayoutError::Exhausted {
                placed: trees.len(),
                requested: params.count,
                attempts,
                gap: params.minimal_gap,
            });
        }
        attempts += 1;

        let p = Vec2::new(
            rng.random_range(params.min.x..params.max.x),
            rng.random_range(params.min.y..params.max.y),
        );
        if !grid.is_free(p, params.minimal_gap) {
            continue;
        }
        grid.insert(p);
        trees.push(TreeInstance {
            x: p.x,
            z: p.y,
            scale: 1.0 + rng.random_range(0.0..1.0),
            rotation_degrees: rng.random_range(0.0..360.0),
            variant: rng.random_range(0..params.variants),
        });
    }

    log::debug!("placed {} trees in {attempts} attempts", trees.len());
    Ok(trees)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(seed: u64) -> ForestParams {
        ForestParams { seed, count: 200, ..Default::default() }
    }

    // ── determinism ───────────────────────────────────────────────────────

    #[test]
    fn same_seed_same_forest() {
        assert_eq!(generate_forest(&small(7)).unwrap(), generate_forest(&small(7)).unwrap());
    }

    #[test]
    fn different_seed_different_forest() {
        assert_ne!(generate_forest(&small(1)).unwrap(), generate_forest(&small(2)).unwrap());
    }

    // ── constraints ───────────────────────────────────────────────────────

    #[test]
    fn default_forest_respects_gap_and_bounds() {
        let params = ForestParams::default();
        let trees = generate_forest(&params).unwrap();
        assert_eq!(trees.len(), 1499);

        for t in &trees {
            assert!((params.min.x..params.max.x).contains(&t.x));
            assert!((params.min.y..params.max.y).contains(&t.z));
            assert!((1.0..2.0).contains(&t.scale));
            assert!((0.0..360.0).contains(&t.rotation_degrees));
            assert!(t.variant < 6);
        }
        for (i, a) in trees.iter().enumerate() {
            for b in &trees[i + 1..] {
                assert!(a.position().distance(b.position()) >= params.minimal_gap);
            }
        }
    }

    #[test]
    fn overfull_area_is_exhausted() {
        let params = ForestParams {
            min: Vec2::ZERO,
            max: Vec2::ONE,
            count: 100,
            attempts_per_tree: 10,
            ..Default::default()
        };
        match generate_forest(&params) {
            Err(LayoutError::Exhausted { placed, requested, attempts, .. }) => {
                assert!(placed < requested);
                assert_eq!(attempts, 1000);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn inverted_area_is_rejected() {
        let params = ForestParams { min: Vec2::ONE, max: Vec2::ZERO, ..Default::default() };
        assert_eq!(generate_forest(&params), Err(LayoutError::DegenerateArea));
    }
}
