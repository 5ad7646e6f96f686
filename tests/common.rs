//! Shared helpers for the gridworld integration tests.

#![allow(dead_code)]

use gridworld_rl::{
    config::RewardConfig,
    gridworld::{Dynamics, GridGeometry, Gridworld, Orientation, Pose, Position},
};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Build an environment from an explicit layout with deterministic actions.
pub fn fixed_world(
    length: usize,
    width: usize,
    obstacles: &[Position],
    destination: Position,
    start: Pose,
) -> Gridworld {
    let geometry = GridGeometry::new(length, width, obstacles, destination).unwrap();
    let dynamics = Dynamics::new(RewardConfig::default(), 0.0, 0.9);
    Gridworld::from_parts(geometry, dynamics, start)
}

pub fn pose(row: usize, col: usize, orientation: Orientation) -> Pose {
    Pose::new(Position::new(row, col), orientation)
}

/// Pearson chi-squared statistic of `counts` against a uniform expectation.
pub fn chi_squared_uniform(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    let expected = total as f64 / counts.len() as f64;
    counts
        .iter()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Upper critical value of the chi-squared distribution at `1 - alpha`.
pub fn chi_squared_critical(degrees_of_freedom: usize, alpha: f64) -> f64 {
    ChiSquared::new(degrees_of_freedom as f64)
        .unwrap()
        .inverse_cdf(1.0 - alpha)
}

/// Pearson statistic for a two-sample homogeneity test over the same categories.
pub fn chi_squared_homogeneity(a: &[usize], b: &[usize]) -> f64 {
    let total_a: usize = a.iter().sum();
    let total_b: usize = b.iter().sum();
    let total = (total_a + total_b) as f64;
    a.iter()
        .zip(b)
        .filter(|&(&x, &y)| x + y > 0)
        .map(|(&x, &y)| {
            let column = (x + y) as f64;
            let expected_a = column * total_a as f64 / total;
            let expected_b = column * total_b as f64 / total;
            (x as f64 - expected_a).powi(2) / expected_a + (y as f64 - expected_b).powi(2) / expected_b
        })
        .sum()
}
