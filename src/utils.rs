//! Utility functions shared by learners, planners and policies

use rand::{Rng, prelude::IndexedRandom};

/// Indices of every entry equal to the maximum.
///
/// Equality is exact: two actions tie only when their values are
/// bit-for-bit the same float. Returns an empty vector for empty input.
///
/// # Examples
///
/// ```
/// use gridworld_rl::utils::maximizers;
///
/// assert_eq!(maximizers(&[1.0, 3.0, 2.0, 3.0]), vec![1, 3]);
/// assert!(maximizers(&[]).is_empty());
/// ```
pub fn maximizers(values: &[f64]) -> Vec<usize> {
    let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == best)
        .map(|(i, _)| i)
        .collect()
}

/// Index of a maximal entry, breaking ties uniformly at random.
///
/// Returns `None` only for empty input.
pub fn choose_maximizer<R>(values: &[f64], rng: &mut R) -> Option<usize>
where
    R: Rng + ?Sized,
{
    maximizers(values).choose(rng).copied()
}

/// Discounted return of a reward sequence: `sum(discount^i * r_i)`.
///
/// # Examples
///
/// ```
/// use gridworld_rl::utils::policy_score;
///
/// let score = policy_score(&[0.0, 0.0, 10.0], 0.9);
/// assert!((score - 8.1).abs() < 1e-12);
/// ```
pub fn policy_score(rewards: &[f64], discount: f64) -> f64 {
    rewards
        .iter()
        .rev()
        .fold(0.0, |acc, &reward| reward + discount * acc)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_maximizers_single_and_ties() {
        assert_eq!(maximizers(&[0.5, -1.0, 0.2]), vec![0]);
        assert_eq!(maximizers(&[0.0; 4]), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_choose_maximizer_only_picks_maxima() {
        let mut rng = StdRng::seed_from_u64(42);
        let values = [2.0, 1.0, 2.0, 0.0];
        let mut seen = [false; 4];
        for _ in 0..200 {
            let i = choose_maximizer(&values, &mut rng).unwrap();
            assert!(i == 0 || i == 2);
            seen[i] = true;
        }
        assert!(seen[0] && seen[2]);
        assert!(choose_maximizer(&[], &mut rng).is_none());
    }

    #[test]
    fn test_policy_score() {
        assert_eq!(policy_score(&[], 0.9), 0.0);
        assert_eq!(policy_score(&[1.0, 1.0], 1.0), 2.0);
        let score = policy_score(&[-1.0, 0.0, 10.0], 0.5);
        assert!((score - (-1.0 + 0.25 * 10.0)).abs() < 1e-12);
    }
}
