//! Vector similarity and best-match selection.
//!
//! The FAQ matcher scores a query embedding against every cached question
//! embedding with [`cosine_similarity`] and keeps the single best candidate
//! via [`best_match`]. A match is only accepted when its score clears a
//! threshold ([`accept`]).

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`:
/// - `1.0` = identical direction
/// - `0.0` = orthogonal (unrelated)
/// - `-1.0` = opposite direction
///
/// Returns `0.0` for empty vectors, zero vectors, or vectors of different
/// lengths.
///
/// # Formula
///
/// ```text
///            a · b
/// cos(θ) = ─────────
///          ‖a‖ × ‖b‖
/// ```
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}

/// The best-scoring candidate: its position in the candidate list and score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub index: usize,
    pub score: f32,
}

/// Finds the candidate most similar to `query`.
///
/// Only a strictly greater score replaces the current best, so on ties the
/// earliest candidate wins. Returns `None` for an empty candidate list.
pub fn best_match<V: AsRef<[f32]>>(query: &[f32], candidates: &[V]) -> Option<Scored> {
    let mut best: Option<Scored> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let score = cosine_similarity(query, candidate.as_ref());
        match best {
            Some(b) if score <= b.score => {}
            _ => best = Some(Scored { index, score }),
        }
    }
    best
}

/// Keeps `best` only if its score is strictly above `threshold`.
pub fn accept(best: Option<Scored>, threshold: f32) -> Option<Scored> {
    best.filter(|b| b.score > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_symmetric() {
        let a = vec![0.3, -1.2, 4.0, 0.01];
        let b = vec![2.0, 0.5, -0.7, 3.3];
        assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_degenerate() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_best_match_picks_highest() {
        let candidates = vec![vec![0.0, 1.0], vec![1.0, 0.1], vec![-1.0, 0.0]];
        let best = best_match(&[1.0, 0.0], &candidates).unwrap();
        assert_eq!(best.index, 1);
        assert!(best.score > 0.9);
    }

    #[test]
    fn test_best_match_tie_keeps_first() {
        let candidates = vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![1.0, 0.0]];
        let best = best_match(&[3.0, 0.0], &candidates).unwrap();
        assert_eq!(best.index, 0);
    }

    #[test]
    fn test_best_match_empty() {
        let candidates: Vec<Vec<f32>> = Vec::new();
        assert!(best_match(&[1.0], &candidates).is_none());
    }

    #[test]
    fn test_accept_is_strict() {
        let at = Some(Scored {
            index: 0,
            score: 0.8,
        });
        assert!(accept(at, 0.8).is_none());

        let above = Some(Scored {
            index: 2,
            score: 0.81,
        });
        assert_eq!(accept(above, 0.8).map(|s| s.index), Some(2));
        assert!(accept(None, 0.8).is_none());
    }
}
