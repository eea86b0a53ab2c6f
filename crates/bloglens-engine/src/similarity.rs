//! Vector similarity math

/// Cosine similarity between two vectors
///
/// Returns a value between -1 and 1, where 1 means identical direction.
/// Returns `None` when the vectors differ in dimension, are empty, or
/// either one has zero magnitude, since the score is undefined there.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot_product = 0.0;
    let mut magnitude_a = 0.0;
    let mut magnitude_b = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        dot_product += x * y;
        magnitude_a += x * x;
        magnitude_b += y * y;
    }

    let denominator = magnitude_a.sqrt() * magnitude_b.sqrt();
    if denominator == 0.0 {
        return None;
    }

    Some(dot_product / denominator)
}
