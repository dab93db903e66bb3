//! Vector math shared by clustering, graph expansion and reranking.

/// Compute cosine similarity between two vectors
///
/// Returns a value between -1.0 and 1.0. Vectors of different length,
/// or with zero magnitude, have similarity 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Element-wise mean of a set of equal-length vectors.
///
/// Returns `None` for an empty set.
pub fn mean_vector<'a, I>(vectors: I) -> Option<Vec<f32>>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut iter = vectors.into_iter();
    let first = iter.next()?;
    let mut sum = first.to_vec();
    let mut count = 1usize;

    for vector in iter {
        for (acc, value) in sum.iter_mut().zip(vector.iter()) {
            *acc += value;
        }
        count += 1;
    }

    let count = count as f32;
    for value in sum.iter_mut() {
        *value /= count;
    }
    Some(sum)
}

/// Combined score of two relevance scores: their geometric mean.
///
/// Inputs are clamped to `[0, 1]` first, so the result is too.
pub fn combined_score(a: f32, b: f32) -> f32 {
    (a.clamp(0.0, 1.0) * b.clamp(0.0, 1.0)).sqrt()
}
