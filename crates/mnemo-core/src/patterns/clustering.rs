//! K-means partitioning of sample query vectors.
//!
//! Uses cosine similarity for assignment and the plain member mean as the
//! centroid. Initialization is farthest-first, so a pass over the same
//! samples always yields the same partition.
//!
//! # Algorithm
//! 1. Seed centroids farthest-first, stopping early when the remaining
//!    vectors coincide with an existing seed
//! 2. Iterate until assignments stop changing or `MAX_ITERATIONS`:
//!    - Assign each vector to its most similar centroid
//!    - Recompute each centroid as the mean of its members, dropping empty groups
//! 3. Dissolve groups smaller than the minimum size into their nearest
//!    surviving neighbor while more than one group remains

use crate::vector::{cosine_similarity, mean_vector};

/// Maximum number of assignment/update rounds.
const MAX_ITERATIONS: usize = 50;

/// Cosine distance below which two vectors are treated as the same seed.
const COINCIDENT_DISTANCE: f32 = 1e-6;

/// Partition `vectors` into at most `k` groups of vector indices.
///
/// Every returned group is non-empty, and each has at least `min_size`
/// members unless only one group is left.
pub fn partition(vectors: &[&[f32]], k: usize, min_size: usize) -> Vec<Vec<usize>> {
    if vectors.is_empty() || k == 0 {
        return Vec::new();
    }

    let seeds = seed_farthest_first(vectors, k);
    let mut groups = group(&assign(vectors, &seeds), seeds.len());

    for _ in 0..MAX_ITERATIONS {
        let centroids: Vec<Vec<f32>> = groups
            .iter()
            .map(|members| centroid_of(vectors, members))
            .collect();

        let next = group(&assign(vectors, &centroids), centroids.len());
        let converged = next == groups;
        groups = next;

        if converged {
            break;
        }
    }

    enforce_min_size(vectors, groups, min_size)
}

/// Pick up to `k` seeds, each as far as possible from those already chosen.
fn seed_farthest_first(vectors: &[&[f32]], k: usize) -> Vec<Vec<f32>> {
    let mut seeds: Vec<Vec<f32>> = vec![vectors[0].to_vec()];

    while seeds.len() < k {
        let farthest = vectors
            .iter()
            .map(|vector| {
                let nearest = seeds
                    .iter()
                    .map(|seed| 1.0 - cosine_similarity(vector, seed))
                    .fold(f32::MAX, f32::min);
                (vector, nearest)
            })
            .max_by(|a, b| a.1.total_cmp(&b.1));

        match farthest {
            Some((vector, distance)) if distance > COINCIDENT_DISTANCE => {
                seeds.push(vector.to_vec());
            }
            _ => break,
        }
    }

    seeds
}

/// Index of the most similar centroid for every vector. Ties go to the lower index.
fn assign(vectors: &[&[f32]], centroids: &[Vec<f32>]) -> Vec<usize> {
    vectors
        .iter()
        .map(|vector| nearest_centroid(vector, centroids))
        .collect()
}

fn nearest_centroid(vector: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best_similarity = f32::NEG_INFINITY;
    let mut best = 0;

    for (i, centroid) in centroids.iter().enumerate() {
        let similarity = cosine_similarity(vector, centroid);
        if similarity > best_similarity {
            best_similarity = similarity;
            best = i;
        }
    }

    best
}

/// Collect vector indices per centroid, dropping centroids nobody chose.
fn group(assignments: &[usize], k: usize) -> Vec<Vec<usize>> {
    let mut groups = vec![Vec::new(); k];
    for (index, &cluster) in assignments.iter().enumerate() {
        groups[cluster].push(index);
    }
    groups.retain(|members| !members.is_empty());
    groups
}

fn centroid_of(vectors: &[&[f32]], members: &[usize]) -> Vec<f32> {
    mean_vector(members.iter().map(|&i| vectors[i])).unwrap_or_default()
}

fn enforce_min_size(
    vectors: &[&[f32]],
    mut groups: Vec<Vec<usize>>,
    min_size: usize,
) -> Vec<Vec<usize>> {
    while groups.len() > 1 {
        let smallest = groups
            .iter()
            .enumerate()
            .min_by_key(|(_, members)| members.len())
            .map(|(i, members)| (i, members.len()));

        let Some((index, size)) = smallest else {
            break;
        };
        if size >= min_size {
            break;
        }

        let orphans = groups.remove(index);
        let centroids: Vec<Vec<f32>> = groups
            .iter()
            .map(|members| centroid_of(vectors, members))
            .collect();

        for orphan in orphans {
            let target = nearest_centroid(vectors[orphan], &centroids);
            groups[target].push(orphan);
        }
    }

    groups
}
