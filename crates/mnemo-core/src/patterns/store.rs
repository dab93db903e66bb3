//! Pattern store: sample ingestion, clustering and similarity lookup.

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::clustering::partition;
use super::snapshot::PatternSnapshot;
use crate::config::PatternConfig;
use crate::error::Result;
use crate::types::{Cluster, Pattern, Sample};
use crate::vector::{cosine_similarity, mean_vector};

/// What happened to a sample handed to [`PatternStore::add_sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Stored. `reclustered` is true when this sample triggered a cluster pass.
    Accepted { reclustered: bool },
    /// Relevance below the quality threshold (or not a number)
    BelowThreshold,
    /// Query vector has no components
    EmptyVector,
    /// Query vector length differs from the stored samples
    DimensionMismatch { expected: usize, actual: usize },
    /// A sample with this id is already stored
    Duplicate,
}

impl IngestOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn reclustered(&self) -> bool {
        matches!(self, Self::Accepted { reclustered: true })
    }
}

/// Pattern store statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternStats {
    pub sample_count: usize,
    pub cluster_count: usize,
    /// Samples accepted since the last cluster pass
    pub pending_samples: usize,
    /// Mean of cluster `avg_quality`, 0 when there are no clusters
    pub mean_cluster_quality: f32,
}

/// Holds samples and the clusters learned from them.
///
/// Single-owner data structure: callers sharing one store across tasks
/// must serialize writers themselves.
#[derive(Debug, Clone)]
pub struct PatternStore {
    config: PatternConfig,
    samples: Vec<Sample>,
    /// Sample id -> position in `samples`
    sample_index: HashMap<String, usize>,
    clusters: Vec<Cluster>,
    /// Sample id -> position in `clusters`
    membership: HashMap<String, usize>,
    pending: usize,
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new(PatternConfig::default())
    }
}

impl PatternStore {
    /// Create an empty pattern store
    pub fn new(config: PatternConfig) -> Self {
        Self {
            config,
            samples: Vec::new(),
            sample_index: HashMap::new(),
            clusters: Vec::new(),
            membership: HashMap::new(),
            pending: 0,
        }
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Get a sample by id
    pub fn sample(&self, id: &str) -> Option<&Sample> {
        self.sample_index.get(id).map(|&i| &self.samples[i])
    }

    /// Ingest one sample.
    ///
    /// Sub-threshold and malformed samples are dropped without error, and
    /// accepted scores are clamped to `[0, 1]`. Every
    /// `2 × min_samples_per_cluster` accepted samples trigger a cluster pass
    /// before this returns.
    pub fn add_sample(&mut self, mut sample: Sample) -> IngestOutcome {
        if sample.relevance_score.is_nan() || sample.relevance_score < self.config.quality_threshold
        {
            debug!(
                "Dropping sample {} below quality threshold ({} < {})",
                sample.id, sample.relevance_score, self.config.quality_threshold
            );
            return IngestOutcome::BelowThreshold;
        }

        if sample.query_vector.is_empty() {
            return IngestOutcome::EmptyVector;
        }

        if let Some(first) = self.samples.first() {
            let expected = first.query_vector.len();
            let actual = sample.query_vector.len();
            if expected != actual {
                debug!("Dropping sample {}: dimension {} != {}", sample.id, actual, expected);
                return IngestOutcome::DimensionMismatch { expected, actual };
            }
        }

        if self.sample_index.contains_key(&sample.id) {
            return IngestOutcome::Duplicate;
        }

        sample.relevance_score = sample.relevance_score.clamp(0.0, 1.0);
        self.sample_index.insert(sample.id.clone(), self.samples.len());
        self.samples.push(sample);
        self.pending += 1;

        let reclustered = if self.pending >= self.config.recluster_interval() {
            self.cluster();
            true
        } else {
            false
        };

        IngestOutcome::Accepted { reclustered }
    }

    /// Rebuild the cluster set from every stored sample.
    ///
    /// With fewer than `min_samples_per_cluster` samples the cluster set is
    /// left empty. Returns the new cluster count.
    pub fn cluster(&mut self) -> usize {
        self.pending = 0;

        let min_size = self.config.min_samples_per_cluster.max(1);
        if self.samples.len() < min_size {
            self.clusters.clear();
            self.membership.clear();
            return 0;
        }

        let start = Instant::now();
        let k = self.config.max_clusters.min(self.samples.len() / min_size);
        let vectors: Vec<&[f32]> = self
            .samples
            .iter()
            .map(|sample| sample.query_vector.as_slice())
            .collect();

        let groups = partition(&vectors, k, min_size);

        let clusters: Vec<Cluster> = groups
            .into_iter()
            .map(|members| {
                let centroid =
                    mean_vector(members.iter().map(|&i| vectors[i])).unwrap_or_default();
                let quality = members
                    .iter()
                    .map(|&i| self.samples[i].relevance_score)
                    .sum::<f32>()
                    / members.len() as f32;

                Cluster {
                    id: Uuid::new_v4().to_string(),
                    centroid,
                    member_ids: members.iter().map(|&i| self.samples[i].id.clone()).collect(),
                    avg_quality: quality,
                }
            })
            .collect();

        self.clusters = clusters;
        self.rebuild_membership();

        info!(
            "Clustered {} samples into {} patterns in {:?}",
            self.samples.len(),
            self.clusters.len(),
            start.elapsed()
        );

        self.clusters.len()
    }

    /// Up to `k` patterns ordered by centroid similarity to `query_vector`,
    /// ties broken by higher average quality.
    pub fn find_similar(&self, query_vector: &[f32], k: usize) -> Vec<Pattern> {
        if k == 0 || self.clusters.is_empty() {
            return Vec::new();
        }

        let mut patterns: Vec<Pattern> = self
            .clusters
            .iter()
            .map(|cluster| cluster.to_pattern(cosine_similarity(query_vector, &cluster.centroid)))
            .collect();

        patterns.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| b.avg_quality.total_cmp(&a.avg_quality))
        });
        patterns.truncate(k);
        patterns
    }

    /// Revise a sample's relevance score.
    ///
    /// The owning cluster's average quality is recomputed in place. Unknown
    /// ids and non-finite scores are ignored. Returns whether a sample changed.
    pub fn update_from_feedback(&mut self, sample_id: &str, new_score: f32) -> bool {
        if !new_score.is_finite() {
            return false;
        }
        let Some(&index) = self.sample_index.get(sample_id) else {
            debug!("Feedback for unknown sample {}", sample_id);
            return false;
        };

        self.samples[index].relevance_score = new_score.clamp(0.0, 1.0);

        if let Some(&cluster_index) = self.membership.get(sample_id) {
            let quality = self.mean_quality(&self.clusters[cluster_index]);
            self.clusters[cluster_index].avg_quality = quality;
        }

        true
    }

    /// Current statistics
    pub fn stats(&self) -> PatternStats {
        let mean_cluster_quality = if self.clusters.is_empty() {
            0.0
        } else {
            self.clusters.iter().map(|c| c.avg_quality).sum::<f32>() / self.clusters.len() as f32
        };

        PatternStats {
            sample_count: self.samples.len(),
            cluster_count: self.clusters.len(),
            pending_samples: self.pending,
            mean_cluster_quality,
        }
    }

    /// Copy out clusters and samples
    pub fn export(&self) -> PatternSnapshot {
        PatternSnapshot {
            clusters: self.clusters.clone(),
            samples: self.samples.clone(),
            pending: self.pending,
        }
    }

    /// Replace the whole state with `snapshot`.
    pub fn import(&mut self, snapshot: PatternSnapshot) {
        self.samples.clear();
        self.sample_index.clear();

        for sample in snapshot.samples {
            if self.sample_index.contains_key(&sample.id) {
                warn!("Snapshot repeats sample {}; keeping the first copy", sample.id);
                continue;
            }
            self.sample_index.insert(sample.id.clone(), self.samples.len());
            self.samples.push(sample);
        }

        self.clusters = snapshot.clusters;
        self.pending = snapshot.pending;
        self.rebuild_membership();

        if self.clusters.len() > self.config.max_clusters {
            warn!(
                "Snapshot has {} clusters, limit is {}; reclustering",
                self.clusters.len(),
                self.config.max_clusters
            );
            self.cluster();
        }
    }

    /// Validate an untyped blob and replace the whole state with it.
    pub fn import_value(&mut self, blob: &Value) -> Result<()> {
        let snapshot = PatternSnapshot::from_value(blob)?;
        self.import(snapshot);
        Ok(())
    }

    fn rebuild_membership(&mut self) {
        self.membership = self
            .clusters
            .iter()
            .enumerate()
            .flat_map(|(i, cluster)| cluster.member_ids.iter().map(move |id| (id.clone(), i)))
            .collect();
    }

    fn mean_quality(&self, cluster: &Cluster) -> f32 {
        let scores: Vec<f32> = cluster
            .member_ids
            .iter()
            .filter_map(|id| self.sample(id))
            .map(|sample| sample.relevance_score)
            .collect();

        if scores.is_empty() {
            cluster.avg_quality
        } else {
            scores.iter().sum::<f32>() / scores.len() as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    fn config(quality_threshold: f32, min_samples: usize, max_clusters: usize) -> PatternConfig {
        PatternConfig {
            quality_threshold,
            min_samples_per_cluster: min_samples,
            max_clusters,
        }
    }

    fn sample(query: Vec<f32>, score: f32) -> Sample {
        Sample::new(query, vec![0.0, 1.0, 0.0], score)
    }

    #[test]
    fn test_threshold_filtering() {
        let mut store = PatternStore::new(config(0.5, 2, 3));

        for score in [0.0, 0.1, 0.49, f32::NAN] {
            let outcome = store.add_sample(sample(vec![1.0, 0.0, 0.0], score));
            assert_eq!(outcome, IngestOutcome::BelowThreshold);
        }
        assert_eq!(store.sample_count(), 0);

        assert!(store.add_sample(sample(vec![1.0, 0.0, 0.0], 0.5)).is_accepted());
        assert_eq!(store.sample_count(), 1);
    }

    #[test]
    fn test_rejects_malformed_vectors() {
        let mut store = PatternStore::new(config(0.5, 2, 3));
        assert_eq!(store.add_sample(sample(vec![], 0.9)), IngestOutcome::EmptyVector);

        store.add_sample(sample(vec![1.0, 0.0, 0.0], 0.9));
        assert_eq!(
            store.add_sample(sample(vec![1.0, 0.0], 0.9)),
            IngestOutcome::DimensionMismatch { expected: 3, actual: 2 }
        );

        let dup = sample(vec![1.0, 0.0, 0.0], 0.9).with_id("same");
        assert!(store.add_sample(dup.clone()).is_accepted());
        assert_eq!(store.add_sample(dup), IngestOutcome::Duplicate);
        assert_eq!(store.sample_count(), 2);
    }

    #[test]
    fn test_ingest_clamps_score() {
        let mut store = PatternStore::new(config(0.5, 2, 3));
        let high = sample(vec![1.0, 0.0], 5.0).with_id("high");
        assert!(store.add_sample(high).is_accepted());
        store.add_sample(sample(vec![1.0, 0.0], f32::INFINITY).with_id("inf"));

        assert_eq!(store.sample("high").unwrap().relevance_score, 1.0);
        assert_eq!(store.sample("inf").unwrap().relevance_score, 1.0);

        store.cluster();
        assert_eq!(store.cluster_count(), 1);
        assert!(store.clusters()[0].avg_quality <= 1.0);
    }

    #[test]
    fn test_auto_recluster() {
        let mut store = PatternStore::new(config(0.5, 2, 3));

        let outcomes: Vec<IngestOutcome> = (0..4)
            .map(|_| store.add_sample(sample(vec![1.0, 0.0, 0.0], 0.9)))
            .collect();

        assert!(!outcomes[2].reclustered());
        assert!(outcomes[3].reclustered());
        assert!(store.cluster_count() >= 1);
        assert_eq!(store.stats().pending_samples, 0);
    }

    #[test]
    fn test_concrete_scenario() {
        let mut store = PatternStore::new(config(0.5, 2, 3));
        for _ in 0..6 {
            store.add_sample(Sample::new(vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], 0.9));
        }

        let patterns = store.find_similar(&[1.0, 0.0, 0.0], 5);
        assert!(!patterns.is_empty());
        assert!(patterns.iter().any(|p| (p.avg_quality - 0.9).abs() < 1e-5));
    }

    #[test]
    fn test_cluster_requires_min_samples() {
        let mut store = PatternStore::new(config(0.5, 5, 3));
        for _ in 0..4 {
            store.add_sample(sample(vec![1.0, 0.0], 0.9));
        }
        assert_eq!(store.cluster(), 0);
        assert!(store.find_similar(&[1.0, 0.0], 3).is_empty());
    }

    #[test]
    fn test_bounded_clusters() {
        for max_clusters in 0..5 {
            let mut store = PatternStore::new(config(0.0, 1, max_clusters));
            for i in 0..30 {
                let angle = i as f32 * 0.2;
                store.add_sample(sample(vec![angle.cos(), angle.sin()], 0.7));
            }
            store.cluster();
            assert!(store.cluster_count() <= max_clusters);
        }
    }

    #[test]
    fn test_find_similar_bound_and_order() {
        let mut store = PatternStore::new(config(0.0, 2, 4));
        for _ in 0..3 {
            store.add_sample(sample(vec![1.0, 0.0], 0.9));
            store.add_sample(sample(vec![0.0, 1.0], 0.4));
        }
        store.cluster();
        assert_eq!(store.cluster_count(), 2);

        for k in 0..4 {
            assert!(store.find_similar(&[1.0, 0.0], k).len() <= k);
        }

        let patterns = store.find_similar(&[1.0, 0.0], 2);
        assert!(patterns[0].similarity > patterns[1].similarity);
        assert!((patterns[0].avg_quality - 0.9).abs() < 1e-5);

        // Equidistant query: tie broken by quality
        let patterns = store.find_similar(&[1.0, 1.0], 2);
        assert!(patterns[0].avg_quality > patterns[1].avg_quality);
    }

    #[test]
    fn test_find_similar_does_not_cluster() {
        let mut store = PatternStore::new(config(0.0, 1, 4));
        store.add_sample(sample(vec![1.0, 0.0], 0.9));
        assert!(store.find_similar(&[1.0, 0.0], 3).is_empty());
        assert_eq!(store.cluster_count(), 0);
    }

    #[test]
    fn test_feedback_updates_cluster_quality() {
        let mut store = PatternStore::new(config(0.5, 2, 1));
        let first = sample(vec![1.0, 0.0], 0.8).with_id("s1");
        store.add_sample(first);
        store.add_sample(sample(vec![1.0, 0.0], 0.8).with_id("s2"));
        store.cluster();

        assert!(store.update_from_feedback("s1", 0.2));
        assert!((store.clusters()[0].avg_quality - 0.5).abs() < 1e-5);
        assert_eq!(store.sample("s1").unwrap().relevance_score, 0.2);
    }

    #[test]
    fn test_feedback_on_unknown_id() {
        let mut store = PatternStore::new(config(0.5, 2, 3));
        store.add_sample(sample(vec![1.0, 0.0], 0.9));

        assert!(!store.update_from_feedback("missing", 0.1));
        assert_eq!(store.sample_count(), 1);
    }

    #[test]
    fn test_round_trip() {
        let mut store = PatternStore::new(config(0.5, 2, 3));
        for i in 0..7 {
            let query = if i % 2 == 0 { vec![1.0, 0.0] } else { vec![0.0, 1.0] };
            store.add_sample(sample(query, 0.9));
        }
        store.cluster();

        let blob = store.export().to_value().unwrap();
        let mut restored = PatternStore::new(config(0.5, 2, 3));
        restored.import_value(&blob).unwrap();

        assert_eq!(restored.sample_count(), store.sample_count());
        assert_eq!(restored.cluster_count(), store.cluster_count());
        assert_eq!(restored.export(), store.export());
    }

    #[test]
    fn test_import_validation() {
        let mut store = PatternStore::default();

        assert!(matches!(store.import_value(&Value::Null), Err(Error::SnapshotMissing)));
        assert!(matches!(store.import_value(&json!({})), Err(Error::ClustersNotSequence)));
        assert!(matches!(
            store.import_value(&json!({ "clusters": [] })),
            Err(Error::SamplesNotSequence)
        ));
    }

    #[test]
    fn test_import_replaces_state() {
        let mut store = PatternStore::new(config(0.5, 2, 3));
        store.add_sample(sample(vec![1.0, 0.0], 0.9));
        store.import(PatternSnapshot::default());
        assert_eq!(store.sample_count(), 0);
    }

    #[test]
    fn test_pending_survives_round_trip() {
        // Recluster every 4 accepted samples
        let mut store = PatternStore::new(config(0.5, 2, 3));
        for _ in 0..3 {
            store.add_sample(sample(vec![1.0, 0.0], 0.9));
        }
        assert_eq!(store.stats().pending_samples, 3);

        let blob = store.export().to_value().unwrap();
        let mut restored = PatternStore::new(config(0.5, 2, 3));
        restored.import_value(&blob).unwrap();
        assert_eq!(restored.stats().pending_samples, 3);

        assert!(restored.add_sample(sample(vec![1.0, 0.0], 0.9)).reclustered());
        assert_eq!(restored.cluster_count(), 1);
    }

    #[test]
    fn test_import_over_limit_reclusters() {
        let mut source = PatternStore::new(config(0.0, 1, 4));
        for i in 0..8 {
            let angle = i as f32 * 0.8;
            source.add_sample(sample(vec![angle.cos(), angle.sin()], 0.6));
        }
        source.cluster();

        let mut target = PatternStore::new(config(0.0, 1, 1));
        target.import(source.export());
        assert!(target.cluster_count() <= 1);
        assert_eq!(target.sample_count(), 8);
    }
}
