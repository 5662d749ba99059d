//! AQI Regressor
//!
//! The model collaborator: anything that maps pollutant feature rows to raw
//! AQI values. The shipped implementation is a tree-ensemble regressor
//! exported offline from the trained random forest as JSON and evaluated
//! here in pure Rust.
//!
//! Artifact layout (one entry per tree, parallel arrays per node):
//!
//! ```text
//! {
//!   "feature_names": ["PM2.5", "PM10", "CO", "NO2", "SO2", "O3"],
//!   "trees": [
//!     { "feature": [0, -2, -2], "threshold": [55.0, -2.0, -2.0],
//!       "children_left": [1, -1, -1], "children_right": [2, -1, -1],
//!       "value": [0.0, 48.0, 162.5] }
//!   ]
//! }
//! ```
//!
//! Leaves have `children_left == -1`; samples with `x[feature] <= threshold`
//! go left.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::reading::FeatureVector;

// ============================================================================
// Collaborator contract
// ============================================================================

/// Failures raised by a regressor at inference time
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("model returned {got} outputs for {expected} rows")]
    OutputLength { expected: usize, got: usize },
}

/// Trained regressor: one raw AQI per input row, deterministic, no side effects
pub trait AqiRegressor: Send + Sync {
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<f64>, ModelError>;

    /// Short description for logs and health output
    fn describe(&self) -> String {
        "regressor".to_string()
    }
}

// ============================================================================
// Artifact format
// ============================================================================

#[derive(Debug, Deserialize)]
struct ForestArtifact {
    feature_names: Vec<String>,
    trees: Vec<TreeArtifact>,
}

#[derive(Debug, Deserialize)]
struct TreeArtifact {
    feature: Vec<i64>,
    threshold: Vec<f64>,
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    value: Vec<f64>,
}

// ============================================================================
// Regression tree
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum TreeNode {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Single regression tree with validated node links
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn from_artifact(tree: &TreeArtifact) -> Result<Self> {
        let n = tree.feature.len();
        if n == 0 {
            bail!("tree has no nodes");
        }
        if tree.threshold.len() != n
            || tree.children_left.len() != n
            || tree.children_right.len() != n
            || tree.value.len() != n
        {
            bail!("inconsistent node array lengths");
        }

        let mut nodes = Vec::with_capacity(n);
        for idx in 0..n {
            let (left, right) = (tree.children_left[idx], tree.children_right[idx]);

            if left < 0 && right < 0 {
                nodes.push(TreeNode::Leaf(tree.value[idx]));
                continue;
            }

            let feature = usize::try_from(tree.feature[idx])
                .ok()
                .filter(|&f| f < FeatureVector::NAMES.len())
                .ok_or_else(|| anyhow!("node {}: invalid feature index {}", idx, tree.feature[idx]))?;

            // Children must point forward so traversal always terminates
            let child = |c: i64| -> Result<usize> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > idx && c < n)
                    .ok_or_else(|| anyhow!("node {}: invalid child index {}", idx, c))
            };

            nodes.push(TreeNode::Split {
                feature,
                threshold: tree.threshold[idx],
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(RegressionTree { nodes })
    }

    pub fn predict(&self, features: &FeatureVector) -> f64 {
        let x = features.as_slice();
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf(value) => return value,
                TreeNode::Split { feature, threshold, left, right } => {
                    idx = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

// ============================================================================
// Forest regressor
// ============================================================================

/// Averaging ensemble of regression trees
#[derive(Debug, Clone)]
pub struct ForestRegressor {
    trees: Vec<RegressionTree>,
}

impl ForestRegressor {
    /// Parse and validate a JSON artifact
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: ForestArtifact =
            serde_json::from_str(json).with_context(|| "Failed to parse model artifact JSON")?;

        if artifact.feature_names != FeatureVector::NAMES {
            bail!(
                "Feature order mismatch: artifact has {:?}, expected {:?}",
                artifact.feature_names,
                FeatureVector::NAMES
            );
        }
        if artifact.trees.is_empty() {
            bail!("Model artifact contains no trees");
        }

        let trees = artifact
            .trees
            .iter()
            .enumerate()
            .map(|(i, t)| RegressionTree::from_artifact(t).with_context(|| format!("Tree {}", i)))
            .collect::<Result<Vec<_>>>()?;

        Ok(ForestRegressor { trees })
    }

    /// Load from a JSON artifact file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact: {:?}", path))?;
        Self::from_json(&contents).with_context(|| format!("Invalid model artifact: {:?}", path))
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean of the per-tree predictions
    pub fn predict_row(&self, features: &FeatureVector) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        total / self.trees.len() as f64
    }
}

impl AqiRegressor for ForestRegressor {
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<f64>, ModelError> {
        Ok(rows.par_iter().map(|row| self.predict_row(row)).collect())
    }

    fn describe(&self) -> String {
        format!("forest regressor ({} trees)", self.trees.len())
    }
}

/// Load the model at startup. A missing or invalid artifact is logged and
/// reported as `None`; the process keeps running without predictions.
pub fn load_model(path: &Path) -> Option<Arc<dyn AqiRegressor>> {
    if !path.exists() {
        tracing::warn!("Model not found at {:?}; predictions disabled", path);
        return None;
    }

    match ForestRegressor::load(path) {
        Ok(forest) => {
            tracing::info!("Loaded {} from {:?}", forest.describe(), path);
            Some(Arc::new(forest))
        }
        Err(e) => {
            tracing::warn!("Failed to load model: {:#}", e);
            None
        }
    }
}
