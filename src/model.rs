//! Multi-output random-forest regressor
//!
//! An ensemble of CART-style regression trees. Each tree trains on a
//! bootstrap resample of the training rows and splits on the feature and
//! threshold that most reduce the summed per-output variance. Leaves hold
//! the mean target vector of their samples; the forest prediction is the
//! mean of the tree leaves.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::Result;
use crate::dataset::{N_FEATURES, N_OUTPUTS};
use crate::error::SkycastError;

/// Forest hyperparameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the ensemble
    #[serde(default = "default_n_trees")]
    pub n_trees: usize,
    /// Maximum tree depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Minimum number of samples in a leaf
    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,
    /// Seed for bootstrap resampling
    #[serde(default = "default_model_seed")]
    pub seed: u64,
}

fn default_n_trees() -> usize {
    50
}

fn default_max_depth() -> usize {
    12
}

fn default_min_samples_leaf() -> usize {
    2
}

fn default_model_seed() -> u64 {
    42
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: default_n_trees(),
            max_depth: default_max_depth(),
            min_samples_leaf: default_min_samples_leaf(),
            seed: default_model_seed(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: [f64; N_OUTPUTS],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A single regression tree with multi-output leaves
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    fn fit(
        features: &[[f64; N_FEATURES]],
        targets: &[[f64; N_OUTPUTS]],
        indices: Vec<usize>,
        config: &ForestConfig,
    ) -> Self {
        let root = grow(features, targets, indices, 0, config);
        Self { root }
    }

    fn predict(&self, features: &[f64; N_FEATURES]) -> [f64; N_OUTPUTS] {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }
}

fn mean_targets(targets: &[[f64; N_OUTPUTS]], indices: &[usize]) -> [f64; N_OUTPUTS] {
    let mut sums = [0.0; N_OUTPUTS];
    for &i in indices {
        for (sum, value) in sums.iter_mut().zip(targets[i].iter()) {
            *sum += value;
        }
    }
    let n = indices.len().max(1) as f64;
    sums.map(|sum| sum / n)
}

/// Sum of squared errors around the per-output mean, summed across outputs
fn sse(targets: &[[f64; N_OUTPUTS]], indices: &[usize]) -> f64 {
    let mut sums = [0.0; N_OUTPUTS];
    let mut squares = [0.0; N_OUTPUTS];
    for &i in indices {
        for k in 0..N_OUTPUTS {
            sums[k] += targets[i][k];
            squares[k] += targets[i][k] * targets[i][k];
        }
    }
    let n = indices.len() as f64;
    (0..N_OUTPUTS)
        .map(|k| squares[k] - sums[k] * sums[k] / n)
        .sum()
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    cost: f64,
}

/// Scan every feature for the threshold minimizing left + right SSE.
fn best_split(
    features: &[[f64; N_FEATURES]],
    targets: &[[f64; N_OUTPUTS]],
    indices: &[usize],
    min_samples_leaf: usize,
) -> Option<BestSplit> {
    let n = indices.len();
    let mut best: Option<BestSplit> = None;

    for feature in 0..N_FEATURES {
        let mut order: Vec<usize> = indices.to_vec();
        order.sort_by(|&a, &b| {
            features[a][feature]
                .partial_cmp(&features[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Running sums from the left side of the ordered samples
        let mut left_sums = [0.0; N_OUTPUTS];
        let mut left_squares = [0.0; N_OUTPUTS];
        let mut total_sums = [0.0; N_OUTPUTS];
        let mut total_squares = [0.0; N_OUTPUTS];
        for &i in &order {
            for k in 0..N_OUTPUTS {
                total_sums[k] += targets[i][k];
                total_squares[k] += targets[i][k] * targets[i][k];
            }
        }

        for p in 1..n {
            let i = order[p - 1];
            for k in 0..N_OUTPUTS {
                left_sums[k] += targets[i][k];
                left_squares[k] += targets[i][k] * targets[i][k];
            }

            if p < min_samples_leaf || n - p < min_samples_leaf {
                continue;
            }
            let lo = features[order[p - 1]][feature];
            let hi = features[order[p]][feature];
            if hi <= lo {
                continue;
            }

            let left_n = p as f64;
            let right_n = (n - p) as f64;
            let mut cost = 0.0;
            for k in 0..N_OUTPUTS {
                let right_sum = total_sums[k] - left_sums[k];
                let right_square = total_squares[k] - left_squares[k];
                cost += left_squares[k] - left_sums[k] * left_sums[k] / left_n;
                cost += right_square - right_sum * right_sum / right_n;
            }

            if best.as_ref().is_none_or(|b| cost < b.cost) {
                best = Some(BestSplit {
                    feature,
                    threshold: (lo + hi) / 2.0,
                    cost,
                });
            }
        }
    }

    best
}

fn grow(
    features: &[[f64; N_FEATURES]],
    targets: &[[f64; N_OUTPUTS]],
    indices: Vec<usize>,
    depth: usize,
    config: &ForestConfig,
) -> Node {
    if depth >= config.max_depth || indices.len() < 2 * config.min_samples_leaf {
        return Node::Leaf {
            value: mean_targets(targets, &indices),
        };
    }

    let parent_cost = sse(targets, &indices);
    let split = match best_split(features, targets, &indices, config.min_samples_leaf) {
        Some(split) if split.cost < parent_cost => split,
        _ => {
            return Node::Leaf {
                value: mean_targets(targets, &indices),
            };
        }
    };

    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| features[i][split.feature] <= split.threshold);

    Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(grow(features, targets, left_indices, depth + 1, config)),
        right: Box::new(grow(features, targets, right_indices, depth + 1, config)),
    }
}

/// Trained random-forest regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Train a forest on the given feature and target rows.
    ///
    /// Each tree sees a bootstrap resample drawn from a per-tree seed
    /// derived from the forest seed, so training is deterministic.
    pub fn fit(
        config: ForestConfig,
        features: &[[f64; N_FEATURES]],
        targets: &[[f64; N_OUTPUTS]],
    ) -> Result<Self> {
        if features.is_empty() {
            return Err(SkycastError::model("training set is empty"));
        }
        if features.len() != targets.len() {
            return Err(SkycastError::model(format!(
                "feature rows ({}) and target rows ({}) do not match",
                features.len(),
                targets.len()
            )));
        }
        if config.n_trees == 0 {
            return Err(SkycastError::model("forest needs at least one tree"));
        }

        let n = features.len();
        let mut trees = Vec::with_capacity(config.n_trees);
        for t in 0..config.n_trees {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(t as u64));
            let sample: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
            trees.push(DecisionTree::fit(features, targets, sample, &config));
            debug!(tree = t + 1, total = config.n_trees, "trained tree");
        }

        Ok(Self { config, trees })
    }

    /// Hyperparameters this forest was trained with
    #[must_use]
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Predict one output vector by averaging the trees
    #[must_use]
    pub fn predict(&self, features: &[f64; N_FEATURES]) -> [f64; N_OUTPUTS] {
        let mut sums = [0.0; N_OUTPUTS];
        for tree in &self.trees {
            let value = tree.predict(features);
            for k in 0..N_OUTPUTS {
                sums[k] += value[k];
            }
        }
        let n = self.trees.len().max(1) as f64;
        sums.map(|sum| sum / n)
    }

    /// Predict every row of a feature matrix
    #[must_use]
    pub fn predict_batch(&self, rows: &[[f64; N_FEATURES]]) -> Vec<[f64; N_OUTPUTS]> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Serialize the trained forest to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = postcard::to_stdvec(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Restore a forest previously written by [`RandomForest::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(postcard::from_bytes(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Step function of the first feature, constant in the rest
    fn step_data() -> (Vec<[f64; N_FEATURES]>, Vec<[f64; N_OUTPUTS]>) {
        let mut features = Vec::new();
        let mut targets = Vec::new();
        for i in 0..100 {
            let x = f64::from(i);
            features.push([x, 1.0, 2020.0, 5.0]);
            let level = if x < 50.0 { 10.0 } else { 30.0 };
            targets.push([level, level / 2.0, level * 2.0]);
        }
        (features, targets)
    }

    #[test]
    fn test_forest_learns_step_function() {
        let (features, targets) = step_data();
        let forest = RandomForest::fit(ForestConfig::default(), &features, &targets).unwrap();

        let low = forest.predict(&[10.0, 1.0, 2020.0, 5.0]);
        let high = forest.predict(&[90.0, 1.0, 2020.0, 5.0]);
        assert!((low[0] - 10.0).abs() < 1.0, "low side predicted {}", low[0]);
        assert!((high[0] - 30.0).abs() < 1.0, "high side predicted {}", high[0]);
        assert!((low[2] - 20.0).abs() < 2.0);
        assert!((high[1] - 15.0).abs() < 1.0);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (features, targets) = step_data();
        let a = RandomForest::fit(ForestConfig::default(), &features, &targets).unwrap();
        let b = RandomForest::fit(ForestConfig::default(), &features, &targets).unwrap();

        let probe = [42.0, 1.0, 2020.0, 5.0];
        assert_eq!(a.predict(&probe), b.predict(&probe));
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let (features, targets) = step_data();
        assert!(RandomForest::fit(ForestConfig::default(), &[], &[]).is_err());
        assert!(RandomForest::fit(ForestConfig::default(), &features, &targets[..50]).is_err());

        let no_trees = ForestConfig {
            n_trees: 0,
            ..ForestConfig::default()
        };
        assert!(RandomForest::fit(no_trees, &features, &targets).is_err());
    }

    #[test]
    fn test_save_load_round_trip() {
        let (features, targets) = step_data();
        let forest = RandomForest::fit(ForestConfig::default(), &features, &targets).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        forest.save(&path).unwrap();
        let restored = RandomForest::load(&path).unwrap();

        let probe = [200.0, 7.0, 2021.0, 3.3];
        assert_eq!(forest.predict(&probe), restored.predict(&probe));
        assert_eq!(forest.config(), restored.config());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        std::fs::write(&path, b"not a model").unwrap();
        assert!(RandomForest::load(&path).is_err());
    }
}
