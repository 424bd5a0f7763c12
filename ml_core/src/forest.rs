use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::{
    model::{check_rows, Regressor},
    ArtifactError, MlError,
};

/// Marker used in `children_left` / `children_right` for leaf nodes.
const LEAF: i64 = -1;

/// A single regression tree stored as parallel node arrays.
///
/// Node `i` is a leaf when `children_left[i] == -1`, in which case `value[i]`
/// is its prediction. Otherwise the row goes left when
/// `x[feature[i]] <= threshold[i]` and right otherwise. Node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
}

impl Tree {
    /// Creates a new tree from its node arrays.
    pub fn new(
        children_left: Vec<i64>,
        children_right: Vec<i64>,
        feature: Vec<i64>,
        threshold: Vec<f64>,
        value: Vec<f64>,
    ) -> Self {
        Self {
            children_left,
            children_right,
            feature,
            threshold,
            value,
        }
    }

    /// Returns a single leaf tree that always predicts `value`.
    pub fn leaf(value: f64) -> Self {
        Self::new(vec![LEAF], vec![LEAF], vec![LEAF], vec![0.0], vec![value])
    }

    fn len(&self) -> usize {
        self.value.len()
    }

    fn validate(&self, idx: usize, n_features: usize) -> Result<(), ArtifactError> {
        let n = self.len();
        let invalid = |msg: String| ArtifactError::Invalid(format!("tree {idx}: {msg}"));

        if n == 0 {
            return Err(invalid("no nodes".into()));
        }

        let lens = [
            self.children_left.len(),
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
        ];
        if lens.iter().any(|&len| len != n) {
            return Err(invalid(format!("node arrays differ in length: {lens:?} vs {n}")));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if !self.value[node].is_finite() {
                    return Err(invalid(format!("leaf {node} has a non-finite value")));
                }
                continue;
            }

            // Children must point forward, which also rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(invalid(format!("node {node} has bad child {child}")));
                }
            }

            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(invalid(format!("node {node} splits on feature {feature}")));
            }
        }

        Ok(())
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut node = 0;
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            node = if row[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        self.value[node]
    }
}

/// An averaging ensemble of regression trees (random forest regression).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feature_names_in: Option<Vec<String>>,
    n_features: usize,
    trees: Vec<Tree>,
}

impl Forest {
    /// Creates a new forest.
    ///
    /// # Errors
    /// Returns `ArtifactError::Invalid` if any tree is malformed.
    pub fn new(
        n_features: usize,
        trees: Vec<Tree>,
        feature_names_in: Option<Vec<String>>,
    ) -> Result<Self, ArtifactError> {
        let forest = Self {
            feature_names_in,
            n_features,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.n_features == 0 {
            return Err(ArtifactError::Invalid("forest expects zero features".into()));
        }

        if self.trees.is_empty() {
            return Err(ArtifactError::Invalid("forest has no trees".into()));
        }

        if let Some(names) = &self.feature_names_in {
            if names.len() != self.n_features {
                return Err(ArtifactError::Invalid(format!(
                    "{} feature names for {} features",
                    names.len(),
                    self.n_features
                )));
            }
        }

        self.trees
            .iter()
            .enumerate()
            .try_for_each(|(idx, tree)| tree.validate(idx, self.n_features))
    }
}

impl Regressor for Forest {
    fn num_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn predict(&self, rows: ArrayView2<f64>) -> Result<Array1<f64>, MlError> {
        check_rows(&rows, self.n_features)?;

        let n_trees = self.trees.len() as f64;
        let preds = rows
            .rows()
            .into_iter()
            .map(|row| self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>() / n_trees)
            .collect();

        Ok(preds)
    }
}
