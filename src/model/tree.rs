//! Tree ensembles exported from scikit-learn `tree_` arrays.
//!
//! Ensembles are only built by deserializing, and deserializing validates the
//! node arrays, so a walk can neither index out of bounds nor loop.

use serde::Deserialize;

use super::Regressor;
use crate::error::{PricingError, Result};

const LEAF: i64 = -1;

/// One regression tree in flat array form. Node 0 is the root.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
}

impl Tree {
    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("empty tree".into());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(format!("node arrays differ in length (expected {n})"));
        }

        for i in 0..n {
            let (l, r) = (self.children_left[i], self.children_right[i]);
            if l == LEAF || r == LEAF {
                if l != r {
                    return Err(format!("node {i} has a single child"));
                }
                if !self.value[i].is_finite() {
                    return Err(format!("leaf {i} has non-finite value"));
                }
                continue;
            }
            // preorder layout: children always come after their parent
            for child in [l, r] {
                if child <= i as i64 || child >= n as i64 {
                    return Err(format!("node {i} points at invalid child {child}"));
                }
            }
            let f = self.feature[i];
            if f < 0 || f as usize >= n_features {
                return Err(format!("node {i} splits on feature {f}, have {n_features}"));
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf.
    ///
    /// Feature values are rounded to f32 before each comparison, matching how
    /// scikit-learn feeds rows to its trees; thresholds stay f64.
    pub(crate) fn evaluate(&self, row: &[f64]) -> f64 {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let f = self.feature[node] as usize;
            let x = f64::from(row[f] as f32);
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        self.value[node]
    }
}

/// Exported layout, before validation. Not re-exported outside `model`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnsembleSpec {
    /// Mean of the trees.
    RandomForest { n_features: usize, trees: Vec<Tree> },
    /// `init + learning_rate * sum(trees)`
    GradientBoosting {
        n_features: usize,
        init: f64,
        learning_rate: f64,
        trees: Vec<Tree>,
    },
}

impl EnsembleSpec {
    fn n_features(&self) -> usize {
        match self {
            EnsembleSpec::RandomForest { n_features, .. } => *n_features,
            EnsembleSpec::GradientBoosting { n_features, .. } => *n_features,
        }
    }

    fn trees(&self) -> &[Tree] {
        match self {
            EnsembleSpec::RandomForest { trees, .. } => trees,
            EnsembleSpec::GradientBoosting { trees, .. } => trees,
        }
    }
}

/// A validated random forest or gradient boosting ensemble.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "EnsembleSpec")]
pub struct TreeEnsemble(EnsembleSpec);

impl TryFrom<EnsembleSpec> for TreeEnsemble {
    type Error = PricingError;

    fn try_from(spec: EnsembleSpec) -> Result<Self> {
        if spec.trees().is_empty() {
            return Err(PricingError::Artifact("ensemble has no trees".into()));
        }
        if let EnsembleSpec::GradientBoosting { init, learning_rate, .. } = &spec {
            if !init.is_finite() || !learning_rate.is_finite() {
                return Err(PricingError::Artifact(
                    "gradient boosting init/learning_rate must be finite".into(),
                ));
            }
        }
        let n_features = spec.n_features();
        for (i, tree) in spec.trees().iter().enumerate() {
            tree.validate(n_features)
                .map_err(|e| PricingError::Artifact(format!("tree {i}: {e}")))?;
        }
        Ok(Self(spec))
    }
}

impl Regressor for TreeEnsemble {
    fn describe(&self) -> String {
        match &self.0 {
            EnsembleSpec::RandomForest { trees, .. } => {
                format!("random_forest[{} trees]", trees.len())
            }
            EnsembleSpec::GradientBoosting { trees, learning_rate, .. } => {
                format!("gradient_boosting[{} trees, lr={}]", trees.len(), learning_rate)
            }
        }
    }

    fn n_features(&self) -> usize {
        self.0.n_features()
    }

    fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features() {
            return Err(PricingError::Inference(format!(
                "feature length mismatch: got {}, expected {}",
                row.len(),
                self.n_features()
            )));
        }
        let y = match &self.0 {
            EnsembleSpec::RandomForest { trees, .. } => {
                trees.iter().map(|t| t.evaluate(row)).sum::<f64>() / trees.len() as f64
            }
            EnsembleSpec::GradientBoosting {
                init,
                learning_rate,
                trees,
                ..
            } => init + learning_rate * trees.iter().map(|t| t.evaluate(row)).sum::<f64>(),
        };
        Ok(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Splits on feature 0 at 0.5, then feature 8 at 2.5 on the right.
    fn stump() -> Tree {
        Tree {
            children_left: vec![1, -1, 3, -1, -1],
            children_right: vec![2, -1, 4, -1, -1],
            feature: vec![0, -2, 8, -2, -2],
            threshold: vec![0.5, -2.0, 2.5, -2.0, -2.0],
            value: vec![0.0, 10.0, 0.0, 12.0, 13.0],
        }
    }

    fn row(year: f64, fuel: f64) -> Vec<f64> {
        let mut r = vec![0.0; 12];
        r[0] = year;
        r[8] = fuel;
        r
    }

    fn forest(trees: Vec<Tree>) -> Result<TreeEnsemble> {
        TreeEnsemble::try_from(EnsembleSpec::RandomForest {
            n_features: 12,
            trees,
        })
    }

    #[test]
    fn evaluates_thresholds_inclusively_left() {
        let t = stump();
        assert_eq!(t.evaluate(&row(0.5, 0.0)), 10.0);
        assert_eq!(t.evaluate(&row(0.6, 2.5)), 12.0);
        assert_eq!(t.evaluate(&row(0.6, 4.0)), 13.0);
    }

    #[test]
    fn compares_features_at_f32_precision() {
        let t = Tree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![1.5, -2.0, -2.0],
            value: vec![0.0, 10.0, 20.0],
        };
        // 1.500000001 rounds to exactly 1.5 in f32, so it stays left
        assert_eq!(t.evaluate(&row(1.500000001, 0.0)), 10.0);
        assert_eq!(t.evaluate(&row(1.5001, 0.0)), 20.0);
    }

    #[test]
    fn forest_averages_and_boosting_shrinks() {
        let rf = forest(vec![stump(), stump()]).unwrap();
        assert_eq!(rf.predict(&row(1.0, 4.0)).unwrap(), 13.0);

        let gb = TreeEnsemble::try_from(EnsembleSpec::GradientBoosting {
            n_features: 12,
            init: 12.0,
            learning_rate: 0.1,
            trees: vec![stump(), stump()],
        })
        .unwrap();
        let y = gb.predict(&row(0.0, 0.0)).unwrap();
        assert!((y - 14.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_cycles_and_bad_features() {
        let mut t = stump();
        t.children_left[2] = 0;
        assert!(t.validate(12).is_err());

        let mut t = stump();
        t.feature[2] = 12;
        assert!(matches!(forest(vec![t]), Err(PricingError::Artifact(_))));

        let mut t = stump();
        t.value.pop();
        assert!(t.validate(12).is_err());

        assert!(stump().validate(12).is_ok());
    }

    #[test]
    fn empty_ensemble_is_an_artifact_error() {
        assert!(matches!(forest(vec![]), Err(PricingError::Artifact(_))));
    }

    #[test]
    fn deserializing_validates() {
        let bad = r#"{"kind":"random_forest","n_features":12,"trees":[
            {"children_left":[1,-1,-1],"children_right":[0,-1,-1],
             "feature":[0,-2,-2],"threshold":[0.5,0,0],"value":[0,1,2]}]}"#;
        let err = serde_json::from_str::<TreeEnsemble>(bad).unwrap_err();
        assert!(err.to_string().contains("invalid child"));
    }

    #[test]
    fn wrong_row_width_fails_inference() {
        let rf = forest(vec![stump()]).unwrap();
        assert!(matches!(rf.predict(&[0.0; 6]), Err(PricingError::Inference(_))));
    }
}
