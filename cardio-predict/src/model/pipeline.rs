//! Fitted pipeline parameters and scoring math
//!
//! The exported pipeline is a standard scaler followed by a binary logistic
//! regression. The offline training step writes the fitted parameters to
//! `pipeline.json`; this module evaluates them on a feature vector.

use serde::Deserialize;

/// Fitted standard scaler: per-feature mean and scale.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Scale one feature: `(x - mean) / scale`.
    fn transform(&self, index: usize, value: f64) -> f64 {
        (value - self.mean[index]) / self.scale[index]
    }
}

/// Fitted binary logistic regression.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
    pub classes: Vec<i64>,
}

/// The full fitted pipeline: scaler then classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    pub scaler: StandardScaler,
    pub classifier: LogisticRegression,
}

impl Pipeline {
    /// Signed distance from the decision boundary in logit space.
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        let mut logit = self.classifier.intercept;
        for (index, &value) in features.iter().enumerate() {
            logit += self.classifier.coef[index] * self.scaler.transform(index, value);
        }
        logit
    }

    /// Probability of the positive class for one feature vector.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        sigmoid(self.decision_function(features))
    }

    /// Predicted label: positive class iff the logit is strictly positive.
    ///
    /// A logit of exactly zero (probability 0.5) predicts the negative
    /// class, matching argmax over the two class probabilities.
    pub fn predict(&self, features: &[f64]) -> bool {
        self.decision_function(features) > 0.0
    }
}

/// Numerically stable logistic sigmoid.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
