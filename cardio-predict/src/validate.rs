//! Request validation for the predict endpoint
//!
//! Checks run in a fixed order and stop at the first failure:
//! 1. `observation_id` field present
//! 2. `data` field present and an object
//! 3. Key set of `data` equals the nine recognized features exactly
//!    (missing names reported first, then unrecognized names)
//! 4. Each categorical field takes a value from its finite domain
//! 5. Range checks on `age`, `trestbps`, `oldpeak`
//!
//! A failure reports one actionable error, never a batch.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// The nine features every observation must carry.
pub const FEATURE_NAMES: [&str; 9] = [
    "age", "sex", "cp", "trestbps", "fbs", "restecg", "oldpeak", "ca", "thal",
];

/// Allowed values for the categorical features, checked in this order.
const CATEGORY_DOMAINS: [(&str, &[i64]); 6] = [
    ("sex", &[0, 1]),
    ("cp", &[0, 1, 2, 3]),
    ("fbs", &[0, 1]),
    ("restecg", &[0, 1, 2]),
    ("ca", &[0, 1, 2, 3, 4]),
    ("thal", &[0, 1, 2, 3]),
];

/// Range predicates for the non-categorical features: `age` within
/// [0, 100] inclusive, `trestbps` within (10, 500) exclusive, `oldpeak`
/// below 12.
const RANGE_CHECKS: [(&str, fn(f64) -> bool); 3] = [
    ("age", |v| v < 0.0 || v > 100.0),
    ("trestbps", |v| v <= 10.0 || v >= 500.0),
    ("oldpeak", |v| v >= 12.0),
];

/// A request that passed every check.
#[derive(Debug, Clone)]
pub struct ValidRequest {
    pub observation_id: i64,
    pub observation: Map<String, Value>,
}

/// The first failing check.
///
/// `observation_id` echoes the identifier exactly as submitted, or None
/// when the request carried no identifier at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub observation_id: Option<Value>,
    pub message: String,
}

/// Validate a decoded request body against the observation schema.
pub fn validate_request(body: &Value) -> Result<ValidRequest, ValidationFailure> {
    let Some(root) = body.as_object() else {
        return Err(ValidationFailure {
            observation_id: None,
            message: "observation_id".to_string(),
        });
    };

    let Some(raw_id) = root.get("observation_id") else {
        return Err(ValidationFailure {
            observation_id: None,
            message: "observation_id".to_string(),
        });
    };

    let Some(data) = root.get("data") else {
        return Err(fail(raw_id, "data"));
    };
    let Some(observation) = data.as_object() else {
        return Err(fail(raw_id, "data"));
    };

    let expected: BTreeSet<&str> = FEATURE_NAMES.iter().copied().collect();
    let keys: BTreeSet<&str> = observation.keys().map(String::as_str).collect();

    let missing: Vec<&str> = expected.difference(&keys).copied().collect();
    if !missing.is_empty() {
        return Err(fail(raw_id, render_key_set(&missing)));
    }

    let extra: Vec<&str> = keys.difference(&expected).copied().collect();
    if !extra.is_empty() {
        return Err(fail(raw_id, render_key_set(&extra)));
    }

    for (key, domain) in CATEGORY_DOMAINS {
        let Some(value) = observation.get(key) else {
            continue;
        };
        // Integral floats count as members: 1.0 is a valid value for sex
        let in_domain = value
            .as_f64()
            .map(|v| domain.iter().any(|&allowed| v == allowed as f64))
            .unwrap_or(false);
        if !in_domain {
            return Err(fail(raw_id, format!("{} {}", key, render_value(value))));
        }
    }

    for (key, out_of_range) in RANGE_CHECKS {
        let Some(value) = observation.get(key) else {
            continue;
        };
        let accepted = value.as_f64().map(|v| !out_of_range(v)).unwrap_or(false);
        if !accepted {
            return Err(fail(raw_id, format!("{} {}", key, render_value(value))));
        }
    }

    let Some(observation_id) = integer_value(raw_id) else {
        return Err(fail(
            raw_id,
            format!("observation_id {}", render_value(raw_id)),
        ));
    };

    Ok(ValidRequest {
        observation_id,
        observation: observation.clone(),
    })
}

fn fail(raw_id: &Value, message: impl Into<String>) -> ValidationFailure {
    ValidationFailure {
        observation_id: Some(raw_id.clone()),
        message: message.into(),
    }
}

/// Render a key set as a deterministic brace list, e.g. `{ca, thal}`.
fn render_key_set(names: &[&str]) -> String {
    format!("{{{}}}", names.join(", "))
}

/// Render an offending value for an error message. Strings appear without
/// quotes; everything else uses its JSON rendering.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extract an integer identifier. Integral floats are accepted (3.0 is 3)
/// up to the limit where f64 still represents integers exactly.
fn integer_value(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT => Some(f as i64),
        _ => None,
    }
}
