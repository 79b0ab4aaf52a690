//! Render data construction.
//!
//! Templates see the spec's YAML mapping as JSON, with generated stimulus appended
//! to `inputs` after any inputs the spec lists itself.

use serde_json::Value;

use crate::common::{Error, Result};
use crate::stimulus::StimulusEvent;
use crate::testspec::{INPUTS_KEY, TestSpec};

/// Builds the template data for `spec` augmented with `events`.
///
/// # Returns
///
/// A JSON object, or [`Error::Spec`] if the mapping has keys JSON can't express.
pub fn render_data(spec: &TestSpec, events: &[StimulusEvent]) -> Result<Value> {
    let to_spec_error = |e: serde_json::Error| Error::Spec {
        path: spec.path.clone(),
        message: e.to_string(),
    };

    let mut data = serde_json::to_value(&spec.fields).map_err(to_spec_error)?;
    let Value::Object(map) = &mut data else {
        return Err(Error::Spec {
            path: spec.path.clone(),
            message: "top level must be a mapping".to_string(),
        });
    };

    if events.is_empty() {
        return Ok(data);
    }

    let mut inputs = match map.remove(INPUTS_KEY) {
        Some(Value::Array(existing)) => existing,
        _ => Vec::with_capacity(events.len()),
    };
    for event in events {
        inputs.push(serde_json::to_value(event).map_err(to_spec_error)?);
    }
    let _ = map.insert(INPUTS_KEY.to_string(), Value::Array(inputs));
    Ok(data)
}
