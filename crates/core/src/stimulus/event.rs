//! Stimulus event records.

use serde::Serialize;

/// A value applied to a named design input at a given simulation cycle.
///
/// Serializes as `{name, cycle: [cycle], val}`, the shape the testbench templates
/// iterate over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StimulusEvent {
    /// Input signal name.
    #[serde(rename = "name")]
    pub signal: String,
    /// Cycle at which the value is driven.
    #[serde(serialize_with = "cycle_list")]
    pub cycle: u64,
    /// Driven value.
    #[serde(rename = "val")]
    pub value: u32,
}

impl StimulusEvent {
    /// Creates an event for `signal` at `cycle`.
    pub fn new(signal: impl Into<String>, cycle: u64, value: u32) -> Self {
        Self {
            signal: signal.into(),
            cycle,
            value,
        }
    }
}

// Templates accept a list of cycles per input; generated events always carry one.
fn cycle_list<S: serde::Serializer>(cycle: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    [*cycle].serialize(serializer)
}
