//! Stimulus timeline synthesis.
//!
//! Turns assembler hex output into the cycle-stamped `from_cpu` events that a generated
//! testbench replays. It provides:
//! 1. **Blocks:** Parsing of one file's hex output into a header and instruction words.
//! 2. **Events:** The `StimulusEvent` record handed to the renderer.
//! 3. **Timeline:** The accumulator that encodes words and schedules consecutive programs.

/// Assembled program parsing.
pub mod block;
/// Stimulus event records.
pub mod event;
/// Cycle accumulator and block-load encoding.
pub mod timeline;

pub use block::{AssembledBlock, InstructionWord};
pub use event::StimulusEvent;
pub use timeline::{BlockSchedule, LoadMode, Timeline, settle_cycles};
