//! Block-Loader Protocol Constants.
//!
//! This module defines the encoding and timing constants of the instruction-load
//! protocol driven by generated testbenches. It includes:
//! 1. **Header Constants:** Base address tag and mode bits carried by the header word.
//! 2. **Word Constants:** Position of the alternating write strobe in instruction words.
//! 3. **Latency Constants:** Parameters of the settle-time estimate between programs.

/// Base address tag carried by every header word; the low bits hold the block count.
pub const HEADER_BASE: u32 = 0xa000_0000;

/// Mask selecting the tag nibble of a header word.
pub const HEADER_TAG_MASK: u32 = 0xf000_0000;

/// Mode bit added to the header when the design is loaded in 3D mode (bit 26).
pub const MODE_3D: u32 = 0b100 << 24;

/// Bit position of the alternating write strobe added to each instruction word.
pub const STROBE_SHIFT: u32 = 4;

/// Strobe value applied to the first instruction word of a program.
pub const STROBE_INITIAL: u32 = 1;

/// Input signal that carries header and instruction words into the design.
pub const FROM_CPU: &str = "from_cpu";

/// Minimum block count used by the settle-time estimate.
pub const MIN_SETTLE_BLOCKS: u64 = 16;

/// Per-block service overhead in cycles, added to the word count.
pub const BLOCK_SERVICE_OVERHEAD: u64 = 15;

/// Fixed wait appended after every program.
pub const SETTLE_MARGIN: u64 = 20;
