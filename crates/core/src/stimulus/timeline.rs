//! Stimulus Timeline.
//!
//! This module owns the cycle accounting for the block-load protocol. For each
//! assembled program it:
//! 1. **Header:** Re-encodes the block count (plus the 3D mode bit when enabled) and
//!    drives it on `from_cpu` at the current baseline cycle.
//! 2. **Instructions:** Drives every word one cycle after its line offset, with an
//!    alternating write strobe added at bit 4 (1, 0, 1, ...).
//! 3. **Settle:** Advances the baseline far enough for the design to consume every
//!    block before the next program's header is driven.

use std::path::Path;

use tracing::{debug, warn};

use crate::common::constants::{
    BLOCK_SERVICE_OVERHEAD, FROM_CPU, HEADER_BASE, MIN_SETTLE_BLOCKS, MODE_3D, SETTLE_MARGIN,
    STROBE_INITIAL, STROBE_SHIFT,
};
use crate::common::Result;
use crate::stimulus::block::AssembledBlock;
use crate::stimulus::event::StimulusEvent;

/// How the design interprets the header word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Header is re-emitted as base tag plus block count.
    #[default]
    Planar,
    /// Header additionally carries [`MODE_3D`].
    ThreeD,
}

impl LoadMode {
    /// Maps the spec's `is_3d` flag to a mode.
    pub const fn from_is_3d(is_3d: bool) -> Self {
        if is_3d { Self::ThreeD } else { Self::Planar }
    }

    /// Header value driven for a program announcing `num_blocks` blocks.
    pub const fn encode_header(self, num_blocks: u32) -> u32 {
        let header = HEADER_BASE.wrapping_add(num_blocks);
        match self {
            Self::Planar => header,
            Self::ThreeD => header.wrapping_add(MODE_3D),
        }
    }
}

/// Cycle accounting for one scheduled program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSchedule {
    /// Cycle of the header event.
    pub base_cycle: u64,
    /// Block count decoded from the header.
    pub num_blocks: u32,
    /// Instruction words driven (blank lines excluded).
    pub words: usize,
    /// Cycles reserved for this program: the settle window, stretched if needed so
    /// the next program starts after this one's last word.
    pub advance: u64,
}

impl BlockSchedule {
    /// Baseline cycle for the program that follows.
    pub const fn next_cycle(&self) -> u64 {
        self.base_cycle + self.advance
    }
}

/// Cycles reserved after a program of `words` instruction words and `num_blocks` blocks.
///
/// `W + max(16, blocks) * (W + 15) + 20`
pub fn settle_cycles(words: usize, num_blocks: u32) -> u64 {
    let words = words as u64;
    let blocks = MIN_SETTLE_BLOCKS.max(u64::from(num_blocks));
    words + blocks * (words + BLOCK_SERVICE_OVERHEAD) + SETTLE_MARGIN
}

/// Accumulates stimulus events across the programs of one test spec.
///
/// Programs must be pushed in the order the testbench should load them; each one
/// starts at the cycle where the previous one's settle window ends.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    mode: LoadMode,
    cycle: u64,
    events: Vec<StimulusEvent>,
    schedules: Vec<BlockSchedule>,
}

impl Timeline {
    /// Creates an empty timeline starting at cycle 0.
    pub fn new(mode: LoadMode) -> Self {
        Self::starting_at(mode, 0)
    }

    /// Creates an empty timeline whose first header is driven at `cycle`.
    pub fn starting_at(mode: LoadMode, cycle: u64) -> Self {
        Self {
            mode,
            cycle,
            events: Vec::new(),
            schedules: Vec::new(),
        }
    }

    /// Load mode used for header encoding.
    pub const fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Baseline cycle for the next program.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Events produced so far, in production order.
    pub fn events(&self) -> &[StimulusEvent] {
        &self.events
    }

    /// Per-program schedules, in push order.
    pub fn schedules(&self) -> &[BlockSchedule] {
        &self.schedules
    }

    /// Consumes the timeline, returning its events.
    pub fn into_events(self) -> Vec<StimulusEvent> {
        self.events
    }

    /// Schedules one assembled program and advances the baseline.
    ///
    /// # Arguments
    ///
    /// * `block` - Header and instruction words of the program.
    ///
    /// # Returns
    ///
    /// The cycle accounting for the program.
    pub fn push_block(&mut self, block: &AssembledBlock) -> BlockSchedule {
        let base_cycle = self.cycle;
        let num_blocks = block.num_blocks();

        self.events.push(StimulusEvent::new(
            FROM_CPU,
            base_cycle,
            self.mode.encode_header(num_blocks),
        ));

        let mut strobe = STROBE_INITIAL;
        for word in &block.words {
            self.events.push(StimulusEvent::new(
                FROM_CPU,
                base_cycle + word.offset as u64 + 1,
                word.raw.wrapping_add(strobe << STROBE_SHIFT),
            ));
            strobe ^= 1;
        }

        // Interior blank lines push words past the settle window; the next header
        // must still come after the last word.
        let span = block.line_span() as u64 + 1;
        let schedule = BlockSchedule {
            base_cycle,
            num_blocks,
            words: block.word_count(),
            advance: settle_cycles(block.word_count(), num_blocks).max(span),
        };
        self.cycle = schedule.next_cycle();
        self.schedules.push(schedule);

        debug!(
            base_cycle,
            num_blocks,
            words = schedule.words,
            next_cycle = self.cycle,
            "scheduled program"
        );
        schedule
    }

    /// Parses hex assembler output for `origin` and schedules it.
    ///
    /// Nothing is appended if any word fails to parse.
    pub fn push_hex(&mut self, origin: &Path, text: &str) -> Result<BlockSchedule> {
        let block = AssembledBlock::parse(origin, text)?;
        if !block.has_header_tag() {
            warn!(
                file = %origin.display(),
                header = %format!("{:#010x}", block.header),
                "header word lacks the 0xa tag; block count decoded by wrapping subtraction"
            );
        }
        Ok(self.push_block(&block))
    }
}
