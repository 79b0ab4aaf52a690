//! Generation statistics collection and reporting.
//!
//! This module tracks what a generator run produced. It provides:
//! 1. **Throughput:** Specs processed and wall time.
//! 2. **Assembly:** Programs assembled and instruction words driven.
//! 3. **Stimulus:** Events emitted and simulated cycles reserved.
//! 4. **Output:** Files written.

use std::time::Instant;

use crate::stimulus::BlockSchedule;

/// Generation statistics for one run.
#[derive(Debug, Clone)]
pub struct GenStats {
    start_time: Instant,
    /// Spec files fully processed.
    pub specs: u64,
    /// Source files assembled.
    pub programs: u64,
    /// Instruction words driven (headers excluded).
    pub words: u64,
    /// Stimulus events emitted.
    pub events: u64,
    /// Simulated cycles reserved across all specs.
    pub cycles: u64,
    /// Largest block count announced by any header.
    pub max_blocks: u32,
    /// Output files written.
    pub files_written: u64,
}

impl Default for GenStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            specs: 0,
            programs: 0,
            words: 0,
            events: 0,
            cycles: 0,
            max_blocks: 0,
            files_written: 0,
        }
    }
}

impl GenStats {
    /// Records one scheduled program.
    pub fn record_program(&mut self, schedule: &BlockSchedule) {
        self.programs += 1;
        self.words += schedule.words as u64;
        self.events += schedule.words as u64 + 1;
        self.cycles += schedule.advance;
        self.max_blocks = self.max_blocks.max(schedule.num_blocks);
    }

    /// Prints the run summary to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        println!("\n==========================================================");
        println!("TESTBENCH GENERATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("specs                    {}", self.specs);
        println!("programs                 {}", self.programs);
        println!("instruction_words        {}", self.words);
        println!("stimulus_events          {}", self.events);
        println!("reserved_cycles          {}", self.cycles);
        println!("max_blocks               {}", self.max_blocks);
        println!("files_written            {}", self.files_written);
        println!("----------------------------------------------------------");
    }
}
