//! Per-spec generation pipeline.
//!
//! For each spec file the generator runs load, assemble, synthesize, and render in
//! order, and stops at the first error:
//! 1. **Load:** Parse and validate the YAML spec.
//! 2. **Assemble:** Build the assembler and run it over the sorted source list.
//! 3. **Synthesize:** Schedule every program on one [`Timeline`].
//! 4. **Render:** Write `<module>_tb.cpp` and `test_<module>.sh` to the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::asm::{Assembler, MakeAssembler, find_sources};
use crate::common::{Error, Result};
use crate::config::Config;
use crate::render::{Template, render_data};
use crate::stats::GenStats;
use crate::stimulus::{BlockSchedule, Timeline};
use crate::testspec::{Assembly, TestSpec};

/// What one spec produced.
#[derive(Debug, Clone)]
pub struct SpecReport {
    /// Design under test.
    pub module: String,
    /// Programs assembled, in schedule order.
    pub sources: Vec<PathBuf>,
    /// Cycle accounting per program.
    pub schedules: Vec<BlockSchedule>,
    /// Stimulus events generated.
    pub events: usize,
    /// Baseline cycle after the last program.
    pub final_cycle: u64,
    /// Written testbench file.
    pub testbench: PathBuf,
    /// Written run script.
    pub script: PathBuf,
}

/// Drives generation for a sequence of spec files.
#[derive(Debug)]
pub struct Generator {
    config: Config,
    out_dir: PathBuf,
    testbench: Template,
    script: Template,
    stats: GenStats,
}

impl Generator {
    /// Creates a generator writing into `out_dir`, loading the configured templates.
    pub fn new(config: Config, out_dir: impl Into<PathBuf>) -> Result<Self> {
        let testbench = Template::from_file(&config.templates.testbench)?;
        let script = Template::from_file(&config.templates.script)?;
        Ok(Self::with_templates(config, out_dir, testbench, script))
    }

    /// Creates a generator with already parsed templates.
    pub fn with_templates(
        config: Config,
        out_dir: impl Into<PathBuf>,
        testbench: Template,
        script: Template,
    ) -> Self {
        Self {
            config,
            out_dir: out_dir.into(),
            testbench,
            script,
            stats: GenStats::default(),
        }
    }

    /// Statistics accumulated so far.
    pub const fn stats(&self) -> &GenStats {
        &self.stats
    }

    /// Output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Generates the testbench for the spec file at `spec_path` using the `make` flow.
    pub fn run(&mut self, spec_path: &Path) -> Result<SpecReport> {
        let spec = TestSpec::load(spec_path)?;
        let asm_config = self.config.assembler.clone();
        self.generate(&spec, |dir| MakeAssembler::new(dir, asm_config))
    }

    /// Generates the testbench for `spec`, creating its assembler with `make_assembler`.
    ///
    /// `make_assembler` is only called when the spec enables assembly; it receives the
    /// resolved assembler directory.
    pub fn generate<A, F>(&mut self, spec: &TestSpec, make_assembler: F) -> Result<SpecReport>
    where
        A: Assembler,
        F: FnOnce(&Path) -> A,
    {
        info!(spec = %spec.path.display(), module = %spec.module, "generating testbench");

        let mut timeline = Timeline::new(spec.load_mode());
        let mut sources = Vec::new();

        if let Assembly::Enabled { dir, basename } = &spec.assembly {
            let mut assembler = make_assembler(dir);
            assembler.prepare()?;

            sources = find_sources(
                &spec.base_dir,
                basename,
                &self.config.assembler.source_extension,
            )?;
            if sources.is_empty() {
                warn!(
                    spec = %spec.path.display(),
                    basename = %basename,
                    "no assembly sources match; testbench gets no generated inputs"
                );
            }

            for source in &sources {
                let hex = assembler.assemble(source)?;
                let schedule = timeline.push_hex(source, &hex)?;
                info!(
                    source = %source.display(),
                    base_cycle = schedule.base_cycle,
                    blocks = schedule.num_blocks,
                    words = schedule.words,
                    "assembled program"
                );
            }
        }

        let data = render_data(spec, timeline.events())?;
        fs::create_dir_all(&self.out_dir)
            .map_err(|e| Error::io("can't create output directory", &self.out_dir, e))?;

        let testbench = self
            .out_dir
            .join(self.config.output.testbench_name(&spec.module));
        self.testbench.render_to_file(&data, &testbench)?;

        let script = self.out_dir.join(self.config.output.script_name(&spec.module));
        self.script.render_to_file(&data, &script)?;
        make_executable(&script)?;

        for schedule in timeline.schedules() {
            self.stats.record_program(schedule);
        }
        self.stats.specs += 1;
        self.stats.files_written += 2;

        info!(
            testbench = %testbench.display(),
            script = %script.display(),
            events = timeline.events().len(),
            "wrote testbench"
        );

        Ok(SpecReport {
            module: spec.module.clone(),
            sources,
            schedules: timeline.schedules().to_vec(),
            events: timeline.events().len(),
            final_cycle: timeline.cycle(),
            testbench,
            script,
        })
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)
        .map_err(|e| Error::io("can't stat", path, e))?
        .permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions(path, permissions).map_err(|e| Error::io("can't chmod", path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
