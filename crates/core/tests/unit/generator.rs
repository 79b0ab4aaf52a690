//! # Generator Pipeline Tests
//!
//! Whole specs run through load, assemble, synthesize, and render with a scripted
//! assembler standing in for the external tool.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tbgen_core::{Error, TestSpec};

use crate::common::harness::{TB_EXPECTED_ACC, Workspace};
use crate::common::mocks::assembler::ScriptedAssembler;

const SPEC: &str = "module: acc\nasm_dir: assembler\nasm_basename: progs/acc\n";

fn load(ws: &Workspace, rel: &str, source: &str) -> TestSpec {
    TestSpec::load(&ws.write(rel, source)).unwrap()
}

#[test]
fn reference_program_end_to_end() {
    let ws = Workspace::new();
    let spec = load(&ws, "acc.yaml", SPEC);
    let _ = ws.write("progs/acc.asm", "");
    let mut generator = ws.generator();

    let report = generator
        .generate(&spec, |dir| {
            assert_eq!(dir, ws.path().join("assembler"));
            ScriptedAssembler::new().with_output("acc.asm", "a0000003\n00000001\n00000002\n")
        })
        .unwrap();

    assert_eq!(ws.read_output("acc_tb.cpp"), TB_EXPECTED_ACC);
    assert_eq!(ws.read_output("test_acc.sh"), "#!/bin/sh\nexec ./obj_dir/Vacc\n");
    assert_eq!(report.events, 3);
    assert_eq!(report.final_cycle, 294);
    assert_eq!(report.testbench, ws.out_dir().join("acc_tb.cpp"));
    assert_eq!(report.script, ws.out_dir().join("test_acc.sh"));
}

#[test]
fn programs_scheduled_in_sorted_order() {
    let ws = Workspace::new();
    let spec = load(&ws, "acc.yaml", SPEC);
    let _ = ws.write("progs/acc_2.asm", "");
    let _ = ws.write("progs/acc_1.asm", "");
    let mut generator = ws.generator();

    let report = generator
        .generate(&spec, |_| {
            ScriptedAssembler::new()
                .with_output("acc_1.asm", "a0000003\n00000001\n00000002\n")
                .with_output("acc_2.asm", "a0000001\n0000000f\n")
        })
        .unwrap();

    let names: Vec<&str> = report
        .sources
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(names, vec!["acc_1.asm", "acc_2.asm"]);
    assert_eq!(report.schedules[1].base_cycle, 294);

    let testbench = ws.read_output("acc_tb.cpp");
    assert!(testbench.ends_with(
        "drive(from_cpu, 294, 0xa0000001);\ndrive(from_cpu, 295, 0x1f);\n"
    ));
}

#[test]
fn three_d_header() {
    let ws = Workspace::new();
    let spec = load(&ws, "acc.yaml", &format!("{SPEC}is_3d: true\n"));
    let _ = ws.write("progs/acc.asm", "");
    let mut generator = ws.generator();

    let _ = generator
        .generate(&spec, |_| {
            ScriptedAssembler::new().with_output("acc.asm", "a0000003\n00000001\n00000002\n")
        })
        .unwrap();
    assert!(ws.read_output("acc_tb.cpp").contains("drive(from_cpu, 0, 0xa4000003);"));
}

#[test]
fn disabled_assembly_never_builds() {
    let ws = Workspace::new();
    let spec = load(
        &ws,
        "acc.yaml",
        "module: acc\nasm_dir: none\ninputs:\n  - {name: core.rst, cycle: [0], val: 1}\n",
    );
    let mut generator = ws.generator();

    let report = generator
        .generate(&spec, |_| -> ScriptedAssembler {
            panic!("assembler must not be created when asm_dir is none")
        })
        .unwrap();

    assert!(report.sources.is_empty());
    assert_eq!(report.final_cycle, 0);
    assert_eq!(
        ws.read_output("acc_tb.cpp"),
        "// acc testbench\ndrive(rootp->acc__DOT__core__DOT__rst, 0, 0x1);\n"
    );
}

#[test]
fn no_matching_sources_still_renders() {
    let ws = Workspace::new();
    let spec = load(&ws, "acc.yaml", SPEC);
    let mut generator = ws.generator();

    let report = generator.generate(&spec, |_| ScriptedAssembler::new()).unwrap();
    assert!(report.sources.is_empty());
    assert_eq!(ws.read_output("acc_tb.cpp"), "// acc testbench\n");
}

#[test]
fn build_failure_writes_nothing() {
    let ws = Workspace::new();
    let spec = load(&ws, "acc.yaml", SPEC);
    let _ = ws.write("progs/acc.asm", "");
    let mut generator = ws.generator();

    let err = generator
        .generate(&spec, |_| ScriptedAssembler::new().failing_build())
        .unwrap_err();
    assert!(matches!(err, Error::AssemblerBuild { .. }));
    assert!(!ws.out_dir().join("acc_tb.cpp").exists());
}

#[test]
fn invalid_hex_aborts_spec() {
    let ws = Workspace::new();
    let spec = load(&ws, "acc.yaml", SPEC);
    let _ = ws.write("progs/acc.asm", "");
    let mut generator = ws.generator();

    let err = generator
        .generate(&spec, |_| {
            ScriptedAssembler::new().with_output("acc.asm", "a0000001\nnot-hex\n")
        })
        .unwrap_err();
    assert!(err.to_string().contains("invalid hex number 'not-hex'"));
    assert!(!ws.out_dir().join("acc_tb.cpp").exists());
    assert_eq!(generator.stats().specs, 0);
}

#[test]
fn missing_field_in_template_renders_no_value() {
    let ws = Workspace::new();
    let spec = load(&ws, "acc.yaml", "module: acc\nasm_dir: none\n");
    let mut generator = tbgen_core::Generator::with_templates(
        tbgen_core::Config::default(),
        ws.out_dir(),
        tbgen_core::render::Template::parse("tmpl_tb", "{{.clock}}").unwrap(),
        tbgen_core::render::Template::parse("tmpl_script", "").unwrap(),
    );

    let _ = generator.generate(&spec, |_| ScriptedAssembler::new()).unwrap();
    assert_eq!(ws.read_output("acc_tb.cpp"), "<no value>");
}

#[cfg(unix)]
#[test]
fn script_is_executable() {
    use std::os::unix::fs::PermissionsExt;

    let ws = Workspace::new();
    let spec = load(&ws, "acc.yaml", "module: acc\nasm_dir: none\n");
    let mut generator = ws.generator();
    let report = generator.generate(&spec, |_| ScriptedAssembler::new()).unwrap();

    let mode = fs::metadata(&report.script).unwrap().permissions().mode();
    assert_eq!(mode & 0o111, 0o111);
}

#[test]
fn stats_accumulate_across_specs() {
    let ws = Workspace::new();
    let first = load(&ws, "a/acc.yaml", SPEC);
    let second = load(&ws, "b/acc.yaml", SPEC);
    let _ = ws.write("a/progs/acc.asm", "");
    let _ = ws.write("b/progs/acc_x.asm", "");
    let _ = ws.write("b/progs/acc_y.asm", "");
    let mut generator = ws.generator();

    let hex = "a0000003\n00000001\n00000002\n";
    let _ = generator
        .generate(&first, |_| ScriptedAssembler::new().with_output("acc.asm", hex))
        .unwrap();
    let _ = generator
        .generate(&second, |_| {
            ScriptedAssembler::new()
                .with_output("acc_x.asm", hex)
                .with_output("acc_y.asm", hex)
        })
        .unwrap();

    let stats = generator.stats();
    assert_eq!(stats.specs, 2);
    assert_eq!(stats.programs, 3);
    assert_eq!(stats.words, 6);
    assert_eq!(stats.events, 9);
    assert_eq!(stats.cycles, 3 * 294);
    assert_eq!(stats.max_blocks, 3);
    assert_eq!(stats.files_written, 4);
}

#[test]
fn run_reports_missing_spec() {
    let ws = Workspace::new();
    let mut generator = ws.generator();
    let err = generator.run(Path::new("/nonexistent/acc.yaml")).unwrap_err();
    assert!(err.to_string().contains("can't read YAML file"));
}
