//! # Configuration Tests

use std::path::PathBuf;

use tbgen_core::config::*;
use tbgen_core::{Config, Error};

#[test]
fn config_default() {
    let config = Config::default();
    assert_eq!(config.templates.testbench, PathBuf::from("tmpl_tb"));
    assert_eq!(config.templates.script, PathBuf::from("tmpl_script"));
    assert_eq!(config.assembler.build_program, "make");
    assert_eq!(config.assembler.build_target, "bin/assembler");
    assert_eq!(config.assembler.binary, PathBuf::from("bin/assembler"));
    assert_eq!(config.assembler.format, "hex");
    assert_eq!(config.assembler.source_extension, "asm");
}

#[test]
fn output_names() {
    let output = OutputConfig::default();
    assert_eq!(output.testbench_name("conv"), "conv_tb.cpp");
    assert_eq!(output.script_name("conv"), "test_conv.sh");
}

#[test]
fn templates_beside_directory() {
    let templates = TemplateConfig::beside(&PathBuf::from("/opt/tbgen/bin"));
    assert_eq!(templates.testbench, PathBuf::from("/opt/tbgen/bin/tmpl_tb"));
    assert_eq!(templates.script, PathBuf::from("/opt/tbgen/bin/tmpl_script"));
}

#[test]
fn partial_json_keeps_defaults() {
    let config: Config =
        serde_json::from_str(r#"{"assembler": {"build_program": "ninja"}}"#).unwrap();
    assert_eq!(config.assembler.build_program, "ninja");
    assert_eq!(config.assembler.build_target, "bin/assembler");
    assert_eq!(config.output.script_prefix, "test_");
}

#[test]
fn loads_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tbgen.json");
    std::fs::write(&path, r#"{"output": {"testbench_suffix": "_tb.sv"}}"#).unwrap();
    let config = Config::from_json_file(&path).unwrap();
    assert_eq!(config.output.testbench_name("m"), "m_tb.sv");
}

#[test]
fn from_json_file_rejects_bad_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tbgen.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        Config::from_json_file(&path).unwrap_err(),
        Error::Config { .. }
    ));
}
