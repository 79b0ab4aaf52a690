//! # Timeline Tests
//!
//! Header re-encoding, strobe alternation, cycle stamping, and the settle window
//! carried from one program to the next.

use std::path::Path;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tbgen_core::Error;
use tbgen_core::stimulus::{AssembledBlock, LoadMode, StimulusEvent, Timeline, settle_cycles};

fn ev(cycle: u64, value: u32) -> StimulusEvent {
    StimulusEvent::new("from_cpu", cycle, value)
}

#[test]
fn reference_program() {
    let mut timeline = Timeline::new(LoadMode::Planar);
    let schedule = timeline
        .push_hex(Path::new("prog0.asm"), "a0000003\n00000001\n00000002\n")
        .unwrap();

    assert_eq!(
        timeline.events(),
        &[ev(0, 0xa000_0003), ev(1, 0x0000_0011), ev(2, 0x0000_0002)]
    );
    assert_eq!(schedule.num_blocks, 3);
    assert_eq!(schedule.words, 2);
    assert_eq!(schedule.advance, 294);
    assert_eq!(timeline.cycle(), 294);
}

#[rstest]
#[case(LoadMode::Planar, 0xa000_0005)]
#[case(LoadMode::ThreeD, 0xa400_0005)]
fn header_value_by_mode(#[case] mode: LoadMode, #[case] expected: u32) {
    let mut timeline = Timeline::new(mode);
    let _ = timeline.push_block(&AssembledBlock::from_words(0xa000_0005, &[]));
    assert_eq!(timeline.events()[0].value, expected);
}

#[test]
fn three_d_only_changes_header() {
    let block = AssembledBlock::from_words(0xa000_0001, &[0x100, 0x200]);
    let mut planar = Timeline::new(LoadMode::Planar);
    let mut three_d = Timeline::new(LoadMode::from_is_3d(true));
    let _ = planar.push_block(&block);
    let _ = three_d.push_block(&block);

    assert_eq!(&planar.events()[1..], &three_d.events()[1..]);
    assert_eq!(planar.cycle(), three_d.cycle());
}

#[test]
fn strobe_alternates_from_one() {
    let mut timeline = Timeline::new(LoadMode::Planar);
    let _ = timeline.push_block(&AssembledBlock::from_words(0xa000_0001, &[0, 0, 0, 0, 0]));
    let strobes: Vec<u32> = timeline.events()[1..]
        .iter()
        .map(|e| (e.value >> 4) & 1)
        .collect();
    assert_eq!(strobes, vec![1, 0, 1, 0, 1]);
}

#[test]
fn strobe_is_added_not_ored() {
    // Bit 4 already set: adding the strobe carries into bit 5.
    let mut timeline = Timeline::new(LoadMode::Planar);
    let _ = timeline.push_block(&AssembledBlock::from_words(0xa000_0001, &[0x10]));
    assert_eq!(timeline.events()[1].value, 0x20);
}

#[test]
fn strobe_wraps_at_word_width() {
    let mut timeline = Timeline::new(LoadMode::Planar);
    let _ = timeline.push_block(&AssembledBlock::from_words(0xa000_0001, &[0xffff_fff0]));
    assert_eq!(timeline.events()[1].value, 0x0000_0000);
}

#[test]
fn second_program_starts_after_settle_window() {
    let mut timeline = Timeline::new(LoadMode::Planar);
    let first = timeline
        .push_hex(Path::new("p0.asm"), "a0000003\n00000001\n00000002\n")
        .unwrap();
    let second = timeline
        .push_hex(Path::new("p1.asm"), "a0000014\n0000000a\n")
        .unwrap();

    assert_eq!(second.base_cycle, first.base_cycle + first.advance);
    assert_eq!(second.base_cycle, 294);
    assert_eq!(timeline.events()[3], ev(294, 0xa000_0014));
    assert_eq!(timeline.events()[4], ev(295, 0x0000_001a));
    // 20 blocks is above the floor of 16.
    assert_eq!(second.advance, 1 + 20 * 16 + 20);
    assert_eq!(timeline.cycle(), 294 + 341);
}

#[test]
fn strobe_restarts_per_program() {
    let mut timeline = Timeline::new(LoadMode::Planar);
    let _ = timeline.push_block(&AssembledBlock::from_words(0xa000_0001, &[0]));
    let _ = timeline.push_block(&AssembledBlock::from_words(0xa000_0001, &[0]));
    assert_eq!(timeline.events()[1].value, 0x10);
    assert_eq!(timeline.events()[3].value, 0x10);
}

#[test]
fn trailing_blank_line_is_not_a_word() {
    let mut timeline = Timeline::new(LoadMode::Planar);
    let with_blank = timeline
        .push_hex(Path::new("p.asm"), "a0000001\n00000007\n\n")
        .unwrap();
    assert_eq!(with_blank.words, 1);
    assert_eq!(with_blank.advance, settle_cycles(1, 1));
    assert_eq!(timeline.events().len(), 2);
}

#[test]
fn interior_blank_line_keeps_position() {
    let mut timeline = Timeline::new(LoadMode::Planar);
    let _ = timeline
        .push_hex(Path::new("p.asm"), "a0000001\n00000001\n\n00000002\n")
        .unwrap();
    assert_eq!(
        timeline.events(),
        &[ev(0, 0xa000_0001), ev(1, 0x11), ev(3, 0x02)]
    );
}

#[test]
fn invalid_word_aborts_without_events() {
    let mut timeline = Timeline::starting_at(LoadMode::Planar, 100);
    let err = timeline
        .push_hex(Path::new("p.asm"), "a0000001\n00000001\nzz\n")
        .unwrap_err();

    match err {
        Error::InvalidHexWord { token, .. } => assert_eq!(token, "zz"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(timeline.events().is_empty());
    assert!(timeline.schedules().is_empty());
    assert_eq!(timeline.cycle(), 100);
}

#[rstest]
#[case::sign_prefix("+1")]
#[case::hex_prefix("0x1")]
#[case::negative("-1")]
#[case::too_wide("100000000")]
fn signed_or_malformed_word_rejected(#[case] token: &str) {
    let mut timeline = Timeline::new(LoadMode::Planar);
    let err = timeline
        .push_hex(Path::new("p.asm"), &format!("a0000001\n{token}\n"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidHexWord { token: ref t, .. } if t == token));
    assert!(timeline.events().is_empty());
    assert_eq!(timeline.cycle(), 0);
}

#[test]
fn padded_program_does_not_overlap_next_header() {
    let mut timeline = Timeline::new(LoadMode::Planar);
    let padded = format!("a0000001\n00000001\n{}00000002\n", "\n".repeat(300));
    let first = timeline.push_hex(Path::new("p0.asm"), &padded).unwrap();
    let _ = timeline
        .push_hex(Path::new("p1.asm"), "a0000001\n00000003\n")
        .unwrap();

    let cycles: Vec<u64> = timeline.events().iter().map(|e| e.cycle).collect();
    assert_eq!(cycles, vec![0, 1, 302, 303, 304]);
    assert_eq!(first.words, 2);
    assert_eq!(first.advance, 303);
}

#[test]
fn invalid_word_diagnostic_names_token() {
    let mut timeline = Timeline::new(LoadMode::Planar);
    let err = timeline.push_hex(Path::new("p.asm"), "zz\n").unwrap_err();
    assert!(err.to_string().contains("'zz'"));
}

#[test]
fn empty_output_is_missing_header() {
    let mut timeline = Timeline::new(LoadMode::Planar);
    let err = timeline.push_hex(Path::new("empty.asm"), "").unwrap_err();
    assert!(matches!(err, Error::MissingHeader { .. }));
    assert!(err.to_string().contains("empty.asm"));
}

#[test]
fn starting_offset_applies_to_all_events() {
    let mut timeline = Timeline::starting_at(LoadMode::Planar, 1000);
    let _ = timeline.push_block(&AssembledBlock::from_words(0xa000_0002, &[1, 2]));
    let cycles: Vec<u64> = timeline.events().iter().map(|e| e.cycle).collect();
    assert_eq!(cycles, vec![1000, 1001, 1002]);
    assert_eq!(timeline.cycle(), 1000 + 294);
}

#[test]
fn into_events_preserves_production_order() {
    let mut timeline = Timeline::new(LoadMode::Planar);
    let _ = timeline.push_block(&AssembledBlock::from_words(0xa000_0001, &[7]));
    let _ = timeline.push_block(&AssembledBlock::from_words(0xa000_0001, &[8]));
    let events = timeline.into_events();
    assert_eq!(events.len(), 4);
    assert!(events.windows(2).all(|w| w[0].cycle <= w[1].cycle));
}
