//! # Assembled Block Tests
//!
//! Parsing of assembler hex output into header and instruction words.

use std::path::Path;

use tbgen_core::Error;
use tbgen_core::stimulus::block::parse_hex_word;
use tbgen_core::stimulus::{AssembledBlock, InstructionWord};

#[test]
fn parse_header_and_words() {
    let block = AssembledBlock::parse(Path::new("p.asm"), "a0000002\ndeadbeef\n0000ffff\n").unwrap();
    assert_eq!(block.header, 0xa000_0002);
    assert_eq!(block.num_blocks(), 2);
    assert!(block.has_header_tag());
    assert_eq!(
        block.words,
        vec![
            InstructionWord {
                offset: 0,
                raw: 0xdead_beef
            },
            InstructionWord {
                offset: 1,
                raw: 0x0000_ffff
            },
        ]
    );
}

#[test]
fn header_only_program() {
    let block = AssembledBlock::parse(Path::new("p.asm"), "a0000000\n").unwrap();
    assert_eq!(block.word_count(), 0);
    assert_eq!(block.num_blocks(), 0);
}

#[test]
fn uppercase_hex_accepted() {
    assert_eq!(parse_hex_word("DEADBEEF").unwrap(), 0xdead_beef);
}

#[test]
fn word_wider_than_32_bits_rejected() {
    let err = parse_hex_word("100000000").unwrap_err();
    assert!(matches!(err, Error::InvalidHexWord { ref token, .. } if token == "100000000"));
}

#[test]
fn prefixed_word_rejected() {
    assert!(parse_hex_word("0x10").is_err());
}

#[test]
fn blank_first_line_is_missing_header() {
    let err = AssembledBlock::parse(Path::new("gap.asm"), "\na0000001\n").unwrap_err();
    assert!(matches!(err, Error::MissingHeader { .. }));
}

#[test]
fn bad_word_after_good_ones_rejects_file() {
    let err = AssembledBlock::parse(Path::new("p.asm"), "a0000001\n1\n2\nnope\n").unwrap_err();
    assert!(err.to_string().contains("'nope'"));
}
