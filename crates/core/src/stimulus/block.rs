//! Assembled Program Parsing.
//!
//! The assembler's hex format is one 32-bit word per line, most significant digit
//! first, with the header word on the first line and an optional trailing blank
//! line. This module parses that text into an [`AssembledBlock`]:
//! 1. **Header:** The first line; must be present and must parse.
//! 2. **Instruction words:** Every following non-blank line, tagged with its offset.
//!
//! A file is parsed completely before anything is scheduled, so a bad token
//! anywhere in the file rejects the whole program.

use std::path::Path;

use crate::common::constants::{HEADER_BASE, HEADER_TAG_MASK};
use crate::common::{Error, Result};

/// One instruction word and its line offset after the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionWord {
    /// 0-based line position after the header, blank lines included.
    pub offset: usize,
    /// Raw word as emitted by the assembler.
    pub raw: u32,
}

/// One source file's assembler output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledBlock {
    /// Header word: base address tag plus block count.
    pub header: u32,
    /// Instruction words in output order.
    pub words: Vec<InstructionWord>,
}

impl AssembledBlock {
    /// Builds a block from a header and densely packed instruction words.
    pub fn from_words(header: u32, words: &[u32]) -> Self {
        Self {
            header,
            words: words
                .iter()
                .enumerate()
                .map(|(offset, &raw)| InstructionWord { offset, raw })
                .collect(),
        }
    }

    /// Parses hex assembler output produced for `origin`.
    ///
    /// # Arguments
    ///
    /// * `origin` - Source file the text was assembled from; used in diagnostics.
    /// * `text` - Newline-separated hex words, header first.
    ///
    /// # Returns
    ///
    /// The parsed block, [`Error::MissingHeader`] if there is no header line, or
    /// [`Error::InvalidHexWord`] naming the first token that is not a base-16 `u32`.
    pub fn parse(origin: &Path, text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let header = match lines.next().map(str::trim) {
            Some(token) if !token.is_empty() => parse_hex_word(token)?,
            _ => {
                return Err(Error::MissingHeader {
                    source_file: origin.to_path_buf(),
                });
            }
        };

        let mut words = Vec::new();
        for (offset, line) in lines.enumerate() {
            let token = line.trim();
            if token.is_empty() {
                continue;
            }
            words.push(InstructionWord {
                offset,
                raw: parse_hex_word(token)?,
            });
        }

        Ok(Self { header, words })
    }

    /// Number of instruction blocks announced by the header.
    ///
    /// Computed as `header - HEADER_BASE` with 32-bit wrapping, so a header that
    /// lacks the tag still decodes deterministically.
    pub const fn num_blocks(&self) -> u32 {
        self.header.wrapping_sub(HEADER_BASE)
    }

    /// Whether the header carries the expected `0xA` tag nibble.
    pub const fn has_header_tag(&self) -> bool {
        (self.header & HEADER_TAG_MASK) == HEADER_BASE
    }

    /// Number of instruction words (blank lines excluded).
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Lines after the header up to and including the last word.
    ///
    /// Equals [`word_count`](Self::word_count) unless blank lines sit between words.
    pub fn line_span(&self) -> usize {
        self.words.last().map_or(0, |word| word.offset + 1)
    }
}

/// Parses a single base-16 `u32` token.
///
/// # Returns
///
/// The value, or [`Error::InvalidHexWord`] carrying the token.
pub fn parse_hex_word(token: &str) -> Result<u32> {
    let invalid = |reason| Error::InvalidHexWord {
        token: token.to_string(),
        reason,
    };
    // `from_str_radix` alone would also take a leading `+`.
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("invalid syntax"));
    }
    u32::from_str_radix(token, 16).map_err(|_| invalid("value out of range"))
}
