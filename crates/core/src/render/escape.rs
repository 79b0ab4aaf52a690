//! Identifier Escaping.
//!
//! The simulator flattens a design's hierarchy into member names reached through
//! the root pointer. A signal written as `core.regfile.x1` in a spec is reached as
//! `rootp->top__DOT__core__DOT__regfile__DOT__x1` in the generated testbench.

/// Separator token that replaces `.` in flattened names.
pub const DOT_TOKEN: &str = "__DOT__";
/// Replacement for `(`.
pub const BRA_TOKEN: &str = "__BRA__";
/// Replacement for `)`.
pub const KET_TOKEN: &str = "__KET__";
/// Prefix through which flattened signals are reached.
pub const ROOT_POINTER: &str = "rootp->";

/// Flattens the hierarchical path `signal` below `module`.
///
/// A path without `.` names a top-level port and is returned unchanged.
///
/// # Arguments
///
/// * `module` - Name of the top module.
/// * `signal` - Dotted signal path, possibly with parenthesized generate indices.
pub fn replace_dots(module: &str, signal: &str) -> String {
    if !signal.contains('.') {
        return signal.to_string();
    }
    let escaped = signal
        .replace('(', BRA_TOKEN)
        .replace(')', KET_TOKEN)
        .replace('.', DOT_TOKEN);
    format!("{ROOT_POINTER}{module}{DOT_TOKEN}{escaped}")
}
