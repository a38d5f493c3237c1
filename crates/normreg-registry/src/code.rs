//! Work-item code generation
//!
//! Codes of blocked items have the form `2.<block>.<seq>`. The next
//! sequence for a block is one past the largest sequence already used in
//! that block; gaps left by deletions are never refilled.
//!
//! Generation is a pure function over a snapshot of existing codes. The
//! caller must take that snapshot and insert the new record under the same
//! lock, see [`crate::planned::PlannedListService`].

use serde::Serialize;

/// Fixed leading segment of every generated code
pub const CODE_PREFIX: &str = "2";

/// Next free code of a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextCode {
    /// Sequence number within the block
    pub next: u64,
    /// Full code, `2.<block>.<next>`
    pub code: String,
}

impl NextCode {
    /// Code with an explicit sequence number
    #[must_use]
    pub fn new(block: &str, next: u64) -> Self {
        Self {
            next,
            code: format!("{CODE_PREFIX}.{block}.{next}"),
        }
    }
}

/// Sequence number of `code` when it belongs to `block`
///
/// Matches `^2\.<block>\.([0-9]+)$` with `block` taken literally. Returns
/// `None` for codes of other blocks, other prefixes, non-numeric suffixes
/// and sequences that overflow `u64`.
#[must_use]
pub fn parse_sequence(code: &str, block: &str) -> Option<u64> {
    let digits = code
        .strip_prefix(CODE_PREFIX)?
        .strip_prefix('.')?
        .strip_prefix(block)?
        .strip_prefix('.')?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Compute the next code for `block` from the codes already assigned in it
///
/// Codes that do not match the block's pattern are ignored. With no
/// matching code the sequence starts at 1. Returns `None` once the block's
/// largest sequence is `u64::MAX`.
///
/// `block` must be non-empty; callers reject empty blocks before calling.
#[must_use]
pub fn next_code_for_block<I, S>(existing: I, block: &str) -> Option<NextCode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let max = existing
        .into_iter()
        .filter_map(|code| parse_sequence(code.as_ref(), block))
        .max()
        .unwrap_or(0);

    max.checked_add(1).map(|next| NextCode::new(block, next))
}

/// Code for an item created without a block: `prefix` followed by
/// `ordinal` zero-padded to `width` digits
#[must_use]
pub fn fallback_code(prefix: &str, width: usize, ordinal: usize) -> String {
    format!("{prefix}{ordinal:0width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_based_not_gap_filling() {
        let codes = ["2.1.01.1", "2.1.01.3", "2.1.02.1"];
        assert_eq!(
            next_code_for_block(codes, "1.01"),
            Some(NextCode {
                next: 4,
                code: "2.1.01.4".into()
            })
        );
    }

    #[test]
    fn empty_block_history_starts_at_one() {
        let none: [&str; 0] = [];
        assert_eq!(next_code_for_block(none, "5.07").unwrap().code, "2.5.07.1");
        assert_eq!(next_code_for_block(none, "5.07").unwrap().next, 1);
    }

    #[test]
    fn other_blocks_are_ignored() {
        let codes = ["2.1.02.9", "2.1.01.2"];
        assert_eq!(next_code_for_block(codes, "1.01").unwrap().next, 3);
    }

    #[test]
    fn malformed_codes_are_ignored() {
        let codes = [
            "3.1.01.7",
            "2.1.01.x",
            "2.1.01.",
            "2.1.01.5a",
            "2.1.01.-4",
            "2.1.01.1.2",
            "PL-0009",
            "",
        ];
        assert_eq!(next_code_for_block(codes, "1.01").unwrap().next, 1);
    }

    #[test]
    fn block_is_matched_literally() {
        // '.' in the block must not act as a wildcard
        assert_eq!(parse_sequence("2.1x01.4", "1.01"), None);
        assert_eq!(parse_sequence("2.1.01.4", "1.01"), Some(4));
    }

    #[test]
    fn block_prefix_does_not_leak_into_children() {
        // codes of 1.01 are not codes of 1
        assert_eq!(parse_sequence("2.1.01.4", "1"), None);
        assert_eq!(parse_sequence("2.1.4", "1"), Some(4));
    }

    #[test]
    fn leading_zeros_parse_numerically() {
        assert_eq!(next_code_for_block(["2.3.02.007"], "3.02").unwrap().next, 8);
    }

    #[test]
    fn overflowing_sequence_is_ignored() {
        assert_eq!(parse_sequence("2.1.99999999999999999999999", "1"), None);
    }

    #[test]
    fn exhausted_sequence_yields_none() {
        let top = format!("2.1.{}", u64::MAX);
        assert_eq!(next_code_for_block([top.as_str()], "1"), None);
        let below = format!("2.1.{}", u64::MAX - 1);
        assert_eq!(next_code_for_block([below.as_str()], "1").unwrap().next, u64::MAX);
    }

    #[test]
    fn fallback_code_is_zero_padded() {
        assert_eq!(fallback_code("PL-", 4, 7), "PL-0007");
        assert_eq!(fallback_code("PL-", 4, 12345), "PL-12345");
    }
}
