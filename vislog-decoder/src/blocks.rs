//! Block segmentation of raw uploads
//!
//! Uploads are blank-line-delimited: two consecutive line breaks separate
//! blocks. Before splitting, an optional dropped-lines marker inserted by
//! the firmware's truncation safeguard is captured and removed.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Marker the firmware inserts when its upload buffer overflowed and CSV
/// lines had to be discarded. Always preceded by a blank line.
static DROPPED_LINES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\n(\d+) lines have been dropped from the following table\.")
        .expect("invalid dropped-lines pattern")
});

/// Ordered sequence of text blocks split from one upload
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSequence {
    /// Blocks in upload order; empty blocks from the split are preserved
    pub blocks: Vec<String>,
    /// Count captured from the dropped-lines marker, if present
    pub dropped_lines: Option<u64>,
}

impl BlockSequence {
    /// Block at `index`, or `None` past the end
    pub fn get(&self, index: usize) -> Option<&str> {
        self.blocks.get(index).map(String::as_str)
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True for an empty upload
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Split a raw upload into blocks
///
/// Never fails: an empty upload yields zero blocks, anything else at least
/// one. The dropped-lines marker (including its leading blank-line
/// separator) is removed from the text before splitting.
pub fn split_blocks(raw: &str) -> BlockSequence {
    let mut dropped_lines = None;
    let mut text = Cow::Borrowed(raw);

    if let Some(caps) = DROPPED_LINES_RE.captures(raw) {
        if let (Some(whole), Some(count)) = (caps.get(0), caps.get(1)) {
            dropped_lines = count.as_str().parse::<u64>().ok();
            let mut stripped = String::with_capacity(raw.len() - whole.len());
            stripped.push_str(&raw[..whole.start()]);
            stripped.push_str(&raw[whole.end()..]);
            text = Cow::Owned(stripped);
            log::debug!("dropped-lines marker found: {:?} lines", dropped_lines);
        }
    }

    if text.is_empty() {
        return BlockSequence {
            blocks: Vec::new(),
            dropped_lines,
        };
    }

    let blocks = text.split("\n\n").map(str::to_string).collect();
    BlockSequence {
        blocks,
        dropped_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_upload_yields_zero_blocks() {
        let seq = split_blocks("");
        assert!(seq.is_empty());
        assert_eq!(seq.dropped_lines, None);
    }

    #[test]
    fn test_single_block() {
        let seq = split_blocks("just one block\nwith two lines");
        assert_eq!(seq.blocks, vec!["just one block\nwith two lines"]);
        assert_eq!(seq.dropped_lines, None);
    }

    #[test]
    fn test_many_blocks_preserve_empties() {
        let seq = split_blocks("a\n\n\n\nb");
        // "a", "", "b" - the empty block between the delimiters survives
        assert_eq!(seq.blocks, vec!["a", "", "b"]);
    }

    #[test]
    fn test_dropped_lines_marker_is_captured_and_removed() {
        let raw = "{}\n\nlog text\n\n42 lines have been dropped from the following table.\n\nmillis,power\n0,100";
        let seq = split_blocks(raw);
        assert_eq!(seq.dropped_lines, Some(42));
        // Marker and its leading blank line are gone; the table keeps its
        // own block position
        assert_eq!(seq.blocks, vec!["{}", "log text", "millis,power\n0,100"]);
    }

    #[test]
    fn test_marker_without_leading_blank_line_is_kept() {
        let raw = "log\n7 lines have been dropped from the following table.";
        let seq = split_blocks(raw);
        assert_eq!(seq.dropped_lines, None);
        assert_eq!(seq.blocks.len(), 1);
    }

    #[test]
    fn test_blocks_are_not_deduplicated() {
        let seq = split_blocks("same\n\nsame\n\nsame");
        assert_eq!(seq.len(), 3);
    }
}
