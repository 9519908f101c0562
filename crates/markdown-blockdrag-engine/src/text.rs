//! Line geometry over plain text.
//!
//! Lines are 1-based, offsets are 0-based byte offsets. A text ending in a
//! newline has a final empty line, the way editors number them.

use std::ops::Range;

use crate::error::{DragError, Result};

/// Start offsets of every line in a text.
#[derive(Debug, Clone, PartialEq)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            starts,
            len: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    pub fn text_len(&self) -> usize {
        self.len
    }

    /// Line containing `offset`. The end of the text belongs to the last line.
    pub fn line_of(&self, offset: usize) -> Result<usize> {
        if offset > self.len {
            return Err(DragError::GeometryOutOfRange {
                offset,
                len: self.len,
            });
        }
        Ok(self.starts.partition_point(|&start| start <= offset))
    }

    pub fn contains_line(&self, line: usize) -> bool {
        line >= 1 && line <= self.starts.len()
    }

    pub fn line_start(&self, line: usize) -> Result<usize> {
        self.check_line(line)?;
        Ok(self.starts[line - 1])
    }

    /// Byte range of a line without its terminator (`\n` or `\r\n`).
    pub fn line_range(&self, text: &str, line: usize) -> Result<Range<usize>> {
        self.check_line(line)?;
        let start = self.starts[line - 1];
        let mut end = self.starts.get(line).map_or(self.len, |next| next - 1);
        if end > start && text.as_bytes().get(end - 1) == Some(&b'\r') {
            end -= 1;
        }
        Ok(start..end)
    }

    pub fn line_text<'t>(&self, text: &'t str, line: usize) -> Result<&'t str> {
        let range = self.line_range(text, line)?;
        Ok(&text[range])
    }

    fn check_line(&self, line: usize) -> Result<()> {
        if self.contains_line(line) {
            Ok(())
        } else {
            Err(DragError::LineOutOfRange {
                line,
                line_count: self.starts.len(),
            })
        }
    }
}

/// Number of tab characters a line starts with.
pub fn leading_tabs(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b'\t').count()
}

const TRAILING: [char; 4] = [' ', '\t', '\r', '\n'];

/// Move `end` back over trailing whitespace, never past `start`.
///
/// Trailing lines holding nothing but blockquote markers are dropped too: the
/// parser ends a block inside a quote after the next line's `>` prefix.
pub(crate) fn trim_end_offset(text: &str, start: usize, end: usize) -> usize {
    let mut end = start + text[start..end].trim_end_matches(TRAILING).len();
    while let Some(newline) = text[start..end].rfind('\n') {
        let last_line = &text[start + newline + 1..end];
        if !last_line.trim_start_matches([' ', '\t', '>']).is_empty() {
            break;
        }
        end = start + text[start..start + newline].trim_end_matches(TRAILING).len();
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(3, 1)]
    #[case(4, 2)]
    #[case(8, 2)]
    #[case(9, 3)]
    #[case(13, 4)]
    fn test_line_of_offset(#[case] offset: usize, #[case] line: usize) {
        let index = LineIndex::new("- A\n\t- B\n- C\n");
        assert_eq!(index.line_of(offset).unwrap(), line);
    }

    #[test]
    fn test_line_of_offset_past_end_is_out_of_range() {
        let index = LineIndex::new("abc");
        let err = index.line_of(4).unwrap_err();
        assert!(matches!(
            err,
            DragError::GeometryOutOfRange { offset: 4, len: 3 }
        ));
    }

    #[test]
    fn test_line_ranges_exclude_terminators() {
        let text = "one\r\ntwo\nthree";
        let index = LineIndex::new(text);

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_text(text, 1).unwrap(), "one");
        assert_eq!(index.line_text(text, 2).unwrap(), "two");
        assert_eq!(index.line_text(text, 3).unwrap(), "three");
        assert!(index.line_range(text, 4).is_err());
        assert!(index.line_range(text, 0).is_err());
    }

    #[test]
    fn test_trailing_newline_gives_empty_last_line() {
        let text = "- A\n";
        let index = LineIndex::new(text);

        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_range(text, 2).unwrap(), 4..4);
    }

    #[rstest]
    #[case("- item", 0)]
    #[case("\t- nested", 1)]
    #[case("\t\t- deeper", 2)]
    #[case("  - spaces do not count", 0)]
    fn test_leading_tabs(#[case] line: &str, #[case] tabs: usize) {
        assert_eq!(leading_tabs(line), tabs);
    }

    #[test]
    fn test_trim_end_offset() {
        let text = "- A\n\n\n";
        assert_eq!(trim_end_offset(text, 0, text.len()), 3);
        assert_eq!(trim_end_offset(text, 4, text.len()), 4);
    }

    #[rstest]
    #[case("- B\n> ", "- B")]
    #[case("- B\n>\n> > ", "- B")]
    #[case("- B\n>   more\n> ", "- B\n>   more")]
    #[case(">", ">")]
    fn test_trim_end_offset_drops_quote_continuations(#[case] text: &str, #[case] kept: &str) {
        assert_eq!(&text[..trim_end_offset(text, 0, text.len())], kept);
    }
}
