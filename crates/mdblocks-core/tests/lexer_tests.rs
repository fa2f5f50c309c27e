//! Tests for the quote-aware line iterator.

use mdblocks_core::lexer::{find_line_end, lines, LineInfo};
use pretty_assertions::assert_eq;

fn texts(input: &str, quote_depth: usize) -> Vec<&str> {
    lines(input, 0, input.len(), quote_depth)
        .map(|line| line.text(input))
        .collect()
}

#[test]
fn test_plain_lines() {
    assert_eq!(texts("a\nb\n\nc", 0), ["a", "b", "", "c"]);
}

#[test]
fn test_trailing_newline_does_not_add_a_line() {
    assert_eq!(texts("a\nb\n", 0), ["a", "b"]);
}

#[test]
fn test_empty_region() {
    assert_eq!(lines("abc", 3, 3, 0).count(), 0);
    assert_eq!(lines("", 0, 0, 0).count(), 0);
}

#[test]
fn test_line_terminators() {
    assert_eq!(texts("a\r\nb\rc\nd", 0), ["a", "b", "c", "d"]);
}

#[test]
fn test_descriptor_offsets() {
    let input = "  ab\r\ncd";
    let first = lines(input, 0, input.len(), 0).next().unwrap();
    assert_eq!(
        first,
        LineInfo {
            start_of_line: 0,
            first_non_whitespace: 2,
            end_of_line: 4,
            start_of_next_line: 6,
        }
    );
    assert!(!first.is_blank());
    assert_eq!(first.content(input), "ab");
    assert_eq!(first.first_byte(input), Some(b'a'));
}

#[test]
fn test_blank_lines() {
    let input = " \t\nx";
    let first = lines(input, 0, input.len(), 0).next().unwrap();
    assert!(first.is_blank());
    assert_eq!(first.first_byte(input), None);
}

#[test]
fn test_region_end_cuts_the_last_line() {
    let input = "abc\ndef";
    let all: Vec<_> = lines(input, 0, 6, 0).collect();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].text(input), "de");
    assert_eq!(all[1].start_of_next_line, 6);
}

#[test]
fn test_quote_markers_are_stripped() {
    assert_eq!(texts("> a\n>b\n  > c", 1), ["a", "b", "c"]);
}

#[test]
fn test_only_one_space_after_marker_is_stripped() {
    assert_eq!(texts(">   a", 1), ["  a"]);
}

#[test]
fn test_nested_quote_markers() {
    assert_eq!(texts("> > a\n>> b", 2), ["a", "b"]);
}

#[test]
fn test_deeper_markers_are_left_in_place() {
    assert_eq!(texts("> > a", 1), ["> a"]);
}

#[test]
fn test_blank_line_inside_quote() {
    assert_eq!(texts("> a\n>\n> b", 1), ["a", "", "b"]);
}

#[test]
fn test_lazy_continuation() {
    assert_eq!(texts("> a\nb\n> c", 1), ["a", "b", "c"]);
}

#[test]
fn test_quote_ends_at_new_paragraph_without_marker() {
    assert_eq!(texts("> a\n\nb\n> c", 1), ["a", ""]);
}

#[test]
fn test_unmarked_blank_line_is_yielded() {
    let input = "> a\n\n> b";
    let all: Vec<_> = lines(input, 0, input.len(), 1).collect();
    assert_eq!(all.len(), 3);
    assert!(all[1].is_blank());
}

#[test]
fn test_first_line_without_marker_ends_immediately() {
    assert_eq!(lines("a\n> b", 0, 5, 1).count(), 0);
}

#[test]
fn test_iterator_is_fused() {
    let input = "> a\n\nb";
    let mut iter = lines(input, 0, input.len(), 1);
    assert!(iter.next().is_some());
    assert!(iter.next().is_some());
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}

#[test]
fn test_offset_tracks_the_next_line() {
    let input = "a\nbc\n";
    let mut iter = lines(input, 0, input.len(), 0);
    assert_eq!(iter.offset(), 0);
    iter.next();
    assert_eq!(iter.offset(), 2);
}

#[test]
fn test_find_line_end() {
    let bytes = b"ab\r\ncd\ref";
    assert_eq!(find_line_end(bytes, 0, bytes.len()), (2, 4));
    assert_eq!(find_line_end(bytes, 4, bytes.len()), (6, 7));
    assert_eq!(find_line_end(bytes, 7, bytes.len()), (9, 9));
    // A CR at the region end is not paired with a LF beyond it.
    assert_eq!(find_line_end(bytes, 0, 3), (2, 3));
}
