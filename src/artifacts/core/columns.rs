//! Column alignment for rendered rows
//!
//! Rows arrive as one string per column, possibly carrying ANSI color
//! sequences. Alignment pads every column to the widest visible cell of
//! that column, drops columns that are blank in every row and trims the
//! trailing padding of each line.

use unicode_width::UnicodeWidthChar;

const ESCAPE: char = '\x1b';

/// Visible width of `text` in terminal cells, ignoring ANSI escape sequences
pub fn display_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c == ESCAPE {
            // CSI sequences end with a byte in '@'..='~'
            if chars.next() == Some('[') {
                for terminator in chars.by_ref() {
                    if ('@'..='~').contains(&terminator) {
                        break;
                    }
                }
            }
            continue;
        }
        width += c.width().unwrap_or(0);
    }

    width
}

/// Join each row's columns into a single line with aligned columns
pub fn align_columns(rows: &[Vec<String>]) -> Vec<String> {
    let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths = (0..column_count)
        .map(|column| {
            rows.iter()
                .filter_map(|row| row.get(column))
                .map(|cell| display_width(cell))
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (column, width) in widths.iter().enumerate() {
                if *width == 0 {
                    continue;
                }
                if !line.is_empty() {
                    line.push(' ');
                }

                let cell = row.get(column).map(String::as_str).unwrap_or_default();
                line.push_str(cell);
                line.push_str(&" ".repeat(width - display_width(cell)));
            }
            line.trim_end().to_string()
        })
        .collect()
}
