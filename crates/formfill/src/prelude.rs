pub use crate::error::Error;

pub use anstream::eprintln;
pub use anstream::println;
pub use color_eyre::eyre::{eyre, Context, Result};
pub use std::format as f;

pub fn new_table() -> prettytable::Table {
    let mut table = prettytable::Table::new();

    let format = prettytable::format::FormatBuilder::new()
        .padding(1, 1)
        .build();

    table.set_format(format);

    table
}

/// Single-line preview of a region text, cut at `width` characters.
pub fn preview(text: &str, width: usize) -> String {
    let flat = text.replace(['\n', '\t'], " ");
    if flat.chars().count() <= width {
        return flat;
    }
    let mut cut: String = flat.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_untouched() {
        assert_eq!(preview("Full Name: ____", 40), "Full Name: ____");
    }

    #[test]
    fn test_preview_flattens_and_cuts() {
        assert_eq!(preview("a\tb\nc", 10), "a b c");
        assert_eq!(preview("abcdefghij", 5), "abcd…");
    }
}
