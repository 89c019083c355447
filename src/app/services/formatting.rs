use std::ops::Range;

/// Toolbar actions that rewrite the selected span of a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTool {
    Bold,
    Italic,
    Underline,
    BulletItem,
    NumberedItem,
    HorizontalRule,
}

const TABLE_BORDER: &str = "+----------";
const TABLE_CELL: &str = "|   Head   ";

/// Convert a char offset into a byte offset, clamped to the end of `text`.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Apply `tool` to the selection (char offsets, end exclusive) and return the new text.
///
/// An inverted selection is treated as empty at its start.
pub fn apply_tool(text: &str, selection: Range<usize>, tool: FormatTool) -> String {
    let start = byte_offset(text, selection.start);
    let end = byte_offset(text, selection.end).max(start);
    let (before, selected, after) = (&text[..start], &text[start..end], &text[end..]);

    let replacement = match tool {
        FormatTool::Bold => format!("**{}**", selected),
        FormatTool::Italic => format!("*{}*", selected),
        FormatTool::Underline => format!("__{}__", selected),
        FormatTool::BulletItem => format!("\n- {}", selected),
        FormatTool::NumberedItem => format!("\n1. {}", selected),
        // The rule replaces the selection rather than wrapping it.
        FormatTool::HorizontalRule => "\n---\n".to_string(),
    };

    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(before);
    out.push_str(&replacement);
    out.push_str(after);
    out
}

/// Build an ASCII table with `rows` body rows and `cols` columns, starting on a new line.
pub fn table_markup(rows: usize, cols: usize) -> String {
    let cols = cols.max(1);
    let border = format!("{}+\n", TABLE_BORDER.repeat(cols));
    let cells = format!("{}|\n", TABLE_CELL.repeat(cols));

    let mut table = String::from("\n");
    table.push_str(&border);
    for _ in 0..rows {
        table.push_str(&cells);
        table.push_str(&border);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_selection() {
        assert_eq!(apply_tool("make this bold", 5..9, FormatTool::Bold), "make **this** bold");
        assert_eq!(apply_tool("abc", 1..2, FormatTool::Italic), "a*b*c");
        assert_eq!(apply_tool("abc", 0..3, FormatTool::Underline), "__abc__");
    }

    #[test]
    fn test_empty_selection_inserts_delimiters() {
        assert_eq!(apply_tool("ab", 1..1, FormatTool::Bold), "a****b");
    }

    #[test]
    fn test_list_items() {
        assert_eq!(apply_tool("Intro item", 6..10, FormatTool::BulletItem), "Intro \n- item");
        assert_eq!(apply_tool("x", 1..1, FormatTool::NumberedItem), "x\n1. ");
    }

    #[test]
    fn test_rule_replaces_selection() {
        assert_eq!(apply_tool("a-gone-b", 1..7, FormatTool::HorizontalRule), "a\n---\nb");
    }

    #[test]
    fn test_selection_is_char_based() {
        assert_eq!(apply_tool("héllo wörld", 6..11, FormatTool::Bold), "héllo **wörld**");
    }

    #[test]
    fn test_out_of_range_selection_is_clamped() {
        assert_eq!(apply_tool("abc", 2..99, FormatTool::Bold), "ab**c**");
        assert_eq!(apply_tool("abc", 2..1, FormatTool::Italic), "ab**c");
    }

    #[test]
    fn test_table_markup() {
        let table = table_markup(1, 2);
        assert_eq!(
            table,
            "\n+----------+----------+\n|   Head   |   Head   |\n+----------+----------+\n"
        );
    }

    #[test]
    fn test_table_lines_are_table_like() {
        for line in table_markup(2, 3).lines().filter(|l| !l.is_empty()) {
            assert!(line.starts_with('+') || line.starts_with('|'));
        }
    }
}
