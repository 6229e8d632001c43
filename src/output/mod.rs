// Output formatting: match and report tables, feed listings and the
// mitigation confirmation prompt.

pub mod terminal;

/// Fit `text` into a table column `width` characters wide.
///
/// Mailbox addresses and message ids can be long and may contain
/// multi-byte characters, so this counts chars rather than bytes. Text that
/// overflows keeps its head and ends in `~` so the column edge still lines
/// up.
pub fn fit_column(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if text.chars().nth(width).is_none() {
        return text.to_string();
    }
    let mut fitted: String = text.chars().take(width - 1).collect();
    fitted.push('~');
    fitted
}
