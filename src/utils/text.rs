use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate text to a display width, appending an ellipsis when cut
///
/// # Examples
/// ```
/// use pbi_client::utils::text::truncate_text;
/// assert_eq!(truncate_text("Hello World!", 8), "Hello...");
/// ```
pub fn truncate_text(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    const ELLIPSIS: &str = "...";
    let ellipsis_width = ELLIPSIS.width();

    if max_width <= ellipsis_width {
        return ELLIPSIS[..max_width].to_string();
    }

    let target_width = max_width - ellipsis_width;
    let mut result = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }

    result.push_str(ELLIPSIS);
    result
}

/// Strip the bracket decoration DAX puts on result column names
///
/// `Table[Column]` becomes `Table.Column` and `[Column]` becomes `Column`.
///
/// # Examples
/// ```
/// use pbi_client::utils::text::strip_column_brackets;
/// assert_eq!(strip_column_brackets("Sales[Amount]"), "Sales.Amount");
/// assert_eq!(strip_column_brackets("[Name]"), "Name");
/// ```
pub fn strip_column_brackets(name: &str) -> String {
    let mut result = String::with_capacity(name.len());

    for (index, ch) in name.char_indices() {
        match ch {
            '[' if index > 0 && !result.ends_with('.') => result.push('.'),
            '[' | ']' => {}
            _ => result.push(ch),
        }
    }

    result
}
