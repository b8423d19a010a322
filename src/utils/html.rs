//! HTML entity escaping for values that cross into markup.

/// Escapes `&`, `<`, `>`, `"` and `'` as HTML entities.
///
/// # Examples
///
/// ```
/// use student_login::utils::html::escape_html;
///
/// assert_eq!(escape_html("<a href=\"x\">"), "&lt;a href=&quot;x&quot;&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }

    out
}
