//! HTML escaping for user-supplied text.

/// Escape the five HTML-significant characters.
///
/// Event titles, entity names and locations come straight from scraped news
/// data and end up inside tooltip and popup markup.
///
/// # Examples
///
/// ```
/// use evkg_core::escape_html;
///
/// assert_eq!(escape_html("AT&T <Inc>"), "AT&amp;T &lt;Inc&gt;");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize `value` as JSON safe to inline inside a `<script>` element.
///
/// `</` is rewritten to `<\/` so a title containing `</script>` cannot
/// terminate the element early. The result is still valid JSON.
pub fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> crate::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}
