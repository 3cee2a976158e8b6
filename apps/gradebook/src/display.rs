//! Small text helpers shared by the HTML pages, flash messages and the CLI.

use gradebook_core::Averages;

/// Render an average the way users see it: always with a fractional part
/// (`12.0`, `13.5`, `0.0`).
#[must_use]
pub fn format_average(value: f64) -> String {
    format!("{value:?}")
}

/// Render a triple as `a, b, c`.
#[must_use]
pub fn format_averages(averages: &Averages) -> String {
    averages
        .as_array()
        .iter()
        .map(|v| format_average(*v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape text for inclusion in HTML element content or attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_keep_fraction() {
        assert_eq!(format_average(12.0), "12.0");
        assert_eq!(format_average(13.5), "13.5");
        assert_eq!(format_average(0.0), "0.0");
    }

    #[test]
    fn triple() {
        assert_eq!(
            format_averages(&Averages::new(17.0, 15.5, 0.0)),
            "17.0, 15.5, 0.0"
        );
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain.png"), "plain.png");
    }
}
