//! HTML export: a fixed, self-contained page with embedded style.

/// Escape the characters that would otherwise be parsed as markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render `title` and `text` into a complete HTML document.
///
/// Newlines in `text` become `<br>` so paragraph breaks survive.
pub fn render_html(title: &str, text: &str) -> String {
    let body = escape_html(text).replace('\n', "<br>\n");
    format!(
        r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="utf-8">
        <title>{title}</title>
        <style>
            body {{
                font-family: Arial, sans-serif;
                margin: 40px;
                line-height: 1.6;
            }}
            h1 {{
                color: #2c3e50;
                font-size: 24px;
                margin-bottom: 20px;
            }}
            p {{
                margin-bottom: 15px;
            }}
            .section {{
                margin-bottom: 25px;
            }}
        </style>
    </head>
    <body>
        <h1>{title}</h1>
        <div class="content">
            {body}
        </div>
    </body>
</html>
"#,
        title = escape_html(title),
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("a < b && c > \"d\""), "a &lt; b &amp;&amp; c &gt; &quot;d&quot;");
    }

    #[test]
    fn renders_title_and_breaks() {
        let html = render_html("Soil <Health>", "Line one\nLine two\n\nPara two");
        assert!(html.contains("<h1>Soil &lt;Health&gt;</h1>"));
        assert!(html.contains("Line one<br>\nLine two<br>\n<br>\nPara two"));
        assert!(html.contains("font-family: Arial, sans-serif;"));
        assert!(html.contains("color: #2c3e50;"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn keeps_unicode() {
        let html = render_html("शीर्षक", "नमस्ते");
        assert!(html.contains("<meta charset=\"utf-8\">"));
        assert!(html.contains("नमस्ते"));
    }
}
