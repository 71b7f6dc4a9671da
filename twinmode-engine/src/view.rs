//! Home page rendering.

use axum::http::StatusCode;

use crate::www::WwwResponse;

/// Renders the home page form, showing `output` (escaped) when present.
pub fn home_page_view(output: Option<&str>) -> WwwResponse {
    let value = output.map(escape_html).unwrap_or_default();
    let body = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>ROT-13 Transformer</title>
</head>
<body>
  <form method="post" action="/">
    <label for="text">Text</label>
    <input type="text" id="text" name="text" value="{value}" required autofocus>
    <input type="submit" value="Transform">
  </form>
</body>
</html>
"#
    );
    WwwResponse::html(StatusCode::OK, body)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
