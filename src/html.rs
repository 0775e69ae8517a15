use rocket::http::RawStr;

pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Percent-encodes each segment of a relative path, leaving the `/` separators intact.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| RawStr::new(segment).percent_encode().as_str().to_owned())
        .collect::<Vec<_>>()
        .join("/")
}
