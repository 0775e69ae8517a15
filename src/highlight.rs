use std::sync::LazyLock;

use syntect::{
    highlighting::{Theme, ThemeSet},
    html::highlighted_html_for_string,
    parsing::{SyntaxReference, SyntaxSet},
};

use crate::html::escape_html;

const THEME_NAME: &str = "InspiredGitHub";

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Renders a fenced code block as HTML.
///
/// The declared language is tried first, then detection from the first line. Anything that
/// cannot be highlighted comes back as escaped plain text.
pub fn highlight_code(code: &str, language: Option<&str>) -> String {
    let highlighted = THEMES.themes.get(THEME_NAME).and_then(|theme| {
        let syntax = find_syntax(code, language)?;
        highlight_with(code, syntax, theme)
    });

    highlighted.unwrap_or_else(|| plain_code_block(code, language))
}

fn find_syntax(code: &str, language: Option<&str>) -> Option<&'static SyntaxReference> {
    let first_line = code.lines().next().unwrap_or_default();
    language
        .and_then(|token| SYNTAXES.find_syntax_by_token(token))
        .or_else(|| SYNTAXES.find_syntax_by_first_line(first_line))
}

fn highlight_with(code: &str, syntax: &SyntaxReference, theme: &Theme) -> Option<String> {
    match highlighted_html_for_string(code, &SYNTAXES, syntax, theme) {
        Ok(html) => Some(html),
        Err(error) => {
            log::debug!("highlighting as {} failed: {error}", syntax.name);
            None
        }
    }
}

fn plain_code_block(code: &str, language: Option<&str>) -> String {
    match language {
        Some(language) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            escape_html(language),
            escape_html(code)
        ),
        None => format!("<pre><code>{}</code></pre>\n", escape_html(code)),
    }
}
