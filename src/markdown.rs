use std::collections::HashMap;

use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd,
};

use crate::highlight::highlight_code;

const URL_PREFIXES: [&str; 3] = ["https://", "http://", "www."];

/// Converts one document's Markdown into an HTML fragment.
///
/// Soft breaks become `<br />`, bare URLs become links, headings get slug ids and fenced
/// code blocks go through the highlighter.
pub fn render_document(markdown: &str) -> String {
    let markdown_options = Options::empty()
        | Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;

    let events = rewrite_events(coalesce_text(Parser::new_ext(markdown, markdown_options)));
    let mut html_content = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_content, events.into_iter());
    html_content
}

/// Joins runs of adjacent text events and turns soft breaks into hard ones.
fn coalesce_text<'a>(parser: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut events: Vec<Event<'a>> = Vec::new();

    for event in parser {
        match event {
            Event::Text(text) => match events.last_mut() {
                Some(Event::Text(previous)) => {
                    *previous = CowStr::from(format!("{}{}", &**previous, &*text));
                }
                _ => events.push(Event::Text(text)),
            },
            Event::SoftBreak => events.push(Event::HardBreak),
            event => events.push(event),
        }
    }

    events
}

fn generate_slug(text: &str) -> String {
    text.to_lowercase()
        .chars()
        // Keep only alphanumeric characters and spaces
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .replace(' ', "-")
}

/// Suffixes `-1`, `-2`, ... until the slug is unused, then records it.
fn unique_slug(seen: &mut HashMap<String, usize>, slug: String) -> String {
    let Some(&next) = seen.get(&slug) else {
        seen.insert(slug.clone(), 1);
        return slug;
    };

    let mut suffix = next;
    let mut candidate = format!("{slug}-{suffix}");
    while seen.contains_key(&candidate) {
        suffix += 1;
        candidate = format!("{slug}-{suffix}");
    }

    seen.insert(slug, suffix + 1);
    seen.insert(candidate.clone(), 1);
    candidate
}

/// Depth change for an inline raw-HTML anchor tag: `+1` for `<a ...>`, `-1` for `</a>`.
fn anchor_depth_change(html: &str) -> isize {
    let tag = html.trim_start().to_ascii_lowercase();
    let (opening, name) = match tag.strip_prefix("</") {
        Some(rest) => (false, rest),
        None => match tag.strip_prefix('<') {
            Some(rest) => (true, rest),
            None => return 0,
        },
    };

    let is_anchor = name
        .strip_prefix('a')
        .and_then(|rest| rest.chars().next())
        .is_some_and(|next| next == '>' || next.is_whitespace() || (opening && next == '/'));

    match (is_anchor, opening) {
        (false, _) => 0,
        // `<a ... />` opens nothing.
        (true, true) if tag.trim_end().ends_with("/>") => 0,
        (true, true) => 1,
        (true, false) => -1,
    }
}

fn rewrite_events<'a>(events: Vec<Event<'a>>) -> Vec<Event<'a>> {
    enum ParserState<'a> {
        Normal,
        InHeading {
            original_tag: Tag<'a>,
            text_content: String,
            nested_events: Vec<Event<'a>>,
        },
        InCodeBlock {
            language: Option<String>,
            code: String,
        },
    }

    let mut state = ParserState::Normal;
    let mut link_depth = 0usize;
    let mut code_depth = 0usize;
    let mut slugs = HashMap::new();

    let mut all_events = Vec::with_capacity(events.len());
    for event in events {
        state = match (event, state) {
            (Event::Start(original_tag @ Tag::Heading { .. }), ParserState::Normal) => {
                ParserState::InHeading {
                    original_tag,
                    text_content: String::new(),
                    nested_events: Vec::new(),
                }
            }
            (Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))), ParserState::Normal) => {
                ParserState::InCodeBlock {
                    language: info.split_whitespace().next().map(str::to_lowercase),
                    code: String::new(),
                }
            }
            (Event::Text(text), ParserState::InCodeBlock { language, mut code }) => {
                code.push_str(&text);
                ParserState::InCodeBlock { language, code }
            }
            (Event::End(TagEnd::CodeBlock), ParserState::InCodeBlock { language, code }) => {
                all_events.push(Event::Html(CowStr::from(highlight_code(
                    &code,
                    language.as_deref(),
                ))));
                ParserState::Normal
            }
            (_, state @ ParserState::InCodeBlock { .. }) => state,
            (
                event @ (Event::Text(_) | Event::Code(_)),
                ParserState::InHeading {
                    mut text_content,
                    mut nested_events,
                    original_tag,
                },
            ) => {
                if let Event::Text(text) | Event::Code(text) = &event {
                    text_content.push_str(text);
                }
                nested_events.push(event);
                ParserState::InHeading {
                    text_content,
                    nested_events,
                    original_tag,
                }
            }
            (
                event @ Event::End(TagEnd::Heading(_)),
                ParserState::InHeading {
                    original_tag:
                        Tag::Heading {
                            level,
                            id,
                            classes,
                            attrs,
                        },
                    text_content,
                    nested_events,
                },
            ) => {
                let id = match id {
                    Some(explicit) => {
                        slugs.entry(explicit.to_string()).or_insert(1);
                        Some(explicit)
                    }
                    None => Some(generate_slug(&text_content))
                        .filter(|slug| !slug.is_empty())
                        .map(|slug| CowStr::from(unique_slug(&mut slugs, slug))),
                };
                all_events.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
                all_events.extend(nested_events);
                all_events.push(event);
                ParserState::Normal
            }
            (
                event,
                ParserState::InHeading {
                    mut nested_events,
                    original_tag,
                    text_content,
                },
            ) => {
                nested_events.push(event);
                ParserState::InHeading {
                    original_tag,
                    text_content,
                    nested_events,
                }
            }
            (Event::Text(text), ParserState::Normal) if link_depth == 0 && code_depth == 0 => {
                all_events.extend(linkify(text));
                ParserState::Normal
            }
            (event, ParserState::Normal) => {
                match &event {
                    Event::Start(Tag::Link { .. } | Tag::Image { .. }) => link_depth += 1,
                    Event::End(TagEnd::Link | TagEnd::Image) => {
                        link_depth = link_depth.saturating_sub(1)
                    }
                    // Indented blocks; fenced ones are captured above.
                    Event::Start(Tag::CodeBlock(_)) => code_depth += 1,
                    Event::End(TagEnd::CodeBlock) => code_depth = code_depth.saturating_sub(1),
                    Event::InlineHtml(html) => {
                        link_depth = link_depth.saturating_add_signed(anchor_depth_change(html))
                    }
                    _ => {}
                }
                all_events.push(event);
                ParserState::Normal
            }
        }
    }

    all_events
}

/// Splits a text run into plain text and autolinks for bare URLs.
fn linkify(text: CowStr<'_>) -> Vec<Event<'_>> {
    let mut events = Vec::new();
    let mut plain_start = 0;

    while let Some((start, end)) = next_url(&text, plain_start) {
        if start > plain_start {
            events.push(Event::Text(text[plain_start..start].to_string().into()));
        }

        let url = &text[start..end];
        let dest_url = match url.starts_with("www.") {
            true => format!("http://{url}"),
            false => url.to_string(),
        };
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: dest_url.into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        events.push(Event::Text(url.to_string().into()));
        events.push(Event::End(TagEnd::Link));

        plain_start = end;
    }

    if events.is_empty() {
        return vec![Event::Text(text)];
    }
    if plain_start < text.len() {
        events.push(Event::Text(text[plain_start..].to_string().into()));
    }
    events
}

fn next_url(text: &str, from: usize) -> Option<(usize, usize)> {
    let mut previous = text[..from].chars().next_back();

    for (offset, c) in text[from..].char_indices() {
        let start = from + offset;
        let at_boundary = previous.map_or(true, |p| !p.is_alphanumeric());
        previous = Some(c);
        if !at_boundary {
            continue;
        }

        let tail = &text[start..];
        let Some(prefix) = URL_PREFIXES.iter().find(|prefix| tail.starts_with(**prefix)) else {
            continue;
        };

        let raw_end = tail
            .find(|c: char| c.is_whitespace() || c == '<')
            .unwrap_or(tail.len());
        let url = trim_url(&tail[..raw_end]);
        if url.len() > prefix.len() {
            return Some((start, start + url.len()));
        }
    }

    None
}

fn trim_url(mut url: &str) -> &str {
    while let Some(last) = url.chars().next_back() {
        let unbalanced_paren =
            last == ')' && url.matches(')').count() > url.matches('(').count();
        let punctuation = matches!(
            last,
            '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '"' | '*' | '_' | '~'
        );
        if !(punctuation || unbalanced_paren) {
            break;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
    url
}
