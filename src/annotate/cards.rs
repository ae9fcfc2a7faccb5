use std::collections::BTreeMap;

use super::{CardKind, Segment};

const FENCE: &str = "```";
const FENCE_LANG: &str = "xml";

/// Child elements of a `<book>` record.
pub const BOOK_FIELDS: &[&str] = &["title", "price", "image", "author", "category"];

/// Child elements of a `<new>` record.
pub const NEWS_FIELDS: &[&str] = &["title", "url", "score", "source", "date"];

/// A typed record found inside an `xml` fence, positioned at the whole fence.
///
/// `end` is exclusive. Records sharing a fence share `start`/`end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredBlock {
    pub kind: CardKind,
    pub fields: BTreeMap<String, String>,
    pub start: usize,
    pub end: usize,
}

impl StructuredBlock {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }

    pub(crate) fn into_segment(self) -> Segment {
        Segment::CardRef {
            kind: self.kind,
            fields: self.fields,
        }
    }
}

/// Locates every `xml` fence in `text` and extracts its book and news records.
///
/// Fences without recognized records contribute nothing. Blocks come back
/// ordered by start offset, records of one fence in their source order.
pub fn extract_blocks(text: &str) -> Vec<StructuredBlock> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some((start, body, end)) = next_fence(text, pos) {
        let before = blocks.len();
        for (kind, inner) in records(body) {
            blocks.push(StructuredBlock {
                kind,
                fields: read_fields(kind, inner),
                start,
                end,
            });
        }
        if blocks.len() == before {
            log::trace!("xml fence at {start}..{end} holds no book or news records");
        }
        pos = end;
    }

    // Fences are found left to right already; the stable sort keeps record order.
    blocks.sort_by_key(|block| block.start);
    blocks
}

/// Returns `(fence_start, body, fence_end)` of the next complete `xml` fence.
fn next_fence(text: &str, from: usize) -> Option<(usize, &str, usize)> {
    let mut search = from;
    loop {
        let open = search + text[search..].find(FENCE)?;
        let after_ticks = open + FENCE.len();
        let rest = &text[after_ticks..];
        let tagged = rest
            .strip_prefix(FENCE_LANG)
            .is_some_and(|tail| tail.chars().next().map_or(true, char::is_whitespace));
        if !tagged {
            search = after_ticks;
            continue;
        }
        let body_start = after_ticks + FENCE_LANG.len();
        let close = body_start + text[body_start..].find(FENCE)?;
        return Some((open, &text[body_start..close], close + FENCE.len()));
    }
}

/// Book and news records of a fence body in source order.
fn records(body: &str) -> Vec<(CardKind, &str)> {
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(offset) = body[pos..].find('<') {
        let at = pos + offset;
        let rest = &body[at..];
        let kind = [CardKind::Book, CardKind::News]
            .into_iter()
            .find(|kind| rest.starts_with(&open_tag(kind.tag())));
        let Some(kind) = kind else {
            pos = at + 1;
            continue;
        };
        let inner_start = at + open_tag(kind.tag()).len();
        match element_body(body, inner_start, kind.tag()) {
            Some((inner, next)) => {
                found.push((kind, inner));
                pos = next;
            }
            None => pos = inner_start,
        }
    }
    found
}

/// Text between `from` and the closing tag, plus the offset after the close.
fn element_body<'a>(source: &'a str, from: usize, tag: &str) -> Option<(&'a str, usize)> {
    let close = close_tag(tag);
    let end = from + source[from..].find(&close)?;
    Some((&source[from..end], end + close.len()))
}

fn read_fields(kind: CardKind, inner: &str) -> BTreeMap<String, String> {
    kind.fields()
        .iter()
        .map(|name| {
            let value = inner
                .find(&open_tag(name))
                .and_then(|at| element_body(inner, at + open_tag(name).len(), name))
                .map(|(value, _)| decode_entities(value.trim()))
                .unwrap_or_default();
            (name.to_string(), value)
        })
        .collect()
}

fn open_tag(name: &str) -> String {
    format!("<{name}>")
}

fn close_tag(name: &str) -> String {
    format!("</{name}>")
}

fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
