//! Reply annotation: turns raw assistant text into renderable segments.
//!
//! Precedence is fences > bold > links. Fenced `xml` blocks describing books
//! and news items are located first by [`extract_blocks`]; the plain text
//! around them is handed to the scanner, which splits paragraphs and picks
//! out `**bold**` runs and `http(s)` links.

mod cards;
mod scanner;

use std::collections::BTreeMap;
use std::fmt;

pub use cards::{extract_blocks, StructuredBlock, BOOK_FIELDS, NEWS_FIELDS};
pub use scanner::scan_run;

/// Kind of structured card embedded in a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    /// A `<book>` record
    Book,
    /// A `<new>` record (news headline)
    News,
}

impl CardKind {
    /// Element name used for this record inside a fence.
    pub fn tag(&self) -> &'static str {
        match self {
            CardKind::Book => "book",
            CardKind::News => "new",
        }
    }

    /// Child elements read for this record kind.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            CardKind::Book => BOOK_FIELDS,
            CardKind::News => NEWS_FIELDS,
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardKind::Book => "book",
            CardKind::News => "news",
        };
        write!(f, "{name}")
    }
}

/// One unit of a message's renderable content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text
    PlainText(String),
    /// Emphasised run; children are plain text and links only
    Bold(Vec<Segment>),
    /// An http/https URL
    Link(String),
    /// Paragraph separator
    LineBreak,
    /// A book or news card spliced in where its fence stood
    CardRef {
        kind: CardKind,
        fields: BTreeMap<String, String>,
    },
}

impl Segment {
    pub fn text(content: impl Into<String>) -> Self {
        Segment::PlainText(content.into())
    }

    pub fn link(url: impl Into<String>) -> Self {
        Segment::Link(url.into())
    }

    /// Field of a card segment; `None` for other segments.
    pub fn card_field(&self, name: &str) -> Option<&str> {
        match self {
            Segment::CardRef { fields, .. } => fields.get(name).map(String::as_str),
            _ => None,
        }
    }

    fn write_visible(&self, out: &mut String) {
        match self {
            Segment::PlainText(text) => out.push_str(text),
            Segment::Bold(children) => children.iter().for_each(|c| c.write_visible(out)),
            Segment::Link(url) => out.push_str(url),
            Segment::LineBreak => out.push_str(scanner::PARAGRAPH_SEPARATOR),
            Segment::CardRef { .. } => {}
        }
    }
}

/// Renders reply text into segments: cards at their fence positions, the
/// text between them scanned for paragraphs, bold and links.
///
/// Several records in one fence share a span; all of them are emitted in
/// record order and the fence text is consumed once. A block starting before
/// the end of text already consumed still yields its card but consumes
/// nothing.
pub fn render(text: &str) -> Vec<Segment> {
    let blocks = extract_blocks(text);
    let mut segments = Vec::new();
    let mut cursor = 0;

    for block in blocks {
        if block.start >= cursor {
            segments.extend(scan_run(&text[cursor..block.start]));
            cursor = block.end;
        } else if block.end > cursor {
            log::debug!(
                "card block {}..{} overlaps consumed text ending at {cursor}",
                block.start,
                block.end
            );
        }
        segments.push(block.into_segment());
    }
    segments.extend(scan_run(&text[cursor..]));
    segments
}

/// Visible text of a segment sequence: markup stripped, links shown as their
/// URL, paragraph breaks restored and cards omitted.
pub fn plain_text(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        segment.write_visible(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK_REPLY: &str = "Here you go:\n\n```xml\n<book>\n  <title>Dune</title>\n  <price>$10</price>\n</book>\n```\n\nEnjoy **reading**!";

    #[test]
    fn splices_cards_between_text_runs() {
        let segments = render(BOOK_REPLY);
        assert_eq!(segments[0], Segment::text("Here you go:"));
        assert_eq!(segments[1], Segment::LineBreak);
        assert!(matches!(
            segments[2],
            Segment::CardRef {
                kind: CardKind::Book,
                ..
            }
        ));
        assert_eq!(segments[2].card_field("title"), Some("Dune"));
        assert_eq!(segments[2].card_field("author"), Some(""));
        assert_eq!(
            &segments[3..],
            &[
                Segment::LineBreak,
                Segment::text("Enjoy "),
                Segment::Bold(vec![Segment::text("reading")]),
                Segment::text("!"),
            ]
        );
    }

    #[test]
    fn fence_with_many_records_is_consumed_once() {
        let text = "a```xml\n<book><title>One</title></book><new><title>Two</title></new>\n```b";
        let segments = render(text);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], Segment::text("a"));
        assert_eq!(segments[1].card_field("title"), Some("One"));
        assert_eq!(segments[2].card_field("title"), Some("Two"));
        assert_eq!(segments[3], Segment::text("b"));
    }

    #[test]
    fn fence_without_records_stays_as_text() {
        let text = "```xml\n<other/>\n```";
        assert_eq!(render(text), vec![Segment::text(text)]);
    }

    #[test]
    fn plain_text_drops_cards_and_markup() {
        let visible = plain_text(&render(BOOK_REPLY));
        assert_eq!(visible, "Here you go:\n\n\n\nEnjoy reading!");
    }

    #[test]
    fn empty_text_renders_nothing() {
        assert!(render("").is_empty());
    }
}
