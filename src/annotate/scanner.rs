use super::Segment;

pub(crate) const PARAGRAPH_SEPARATOR: &str = "\n\n";
const BOLD_MARKER: &str = "**";
const URL_SCHEMES: [&str; 2] = ["https://", "http://"];

/// Scans one plain-text run (text outside card fences) into segments.
///
/// Paragraphs split on a blank line and are separated by
/// [`Segment::LineBreak`]. Inside a paragraph `**bold**` runs are found left
/// to right without nesting; links are recognized both inside and outside
/// bold runs. An opening marker with no close on the same line is kept as
/// literal text.
pub fn scan_run(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    for (index, paragraph) in text.split(PARAGRAPH_SEPARATOR).enumerate() {
        if index > 0 {
            out.push(Segment::LineBreak);
        }
        scan_paragraph(paragraph, &mut out);
    }
    out
}

fn scan_paragraph(paragraph: &str, out: &mut Vec<Segment>) {
    let mut plain_from = 0;
    let mut pos = 0;

    while let Some(offset) = paragraph[pos..].find(BOLD_MARKER) {
        let open = pos + offset;
        let inner_start = open + BOLD_MARKER.len();
        match closing_marker(&paragraph[inner_start..]) {
            Some(len) => {
                scan_links(&paragraph[plain_from..open], out);
                let mut children = Vec::new();
                scan_links(&paragraph[inner_start..inner_start + len], &mut children);
                out.push(Segment::Bold(children));
                pos = inner_start + len + BOLD_MARKER.len();
                plain_from = pos;
            }
            // The first '*' is literal; a match may still start on the second.
            None => pos = open + 1,
        }
    }
    scan_links(&paragraph[plain_from..], out);
}

/// Characters that end a line for bold matching.
const LINE_TERMINATORS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

/// Length of the bold body before the nearest closing marker on this line.
fn closing_marker(rest: &str) -> Option<usize> {
    let line = rest.split(LINE_TERMINATORS).next().unwrap_or(rest);
    line.find(BOLD_MARKER)
}

fn scan_links(text: &str, out: &mut Vec<Segment>) {
    let mut plain_from = 0;
    let mut pos = 0;

    while let Some((start, end)) = next_url(text, pos) {
        push_text(out, &text[plain_from..start]);
        out.push(Segment::Link(text[start..end].to_string()));
        plain_from = end;
        pos = end;
    }
    push_text(out, &text[plain_from..]);
}

/// Byte range of the next `http(s)://` URL at or after `from`. The URL runs
/// greedily up to whitespace and needs at least one character past the scheme.
fn next_url(text: &str, from: usize) -> Option<(usize, usize)> {
    let mut pos = from;
    loop {
        let start = pos + text[pos..].find("http")?;
        let rest = &text[start..];
        let scheme = URL_SCHEMES.iter().find(|scheme| rest.starts_with(*scheme));
        if let Some(scheme) = scheme {
            let tail = &rest[scheme.len()..];
            let len = tail.find(char::is_whitespace).unwrap_or(tail.len());
            if len > 0 {
                return Some((start, start + scheme.len() + len));
            }
        }
        pos = start + "http".len();
    }
}

fn push_text(out: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::PlainText(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Segment::PlainText(text.to_string()));
    }
}
