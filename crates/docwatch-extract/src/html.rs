//! Markup scanning helpers.
//!
//! Flat patterns (rows, cells, attribute-bearing tags) use `regex`; elements
//! that can nest (tables, result containers) use a manual balanced scan so a
//! table inside a table cell does not truncate the outer element. There is
//! deliberately no DOM here: the portal's markup is unstable and the
//! strategies only need text and cell boundaries.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid script regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid style regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));
static TR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("valid tr regex"));
static TD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td[^>]*>(.*?)</td>").expect("valid td regex"));
static TH_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<th[^>]*>").expect("valid th regex"));
static TD_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td[^>]*>").expect("valid td regex"));
static CONTAINER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<([a-z][a-z0-9]*)\s[^>]*?(?:id|class)\s*=\s*["']([^"']*)["'][^>]*>"#)
        .expect("valid container regex")
});

/// Strips tags, scripts, and styles from a markup fragment and returns the
/// remaining text with whitespace collapsed to single spaces.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let no_scripts = SCRIPT_RE.replace_all(html, " ");
    let no_styles = STYLE_RE.replace_all(&no_scripts, " ");
    let no_tags = TAG_RE.replace_all(&no_styles, " ");
    let decoded = decode_entities(&no_tags);

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decodes the handful of entities the portal actually emits.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Case-insensitive substring search returning the byte offset of the match
/// in the original string. Safe for multi-byte text (the portal mixes
/// Ukrainian and English), unlike searching a lowercased copy and reusing
/// its offsets.
#[must_use]
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let needle_lower = needle.to_lowercase();
    for (i, _) in haystack.char_indices() {
        if starts_with_ci(&haystack[i..], &needle_lower) {
            return Some(i);
        }
    }
    None
}

/// Does `text` start with `needle_lower` (which must be pre-lowercased)?
fn starts_with_ci(text: &str, needle_lower: &str) -> bool {
    let mut needle = needle_lower.chars();
    let mut expected = needle.next();
    for c in text.chars().flat_map(char::to_lowercase) {
        match expected {
            Some(e) if e == c => expected = needle.next(),
            Some(_) => return false,
            None => return true,
        }
    }
    expected.is_none()
}

/// Returns the inner markup of every `<table>` in the document, outermost
/// first, nested tables included as separate entries.
#[must_use]
pub fn table_bodies(html: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut search = 0;
    while let Some(open) = find_tag_open(html, search, "table") {
        if let Some(inner) = balanced_inner(html, open, "table") {
            out.push(inner);
        }
        search = open + "<table".len();
    }
    out
}

/// Returns the inner markup of each `<tr>` in a table fragment.
#[must_use]
pub fn row_bodies(table_html: &str) -> Vec<&str> {
    TR_RE
        .captures_iter(table_html)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// Returns the stripped text of each `<td>` cell in a row fragment,
/// in source order. Empty cells are preserved so callers can filter.
#[must_use]
pub fn data_cells(row_html: &str) -> Vec<String> {
    TD_RE
        .captures_iter(row_html)
        .filter_map(|cap| cap.get(1).map(|m| strip_tags(m.as_str())))
        .collect()
}

/// `true` if the row contains only `<th>` cells (a header row).
#[must_use]
pub fn is_header_row(row_html: &str) -> bool {
    TH_OPEN_RE.is_match(row_html) && !TD_OPEN_RE.is_match(row_html)
}

/// An element picked out by the container heuristics: the attribute value
/// that matched and the element's stripped text.
#[derive(Debug)]
pub struct Container {
    pub marker: String,
    pub text: String,
}

/// Finds elements whose `id` or `class` contains one of `hints`
/// (case-insensitive) and returns their stripped text, in document order.
#[must_use]
pub fn candidate_containers(html: &str, hints: &[&str]) -> Vec<Container> {
    let mut out = Vec::new();
    for cap in CONTAINER_RE.captures_iter(html) {
        let (Some(tag), Some(attr)) = (cap.get(1), cap.get(2)) else {
            continue;
        };
        let attr_lower = attr.as_str().to_lowercase();
        if !hints.iter().any(|h| attr_lower.contains(h)) {
            continue;
        }
        let Some(inner) = balanced_inner(html, cap.get(0).map_or(0, |m| m.start()), tag.as_str())
        else {
            continue;
        };
        out.push(Container {
            marker: attr.as_str().to_string(),
            text: strip_tags(inner),
        });
    }
    out
}

/// Floors `pos` to the nearest char boundary at or before it.
#[must_use]
pub fn floor_char_boundary(s: &str, mut pos: usize) -> usize {
    pos = pos.min(s.len());
    while !s.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Finds the next opening tag `<name` at or after `from`, requiring a
/// whitespace, `>`, or `/` after the name so `<table` does not match
/// `<tablex`.
fn find_tag_open(html: &str, from: usize, name: &str) -> Option<usize> {
    let token = format!("<{name}");
    let mut search = from;
    while let Some(rel) = find_case_insensitive(&html[search..], &token) {
        let pos = search + rel;
        let after = pos + token.len();
        match html[after..].chars().next() {
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => return Some(pos),
            Some(_) => search = after,
            None => return None,
        }
    }
    None
}

/// Given the position of an opening tag, returns the inner markup between
/// it and its matching close tag, tracking nesting depth of the same tag
/// name. Returns `None` for self-closing or unterminated elements.
fn balanced_inner<'a>(html: &'a str, open_pos: usize, name: &str) -> Option<&'a str> {
    let gt = html[open_pos..].find('>').map(|i| open_pos + i)?;
    if html[..gt].ends_with('/') {
        return None;
    }
    let content_start = gt + 1;
    let close_token = format!("</{name}");

    let mut depth = 1usize;
    let mut pos = content_start;
    loop {
        let next_open = find_tag_open(html, pos, name);
        let next_close = find_case_insensitive(&html[pos..], &close_token).map(|i| pos + i);

        match (next_open, next_close) {
            (Some(o), Some(c)) if o < c => {
                depth += 1;
                pos = o + name.len() + 1;
            }
            (_, Some(c)) => {
                depth -= 1;
                if depth == 0 {
                    return Some(&html[content_start..c]);
                }
                pos = c + close_token.len();
            }
            _ => return None,
        }
    }
}
