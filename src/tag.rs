//! Defines the [`Tag`] type and the transforms behind tag pages: primary-tag
//! aggregation, the kebab-case route transform and the [`TagMatcher`] that
//! tag templates use to select snippets.

use crate::node::ContentNode;
use serde::{Serialize, Serializer};
use std::fmt;

/// A primary tag together with the route of its tag page.
#[derive(Clone, Debug)]
pub struct Tag {
    /// The raw tag, exactly as it appears in the frontmatter.
    pub name: String,

    /// The tag page route, `/tag/{kebab(name)}/`.
    pub route: String,
}

impl Tag {
    /// Builds the tag for `name`. Returns `None` when the kebab transform
    /// leaves nothing to route on (e.g., a tag made only of punctuation).
    pub fn new(name: &str) -> Option<Tag> {
        let kebab = to_kebab_case(name);
        if kebab.is_empty() {
            return None;
        }
        Some(Tag {
            name: name.to_owned(),
            route: format!("/tag/{}/", kebab),
        })
    }

    /// The matcher that selects snippets whose tags start with this one.
    pub fn matcher(&self) -> TagMatcher {
        TagMatcher::Prefix(self.name.clone())
    }
}

/// Collects the distinct primary tags of `nodes` in order of first
/// occurrence. Nodes without tags are skipped.
pub fn primary_tags<'a, I>(nodes: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a ContentNode>,
{
    nodes.into_iter().fold(Vec::new(), |mut tags, node| {
        if let Some(tag) = node.frontmatter.primary_tag() {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    })
}

/// Selects snippets by their tags string.
///
/// Tag templates historically received a slash-delimited regex string. The
/// matcher keeps that wire form (see its [`fmt::Display`] and [`Serialize`]
/// impls) while giving Rust callers something they can evaluate directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagMatcher {
    /// Matches when the tags string, ignoring leading whitespace, starts with
    /// the tag. Rendered as `/^\s*{tag}/`.
    Prefix(String),

    /// Matches when the tags string contains the needle anywhere. Rendered as
    /// `/{needle}/`.
    Contains(String),
}

impl TagMatcher {
    pub fn matches(&self, tags: &str) -> bool {
        match self {
            TagMatcher::Prefix(tag) => tags.trim_start().starts_with(tag.as_str()),
            TagMatcher::Contains(needle) => tags.contains(needle.as_str()),
        }
    }
}

impl fmt::Display for TagMatcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TagMatcher::Prefix(tag) => write!(f, "/^\\s*{}/", tag),
            TagMatcher::Contains(needle) => write!(f, "/{}/", needle),
        }
    }
}

impl Serialize for TagMatcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Converts `s` to kebab case: the string is split into ASCII words at case
/// and punctuation boundaries, and the lowercased words are joined with `-`.
/// Non-ASCII characters and punctuation are dropped.
///
/// A word is one of, tried in order at each position:
///
/// 1. an acronym of two or more capitals plus trailing digits, ending at a
///    word boundary or just before a capitalized word (`XMLHttp` yields
///    `XML`, `ES6` yields `ES6`);
/// 2. an optional capital, one or more lowercase letters, trailing digits;
/// 3. a lone capital;
/// 4. a run of digits.
///
/// The transform is idempotent.
pub fn to_kebab_case(s: &str) -> String {
    words(s)
        .into_iter()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn words(s: &str) -> Vec<&str> {
    let b = s.as_bytes();
    let mut words = Vec::new();
    let mut i = 0;
    while i < b.len() {
        match word_end(b, i) {
            Some(end) => {
                words.push(&s[i..end]);
                i = end;
            }
            None => i += 1,
        }
    }
    words
}

// Returns the end of the word starting at `i`, if any. Only ASCII bytes can
// start or end a word, so the returned range always lies on char boundaries.
fn word_end(b: &[u8], i: usize) -> Option<usize> {
    let upper = run(b, i, u8::is_ascii_uppercase);
    if upper - i >= 2 {
        let end = run(b, upper, u8::is_ascii_digit);
        if end == b.len() || !is_word(b[end]) || starts_capitalized_word(b, end) {
            return Some(end);
        }
        // Give the last capital back to the word that follows.
        if end == upper && upper - i > 2 && b[upper].is_ascii_lowercase() {
            return Some(upper - 1);
        }
    }

    let start = if b[i].is_ascii_uppercase() { i + 1 } else { i };
    let lower = run(b, start, u8::is_ascii_lowercase);
    if lower > start {
        return Some(run(b, lower, u8::is_ascii_digit));
    }

    if b[i].is_ascii_uppercase() {
        return Some(i + 1);
    }
    if b[i].is_ascii_digit() {
        return Some(run(b, i, u8::is_ascii_digit));
    }
    None
}

fn run(b: &[u8], start: usize, pred: fn(&u8) -> bool) -> usize {
    start + b[start..].iter().take_while(|c| pred(*c)).count()
}

fn is_word(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

fn starts_capitalized_word(b: &[u8], i: usize) -> bool {
    i + 1 < b.len() && b[i].is_ascii_uppercase() && b[i + 1].is_ascii_lowercase()
}
