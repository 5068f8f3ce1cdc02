//! Annotation tags: `key:"value,opt1,opt2" key2:"..."`.
//!
//! The same grammar serves Go struct field tags and `//go:tag` comment
//! lines. Commas inside balanced `[...]` belong to the value, so generic
//! names like `Either[A, B]` survive intact. Malformed entries are dropped
//! without failing the whole annotation.

use indexmap::IndexMap;
use logos::Logos;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TAG_PREFIX: &str = "//go:tag ";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tag {
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Ordered key → tag map. Later duplicate keys override earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(IndexMap<String, Tag>);

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
enum Token {
    #[token(":")]
    Colon,

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    Quoted(String),

    #[regex(r#"[^\s:"]+"#, |lex| lex.slice().to_string())]
    Key(String),
}

fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse a raw annotation into tags.
pub fn parse_tags(raw: &str) -> Tags {
    let mut tags = Tags::default();
    // (key, saw colon)
    let mut pending: Option<(String, bool)> = None;

    for token in Token::lexer(raw) {
        let Ok(token) = token else {
            // Unterminated quote or stray character: the pending entry is
            // malformed and nothing after it can be trusted.
            pending = None;
            break;
        };

        match token {
            Token::Key(key) => match pending.take() {
                // `key:value` without quotes: the word is the malformed
                // value, not a new key.
                Some((_, true)) => {}
                Some((bare, false)) => {
                    tags.insert(bare, Tag::default());
                    pending = Some((key, false));
                }
                None => pending = Some((key, false)),
            },
            Token::Colon => {
                if let Some((_, colon)) = pending.as_mut() {
                    *colon = true;
                }
            }
            Token::Quoted(value) => {
                let Some((key, true)) = pending.take() else {
                    continue;
                };
                if let Some(tag) = Tag::parse_value(&value) {
                    tags.insert(key, tag);
                }
            }
        }
    }

    // A trailing `key:` has no value and is dropped.
    if let Some((bare, false)) = pending {
        tags.insert(bare, Tag::default());
    }

    tags
}

impl Tag {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Split `value,opt1,opt2` honoring brackets. `None` if unbalanced.
    pub fn parse_value(raw: &str) -> Option<Tag> {
        let mut parts = split_top_level(raw, ',')?.into_iter();
        let value = parts.next().unwrap_or_default();
        let options = parts.filter(|o| !o.is_empty()).collect();
        Some(Tag { value, options })
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o == name)
    }

    /// Split `Name[A, B]` into `("Name", ["A", "B"])`.
    ///
    /// Nested brackets stay inside their argument. A value without brackets,
    /// or with unbalanced ones, yields itself and no parameters.
    pub fn type_params(&self) -> (String, Vec<String>) {
        let value = self.value.trim();
        let (Some(open), true) = (value.find('['), value.ends_with(']')) else {
            return (value.to_string(), Vec::new());
        };
        let name = value[..open].trim().to_string();
        let inner = &value[open + 1..value.len() - 1];
        match split_top_level(inner, ',') {
            Some(params) => (name, params.into_iter().filter(|p| !p.is_empty()).collect()),
            None => (value.to_string(), Vec::new()),
        }
    }
}

/// Split on `sep` outside of `[...]`, trimming each part.
pub fn split_top_level(raw: &str, sep: char) -> Option<Vec<String>> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;

    for (i, c) in raw.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            c if c == sep && depth == 0 => {
                parts.push(raw[start..i].trim().to_string());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    if depth != 0 {
        return None;
    }
    parts.push(raw[start..].trim().to_string());
    Some(parts)
}

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert, replacing an earlier entry but keeping its position.
    pub fn insert(&mut self, key: impl Into<String>, tag: Tag) {
        self.0.insert(key.into(), tag);
    }

    pub fn extend(&mut self, other: Tags) {
        for (k, v) in other.0 {
            self.0.insert(k, v);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Tag)> for Tags {
    fn from_iter<I: IntoIterator<Item = (String, Tag)>>(iter: I) -> Self {
        Tags(iter.into_iter().collect())
    }
}

/// Extracts tags from comment lines carrying a tag prefix.
#[derive(Debug, Clone)]
pub struct TagExtractor {
    prefix: String,
}

impl Default for TagExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TagExtractor {
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_TAG_PREFIX.to_string(),
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Tags of a single comment line, if it is a tag line.
    pub fn parse_line(&self, line: &str) -> Option<Tags> {
        let rest = line.trim().strip_prefix(self.prefix.as_str())?;
        Some(parse_tags(rest))
    }

    /// Merge the tags of every tag line in a comment block.
    pub fn extract<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> Tags {
        let mut tags = Tags::default();
        for line in lines {
            if let Some(found) = self.parse_line(line) {
                tags.extend(found);
            }
        }
        tags
    }
}
