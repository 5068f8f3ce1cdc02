//! Validation guards attached to struct fields.
//!
//! Guards are carried in the model for tooling; generated Go code does not
//! enforce them.

use serde::{Deserialize, Serialize};

use crate::tags::Tags;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Guard {
    Enum { options: Vec<String> },
    Regexp { pattern: String },
    AndGuard { list: Vec<Guard> },
    OrGuard { list: Vec<Guard> },
}

impl Guard {
    /// Guards declared by field tags: `enum:"a,b"` and `pattern:"..."`.
    ///
    /// Several guard tags on one field combine with `AndGuard`.
    pub fn from_tags(tags: &Tags) -> Option<Guard> {
        let mut list = Vec::new();

        if let Some(tag) = tags.get("enum") {
            let options: Vec<String> = std::iter::once(tag.value.clone())
                .chain(tag.options.iter().cloned())
                .filter(|o| !o.is_empty())
                .collect();
            if !options.is_empty() {
                list.push(Guard::Enum { options });
            }
        }

        if let Some(tag) = tags.get("pattern") {
            // Commas in a pattern are not options.
            let mut pattern = tag.value.clone();
            for opt in &tag.options {
                pattern.push(',');
                pattern.push_str(opt);
            }
            if !pattern.is_empty() {
                list.push(Guard::Regexp { pattern });
            }
        }

        match list.len() {
            0 => None,
            1 => list.pop(),
            _ => Some(Guard::AndGuard { list }),
        }
    }

    /// Literal values accepted by this guard, if it is a pure enumeration.
    pub fn enum_options(&self) -> Option<&[String]> {
        match self {
            Guard::Enum { options } => Some(options),
            Guard::AndGuard { list } => list.iter().find_map(Guard::enum_options),
            _ => None,
        }
    }
}
