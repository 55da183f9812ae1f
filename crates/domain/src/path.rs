//! Property paths into a JSON body.
//!
//! A path such as `user.addresses[0].city` or `meta["x.trace"]` is parsed
//! once into typed segments and then resolved against a body, yielding
//! `None` wherever the route does not exist.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

/// Errors raised while parsing a property path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A `[` or a quote was never closed.
    #[error("unterminated bracket or quote in path '{path}'")]
    Unterminated {
        /// The offending path.
        path: String,
    },

    /// Two separators with nothing in between, or a leading/trailing dot.
    #[error("empty segment at position {position} in path '{path}'")]
    EmptySegment {
        /// The offending path.
        path: String,
        /// Byte offset of the empty segment.
        position: usize,
    },

    /// A character that cannot appear where it was found.
    #[error("unexpected '{character}' at position {position} in path '{path}'")]
    Unexpected {
        /// The offending path.
        path: String,
        /// The unexpected character.
        character: char,
        /// Byte offset of the character.
        position: usize,
    },
}

/// Result type alias for path parsing.
pub type PathResult<T> = Result<T, PathError>;

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A mapping key. Numeric keys also address sequence indices.
    Key(String),
    /// A bracketed sequence index.
    Index(usize),
}

impl PathSegment {
    fn step<'a>(&self, current: &'a Value) -> Option<&'a Value> {
        match (self, current) {
            (Self::Key(key), Value::Object(map)) => map.get(key),
            (Self::Key(key), Value::Array(items)) => {
                key.parse::<usize>().ok().and_then(|index| items.get(index))
            }
            (Self::Index(index), Value::Array(items)) => items.get(*index),
            (Self::Index(index), Value::Object(map)) => map.get(&index.to_string()),
            _ => None,
        }
    }
}

/// A parsed property path.
///
/// The empty path addresses the whole body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    /// The path that addresses the body itself.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            raw: String::new(),
            segments: Vec::new(),
        }
    }

    /// Parses a path string.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] for unterminated brackets or quotes, empty
    /// segments, and stray characters after a closing bracket.
    pub fn parse(path: &str) -> PathResult<Self> {
        Ok(Self {
            raw: path.to_string(),
            segments: Parser::new(path).run()?,
        })
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns true if this path addresses the body itself.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the path as it was written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Resolves the path against `root`.
    #[must_use]
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |current, segment| segment.step(current))
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

struct Parser<'a> {
    path: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    segments: Vec<PathSegment>,
}

impl<'a> Parser<'a> {
    fn new(path: &'a str) -> Self {
        Self {
            path,
            chars: path.char_indices().peekable(),
            segments: Vec::new(),
        }
    }

    fn run(mut self) -> PathResult<Vec<PathSegment>> {
        if self.path.is_empty() {
            return Ok(self.segments);
        }

        // True right after a dot (or at the start), where a key is required
        // unless a bracket follows.
        let mut expect_key = true;
        let mut key_start = 0;
        let mut key = String::new();

        while let Some((position, ch)) = self.chars.next() {
            match ch {
                '.' => {
                    if key.is_empty() {
                        if expect_key {
                            return Err(self.empty_segment(position));
                        }
                    } else {
                        self.segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                    expect_key = true;
                    key_start = position + 1;
                }
                '[' => {
                    if !key.is_empty() {
                        self.segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    } else if expect_key && position != 0 {
                        return Err(self.empty_segment(key_start));
                    }
                    let segment = self.bracket(position)?;
                    self.segments.push(segment);
                    self.after_bracket()?;
                    expect_key = false;
                }
                ']' | '"' | '\'' => {
                    return Err(PathError::Unexpected {
                        path: self.path.to_string(),
                        character: ch,
                        position,
                    });
                }
                _ => {
                    if key.is_empty() {
                        key_start = position;
                    }
                    key.push(ch);
                    expect_key = false;
                }
            }
        }

        if !key.is_empty() {
            self.segments.push(PathSegment::Key(key));
        } else if expect_key {
            return Err(self.empty_segment(self.path.len()));
        }
        Ok(self.segments)
    }

    /// Parses the inside of `[...]`, the opening bracket already consumed.
    fn bracket(&mut self, open: usize) -> PathResult<PathSegment> {
        match self.chars.peek().copied() {
            Some((_, quote @ ('"' | '\''))) => {
                self.chars.next();
                let mut key = String::new();
                loop {
                    match self.chars.next() {
                        Some((_, ch)) if ch == quote => break,
                        Some((_, ch)) => key.push(ch),
                        None => return Err(self.unterminated()),
                    }
                }
                match self.chars.next() {
                    Some((_, ']')) => Ok(PathSegment::Key(key)),
                    Some((position, character)) => Err(PathError::Unexpected {
                        path: self.path.to_string(),
                        character,
                        position,
                    }),
                    None => Err(self.unterminated()),
                }
            }
            _ => {
                let mut inner = String::new();
                loop {
                    match self.chars.next() {
                        Some((_, ']')) => break,
                        Some((_, ch)) => inner.push(ch),
                        None => return Err(self.unterminated()),
                    }
                }
                let inner = inner.trim();
                if inner.is_empty() {
                    return Err(self.empty_segment(open + 1));
                }
                Ok(inner
                    .parse::<usize>()
                    .map_or_else(|_| PathSegment::Key(inner.to_string()), PathSegment::Index))
            }
        }
    }

    /// After `]` only `.`, `[` or the end of the path may follow.
    fn after_bracket(&mut self) -> PathResult<()> {
        match self.chars.peek().copied() {
            None | Some((_, '.' | '[')) => Ok(()),
            Some((position, character)) => Err(PathError::Unexpected {
                path: self.path.to_string(),
                character,
                position,
            }),
        }
    }

    fn empty_segment(&self, position: usize) -> PathError {
        PathError::EmptySegment {
            path: self.path.to_string(),
            position,
        }
    }

    fn unterminated(&self) -> PathError {
        PathError::Unterminated {
            path: self.path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn segments(path: &str) -> Vec<PathSegment> {
        PropertyPath::parse(path)
            .expect("path should parse")
            .segments()
            .to_vec()
    }

    fn key(k: &str) -> PathSegment {
        PathSegment::Key(k.to_string())
    }

    #[test]
    fn test_parse_dotted() {
        assert_eq!(segments("user.address.city"), vec![key("user"), key("address"), key("city")]);
    }

    #[test]
    fn test_parse_brackets() {
        assert_eq!(
            segments("items[0].tags[12]"),
            vec![key("items"), PathSegment::Index(0), key("tags"), PathSegment::Index(12)]
        );
        assert_eq!(segments("[1]"), vec![PathSegment::Index(1)]);
        assert_eq!(segments("a[0][1]"), vec![key("a"), PathSegment::Index(0), PathSegment::Index(1)]);
    }

    #[test]
    fn test_parse_quoted_keys() {
        assert_eq!(segments(r#"meta["x.trace"]"#), vec![key("meta"), key("x.trace")]);
        assert_eq!(segments("meta['id'].v"), vec![key("meta"), key("id"), key("v")]);
        assert_eq!(segments("a[b]"), vec![key("a"), key("b")]);
    }

    #[test]
    fn test_parse_empty_is_root() {
        let path = PropertyPath::parse("").expect("empty path is valid");
        assert!(path.is_root());
        assert_eq!(path, PropertyPath::root());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            PropertyPath::parse("a..b"),
            Err(PathError::EmptySegment { position: 2, .. })
        ));
        assert!(matches!(PropertyPath::parse(".a"), Err(PathError::EmptySegment { .. })));
        assert!(matches!(PropertyPath::parse("a."), Err(PathError::EmptySegment { .. })));
        assert!(matches!(PropertyPath::parse("a[0"), Err(PathError::Unterminated { .. })));
        assert!(matches!(PropertyPath::parse("a['b]"), Err(PathError::Unterminated { .. })));
        assert!(matches!(PropertyPath::parse("a[]"), Err(PathError::EmptySegment { .. })));
        assert!(matches!(
            PropertyPath::parse("a[0]b"),
            Err(PathError::Unexpected { character: 'b', .. })
        ));
        assert!(matches!(
            PropertyPath::parse("a]"),
            Err(PathError::Unexpected { character: ']', .. })
        ));
    }

    #[test]
    fn test_resolve() {
        let body = json!({
            "user": {"name": "John", "roles": ["admin", "dev"]},
            "items": [{"id": 1}, {"id": 2}],
            "codes": {"404": "missing"}
        });

        let get = |p: &str| PropertyPath::parse(p).expect("valid").resolve(&body).cloned();

        assert_eq!(get("user.name"), Some(json!("John")));
        assert_eq!(get("user.roles[1]"), Some(json!("dev")));
        assert_eq!(get("items.1.id"), Some(json!(2)));
        assert_eq!(get("codes[404]"), Some(json!("missing")));
        assert_eq!(get(""), Some(body.clone()));
        assert_eq!(get("user.missing"), None);
        assert_eq!(get("items[5]"), None);
        assert_eq!(get("user.name.first"), None);
    }

    #[test]
    fn test_display_keeps_original_spelling() {
        let path: PropertyPath = "items[0].id".parse().expect("valid");
        assert_eq!(path.to_string(), "items[0].id");
        assert_eq!(path.as_str(), "items[0].id");
    }
}
