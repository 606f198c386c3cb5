//! Doc-comment annotation grammar.
//!
//! Annotations are read line by line from a declaration's doc comment. The
//! first word of a line is the tag (case-insensitive), the rest of the line
//! is its argument:
//!
//! ```text
//! /// Fetch one user.
//! /// @router /user/{id} [get]
//! /// @limit 10 20 userLimit
//! ```

use regex::Regex;
use std::sync::LazyLock;

static ROUTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(/[\w./\-{}+:$]*)[[:blank:]]+\[(\w+)\]")
        .expect("router annotation regex should be valid")
});

/// One tagged doc line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLine<'a> {
    /// Tag in lower case, including the `@`.
    pub tag: String,
    /// Text after the tag, trimmed.
    pub remainder: &'a str,
    /// The whole trimmed line.
    pub line: &'a str,
}

/// Split a doc line into tag and remainder. Blank lines yield `None`.
pub fn tag_line(line: &str) -> Option<TagLine<'_>> {
    let line = line.trim();
    let tag = line.split_whitespace().next()?;
    Some(TagLine {
        tag: tag.to_lowercase(),
        remainder: line[tag.len()..].trim(),
        line,
    })
}

/// Parsed `@router` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterTag {
    /// Route path, starting with `/`.
    pub path: String,
    /// HTTP method, upper-cased.
    pub method: String,
}

/// Parse the argument of `@router`. `None` means the line is malformed.
pub fn parse_router(remainder: &str) -> Option<RouterTag> {
    let captures = ROUTER_PATTERN.captures(remainder)?;
    Some(RouterTag {
        path: captures[1].to_string(),
        method: captures[2].to_uppercase(),
    })
}

/// Rate limit attached to a route.
///
/// `num` is the refill rate per second and `cap` the bucket capacity. A named
/// limit is shared by every route declaring the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Limit {
    /// Group name; `None` for a per-route limiter.
    pub name: Option<String>,
    /// Tokens added per second.
    pub num: Option<u32>,
    /// Bucket capacity.
    pub cap: Option<u32>,
}

impl Limit {
    /// Whether no limit was declared.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.num.is_none() && self.cap.is_none()
    }

    /// Fill the fields still empty from `other`; set fields are kept.
    pub fn fill_from(&mut self, other: &Limit) {
        if self.num.is_none() {
            self.num = other.num;
        }
        if self.cap.is_none() {
            self.cap = other.cap;
        }
    }
}

/// Parse the argument of `@limit`: `<num> [<cap>] [<name>]`.
///
/// `cap` defaults to `num`. Returns `None` when `num` or `cap` is not a
/// non-negative integer.
pub fn parse_limit(remainder: &str) -> Option<Limit> {
    let mut words = remainder.split_whitespace();
    let mut limit = Limit::default();
    if let Some(num) = words.next() {
        limit.num = Some(num.parse().ok()?);
    }
    if let Some(cap) = words.next() {
        limit.cap = Some(cap.parse().ok()?);
    }
    limit.name = words.next().map(str::to_string);
    if limit.cap.is_none() {
        limit.cap = limit.num;
    }
    Some(limit)
}

/// Generator settings read from the doc comment of `fn main`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MainTags {
    /// `@genDir`: comma-separated scan directories.
    pub dir: Option<String>,
    /// `@genOutput`: output file.
    pub output: Option<String>,
    /// `@genWrapper`: wrapper mode.
    pub wrapper: Option<String>,
}

impl MainTags {
    /// Read `@genDir`, `@genOutput` and `@genWrapper` from doc lines.
    pub fn from_doc_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tags = Self::default();
        for line in lines.into_iter().filter_map(tag_line) {
            let value = Some(line.remainder.to_string()).filter(|v| !v.is_empty());
            match line.tag.as_str() {
                "@gendir" => tags.dir = value,
                "@genoutput" => tags.output = value,
                "@genwrapper" => tags.wrapper = value,
                _ => {}
            }
        }
        tags
    }

    /// Whether any tag was present.
    pub fn is_empty(&self) -> bool {
        self.dir.is_none() && self.output.is_none() && self.wrapper.is_none()
    }
}
