//! Rule definition surface.
//!
//! A [`RuleSpec`] is the caller-facing description of one parameter rule; the
//! registry compiles it into a matchable form. Patterns arrive as a
//! [`PatternSource`]: either a literal string (compiled with boundary
//! anchoring and separator weaving, see `registry.rs`) or a precompiled
//! [`Regex`] that is used verbatim.

use regex::Regex;
use std::collections::HashMap;

bitflags::bitflags! {
    /// Behavior flags carried by a compiled rule.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct RuleFlags: u8 {
        /// A match of this rule truncates the whole parse.
        const STOP_PARSE = 1 << 0;
        /// Repeated matches accumulate into ordered sequences.
        const MULTIPLE   = 1 << 1;
        /// Excluded from rendered help.
        const HIDDEN     = 1 << 2;
    }
}

/// A pattern as supplied by the caller.
#[derive(Debug, Clone)]
pub enum PatternSource {
    /// A literal pattern string. The registry compiles it, widening every
    /// literal space to also match [`TOKEN_SEPARATOR`](crate::TOKEN_SEPARATOR)
    /// and (for primary patterns without `capture_multiple`) anchoring it to
    /// token boundaries.
    Literal(String),
    /// An already-compiled regex, used exactly as given. It sees the raw
    /// working string, separators included.
    Compiled(Regex),
}

impl PatternSource {
    /// Original pattern text, used to derive the human-readable display form.
    pub(crate) fn source_text(&self) -> &str {
        match self {
            PatternSource::Literal(text) => text,
            PatternSource::Compiled(re) => re.as_str(),
        }
    }
}

impl From<&str> for PatternSource {
    fn from(text: &str) -> Self {
        PatternSource::Literal(text.to_string())
    }
}

impl From<String> for PatternSource {
    fn from(text: String) -> Self {
        PatternSource::Literal(text)
    }
}

impl From<Regex> for PatternSource {
    fn from(re: Regex) -> Self {
        PatternSource::Compiled(re)
    }
}

impl From<&Regex> for PatternSource {
    fn from(re: &Regex) -> Self {
        PatternSource::Compiled(re.clone())
    }
}

/// Default value(s) for a rule.
///
/// A rule without named captures carries a boolean flag default; a rule with
/// named captures may map capture-group names to the string substituted when
/// that capture comes back empty.
#[derive(Debug, Clone, PartialEq)]
pub enum Defaults {
    Flag(bool),
    Named(HashMap<String, String>),
}

impl Defaults {
    /// Configured default for a capture-group name, if any.
    pub(crate) fn for_name(&self, name: &str) -> Option<&str> {
        match self {
            Defaults::Flag(_) => None,
            Defaults::Named(map) => map.get(name).map(String::as_str),
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults::Flag(false)
    }
}

impl From<bool> for Defaults {
    fn from(flag: bool) -> Self {
        Defaults::Flag(flag)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Defaults {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Defaults::Named(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }
}

/// Caller-facing description of one parameter rule.
///
/// Built with chained setters; every field is optional except that at least
/// one of `short`/`long` must be set by the time the rule is registered.
///
/// ```
/// use argosy::RuleSpec;
///
/// let spec = RuleSpec::new()
///     .short(r"-u[= ](?<subset>[\w|/]+)")
///     .group("option")
///     .values([("subset", "me")])
///     .help("use the given subset");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSpec {
    pub(crate) short: Option<PatternSource>,
    pub(crate) long: Option<PatternSource>,
    pub(crate) capture_multiple: Option<PatternSource>,
    pub(crate) group: Option<String>,
    pub(crate) values: Defaults,
    pub(crate) multiple: bool,
    pub(crate) stop_parse: bool,
    pub(crate) hidden: bool,
    pub(crate) help: Option<String>,
    pub(crate) human_readable: Option<String>,
}

impl RuleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Short-form pattern (e.g. `-v`).
    pub fn short(mut self, pattern: impl Into<PatternSource>) -> Self {
        self.short = Some(pattern.into());
        self
    }

    /// Long-form pattern (e.g. `--verbose`).
    pub fn long(mut self, pattern: impl Into<PatternSource>) -> Self {
        self.long = Some(pattern.into());
        self
    }

    /// Secondary pattern re-applied against the span consumed by the primary
    /// match, extracting several key/value-like occurrences from one
    /// argument. Implies that captured values accumulate into sequences.
    pub fn capture_multiple(mut self, pattern: impl Into<PatternSource>) -> Self {
        self.capture_multiple = Some(pattern.into());
        self
    }

    /// Display group; rules without one land in [`UNGROUPED`](crate::UNGROUPED).
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Default value(s): a boolean for capture-less rules, or per-capture-name
    /// strings substituted when a capture comes back empty.
    pub fn values(mut self, values: impl Into<Defaults>) -> Self {
        self.values = values.into();
        self
    }

    /// Accumulate repeated matches into ordered sequences instead of
    /// overwriting.
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// A match of this rule truncates the whole parse (e.g. `--`).
    pub fn stop_parse(mut self, stop_parse: bool) -> Self {
        self.stop_parse = stop_parse;
        self
    }

    /// Exclude the rule from rendered help.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Free-text description shown in help.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Display form override; derived from the patterns when absent.
    pub fn human_readable(mut self, human_readable: impl Into<String>) -> Self {
        self.human_readable = Some(human_readable.into());
        self
    }

    pub(crate) fn flags(&self) -> RuleFlags {
        let mut flags = RuleFlags::empty();
        if self.stop_parse {
            flags |= RuleFlags::STOP_PARSE;
        }
        if self.multiple {
            flags |= RuleFlags::MULTIPLE;
        }
        if self.hidden {
            flags |= RuleFlags::HIDDEN;
        }
        flags
    }
}
