//! Rule compilation and grouping.
//!
//! This module holds the *static* side of the matcher: everything derived
//! once from the caller's rule definitions so that a parse run only ever
//! executes precompiled regexes.
//!
//! Matching is intentionally split into two phases:
//!
//! 1. **Register/compile rules** (this module): normalize every
//!    [`RuleSpec`] into a [`Rule`] with compiled patterns, derive its
//!    human-readable display form, and index it into a display [`Group`].
//! 2. **Run** (see `engine/`): join the argument tokens and iterate the
//!    compiled rules to a fixed point.
//!
//! ## Pattern compilation
//!
//! A literal pattern string goes through two rewrites:
//!
//! - **Separator weaving**: tokens are joined with
//!   [`TOKEN_SEPARATOR`](crate::TOKEN_SEPARATOR), so every literal space in
//!   the pattern is widened to also match the separator. Outside a character
//!   class ` ` becomes `[ \x00]`; inside a class, `\x00` is added beside the
//!   space (this also covers negated classes like `[^\ ]`, which must keep
//!   excluding the separator to stop captures at token boundaries).
//! - **Boundary anchoring**: without a `capture_multiple` pattern, the woven
//!   body is wrapped as `[\s\x00]*(?:BODY)([\s\x00]|$)` so it only matches
//!   whole tokens. With `capture_multiple`, the literal is expected to carry
//!   its own spacing and is compiled bare.
//!
//! Precompiled [`Regex`] inputs skip both rewrites and are used verbatim.
//!
//! ## Invariants
//!
//! - Registration order is preserved; it drives match iteration order, the
//!   merge order of aggregate value views, and help ordering.
//! - Every registered rule has at least one primary pattern.
//! - A group's `padding` is always one column wider than its widest display
//!   line (first or second line, whichever is longer).

use crate::error::SetupError;
use crate::spec::{Defaults, PatternSource, RuleFlags, RuleSpec};
use crate::{BOUNDARY_CLASS, api::Options};
use regex::Regex;
use std::collections::HashMap;

/// Which primary pattern of a rule a regex was compiled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PatternKind {
    Short,
    Long,
}

impl PatternKind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            PatternKind::Short => "short",
            PatternKind::Long => "long",
        }
    }
}

/// A fully normalized, matchable rule.
#[derive(Debug)]
pub(crate) struct Rule {
    pub short: Option<Regex>,
    pub long: Option<Regex>,
    pub capture_multiple: Option<Regex>,
    pub flags: RuleFlags,
    pub group: String,
    pub defaults: Defaults,
    pub human_readable: String,
    pub help: Option<String>,
}

impl Rule {
    pub fn pattern(&self, kind: PatternKind) -> Option<&Regex> {
        match kind {
            PatternKind::Short => self.short.as_ref(),
            PatternKind::Long => self.long.as_ref(),
        }
    }

    pub fn is_stop(&self) -> bool {
        self.flags.contains(RuleFlags::STOP_PARSE)
    }

    pub fn is_multiple(&self) -> bool {
        self.flags.contains(RuleFlags::MULTIPLE)
    }

    /// Whether repeated captures accumulate instead of overwriting.
    pub fn accumulates(&self) -> bool {
        self.is_multiple() || self.capture_multiple.is_some()
    }
}

/// One display record inside a group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupEntry {
    pub human_readable: String,
    pub help: Option<String>,
    pub hidden: bool,
}

/// A named, ordered collection of rule display records.
///
/// `padding` is the alignment column for help rendering (widest display line
/// in the group, +1); `prepadding` is the configured left indent.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub entries: Vec<GroupEntry>,
    pub padding: usize,
    pub prepadding: usize,
}

/// Owns the normalized rules and their display groups, in insertion order.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    order: Vec<String>,
    rules: HashMap<String, Rule>,
    groups: Vec<(String, Group)>,
}

impl Registry {
    /// Normalize and store one rule definition.
    ///
    /// Registering an id twice replaces the rule in place (its original
    /// position is kept) while appending a fresh display record to its group.
    pub fn register(&mut self, id: &str, spec: RuleSpec, opts: &Options) -> Result<(), SetupError> {
        if spec.short.is_none() && spec.long.is_none() {
            return Err(SetupError::MissingPattern { id: id.to_string() });
        }

        let capture_multiple = match &spec.capture_multiple {
            Some(source) => Some(compile(source, false, id, "capture_multiple")?),
            None => None,
        };
        // A capture_multiple pattern brings its own spacing; only bare
        // primaries get the boundary wrap.
        let wrap = capture_multiple.is_none();

        let mut human_parts = Vec::new();
        let mut short = None;
        let mut long = None;
        for kind in [PatternKind::Short, PatternKind::Long] {
            let source = match kind {
                PatternKind::Short => &spec.short,
                PatternKind::Long => &spec.long,
            };
            if let Some(source) = source {
                human_parts.push(humanize(source.source_text()));
                let compiled = compile(source, wrap, id, kind.label())?;
                match kind {
                    PatternKind::Short => short = Some(compiled),
                    PatternKind::Long => long = Some(compiled),
                }
            }
        }

        let mut human_readable =
            spec.human_readable.clone().unwrap_or_else(|| human_parts.join(opts.long_short_delimiter.as_str()));
        if spec.short.is_none() {
            // Long-only rules are shifted right so they line up with the
            // long forms of rules that also have a short form.
            human_readable = format!("{}{}", " ".repeat(opts.align_long_if_no_short), human_readable);
        }

        let group = spec.group.clone().unwrap_or_else(|| crate::UNGROUPED.to_string());
        let group_index = match self.groups.iter().position(|(name, _)| *name == group) {
            Some(index) => index,
            None => {
                self.groups.push((
                    group.clone(),
                    Group { entries: Vec::new(), padding: 0, prepadding: opts.pre_padding_spaces },
                ));
                self.groups.len() - 1
            }
        };

        let slot = &mut self.groups[group_index].1;
        slot.entries.push(GroupEntry {
            human_readable: human_readable.clone(),
            help: spec.help.clone(),
            hidden: spec.hidden,
        });

        // Alignment looks at the first display line, or the second when that
        // one is longer (the two-line short/long layout).
        let mut lines = human_readable.split('\n');
        let first = lines.next().unwrap_or("").chars().count();
        let mut max_length = first;
        if let Some(second) = lines.next() {
            let second = second.chars().count();
            if second > first {
                max_length = second;
            }
        }
        if slot.padding < max_length {
            slot.padding = max_length + 1;
        }

        let rule = Rule {
            short,
            long,
            capture_multiple,
            flags: spec.flags(),
            group,
            defaults: spec.values.clone(),
            human_readable,
            help: spec.help,
        };
        if !self.rules.contains_key(id) {
            self.order.push(id.to_string());
        }
        self.rules.insert(id.to_string(), rule);

        Ok(())
    }

    /// Iterate rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.order.iter().filter_map(|id| self.rules.get(id).map(|rule| (id.as_str(), rule)))
    }

    pub fn groups(&self) -> &[(String, Group)] {
        &self.groups
    }
}

fn compile(source: &PatternSource, wrap: bool, id: &str, kind: &'static str) -> Result<Regex, SetupError> {
    match source {
        PatternSource::Compiled(re) => Ok(re.clone()),
        PatternSource::Literal(text) => {
            let woven = weave_separator(text);
            let pattern = if wrap {
                format!("{BOUNDARY_CLASS}*(?:{woven})({BOUNDARY_CLASS}|$)")
            } else {
                woven
            };
            Regex::new(&pattern).map_err(|source| SetupError::InvalidPattern {
                id: id.to_string(),
                kind,
                source,
            })
        }
    }
}

/// Widen every literal space in `pattern` to also match the token separator.
///
/// Outside a character class a space becomes the class `[ \x00]`; inside a
/// class, `\x00` is inserted next to the space (the regex grammar allows this
/// for both plain and negated classes). An escaped space outside a class is
/// left alone: the caller asked for a literal space only.
fn weave_separator(pattern: &str) -> String {
    let mut woven = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars();
    let mut class_depth = 0usize;
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                woven.push(c);
                if let Some(next) = chars.next() {
                    woven.push(next);
                    if next == ' ' && class_depth > 0 {
                        woven.push_str(r"\x00");
                    }
                }
            }
            '[' => {
                class_depth += 1;
                woven.push(c);
            }
            ']' if class_depth > 0 => {
                class_depth -= 1;
                woven.push(c);
            }
            ' ' if class_depth > 0 => woven.push_str(" \\x00"),
            ' ' => woven.push_str("[ \\x00]"),
            _ => woven.push(c),
        }
    }
    woven
}

/// Collapse named-capture syntax to `<name>` for display.
fn humanize(pattern: &str) -> String {
    regex!(r"\(\?P?<(\w+)>[^)]*\)").replace_all(pattern, "<$1>").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Options {
        Options::default()
    }

    #[test]
    fn rejects_rules_without_any_pattern() {
        let mut registry = Registry::default();
        let err = registry.register("broken", RuleSpec::new().help("no patterns"), &options()).unwrap_err();
        assert!(matches!(err, SetupError::MissingPattern { ref id } if id == "broken"));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn rejects_invalid_literal_patterns() {
        let mut registry = Registry::default();
        let err = registry.register("bad", RuleSpec::new().short("-x["), &options()).unwrap_err();
        assert!(matches!(err, SetupError::InvalidPattern { kind: "short", .. }));
    }

    #[test]
    fn humanize_collapses_named_groups() {
        assert_eq!(humanize(r"-u[=| ](?<apiSubset>[\w|/]+)"), "-u[=| ]<apiSubset>");
        assert_eq!(humanize(r"api subset use (?P<apiSubset>[\w|/]+)"), "api subset use <apiSubset>");
        assert_eq!(humanize("sh(ell)?"), "sh(ell)?");
    }

    #[test]
    fn weave_widens_spaces_to_the_separator() {
        assert_eq!(weave_separator("api subsets( ls)?"), r"api[ \x00]subsets([ \x00]ls)?");
        assert_eq!(weave_separator("-u[=| ]"), r"-u[=| \x00]");
        assert_eq!(weave_separator(r"-e(?<P>[^\ ]+)"), r"-e(?<P>[^\ \x00]+)");
        // escaped space outside a class stays literal
        assert_eq!(weave_separator(r"a\ b"), r"a\ b");
    }

    #[test]
    fn anchored_patterns_only_match_whole_tokens() {
        let mut registry = Registry::default();
        registry.register("ends", RuleSpec::new().short("-E"), &options()).unwrap();
        let rule = registry.iter().next().unwrap().1;
        let re = rule.pattern(PatternKind::Short).unwrap();

        assert!(re.is_match("-E"));
        assert!(re.is_match("-E\u{0}next"));
        assert!(!re.is_match("-Enormous"));
    }

    #[test]
    fn alternations_stay_inside_the_anchor() {
        let mut registry = Registry::default();
        registry.register("help", RuleSpec::new().short("help|-h"), &options()).unwrap();
        let re = registry.iter().next().unwrap().1.pattern(PatternKind::Short).unwrap();

        assert!(re.is_match("help"));
        assert!(re.is_match("-h"));
        assert!(!re.is_match("helpme"));
    }

    #[test]
    fn groups_are_discovered_in_insertion_order_with_padding() {
        let mut registry = Registry::default();
        registry
            .register("debug", RuleSpec::new().short("-[-]?d(ebug)?").group("option"), &options())
            .unwrap();
        registry
            .register("help", RuleSpec::new().short("help|-[-]?h(elp)?").group("command"), &options())
            .unwrap();
        registry
            .register("subsets", RuleSpec::new().short("-l").long("api subsets( ls)?").group("command"), &options())
            .unwrap();
        registry
            .register(
                "use",
                RuleSpec::new()
                    .short(r"-u[=| ](?<apiSubset>[\w|/]+)")
                    .long(r"api subset use (?<apiSubset>[\w|/]+)")
                    .group("option"),
                &options(),
            )
            .unwrap();

        let groups = registry.groups();
        assert_eq!(groups[0].0, "option");
        assert_eq!(groups[1].0, "command");

        // widest option line: "api subset use <apiSubset>" (26 chars) -> 27
        assert_eq!(groups[0].1.padding, 27);
        assert_eq!(groups[0].1.prepadding, 2);
        // widest command line: "help|-[-]?h(elp)?" (17 chars) -> 18
        assert_eq!(groups[1].1.padding, 18);

        assert_eq!(
            groups[1].1.entries[1],
            GroupEntry {
                human_readable: "-l\napi subsets( ls)?".into(),
                help: None,
                hidden: false,
            }
        );
    }

    #[test]
    fn long_only_rules_are_left_aligned() {
        let mut registry = Registry::default();
        registry.register("version", RuleSpec::new().long("--version"), &options()).unwrap();
        let rule = registry.iter().next().unwrap().1;
        assert_eq!(rule.human_readable, "    --version");
    }

    #[test]
    fn explicit_human_readable_wins_over_derivation() {
        let mut registry = Registry::default();
        registry
            .register("alt", RuleSpec::new().short("-v(?<V>E|T|ET|TE)").human_readable("-v(E|T|ET)"), &options())
            .unwrap();
        assert_eq!(registry.iter().next().unwrap().1.human_readable, "-v(E|T|ET)");
    }

    #[test]
    fn reregistering_replaces_in_place_and_appends_a_display_record() {
        let mut registry = Registry::default();
        registry.register("flag", RuleSpec::new().short("-a"), &options()).unwrap();
        registry.register("other", RuleSpec::new().short("-b"), &options()).unwrap();
        registry.register("flag", RuleSpec::new().short("-z"), &options()).unwrap();

        let ids: Vec<&str> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["flag", "other"]);
        assert!(registry.iter().next().unwrap().1.pattern(PatternKind::Short).unwrap().is_match("-z"));
        assert_eq!(registry.groups()[0].1.entries.len(), 3);
    }
}
