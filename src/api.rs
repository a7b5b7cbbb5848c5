//! Public matcher API.

use crate::engine::{ParseRun, ParseState};
use crate::error::SetupError;
use crate::help::{DefaultTemplate, HelpContext, HelpTemplate};
use crate::registry::{Group, Registry};
use crate::spec::RuleSpec;
use crate::values::{Scalar, Value};
use std::collections::HashMap;

/// Group name given to rules that do not declare one.
///
/// Distinct from "every rule": [`Matcher::group_values`] with this selector
/// returns only the explicitly ungrouped rules, while
/// [`Matcher::all_values`] merges everything.
pub const UNGROUPED: &str = "_";

/// Options that affect matching and help rendering.
#[derive(Debug, Clone)]
pub struct Options {
    /// Joins the short and long display forms of a rule (newline gives the
    /// classic two-line layout).
    pub long_short_delimiter: String,
    /// Fill character for help alignment.
    pub param_description_spacer: char,
    /// Left indent of each group's help entries.
    pub pre_padding_spaces: usize,
    /// Extra left padding for rules that only have a long form.
    pub align_long_if_no_short: usize,
    /// Short-circuit parsing on the first (leftmost) stop-rule match: only
    /// that rule's effect survives and normal rules are never evaluated.
    pub exit_on_stop: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            long_short_delimiter: "\n".into(),
            param_description_spacer: '.',
            pre_padding_spaces: 2,
            align_long_if_no_short: 4,
            exit_on_stop: false,
        }
    }
}

/// A declarative argument matcher.
///
/// Construction compiles the rule set once; [`parse`](Matcher::parse) can
/// then be called any number of times, each call resetting the result state
/// first. A matcher is not meant for concurrent use: parsing mutates the
/// result state in place, which is why it takes `&mut self`; use one
/// instance per logical thread of control.
///
/// ```
/// use argosy::{Matcher, Options, Scalar};
///
/// let rules = argosy::rules! {
///     dashE: { short: "-e", help: "equivalent to -vE" },
///     showEnds: { short: "-E", long: "--show-ends", help: "display $ at end of each line" },
/// };
/// let mut cat = Matcher::new(rules, Options::default()).unwrap();
///
/// assert_eq!(cat.parse(&["-e", "-E"]), "");
/// assert_eq!(cat.all_values()["dashE"], Scalar::Flag(true));
/// assert_eq!(cat.all_values()["showEnds"], Scalar::Flag(true));
/// ```
#[derive(Debug)]
pub struct Matcher {
    registry: Registry,
    opts: Options,
    state: ParseState,
}

impl Matcher {
    /// Compile a rule set.
    ///
    /// `rules` is an ordered sequence of `(id, spec)` pairs; the order drives
    /// match iteration, aggregate merging, and help ordering. The first
    /// invalid rule aborts construction; a matcher never exists partially
    /// configured.
    pub fn new<I, S>(rules: I, opts: Options) -> Result<Self, SetupError>
    where
        I: IntoIterator<Item = (S, RuleSpec)>,
        S: Into<String>,
    {
        let mut registry = Registry::default();
        for (id, spec) in rules {
            let id = id.into();
            registry.register(&id, spec, &opts)?;
        }
        let mut matcher = Matcher { registry, opts, state: ParseState::default() };
        matcher.reset();
        Ok(matcher)
    }

    /// Parse an argument list.
    ///
    /// Resets all result state, applies stop rules, then iterates the normal
    /// rules to a fixed point. Returns whatever matched no rule: surviving
    /// tokens joined by [`TOKEN_SEPARATOR`](crate::TOKEN_SEPARATOR), which
    /// callers should treat as whitespace. Text cut off by a stop rule is
    /// available from [`remainder`](Matcher::remainder) afterwards.
    pub fn parse<S: AsRef<str>>(&mut self, args: &[S]) -> String {
        let tokens: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
        ParseRun::new(&self.registry, &self.opts, &mut self.state).run(&tokens)
    }

    /// Reinitialize every rule's value to its configured default.
    pub fn reset(&mut self) {
        self.state.reset(&self.registry);
    }

    /// Everything discarded behind the last parse's stop-rule match.
    pub fn remainder(&self) -> &str {
        &self.state.remainder
    }

    /// Full value of one rule; `None` for an unknown id.
    pub fn value(&self, id: &str) -> Option<&Value> {
        self.state.slots.get(id).map(|slot| &slot.value)
    }

    /// Value of one capture group of one rule; `None` for an unknown id, a
    /// rule without a composite value, or a missing group name.
    pub fn capture(&self, id: &str, name: &str) -> Option<&Scalar> {
        self.value(id)?.get(name)
    }

    /// Merge the values of every rule in `group` into a flat map: composite
    /// values are spread key-by-key (later rules win on collision), scalar
    /// values land under the rule id. An unknown group yields an empty map.
    pub fn group_values(&self, group: &str) -> HashMap<String, Scalar> {
        self.collect_values(Some(group))
    }

    /// Merge the values of every rule, as [`group_values`](Matcher::group_values)
    /// does for a single group.
    pub fn all_values(&self) -> HashMap<String, Scalar> {
        self.collect_values(None)
    }

    fn collect_values(&self, group: Option<&str>) -> HashMap<String, Scalar> {
        let mut merged = HashMap::new();
        for (id, rule) in self.registry.iter() {
            if group.is_some_and(|name| rule.group != name) {
                continue;
            }
            let Some(slot) = self.state.slots.get(id) else { continue };
            match &slot.value {
                Value::Flag(flag) => {
                    merged.insert(id.to_string(), Scalar::Flag(*flag));
                }
                Value::Captures(map) => {
                    for (name, scalar) in map {
                        merged.insert(name.clone(), scalar.clone());
                    }
                }
            }
        }
        merged
    }

    /// Display groups in registration order, with their alignment metadata.
    pub fn groups(&self) -> &[(String, Group)] {
        self.registry.groups()
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Render help with the built-in [`DefaultTemplate`].
    pub fn generate_help(&self, ctx: &HelpContext) -> String {
        self.generate_help_with(ctx, &DefaultTemplate)
    }

    /// Render help with a custom [`HelpTemplate`].
    pub fn generate_help_with<T: HelpTemplate>(&self, ctx: &HelpContext, template: &T) -> String {
        template.render(ctx, self.registry.groups(), &self.opts)
    }
}
