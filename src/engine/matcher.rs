//! Single-rule match attempt.
//!
//! One [`ParseState::apply_rule`] call answers: does this rule match the
//! candidate string, and what does it capture? The short and long patterns
//! are tried independently in that order, each consuming the candidate from
//! wherever the previous attempt left off:
//!
//! ```text
//! candidate ── short ── match? ──┬─ named groups ── store/append values
//!     │                          ├─ capture_multiple ── rescan matched span
//!     │                          └─ neither ── value = Flag(true)
//!     └────── long  ── (same, against the remaining candidate)
//! ```
//!
//! Position handling is deliberately a pure function
//! ([`find_at_or_before`]): leftmost match, accepted only when it starts at
//! or before the allowed offset. No cursor state lives in the regexes.
//! Normal parsing passes an allowed offset of `0` (the rule must match at
//! the head of the working string); the stop-rule pre-scan passes the string
//! length to accept a match anywhere.

use super::state::{MatchTrace, ParseState};
use crate::registry::{PatternKind, Rule};
use crate::values::Scalar;
use regex::{Captures, Regex};

/// Leftmost match of `re` in `hay`, accepted only if it starts at or before
/// `allow_start`.
pub(crate) fn find_at_or_before<'t>(re: &Regex, hay: &'t str, allow_start: usize) -> Option<Captures<'t>> {
    let caps = re.captures(hay)?;
    let start = caps.get(0).map(|m| m.start())?;
    if start <= allow_start { Some(caps) } else { None }
}

impl ParseState {
    /// Try `rule` against `candidate`, recording captures and consumed text.
    ///
    /// Returns whether any pattern of the rule matched. The consumed text is
    /// left in the rule's [`MatchTrace::found`] for the caller to strip from
    /// the working string.
    pub(crate) fn apply_rule(&mut self, id: &str, rule: &Rule, candidate: &str, allow_start: usize) -> bool {
        let debug = std::env::var_os("ARGOSY_DEBUG_RULES").is_some();
        let has_capture_multi = rule.capture_multiple.is_some();
        // Accumulated values survive repeated calls only for multiple rules;
        // everything else discards them on its first capturing sub-match.
        let clean_existing = !rule.is_multiple();
        let mut matched = false;
        let mut hay = candidate;

        for kind in [PatternKind::Short, PatternKind::Long] {
            let Some(primary) = rule.pattern(kind) else { continue };
            let mut current = primary;
            let mut first_round = true;

            loop {
                let Some(caps) = find_at_or_before(current, hay, allow_start) else { break };
                let whole = caps.get(0).expect("group 0 always participates");
                if debug {
                    eprintln!(
                        "[match] rule=\"{id}\" kind={} re=\"{}\" text={:?} start={}",
                        kind.label(),
                        current.as_str(),
                        whole.as_str(),
                        whole.start()
                    );
                }
                matched = true;

                let slot = self.slots.get_mut(id).expect("slot exists for every registered rule");
                match &mut slot.trace {
                    Some(trace) if has_capture_multi => trace.temp.push_str(whole.as_str()),
                    trace => {
                        *trace = Some(MatchTrace {
                            start: whole.start(),
                            temp: whole.as_str().to_string(),
                            found: String::new(),
                        })
                    }
                }

                let names: Vec<&str> = current.capture_names().flatten().collect();
                if !names.is_empty() {
                    let map = slot.value.captures_mut(first_round && clean_existing);
                    first_round = false;
                    for name in names {
                        let captured = caps.name(name).map(|m| m.as_str()).unwrap_or("");
                        let effective = if captured.is_empty() {
                            rule.defaults.for_name(name).unwrap_or("").to_string()
                        } else {
                            captured.to_string()
                        };
                        if rule.is_multiple() || has_capture_multi {
                            match map.entry(name.to_string()).or_insert_with(|| Scalar::List(Vec::new())) {
                                Scalar::List(items) => items.push(effective),
                                other => *other = Scalar::List(vec![effective]),
                            }
                        } else {
                            map.insert(name.to_string(), Scalar::Text(effective));
                        }
                    }
                } else if !has_capture_multi {
                    slot.value = crate::values::Value::Flag(true);
                }

                let consumed_to = whole.end();
                let was_empty = whole.range().is_empty();
                hay = &hay[consumed_to..];
                if has_capture_multi {
                    // An empty sub-match cannot make progress; stop rather
                    // than rescan the same position forever.
                    if was_empty {
                        break;
                    }
                    current = rule.capture_multiple.as_ref().expect("has_capture_multi checked");
                } else {
                    break;
                }
            }

            if let Some(trace) = self.slots.get_mut(id).and_then(|slot| slot.trace.as_mut()) {
                trace.found.clone_from(&trace.temp);
                if has_capture_multi {
                    trace.temp.clear();
                }
            }
        }

        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Options;
    use crate::registry::Registry;
    use crate::spec::RuleSpec;
    use crate::values::Value;

    fn setup(rules: Vec<(&str, RuleSpec)>) -> (Registry, ParseState) {
        let opts = Options::default();
        let mut registry = Registry::default();
        for (id, spec) in rules {
            registry.register(id, spec, &opts).unwrap();
        }
        let mut state = ParseState::default();
        state.reset(&registry);
        (registry, state)
    }

    #[test]
    fn find_at_or_before_bounds_the_match_start() {
        let re = Regex::new(r"-E").unwrap();
        assert!(find_at_or_before(&re, "-E", 0).is_some());
        assert!(find_at_or_before(&re, "-e\u{0}-E", 0).is_none());
        assert!(find_at_or_before(&re, "-e\u{0}-E", 10).is_some());
        // repeated calls are position-independent
        assert!(find_at_or_before(&re, "-e\u{0}-E", 0).is_none());
    }

    #[test]
    fn capture_less_match_sets_the_flag() {
        let (registry, mut state) = setup(vec![("ends", RuleSpec::new().short("-E"))]);
        let rule = registry.iter().next().unwrap().1;

        assert!(state.apply_rule("ends", rule, "-E", 0));
        assert_eq!(state.slots["ends"].value, Value::Flag(true));
        assert_eq!(state.trace("ends").unwrap().found, "-E");
    }

    #[test]
    fn empty_capture_takes_the_configured_default() {
        let (registry, mut state) = setup(vec![(
            "pair",
            RuleSpec::new().short(r"-e (?<key>\w+)?:(?<value>\w+)?").values([("key", "dk"), ("value", "dv")]),
        )]);
        let rule = registry.iter().next().unwrap().1;

        assert!(state.apply_rule("pair", rule, "-e\u{0}:v1", 0));
        assert_eq!(state.slots["pair"].value.get("key"), Some(&Scalar::Text("dk".into())));
        assert_eq!(state.slots["pair"].value.get("value"), Some(&Scalar::Text("v1".into())));
    }

    #[test]
    fn multiple_rules_append_across_calls() {
        let (registry, mut state) =
            setup(vec![("item", RuleSpec::new().short(r"-i (?<item>\w+)").multiple(true))]);
        let rule = registry.iter().next().unwrap().1;

        assert!(state.apply_rule("item", rule, "-i\u{0}a", 0));
        assert!(state.apply_rule("item", rule, "-i\u{0}b", 0));
        assert_eq!(
            state.slots["item"].value.get("item"),
            Some(&Scalar::List(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn non_multiple_rules_discard_previous_captures() {
        let (registry, mut state) = setup(vec![("topic", RuleSpec::new().short(r"-t (?<topic>\w+)"))]);
        let rule = registry.iter().next().unwrap().1;

        assert!(state.apply_rule("topic", rule, "-t\u{0}first", 0));
        assert!(state.apply_rule("topic", rule, "-t\u{0}second", 0));
        assert_eq!(state.slots["topic"].value.get("topic"), Some(&Scalar::Text("second".into())));
    }

    #[test]
    fn capture_multiple_rescans_the_consumed_span() {
        let (registry, mut state) = setup(vec![(
            "kv",
            RuleSpec::new().short("-a ").capture_multiple(r"(?<k>\w+)?:(?<v>\w+)?,?"),
        )]);
        let rule = registry.iter().next().unwrap().1;

        assert!(state.apply_rule("kv", rule, "-a\u{0}k1:v1,k2:v2", 0));
        assert_eq!(state.slots["kv"].value.get("k"), Some(&Scalar::List(vec!["k1".into(), "k2".into()])));
        assert_eq!(state.trace("kv").unwrap().found, "-a\u{0}k1:v1,k2:v2");
        // temp is spent once found is published
        assert_eq!(state.trace("kv").unwrap().temp, "");
    }

    #[test]
    fn no_match_leaves_state_untouched() {
        let (registry, mut state) = setup(vec![("ends", RuleSpec::new().short("-E"))]);
        let rule = registry.iter().next().unwrap().1;

        assert!(!state.apply_rule("ends", rule, "-x", 0));
        assert_eq!(state.slots["ends"].value, Value::Flag(false));
    }
}
