//! Per-parse result state.
//!
//! Every parse starts by resetting one [`Slot`] per registered rule and ends
//! with the slots holding the rule values callers read through the
//! accessors. Slots also carry transient match bookkeeping ([`MatchTrace`])
//! that only lives for the duration of a single parse pass and is never part
//! of the public result.

use crate::registry::Registry;
use crate::spec::Defaults;
use crate::values::{Scalar, Value};
use std::collections::HashMap;

/// Transient bookkeeping for the latest match of one rule.
#[derive(Debug, Clone, Default)]
pub(crate) struct MatchTrace {
    /// Start offset of the match within the candidate string it ran against.
    pub start: usize,
    /// Matched text accumulated across capture-multiple sub-matches.
    pub temp: String,
    /// Total consumed text, stripped from the working string by the caller.
    pub found: String,
}

/// Result entry for one rule.
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub value: Value,
    pub trace: Option<MatchTrace>,
}

/// All per-parse state: one slot per rule plus the stop-rule remainder.
#[derive(Debug, Default)]
pub(crate) struct ParseState {
    pub slots: HashMap<String, Slot>,
    pub remainder: String,
}

impl ParseState {
    /// Reinitialize every slot to its rule's configured default.
    ///
    /// Accumulating rules (`multiple` or `capture_multiple`) start from an
    /// empty capture map instead: their occurrences must build up from
    /// nothing rather than overwrite a pre-seeded default. Defaults are
    /// copied, never shared, so repeated parses cannot contaminate each
    /// other through the rule definitions.
    pub fn reset(&mut self, registry: &Registry) {
        self.remainder.clear();
        self.slots.clear();
        for (id, rule) in registry.iter() {
            let value = if rule.accumulates() {
                Value::Captures(HashMap::new())
            } else {
                match &rule.defaults {
                    Defaults::Flag(flag) => Value::Flag(*flag),
                    Defaults::Named(map) => Value::Captures(
                        map.iter().map(|(name, text)| (name.clone(), Scalar::Text(text.clone()))).collect(),
                    ),
                }
            };
            self.slots.insert(id.to_string(), Slot { value, trace: None });
        }
    }

    pub fn snapshot(&self) -> HashMap<String, Slot> {
        self.slots.clone()
    }

    pub fn restore(&mut self, slots: HashMap<String, Slot>) {
        self.slots = slots;
    }

    pub fn trace(&self, id: &str) -> Option<&MatchTrace> {
        self.slots.get(id).and_then(|slot| slot.trace.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Options;
    use crate::spec::RuleSpec;

    fn registry() -> Registry {
        let mut registry = Registry::default();
        let opts = Options::default();
        registry.register("flag", RuleSpec::new().short("-f"), &opts).unwrap();
        registry
            .register("topic", RuleSpec::new().short(r"-t (?<topic>\w+)").values([("topic", "general")]), &opts)
            .unwrap();
        registry
            .register("many", RuleSpec::new().short(r"-m (?<item>\w+)").multiple(true).values([("item", "d")]), &opts)
            .unwrap();
        registry
    }

    #[test]
    fn reset_seeds_defaults_and_empties_accumulators() {
        let registry = registry();
        let mut state = ParseState::default();
        state.reset(&registry);

        assert_eq!(state.slots["flag"].value, Value::Flag(false));
        assert_eq!(state.slots["topic"].value.get("topic"), Some(&Scalar::Text("general".into())));
        // multiple rules are not pre-seeded
        assert_eq!(state.slots["many"].value, Value::Captures(HashMap::new()));
        assert!(state.trace("flag").is_none());
    }

    #[test]
    fn reset_copies_defaults_instead_of_sharing() {
        let registry = registry();
        let mut state = ParseState::default();
        state.reset(&registry);

        if let Value::Captures(map) = &mut state.slots.get_mut("topic").unwrap().value {
            map.insert("topic".into(), Scalar::Text("mutated".into()));
        }
        state.reset(&registry);
        assert_eq!(state.slots["topic"].value.get("topic"), Some(&Scalar::Text("general".into())));
    }
}
