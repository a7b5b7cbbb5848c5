//! Top-level parse pipeline.
//!
//! A [`ParseRun`] borrows the compiled rules, the options, and the mutable
//! per-parse state, and drives one full parse:
//!
//! ```text
//! run(tokens)
//!   ├─ join tokens with TOKEN_SEPARATOR (separator stripped from content)
//!   ├─ ParseState::reset
//!   ├─ stop-rule pre-scan (match anywhere; leftmost start wins)
//!   │    └─ split: [ working | stop match | remainder ]
//!   └─ fixed-point loop over non-stop rules in registration order
//!        └─ strip each consumed span, trim, repeat until unchanged
//! ```
//!
//! With `exit_on_stop` set, the pre-scan snapshots and resets the result
//! state around every improving stop candidate, so only the leftmost stop
//! rule's effect survives and the truncated working string is returned
//! without evaluating any normal rule.

use super::state::ParseState;
use crate::TOKEN_SEPARATOR;
use crate::api::Options;
use crate::registry::Registry;

pub(crate) struct ParseRun<'a> {
    registry: &'a Registry,
    opts: &'a Options,
    state: &'a mut ParseState,
}

impl<'a> ParseRun<'a> {
    pub fn new(registry: &'a Registry, opts: &'a Options, state: &'a mut ParseState) -> Self {
        ParseRun { registry, opts, state }
    }

    /// Parse `tokens`, returning the leftover string that matched no rule.
    pub fn run(self, tokens: &[&str]) -> String {
        let debug = std::env::var_os("ARGOSY_DEBUG_RULES").is_some();
        let mut working = join_tokens(tokens);
        self.state.reset(self.registry);

        // Stop-rule pre-scan: anything behind the leftmost stop match can be
        // set aside before the normal rules ever run.
        let mut min_start = working.len();
        let mut stop_len = 0usize;
        let mut saved = None;
        for (id, rule) in self.registry.iter() {
            if !rule.is_stop() {
                continue;
            }
            if self.state.apply_rule(id, rule, &working, working.len()) {
                let Some(trace) = self.state.trace(id) else { continue };
                if trace.start < min_start {
                    min_start = trace.start;
                    stop_len = trace.found.len();
                    if self.opts.exit_on_stop {
                        saved = Some(self.state.snapshot());
                        self.state.reset(self.registry);
                    }
                }
            }
        }

        if min_start != working.len() {
            // Offsets can come from a candidate an earlier pattern of the
            // same rule already sliced; snap before cutting the string.
            let head = snap(&working, min_start);
            let cut = snap(&working, min_start + stop_len);
            self.state.remainder = working[cut..].to_string();
            working.truncate(head);
            if debug {
                eprintln!("[stop] working={working:?} remainder={:?}", self.state.remainder);
            }
            if self.opts.exit_on_stop {
                if let Some(slots) = saved {
                    self.state.restore(slots);
                }
                return working;
            }
        }

        // Fixed-point loop: a pass that strips nothing leaves the string
        // unchanged and ends the iteration.
        let mut previous = working.clone();
        loop {
            for (id, rule) in self.registry.iter() {
                if rule.is_stop() {
                    continue;
                }
                if self.state.apply_rule(id, rule, &working, 0) {
                    let found = self.state.trace(id).map(|trace| trace.found.clone()).unwrap_or_default();
                    if debug {
                        eprintln!("[strip] rule=\"{id}\" found={found:?} working={working:?}");
                    }
                    if !found.is_empty() {
                        working = working.replacen(&found, "", 1);
                    }
                }
            }
            working = working.trim_matches(|c: char| c.is_whitespace() || c == TOKEN_SEPARATOR).to_string();
            if working == previous {
                break;
            }
            previous.clone_from(&working);
        }

        working
    }
}

/// Join tokens with the separator, stripping any separator characters a
/// caller-built token might carry (OS argv can never contain them).
fn join_tokens(tokens: &[&str]) -> String {
    let mut joined = String::new();
    for (index, token) in tokens.iter().enumerate() {
        if index > 0 {
            joined.push(TOKEN_SEPARATOR);
        }
        if token.contains(TOKEN_SEPARATOR) {
            joined.extend(token.chars().filter(|&c| c != TOKEN_SEPARATOR));
        } else {
            joined.push_str(token);
        }
    }
    joined
}

/// Clamp `index` to `text` and walk it back onto a char boundary.
fn snap(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_uses_the_separator_and_strips_it_from_content() {
        assert_eq!(join_tokens(&["a", "b c", "d"]), "a\u{0}b c\u{0}d");
        assert_eq!(join_tokens(&[]), "");
        assert_eq!(join_tokens(&["a\u{0}b"]), "ab");
    }

    #[test]
    fn snap_respects_char_boundaries() {
        let text = "héllo";
        assert_eq!(snap(text, 2), 1); // inside 'é'
        assert_eq!(snap(text, 99), text.len());
    }
}
