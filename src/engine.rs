//! Matching engine.
//!
//! This module is the operational core of the matcher. The registry hands it
//! compiled rules; the engine owns everything per-parse:
//!
//! ```text
//! tokens ── join with TOKEN_SEPARATOR ──┐
//!                                       │
//! rules ────────────────┐               v
//!                       │        ParseState::reset      (state.rs)
//!                       │               │
//!                       ├── stop-rule pre-scan          (parser.rs)
//!                       │     - match anywhere in the working string
//!                       │     - leftmost stop match wins
//!                       │     - remainder split off
//!                       │               │
//!                       └── fixed-point loop            (parser.rs)
//!                             - each rule matched at the string head
//!                             - consumed text stripped  (matcher.rs)
//!                             - repeat until a pass changes nothing
//!                                       │
//!                                       v
//!                            leftover string + ParseState
//! ```
//!
//! ## Responsibilities by module
//!
//! - `state.rs`: per-rule result slots, reset-to-defaults semantics, the
//!   stop-rule remainder.
//! - `matcher.rs`: the single-rule match attempt, built on a pure leftmost search with
//!   an allowed-start bound, capture extraction, default substitution, and
//!   multi-occurrence accumulation.
//! - `parser.rs`: the top-level parse pipeline (join, stop pre-scan,
//!   fixed-point iteration).
//!
//! Termination of the fixed-point loop is structural: every accepted match
//! strips its consumed text from the working string, and a pass that strips
//! nothing leaves the string unchanged, which ends the loop.
//!
//! ## Debugging
//!
//! Set `ARGOSY_DEBUG_RULES=1` to print match and strip traces to stderr.

#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/state.rs"]
mod state;

#[allow(unused_imports)]
pub(crate) use matcher::find_at_or_before;
pub(crate) use parser::ParseRun;
pub(crate) use state::ParseState;
