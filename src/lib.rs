//! argosy: a declarative, regex-driven command-line argument matcher.
//!
//! Callers describe their command line as a set of named *rules* (a short
//! and/or long regex pattern, optional named capture groups, default values,
//! display grouping, multi-occurrence semantics) and hand the matcher an
//! already-tokenized argument list. The matcher joins the tokens, repeatedly
//! applies every rule until nothing more can be consumed, and exposes the
//! captured values through typed accessors. Whatever matched no rule is
//! returned as a leftover string; a *stop rule* (think `--`) truncates the
//! parse and sets aside everything behind it as a remainder.
//!
//! ```
//! use argosy::{Matcher, Options, RuleSpec};
//!
//! let rules = vec![
//!     ("verbose".to_string(), RuleSpec::new().short("-v").long("--verbose").help("chatty output")),
//!     ("output".to_string(), RuleSpec::new().short(r"-o[= ](?<file>[^\s\x00]+)").help("write to <file>")),
//! ];
//! let mut matcher = Matcher::new(rules, Options::default()).unwrap();
//!
//! let leftover = matcher.parse(&["-v", "-o", "out.txt", "input.txt"]);
//! assert_eq!(leftover, "input.txt");
//! assert_eq!(matcher.capture("output", "file").unwrap().as_text(), Some("out.txt"));
//! ```

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod help;
mod registry;
mod spec;
mod values;


pub use api::{Matcher, Options, UNGROUPED};
pub use error::SetupError;
pub use help::{DefaultTemplate, HelpContext, HelpTemplate, pad_entry};
pub use registry::{Group, GroupEntry};
pub use spec::{Defaults, PatternSource, RuleSpec};
pub use values::{Scalar, Value};

// --- Token separator --------------------------------------------------------

/// Separator used to join argument tokens into the working string.
///
/// NUL is the one character an OS-provided `argv` entry can never contain
/// (argv strings are themselves NUL-terminated), so it can delimit tokens
/// without ever colliding with their content. The leftover string returned by
/// [`Matcher::parse`] uses this separator between surviving tokens; treat it
/// as whitespace-equivalent when displaying or re-splitting.
pub const TOKEN_SEPARATOR: char = '\0';

/// Character class matching a token boundary: any whitespace or the
/// separator. Literal patterns are anchored with this on both sides.
pub(crate) const BOUNDARY_CLASS: &str = r"[\s\x00]";
