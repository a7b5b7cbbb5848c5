/// Errors reported while a rule set is being registered.
///
/// These are the setup failures of [`crate::Matcher::new`]: a matcher is
/// never handed out partially configured, so the first failing rule aborts
/// construction.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("rule '{id}' must define at least a 'short' or 'long' pattern")]
    MissingPattern { id: String },

    #[error("rule '{id}' has an invalid {kind} pattern")]
    InvalidPattern {
        id: String,
        kind: &'static str,
        #[source]
        source: regex::Error,
    },
}
