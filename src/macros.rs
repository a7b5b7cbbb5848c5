#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Declare a rule set as `(id, RuleSpec)` pairs.
///
/// Each field name is a [`RuleSpec`](crate::RuleSpec) builder method; the
/// value is passed through unchanged:
///
/// ```
/// use argosy::{Matcher, Options};
///
/// let rules = argosy::rules! {
///     verbose: { short: "-v", long: "--verbose", help: "chatty output" },
///     topic: { short: r"-t[= ](?<topic>\w+)", values: [("topic", "general")] },
/// };
/// let matcher = Matcher::new(rules, Options::default()).unwrap();
/// ```
#[macro_export]
macro_rules! rules {
    ( $( $id:ident : { $( $key:ident : $value:expr ),* $(,)? } ),* $(,)? ) => {
        vec![
            $( (stringify!($id).to_string(), $crate::RuleSpec::new() $( .$key($value) )* ) ),*
        ]
    };
}
