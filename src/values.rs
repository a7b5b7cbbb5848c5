//! Tagged value model for parse results.
//!
//! A rule's result can take several shapes (bool, string, map, or map of
//! sequences); rather than inspecting types at runtime, the shapes are two
//! explicit enums:
//!
//! - [`Value`]: the whole result of one rule, either a plain flag or a map of
//!   capture-group names.
//! - [`Scalar`]: one entry in a merged view, either a flag, a single string,
//!   or an ordered sequence of strings (for `multiple` / `capture_multiple`
//!   rules).
//!
//! Accessors pattern-match on the tags instead of inspecting runtime types.

use std::collections::HashMap;

/// One entry of a merged value view, or one capture-group value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl Scalar {
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Scalar::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Scalar::List(items) => Some(items),
            _ => None,
        }
    }
}

/// The full value of one rule after a parse (or reset).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Capture-less rule: `false` until matched, then `true` (or whatever
    /// boolean default was configured).
    Flag(bool),
    /// Rule with named captures: capture-group name to value. Accumulating
    /// rules hold [`Scalar::List`] entries.
    Captures(HashMap<String, Scalar>),
}

impl Value {
    /// Value of one capture group, if this is a composite value holding it.
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        match self {
            Value::Captures(map) => map.get(name),
            Value::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(flag) => Some(*flag),
            Value::Captures(_) => None,
        }
    }

    /// Borrow the capture map, converting a flag value into an empty map
    /// first. `clear` empties an already-composite map (the discard-previous
    /// step of a non-accumulating rule's first capturing sub-match).
    pub(crate) fn captures_mut(&mut self, clear: bool) -> &mut HashMap<String, Scalar> {
        if let Value::Flag(_) = self {
            *self = Value::Captures(HashMap::new());
        } else if clear {
            if let Value::Captures(map) = self {
                map.clear();
            }
        }
        match self {
            Value::Captures(map) => map,
            Value::Flag(_) => unreachable!("flag value was just converted to captures"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_mut_converts_flags_and_clears_on_request() {
        let mut value = Value::Flag(false);
        value.captures_mut(false).insert("a".into(), Scalar::Text("1".into()));
        assert_eq!(value.get("a"), Some(&Scalar::Text("1".into())));

        // clear=false keeps what is already there
        value.captures_mut(false).insert("b".into(), Scalar::Text("2".into()));
        assert!(value.get("a").is_some());

        // clear=true discards previous entries
        let map = value.captures_mut(true);
        assert!(map.is_empty());
    }

    #[test]
    fn scalar_projections() {
        assert_eq!(Scalar::Flag(true).as_flag(), Some(true));
        assert_eq!(Scalar::Text("x".into()).as_text(), Some("x"));
        assert_eq!(Scalar::List(vec!["a".into()]).as_list(), Some(&["a".to_string()][..]));
        assert_eq!(Scalar::Flag(true).as_text(), None);
    }
}
