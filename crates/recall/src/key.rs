// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Deterministic cache keys derived from a call's operation name and arguments.

use std::fmt;
use std::sync::Arc;

/// A deterministic cache key identifying one logical call.
///
/// A key is derived from an operation name and the ordered arguments of the
/// call via [`CallKey::for_call`]. Derivation is pure: the same operation
/// invoked with equal arguments always yields an equal key, on any process or
/// host, so independently built keys address the same stored result.
///
/// Keys are cheap to clone and hand out; the underlying text is shared.
///
/// # Key text
///
/// The key text is the operation name immediately followed by the arguments
/// rendered as canonical JSON: compact (no whitespace) and with object keys in
/// sorted order, so the rendering is independent of field declaration or map
/// iteration order.
///
/// ```
/// use recall::CallKey;
///
/// let key = CallKey::for_call("find_jobs", &(2, 10))?;
/// assert_eq!(key.as_str(), "find_jobs[2,10]");
/// # Ok::<(), recall::KeyError>(())
/// ```
///
/// Two renderings deserve a caveat: a unit argument list renders as `null`,
/// and non-finite floats (`NaN`, infinities) also render as `null`, so calls
/// differing only in which non-finite float they pass share a key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallKey {
    text: Arc<str>,
}

impl CallKey {
    /// Derives the key for `operation` invoked with `arguments`.
    ///
    /// `arguments` is typically a tuple of the call's arguments in order, but
    /// any serializable type works. Argument order and argument types are
    /// significant: `(2, 10)` and `(10, 2)` produce different keys, as do
    /// `1` and `"1"`.
    ///
    /// # Errors
    ///
    /// Fails when `arguments` cannot be serialized, for example a map whose
    /// keys have no string form. Such a call cannot be cached and the error
    /// should be treated as fatal rather than retried.
    pub fn for_call<A>(operation: &str, arguments: &A) -> Result<Self, KeyError>
    where
        A: serde::Serialize + ?Sized,
    {
        // Canonicalization happens in the value model: serde_json maps are
        // sorted, and Display renders compactly.
        let canonical = serde_json::to_value(arguments).map_err(|source| KeyError {
            operation: operation.to_string(),
            source,
        })?;

        let rendered = canonical.to_string();
        let mut text = String::with_capacity(operation.len() + rendered.len());
        text.push_str(operation);
        text.push_str(&rendered);

        Ok(Self { text: text.into() })
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for CallKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for CallKey {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// The error returned when no cache key can be derived for a call.
///
/// Key derivation fails only when the arguments cannot be serialized. This is
/// a defect in the call signature, not a transient condition: the same call
/// will fail the same way every time, so callers should surface it instead of
/// retrying.
#[derive(Debug, thiserror::Error)]
#[error("cannot derive a cache key for `{operation}`: {source}")]
pub struct KeyError {
    operation: String,
    #[source]
    source: serde_json::Error,
}

impl KeyError {
    /// Returns the name of the operation whose key could not be derived.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;

    #[test]
    fn text_is_operation_then_compact_arguments() {
        let key = CallKey::for_call("find_jobs", &(2, 10)).expect("key should build");

        assert_eq!(key.as_str(), "find_jobs[2,10]");
        assert_eq!(key.to_string(), "find_jobs[2,10]");
    }

    #[test]
    fn equal_calls_produce_equal_keys() {
        let first = CallKey::for_call("find_jobs", &(2, 10)).expect("key should build");
        let second = CallKey::for_call("find_jobs", &(2, 10)).expect("key should build");

        assert_eq!(first, second);
    }

    #[test]
    fn operation_name_is_significant() {
        let find = CallKey::for_call("find_jobs", &(2, 10)).expect("key should build");
        let count = CallKey::for_call("count_jobs", &(2, 10)).expect("key should build");

        assert_ne!(find, count);
    }

    #[test]
    fn argument_order_is_significant() {
        let forward = CallKey::for_call("find_jobs", &(2, 10)).expect("key should build");
        let reversed = CallKey::for_call("find_jobs", &(10, 2)).expect("key should build");

        assert_ne!(forward, reversed);
    }

    #[test]
    fn argument_types_are_significant() {
        let number = CallKey::for_call("lookup", &(1,)).expect("key should build");
        let string = CallKey::for_call("lookup", &("1",)).expect("key should build");

        assert_ne!(number, string);
    }

    #[test]
    fn unit_arguments_render_as_null() {
        let key = CallKey::for_call("list_all", &()).expect("key should build");

        assert_eq!(key.as_str(), "list_allnull");
    }

    #[test]
    fn map_arguments_render_with_sorted_keys() {
        // HashMap iteration order is arbitrary; the rendered key must not be.
        let arguments = HashMap::from([("b", 2), ("a", 1)]);

        let key = CallKey::for_call("lookup", &arguments).expect("key should build");

        assert_eq!(key.as_str(), r#"lookup{"a":1,"b":2}"#);
    }

    #[test]
    fn struct_fields_render_in_sorted_order() {
        #[derive(serde::Serialize)]
        struct Filter {
            status: &'static str,
            page: u32,
        }

        let key = CallKey::for_call(
            "find_jobs",
            &Filter {
                status: "open",
                page: 3,
            },
        )
        .expect("key should build");

        assert_eq!(key.as_str(), r#"find_jobs{"page":3,"status":"open"}"#);
    }

    #[test]
    fn non_finite_floats_render_as_null() {
        let nan = CallKey::for_call("score", &(f64::NAN,)).expect("key should build");
        let infinity = CallKey::for_call("score", &(f64::INFINITY,)).expect("key should build");

        assert_eq!(nan.as_str(), "score[null]");
        // Both non-finite values collapse onto the same key.
        assert_eq!(nan, infinity);
    }

    #[test]
    fn unserializable_arguments_report_the_operation() {
        // Tuple map keys have no JSON string form.
        let arguments = BTreeMap::from([((1, 2), "value")]);

        let error = CallKey::for_call("broken", &arguments).expect_err("tuple keys cannot serialize");

        assert_eq!(error.operation(), "broken");
        assert!(error.to_string().contains("broken"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn clones_compare_equal_and_hash_alike() {
        let key = CallKey::for_call("find_jobs", &(2, 10)).expect("key should build");
        let copy = key.clone();

        let mut map = HashMap::new();
        let _: Option<i32> = map.insert(key, 1);

        assert_eq!(map.get(&copy), Some(&1));
    }
}
