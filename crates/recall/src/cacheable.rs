// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The policy deciding which computed results are worth storing.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// Classifies a value for the caching decision in [`should_cache`].
///
/// Implementations answer two questions about a computed result: does it
/// represent *no result at all* ([`is_absent`](Cacheable::is_absent)), and is
/// it a collection that *happens to have no elements*
/// ([`is_vacant`](Cacheable::is_vacant))? Scalars answer no to both, which the
/// default method bodies provide; an empty string is a legitimate scalar
/// value, not an empty collection.
///
/// The distinction matters because the two conditions are treated differently:
/// absent results are never stored, while vacant collections are stored only
/// when an entry for the call existed before.
pub trait Cacheable {
    /// Returns `true` if this value represents the absence of a result.
    fn is_absent(&self) -> bool {
        false
    }

    /// Returns `true` if this value is a collection holding no elements.
    fn is_vacant(&self) -> bool {
        false
    }
}

/// Decides whether a computed result should be stored.
///
/// `had_prior_value` reports whether an entry for the call existed before the
/// computation, even an expired one. The rules, in order:
///
/// 1. An absent result is never stored.
/// 2. Any other result is stored when an entry existed before; the operation
///    has already proven it produces results worth keeping.
/// 3. A vacant collection seen with no such history is not stored; it often
///    means data that simply has not arrived yet.
/// 4. Everything else is stored.
///
/// ```
/// use recall::should_cache;
///
/// assert!(should_cache(&42, false));
/// assert!(!should_cache(&Vec::<i32>::new(), false));
/// assert!(should_cache(&Vec::<i32>::new(), true));
/// assert!(!should_cache(&None::<i32>, true));
/// ```
#[must_use]
pub fn should_cache<V>(value: &V, had_prior_value: bool) -> bool
where
    V: Cacheable + ?Sized,
{
    if value.is_absent() {
        return false;
    }
    if had_prior_value {
        return true;
    }
    !value.is_vacant()
}

macro_rules! impl_cacheable_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Cacheable for $ty {}
        )*
    };
}

impl_cacheable_scalar!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, str,
    String,
);

impl<T> Cacheable for Option<T>
where
    T: Cacheable,
{
    fn is_absent(&self) -> bool {
        self.is_none()
    }

    fn is_vacant(&self) -> bool {
        self.as_ref().is_some_and(Cacheable::is_vacant)
    }
}

impl<T> Cacheable for Vec<T> {
    fn is_vacant(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Cacheable for VecDeque<T> {
    fn is_vacant(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Cacheable for [T] {
    fn is_vacant(&self) -> bool {
        self.is_empty()
    }
}

impl<T, S> Cacheable for HashSet<T, S> {
    fn is_vacant(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Cacheable for BTreeSet<T> {
    fn is_vacant(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> Cacheable for HashMap<K, V, S> {
    fn is_vacant(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> Cacheable for BTreeMap<K, V> {
    fn is_vacant(&self) -> bool {
        self.is_empty()
    }
}

impl Cacheable for serde_json::Value {
    fn is_absent(&self) -> bool {
        self.is_null()
    }

    fn is_vacant(&self) -> bool {
        match self {
            Self::Array(values) => values.is_empty(),
            Self::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

impl<T> Cacheable for &T
where
    T: Cacheable + ?Sized,
{
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }

    fn is_vacant(&self) -> bool {
        (**self).is_vacant()
    }
}

impl<T> Cacheable for Box<T>
where
    T: Cacheable + ?Sized,
{
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }

    fn is_vacant(&self) -> bool {
        (**self).is_vacant()
    }
}

impl<T> Cacheable for Arc<T>
where
    T: Cacheable + ?Sized,
{
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }

    fn is_vacant(&self) -> bool {
        (**self).is_vacant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_are_always_stored() {
        assert!(should_cache(&42, false));
        assert!(should_cache(&42, true));
        assert!(should_cache(&false, false));
        assert!(should_cache(&0.0_f64, false));
    }

    #[test]
    fn empty_string_is_a_scalar_not_a_vacant_collection() {
        assert!(should_cache(&String::new(), false));
        assert!(should_cache("", false));
    }

    #[test]
    fn absent_results_are_never_stored() {
        assert!(!should_cache(&None::<i32>, false));
        // Even a prior entry does not make absence worth keeping.
        assert!(!should_cache(&None::<i32>, true));
    }

    #[test]
    fn present_option_follows_its_content() {
        assert!(should_cache(&Some(42), false));
        assert!(!should_cache(&Some(Vec::<i32>::new()), false));
        assert!(should_cache(&Some(Vec::<i32>::new()), true));
    }

    #[test]
    fn vacant_collections_are_stored_only_with_history() {
        assert!(!should_cache(&Vec::<i32>::new(), false));
        assert!(should_cache(&Vec::<i32>::new(), true));

        assert!(!should_cache(&HashMap::<String, i32>::new(), false));
        assert!(should_cache(&HashMap::<String, i32>::new(), true));

        assert!(!should_cache(&BTreeSet::<i32>::new(), false));
        assert!(should_cache(&BTreeSet::<i32>::new(), true));
    }

    #[test]
    fn populated_collections_are_stored() {
        assert!(should_cache(&vec![1, 2, 3], false));
        assert!(should_cache(&HashMap::from([("a", 1)]), false));
    }

    #[test]
    fn json_null_is_absent() {
        assert!(!should_cache(&serde_json::Value::Null, false));
        assert!(!should_cache(&serde_json::Value::Null, true));
    }

    #[test]
    fn json_containers_follow_the_collection_rules() {
        let empty_array = serde_json::json!([]);
        let empty_object = serde_json::json!({});
        let populated = serde_json::json!({ "jobs": [1, 2] });

        assert!(!should_cache(&empty_array, false));
        assert!(should_cache(&empty_array, true));
        assert!(!should_cache(&empty_object, false));
        assert!(should_cache(&populated, false));
    }

    #[test]
    fn json_scalars_are_stored() {
        assert!(should_cache(&serde_json::json!(0), false));
        assert!(should_cache(&serde_json::json!(""), false));
        assert!(should_cache(&serde_json::json!(false), false));
    }

    #[test]
    fn smart_pointers_delegate_to_their_content() {
        assert!(!should_cache(&Box::new(Vec::<i32>::new()), false));
        assert!(should_cache(&Arc::new(vec![1]), false));
        assert!(!should_cache(&&None::<i32>, true));
    }
}
