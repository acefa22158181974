//! Dynamic dependency values and structural equality.
//!
//! Effect dependencies are heterogeneous: a hook callsite may condition on an
//! id, a string, and a whole config map at once. `DepValue` keeps that
//! flexibility as a tagged union instead of forcing every callsite onto one
//! concrete type.
//!
//! Equality is structural, not referential and not serialization-based:
//! sequences compare element-wise in order, maps compare as key sets (key
//! order never matters), and values that carry no comparable structure
//! (`Opaque`) always compare unequal.

use std::any::Any;
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;

/// An ordered dependency sequence. Callsites rarely have more than a handful
/// of dependencies, so the common case stays inline.
pub type Deps = SmallVec<[DepValue; 4]>;

/// A dependency element: atomic, structured, or opaque.
#[derive(Clone)]
pub enum DepValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<DepValue>),
    /// Insertion order is preserved for display but ignored by equality.
    Map(IndexMap<String, DepValue>),
    /// A value with no comparable structure. Always unequal, even to itself,
    /// so an opaque dependency re-fires its effect on every cycle.
    Opaque(Rc<dyn Any>),
}

impl DepValue {
    /// Wraps an arbitrary value as an always-unequal dependency.
    pub fn opaque<T: Any>(value: T) -> Self {
        DepValue::Opaque(Rc::new(value))
    }

    /// Builds a `Map` value from key/value pairs, keeping insertion order.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<DepValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        DepValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Recursive structural equality over two dependency elements.
///
/// Floats compare by bit pattern so a NaN dependency is stable across cycles
/// rather than counting as changed every time. Values of different variants
/// are unequal; no coercion (`Int(1)` != `Float(1.0)`).
pub fn structural_eq(a: &DepValue, b: &DepValue) -> bool {
    match (a, b) {
        (DepValue::Null, DepValue::Null) => true,
        (DepValue::Bool(a), DepValue::Bool(b)) => a == b,
        (DepValue::Int(a), DepValue::Int(b)) => a == b,
        (DepValue::Float(a), DepValue::Float(b)) => a.to_bits() == b.to_bits(),
        (DepValue::Str(a), DepValue::Str(b)) => a == b,
        (DepValue::Seq(a), DepValue::Seq(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| structural_eq(x, y))
        }
        (DepValue::Map(a), DepValue::Map(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|w| structural_eq(v, w)))
        }
        _ => false,
    }
}

/// Whether a dependency sequence changed relative to the previous cycle's.
///
/// A length change counts as changed: there is no sensible element-wise
/// answer for the out-of-range indices, so the whole sequence is treated as
/// different.
pub fn deps_changed(prev: &[DepValue], current: &[DepValue]) -> bool {
    prev.len() != current.len()
        || prev
            .iter()
            .zip(current)
            .any(|(a, b)| !structural_eq(a, b))
}

impl PartialEq for DepValue {
    fn eq(&self, other: &Self) -> bool {
        structural_eq(self, other)
    }
}

impl std::fmt::Debug for DepValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepValue::Null => f.write_str("Null"),
            DepValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            DepValue::Int(v) => f.debug_tuple("Int").field(v).finish(),
            DepValue::Float(v) => f.debug_tuple("Float").field(v).finish(),
            DepValue::Str(v) => f.debug_tuple("Str").field(v).finish(),
            DepValue::Seq(v) => f.debug_tuple("Seq").field(v).finish(),
            DepValue::Map(v) => {
                let mut m = f.debug_map();
                for (k, val) in v {
                    m.entry(k, val);
                }
                m.finish()
            }
            DepValue::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<()> for DepValue {
    fn from(_: ()) -> Self {
        DepValue::Null
    }
}
impl From<bool> for DepValue {
    fn from(v: bool) -> Self {
        DepValue::Bool(v)
    }
}
impl From<i32> for DepValue {
    fn from(v: i32) -> Self {
        DepValue::Int(v as i64)
    }
}
impl From<i64> for DepValue {
    fn from(v: i64) -> Self {
        DepValue::Int(v)
    }
}
impl From<u32> for DepValue {
    fn from(v: u32) -> Self {
        DepValue::Int(v as i64)
    }
}
impl From<usize> for DepValue {
    fn from(v: usize) -> Self {
        DepValue::Int(v as i64)
    }
}
impl From<f32> for DepValue {
    fn from(v: f32) -> Self {
        DepValue::Float(v as f64)
    }
}
impl From<f64> for DepValue {
    fn from(v: f64) -> Self {
        DepValue::Float(v)
    }
}
impl From<&str> for DepValue {
    fn from(v: &str) -> Self {
        DepValue::Str(v.to_owned())
    }
}
impl From<String> for DepValue {
    fn from(v: String) -> Self {
        DepValue::Str(v)
    }
}
impl<T: Into<DepValue>> From<Vec<T>> for DepValue {
    fn from(v: Vec<T>) -> Self {
        DepValue::Seq(v.into_iter().map(Into::into).collect())
    }
}
impl<T: Into<DepValue>> From<Option<T>> for DepValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(DepValue::Null)
    }
}

/// Builds a [`Deps`] sequence from anything convertible into [`DepValue`]:
///
/// ```rust
/// use keepsake_core::{deps, value::DepValue};
///
/// let d = deps![42, "name", DepValue::map([("retries", 3)])];
/// assert_eq!(d.len(), 3);
/// ```
#[macro_export]
macro_rules! deps {
    () => { $crate::value::Deps::new() };
    ($($dep:expr),+ $(,)?) => {{
        let mut d = $crate::value::Deps::new();
        $( d.push($crate::value::DepValue::from($dep)); )+
        d
    }};
}

#[cfg(feature = "serde")]
impl serde::Serialize for DepValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};
        match self {
            DepValue::Null => serializer.serialize_unit(),
            DepValue::Bool(v) => serializer.serialize_bool(*v),
            DepValue::Int(v) => serializer.serialize_i64(*v),
            DepValue::Float(v) => serializer.serialize_f64(*v),
            DepValue::Str(v) => serializer.serialize_str(v),
            DepValue::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DepValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            // opaque values have no stable representation
            DepValue::Opaque(_) => serializer.serialize_unit(),
        }
    }
}
