//! Optional record fields that remember how they were written.
//!
//! A fetched document may leave a key out or set it to `null`, and the
//! service can treat the two differently. [`Field`] keeps that distinction
//! so a decoded record encodes back to the same JSON.

use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A JSON object member that may be absent, `null`, or carry a value.
///
/// Pair it with `#[serde(default, skip_serializing_if = "Field::is_absent")]`
/// so absent members stay absent on encode.
///
/// # Example
///
/// ```
/// use project_document::Field;
///
/// let title: Field<String> = "Map".to_owned().into();
/// assert_eq!(title.as_deref(), Some("Map"));
/// assert!(Field::<String>::Null.value().is_none());
/// assert!(Field::<String>::default().is_absent());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// The key was not present.
    Absent,
    /// The key was present with a `null` value.
    Null,
    /// The key was present with a value.
    Present(T),
}

impl<T> Field<T> {
    /// Return whether the key was left out.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Return whether the key was set to `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }

    /// Borrow the value through [`Deref`], like [`Option::as_deref`].
    #[must_use]
    pub fn as_deref(&self) -> Option<&T::Target>
    where
        T: Deref,
    {
        self.value().map(Deref::deref)
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Self::Present(value)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Present(value) => serializer.serialize_some(value),
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Self::Null, Self::Present))
    }
}
