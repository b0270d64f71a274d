use std::{borrow::Cow, fmt};

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

/// An opaque physical unit label, such as `"kg/s"` or `"m**3/(m**2*s)"`.
///
/// Units are compared by exact string identity. No algebraic normalization
/// takes place, so `"m/s"` and `"s**-1*m"` are different units.
///
/// # Example
///
/// ```
/// use unitcheck_core::Unit;
///
/// let velocity = Unit::from("m/s");
/// assert_eq!(velocity, "m/s");
/// assert_ne!(velocity, Unit::from("s**-1*m"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize), serde(transparent))]
pub struct Unit(Cow<'static, str>);

impl Unit {
    /// Creates a unit from an owned or borrowed label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(Cow::Owned(label.into()))
    }

    /// Creates a unit from a static label without allocating.
    #[must_use]
    pub const fn from_static(label: &'static str) -> Self {
        Self(Cow::Borrowed(label))
    }

    /// Returns the label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the label is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Unit {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&'static str> for Unit {
    fn from(label: &'static str) -> Self {
        Self::from_static(label)
    }
}

impl From<String> for Unit {
    fn from(label: String) -> Self {
        Self(Cow::Owned(label))
    }
}

impl PartialEq<str> for Unit {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Unit {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
