use crate::{Measured, Unit};

/// A single argument value with an optional caller-declared unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub value: f64,
    pub unit: Option<Unit>,
}

/// Named argument values for one call of a checked formula.
///
/// Values are plain numbers. A caller may also state the unit a value is
/// expressed in. Stated units are compared against the formula's contract
/// before it is evaluated; values without a stated unit are taken to already
/// be in the contract's units.
///
/// Supplying a name that was already supplied replaces the earlier argument.
///
/// # Example
///
/// ```
/// use unitcheck_core::Arguments;
///
/// let args = Arguments::new()
///     .with_unit("L", 1.0, "kg/s")
///     .with("rhol", 1000.0)
///     .with("Ft", 2.0);
///
/// assert_eq!(args.len(), 3);
/// assert_eq!(args.get("L").unwrap().unit.as_ref().unwrap(), "kg/s");
/// assert!(args.get("rhol").unwrap().unit.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<(String, Argument)>,
}

impl Arguments {
    /// Creates an empty set of arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value without a unit annotation.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, Argument { value, unit: None });
        self
    }

    /// Adds a value annotated with the unit the caller expressed it in.
    #[must_use]
    pub fn with_unit(mut self, name: impl Into<String>, value: f64, unit: impl Into<Unit>) -> Self {
        self.insert(
            name,
            Argument {
                value,
                unit: Some(unit.into()),
            },
        );
        self
    }

    /// Adds the result of another checked formula, annotated with its unit.
    #[must_use]
    pub fn with_measured(mut self, name: impl Into<String>, measured: Measured) -> Self {
        let (value, unit) = measured.into_parts();
        self.insert(
            name,
            Argument {
                value,
                unit: Some(unit),
            },
        );
        self
    }

    /// Inserts an argument, replacing any previous argument with that name.
    pub fn insert(&mut self, name: impl Into<String>, argument: Argument) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = argument,
            None => self.entries.push((name, argument)),
        }
    }

    /// Returns the argument supplied under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, argument)| argument)
    }

    /// Iterates over the arguments in the order they were first supplied.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Argument)> {
        self.entries
            .iter()
            .map(|(name, argument)| (name.as_str(), argument))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
