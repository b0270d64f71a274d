use std::collections::{BTreeMap, btree_map::Entry};

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{Checked, ConfigurationError, Formula, Unit};

/// The units a formula was derived for.
///
/// A contract maps parameter names to their expected [`Unit`] and designates
/// the unit of the result. It is validated once, when built, and never
/// changes afterwards:
///
/// - at least one parameter unit is declared,
/// - parameter names are non-empty and unique,
/// - every unit label, including the result unit, is non-empty.
///
/// Contracts can also be loaded from configuration files. Deserializing runs
/// the same validation as [`UnitContract::new`].
///
/// # Example
///
/// ```
/// use unitcheck_core::UnitContract;
///
/// let contract = UnitContract::new(
///     [("L", "kg/s"), ("rhol", "kg/m**3"), ("Ft", "m**2")],
///     "m**3/(m**2*s)",
/// )
/// .unwrap();
///
/// assert_eq!(contract.unit_of("rhol").unwrap(), "kg/m**3");
/// assert_eq!(contract.result(), "m**3/(m**2*s)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(Serialize, Deserialize),
    serde(try_from = "RawContract", into = "RawContract")
)]
pub struct UnitContract {
    parameters: BTreeMap<String, Unit>,
    result: Unit,
}

impl UnitContract {
    /// Builds a validated contract.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the result unit is empty, a parameter
    /// name or unit is empty, a parameter is declared twice, or no parameter
    /// units are declared at all.
    pub fn new<I, K, U>(
        parameters: I,
        result: impl Into<Unit>,
    ) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, U)>,
        K: Into<String>,
        U: Into<Unit>,
    {
        let result = result.into();
        if result.is_blank() {
            return Err(ConfigurationError::EmptyResultUnit);
        }

        let mut map = BTreeMap::new();
        for (name, unit) in parameters {
            let name = name.into();
            let unit = unit.into();

            if name.trim().is_empty() {
                return Err(ConfigurationError::EmptyParameterName);
            }
            if unit.is_blank() {
                return Err(ConfigurationError::EmptyUnit { parameter: name });
            }

            match map.entry(name) {
                Entry::Occupied(entry) => {
                    return Err(ConfigurationError::DuplicateParameter {
                        parameter: entry.key().clone(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(unit);
                }
            }
        }

        if map.is_empty() {
            return Err(ConfigurationError::EmptyContract);
        }

        Ok(Self {
            parameters: map,
            result,
        })
    }

    /// Builds a contract from static pairs that were validated elsewhere.
    ///
    /// Used by `#[unitcheck]`, which checks the contract at compile time.
    pub(crate) fn from_validated(
        parameters: &[(&'static str, &'static str)],
        result: &'static str,
    ) -> Self {
        Self {
            parameters: parameters
                .iter()
                .map(|&(name, unit)| (name.to_owned(), Unit::from_static(unit)))
                .collect(),
            result: Unit::from_static(result),
        }
    }

    /// Returns the expected unit of a parameter, if the contract declares one.
    #[must_use]
    pub fn unit_of(&self, parameter: &str) -> Option<&Unit> {
        self.parameters.get(parameter)
    }

    /// Returns the unit of the formula's result.
    #[must_use]
    pub fn result(&self) -> &Unit {
        &self.result
    }

    /// Iterates over the declared parameters and their units, ordered by name.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &Unit)> {
        self.parameters
            .iter()
            .map(|(name, unit)| (name.as_str(), unit))
    }

    /// Returns the number of parameters with a declared unit.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Checks that every contract entry names one of `accepted`.
    pub(crate) fn check_against(
        &self,
        accepted: &[&'static str],
    ) -> Result<(), ConfigurationError> {
        for (index, name) in accepted.iter().enumerate() {
            if accepted[..index].contains(name) {
                return Err(ConfigurationError::DuplicateFormulaParameter {
                    parameter: (*name).to_owned(),
                });
            }
        }

        match self
            .parameters
            .keys()
            .find(|name| !accepted.iter().any(|candidate| *candidate == name.as_str()))
        {
            Some(unknown) => Err(ConfigurationError::UnknownParameter {
                parameter: unknown.clone(),
                accepted: accepted.iter().map(|&name| name.to_owned()).collect(),
            }),
            None => Ok(()),
        }
    }
}

/// Declares a unit contract, producing a [`Declaration`] that can be applied
/// to formulas.
///
/// This is the runtime counterpart of the `#[unitcheck]` attribute.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] if the contract is malformed.
/// See [`UnitContract::new`].
///
/// # Example
///
/// ```
/// use unitcheck_core::{Arguments, declare, formula};
///
/// let ucoef = declare(
///     [("L", "kg/s"), ("rhol", "kg/m**3"), ("Ft", "m**2")],
///     "m**3/(m**2*s)",
/// )
/// .and_then(|declaration| {
///     declaration.apply(formula(["L", "rhol", "Ft"], |[l, rhol, ft]| l / (rhol * ft)))
/// })
/// .unwrap();
///
/// let args = Arguments::new()
///     .with_unit("L", 1.0, "kg/s")
///     .with("rhol", 1000.0)
///     .with("Ft", 2.0);
///
/// let result = ucoef.call(&args).unwrap();
/// assert_eq!(result.into_parts(), (0.0005, "m**3/(m**2*s)".into()));
/// ```
pub fn declare<I, K, U>(
    contract: I,
    result_unit: impl Into<Unit>,
) -> Result<Declaration, ConfigurationError>
where
    I: IntoIterator<Item = (K, U)>,
    K: Into<String>,
    U: Into<Unit>,
{
    UnitContract::new(contract, result_unit).map(Declaration::from)
}

/// A declared unit contract, ready to be attached to formulas.
///
/// The same declaration can be applied to any number of formulas. Each
/// resulting [`Checked`] owns its own copy of the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    contract: UnitContract,
}

impl Declaration {
    /// Returns the declared contract.
    #[must_use]
    pub fn contract(&self) -> &UnitContract {
        &self.contract
    }

    /// Attaches the contract to a formula.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownParameter`] if the contract names a
    /// parameter the formula does not accept, or
    /// [`ConfigurationError::DuplicateFormulaParameter`] if the formula lists a
    /// parameter twice.
    pub fn apply<F: Formula>(&self, formula: F) -> Result<Checked<F>, ConfigurationError> {
        self.contract.check_against(formula.parameters())?;

        tracing::debug!(
            parameters = self.contract.parameter_count(),
            result = %self.contract.result,
            "unit contract applied to formula"
        );

        Ok(Checked::new(formula, self.contract.clone()))
    }
}

impl From<UnitContract> for Declaration {
    fn from(contract: UnitContract) -> Self {
        Self { contract }
    }
}

/// The serialized shape of a [`UnitContract`].
#[cfg(feature = "serde-derive")]
#[derive(Serialize, Deserialize)]
struct RawContract {
    result: Unit,
    parameters: BTreeMap<String, Unit>,
}

#[cfg(feature = "serde-derive")]
impl TryFrom<RawContract> for UnitContract {
    type Error = ConfigurationError;

    fn try_from(raw: RawContract) -> Result<Self, Self::Error> {
        Self::new(raw.parameters, raw.result)
    }
}

#[cfg(feature = "serde-derive")]
impl From<UnitContract> for RawContract {
    fn from(contract: UnitContract) -> Self {
        Self {
            result: contract.result,
            parameters: contract.parameters,
        }
    }
}
