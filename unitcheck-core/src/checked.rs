use std::fmt;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{Arguments, CallError, Formula, Unit, UnitContract, UnitMismatchError};

/// A numeric result tagged with the unit of the contract that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Measured {
    pub value: f64,
    pub unit: Unit,
}

impl Measured {
    #[must_use]
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Splits the result into its value and unit.
    #[must_use]
    pub fn into_parts(self) -> (f64, Unit) {
        (self.value, self.unit)
    }
}

impl fmt::Display for Measured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// A formula paired with the unit contract it was declared with.
///
/// Built by [`Declaration::apply`](crate::Declaration::apply) or by the
/// `checked()` constructor that `#[unitcheck]` generates. The contract is
/// owned by this wrapper and never changes, so a `Checked` can be shared
/// freely between threads when its formula can.
///
/// Calling a checked formula:
///
/// 1. rejects names the formula does not accept and parameters left without
///    a value,
/// 2. compares every caller-declared unit against the contract and stops at
///    the first disagreement, in parameter order,
/// 3. evaluates the formula and tags the value with the contract's result
///    unit.
///
/// Arguments without a declared unit are passed through unchecked, so a call
/// with plain values returns exactly what the bare formula returns.
#[derive(Debug, Clone)]
pub struct Checked<F> {
    formula: F,
    contract: UnitContract,
}

impl<F: Formula> Checked<F> {
    pub(crate) fn new(formula: F, contract: UnitContract) -> Self {
        Self { formula, contract }
    }

    /// Pairs a formula with a contract checked by `#[unitcheck]` at compile time.
    ///
    /// Debug builds repeat the declaration checks and panic on a bad contract.
    #[doc(hidden)]
    #[must_use]
    pub fn __declared(
        formula: F,
        parameters: &[(&'static str, &'static str)],
        result: &'static str,
    ) -> Self {
        debug_assert!(
            UnitContract::new(parameters.iter().copied(), result).is_ok(),
            "invalid unit contract for declared formula"
        );
        let contract = UnitContract::from_validated(parameters, result);
        debug_assert!(
            contract.check_against(formula.parameters()).is_ok(),
            "unit contract does not fit the declared formula"
        );
        Self::new(formula, contract)
    }

    /// Calls the formula with the given arguments.
    ///
    /// # Errors
    ///
    /// - [`CallError::UnexpectedArgument`] if an argument names no parameter.
    /// - [`CallError::MissingArgument`] if a parameter has no argument.
    /// - [`CallError::UnitMismatch`] if a caller-declared unit disagrees with
    ///   the contract. The formula is not evaluated.
    /// - [`CallError::Formula`] if the formula itself fails.
    pub fn call(&self, args: &Arguments) -> Result<Measured, CallError<F::Error>> {
        let parameters = self.formula.parameters();

        let unexpected = args
            .iter()
            .find(|(name, _)| !parameters.iter().any(|parameter| parameter == name));
        if let Some((name, _)) = unexpected {
            return Err(CallError::UnexpectedArgument {
                name: name.to_owned(),
            });
        }

        let mut supplied = Vec::with_capacity(parameters.len());
        for &parameter in parameters {
            let argument = args.get(parameter).ok_or_else(|| CallError::MissingArgument {
                parameter: parameter.to_owned(),
            })?;
            supplied.push((parameter, argument));
        }

        for &(parameter, argument) in &supplied {
            if let Err(mismatch) = self.check_unit(parameter, argument.unit.as_ref()) {
                tracing::debug!(
                    parameter,
                    expected = %mismatch.expected,
                    found = %mismatch.found,
                    "rejected call with mismatched unit"
                );
                return Err(mismatch.into());
            }
        }

        let values: Vec<f64> = supplied.iter().map(|(_, argument)| argument.value).collect();
        tracing::trace!(parameters = values.len(), "evaluating checked formula");

        let value = self.formula.evaluate(&values)?;
        Ok(Measured::new(value, self.contract.result().clone()))
    }

    /// Returns the unit contract attached to this formula.
    #[must_use]
    pub fn contract(&self) -> &UnitContract {
        &self.contract
    }

    /// Returns the wrapped formula.
    #[must_use]
    pub fn formula(&self) -> &F {
        &self.formula
    }

    /// Consumes the wrapper and returns the bare formula.
    #[must_use]
    pub fn into_inner(self) -> F {
        self.formula
    }

    fn check_unit(
        &self,
        parameter: &str,
        declared: Option<&Unit>,
    ) -> Result<(), UnitMismatchError> {
        match (self.contract.unit_of(parameter), declared) {
            (Some(expected), Some(found)) if expected != found => Err(UnitMismatchError {
                parameter: parameter.to_owned(),
                expected: expected.clone(),
                found: found.clone(),
            }),
            _ => Ok(()),
        }
    }
}

/// Returns the unit contract attached to a checked formula.
///
/// Equivalent to [`Checked::contract`].
#[must_use]
pub fn unit_contract<F: Formula>(checked: &Checked<F>) -> &UnitContract {
    checked.contract()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use approx::assert_relative_eq;

    use thiserror::Error;

    use super::*;
    use crate::{declare, formula, try_formula};

    #[derive(Debug, PartialEq, Error)]
    #[error("square root of a negative number")]
    struct NegativeRadicand;

    fn ucoef_declaration() -> crate::Declaration {
        declare(
            [("L", "kg/s"), ("rhol", "kg/m**3"), ("Ft", "m**2")],
            "m**3/(m**2*s)",
        )
        .unwrap()
    }

    fn ucoef_args() -> Arguments {
        Arguments::new()
            .with("L", 1.0)
            .with("rhol", 1000.0)
            .with("Ft", 2.0)
    }

    #[test]
    fn plain_call_matches_bare_formula() {
        let bare = |[l, rhol, ft]: [f64; 3]| l / (rhol * ft);
        let checked = ucoef_declaration()
            .apply(formula(["L", "rhol", "Ft"], bare))
            .unwrap();

        let result = checked.call(&ucoef_args()).unwrap();
        assert_eq!(result.value, bare([1.0, 1000.0, 2.0]));
        assert_eq!(result.unit, "m**3/(m**2*s)");
    }

    #[test]
    fn matching_annotations_are_accepted() {
        let checked = ucoef_declaration()
            .apply(formula(["L", "rhol", "Ft"], |[l, rhol, ft]| l / (rhol * ft)))
            .unwrap();

        let args = Arguments::new()
            .with_unit("L", 1.0, "kg/s")
            .with_unit("rhol", 1000.0, "kg/m**3")
            .with_unit("Ft", 2.0, "m**2");

        let (value, unit) = checked.call(&args).unwrap().into_parts();
        assert_relative_eq!(value, 0.0005);
        assert_eq!(unit, "m**3/(m**2*s)");
    }

    #[test]
    fn mismatch_stops_before_evaluation() {
        let evaluations = Cell::new(0);
        let checked = ucoef_declaration()
            .apply(formula(["L", "rhol", "Ft"], |[l, rhol, ft]| {
                evaluations.set(evaluations.get() + 1);
                l / (rhol * ft)
            }))
            .unwrap();

        let args = ucoef_args().with_unit("L", 3600.0, "kg/h");
        let error = checked.call(&args).unwrap_err();

        assert_eq!(
            error,
            CallError::UnitMismatch(UnitMismatchError {
                parameter: "L".into(),
                expected: "kg/s".into(),
                found: "kg/h".into(),
            })
        );
        assert_eq!(evaluations.get(), 0);

        checked.call(&ucoef_args()).unwrap();
        assert_eq!(evaluations.get(), 1);
    }

    #[test]
    fn first_mismatch_in_parameter_order_is_reported() {
        let checked = ucoef_declaration()
            .apply(formula(["L", "rhol", "Ft"], |[l, rhol, ft]| l / (rhol * ft)))
            .unwrap();

        let args = ucoef_args()
            .with_unit("Ft", 2.0, "cm**2")
            .with_unit("rhol", 1.0, "g/cm**3");

        let Err(CallError::UnitMismatch(mismatch)) = checked.call(&args) else {
            panic!("expected a unit mismatch");
        };
        assert_eq!(mismatch.parameter, "rhol");
    }

    #[test]
    fn units_compare_by_exact_label() {
        let checked = declare([("w", "m/s")], "m/s")
            .and_then(|declaration| declaration.apply(formula(["w"], |[w]| w)))
            .unwrap();

        let args = Arguments::new().with_unit("w", 1.0, "s**-1*m");
        assert!(matches!(
            checked.call(&args),
            Err(CallError::UnitMismatch(_))
        ));
    }

    #[test]
    fn annotation_on_uncontracted_parameter_is_accepted() {
        let checked = declare([("mu_solv", "Pa*s")], "m**2/s")
            .and_then(|declaration| {
                declaration.apply(formula(["A", "mu_solv"], |[a, mu]| a * mu))
            })
            .unwrap();

        let args = Arguments::new()
            .with_unit("A", 1.0, "dimensionless")
            .with_unit("mu_solv", 1e-3, "Pa*s");

        let result = checked.call(&args).unwrap();
        assert_relative_eq!(result.value, 1e-3);
    }

    #[test]
    fn structural_errors() {
        let checked = ucoef_declaration()
            .apply(formula(["L", "rhol", "Ft"], |[l, rhol, ft]| l / (rhol * ft)))
            .unwrap();

        let missing = Arguments::new().with("L", 1.0).with("Ft", 2.0);
        assert_eq!(
            checked.call(&missing),
            Err(CallError::MissingArgument {
                parameter: "rhol".into()
            })
        );

        let unexpected = ucoef_args().with("A", 1.0);
        assert_eq!(
            checked.call(&unexpected),
            Err(CallError::UnexpectedArgument { name: "A".into() })
        );
    }

    #[test]
    fn formula_errors_propagate_unchanged() {
        let checked = declare([("x", "dimensionless")], "dimensionless")
            .and_then(|declaration| {
                declaration.apply(try_formula(["x"], |[x]| {
                    if x >= 0.0 {
                        Ok(x.sqrt())
                    } else {
                        Err(NegativeRadicand)
                    }
                }))
            })
            .unwrap();

        assert_eq!(
            checked.call(&Arguments::new().with("x", -1.0)),
            Err(CallError::Formula(NegativeRadicand))
        );
    }

    #[test]
    fn each_wrapper_owns_its_contract() {
        let speed = formula(["rliq", "rvap"], |[rliq, rvap]| 0.05 * (rliq / rvap).sqrt());

        let si = declare([("rliq", "kg/m**3"), ("rvap", "kg/m**3")], "m/s")
            .and_then(|declaration| declaration.apply(speed))
            .unwrap();
        let cgs = declare([("rliq", "g/cm**3"), ("rvap", "g/cm**3")], "cm/s")
            .and_then(|declaration| declaration.apply(speed))
            .unwrap();

        assert_eq!(unit_contract(&si).unit_of("rliq").unwrap(), "kg/m**3");
        assert_eq!(unit_contract(&cgs).unit_of("rliq").unwrap(), "g/cm**3");

        let args = Arguments::new().with("rliq", 400.0).with("rvap", 1.0);
        assert_eq!(si.call(&args).unwrap().unit, "m/s");
        assert_eq!(cgs.call(&args).unwrap().unit, "cm/s");
    }

    #[test]
    fn inspection_returns_declared_contract() {
        let declaration = ucoef_declaration();
        let checked = declaration
            .apply(formula(["L", "rhol", "Ft"], |[l, rhol, ft]| l / (rhol * ft)))
            .unwrap();

        assert_eq!(unit_contract(&checked), declaration.contract());
        assert_eq!(checked.contract().result(), "m**3/(m**2*s)");
        assert_eq!(checked.formula().parameters(), ["L", "rhol", "Ft"]);
    }

    #[test]
    fn measured_display() {
        let measured = Measured::new(0.5, Unit::from("m/s"));
        assert_eq!(measured.to_string(), "0.5 m/s");
    }

    #[test]
    fn declared_contract_matches_runtime_contract() {
        let checked = Checked::__declared(
            formula(["L", "rhol", "Ft"], |[l, rhol, ft]| l / (rhol * ft)),
            &[("L", "kg/s"), ("rhol", "kg/m**3"), ("Ft", "m**2")],
            "m**3/(m**2*s)",
        );

        assert_eq!(checked.contract(), ucoef_declaration().contract());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid unit contract")]
    fn declared_contract_rejects_repeated_parameters() {
        let _ = Checked::__declared(
            formula(["L"], |[l]| l),
            &[("L", "kg/s"), ("L", "kg/h")],
            "kg/s",
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not fit")]
    fn declared_contract_rejects_unknown_parameters() {
        let _ = Checked::__declared(formula(["L"], |[l]| l), &[("Ft", "m**2")], "kg/s");
    }

    #[test]
    fn into_inner_returns_the_bare_formula() {
        let bare = ucoef_declaration()
            .apply(formula(["L", "rhol", "Ft"], |[l, rhol, ft]| l / (rhol * ft)))
            .unwrap()
            .into_inner();

        assert_relative_eq!(bare.evaluate(&[1.0, 1000.0, 2.0]).unwrap(), 5e-4);
    }
}
