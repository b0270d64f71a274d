use std::{convert::Infallible, fmt};

use crate::CallError;

/// A pure numeric function of named parameters.
///
/// A formula computes one physical quantity from its inputs. It knows nothing
/// about units; those are attached with a [`UnitContract`](crate::UnitContract)
/// through [`declare`](crate::declare) or the `#[unitcheck]` attribute.
///
/// ## Implementing `Formula`
///
/// Most formulas are built with [`formula()`] or [`try_formula()`], or
/// generated by `#[unitcheck]`. Implement the trait by hand when a formula
/// needs configuration of its own.
///
/// Implementors provide `compute`, which receives exactly one value per entry
/// of `parameters`, in the same order. Callers go through `evaluate`, which
/// enforces that count.
pub trait Formula {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the names of the parameters this formula accepts.
    fn parameters(&self) -> &[&'static str];

    /// Computes the result from one value per parameter.
    ///
    /// # Errors
    ///
    /// Each formula defines its own `Error` type. Errors are reported to the
    /// caller of a checked formula unchanged.
    ///
    /// # Panics
    ///
    /// May panic if `values` does not hold exactly one value per parameter.
    fn compute(&self, values: &[f64]) -> Result<f64, Self::Error>;

    /// Evaluates the formula with values given in `parameters` order.
    ///
    /// # Errors
    ///
    /// - [`CallError::ArgumentCount`] if the number of values differs from the
    ///   number of parameters. The formula is not computed.
    /// - [`CallError::Formula`] if the formula itself fails.
    fn evaluate(&self, values: &[f64]) -> Result<f64, CallError<Self::Error>> {
        let expected = self.parameters().len();
        if values.len() != expected {
            return Err(CallError::ArgumentCount {
                expected,
                found: values.len(),
            });
        }
        self.compute(values).map_err(CallError::Formula)
    }
}

/// Wraps an infallible closure over `N` named parameters as a [`Formula`].
///
/// # Example
///
/// ```
/// use unitcheck_core::{Formula, formula};
///
/// let working_speed = formula(["rliq", "rvap"], |[rliq, rvap]| 0.05 * (rliq / rvap).sqrt());
///
/// assert_eq!(working_speed.parameters(), ["rliq", "rvap"]);
/// assert_eq!(working_speed.evaluate(&[400.0, 1.0]), Ok(1.0));
/// ```
pub fn formula<Func, const N: usize>(
    parameters: [&'static str; N],
    func: Func,
) -> FnFormula<Func, N>
where
    Func: Fn([f64; N]) -> f64,
{
    FnFormula { parameters, func }
}

/// Wraps a fallible closure over `N` named parameters as a [`Formula`].
pub fn try_formula<Func, E, const N: usize>(
    parameters: [&'static str; N],
    func: Func,
) -> TryFnFormula<Func, N>
where
    Func: Fn([f64; N]) -> Result<f64, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    TryFnFormula { parameters, func }
}

/// An infallible formula built by [`formula()`].
#[derive(Clone, Copy)]
pub struct FnFormula<Func, const N: usize> {
    parameters: [&'static str; N],
    func: Func,
}

impl<Func, const N: usize> Formula for FnFormula<Func, N>
where
    Func: Fn([f64; N]) -> f64,
{
    type Error = Infallible;

    fn parameters(&self) -> &[&'static str] {
        &self.parameters
    }

    fn compute(&self, values: &[f64]) -> Result<f64, Self::Error> {
        Ok((self.func)(to_array(values)))
    }
}

/// A fallible formula built by [`try_formula()`].
#[derive(Clone, Copy)]
pub struct TryFnFormula<Func, const N: usize> {
    parameters: [&'static str; N],
    func: Func,
}

impl<Func, E, const N: usize> Formula for TryFnFormula<Func, N>
where
    Func: Fn([f64; N]) -> Result<f64, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn parameters(&self) -> &[&'static str] {
        &self.parameters
    }

    fn compute(&self, values: &[f64]) -> Result<f64, Self::Error> {
        (self.func)(to_array(values))
    }
}

impl<Func, const N: usize> fmt::Debug for FnFormula<Func, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFormula")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl<Func, const N: usize> fmt::Debug for TryFnFormula<Func, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryFnFormula")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

fn to_array<const N: usize>(values: &[f64]) -> [f64; N] {
    std::array::from_fn(|index| values[index])
}
