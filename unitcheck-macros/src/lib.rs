mod unitcheck;
mod utils;

use proc_macro::TokenStream;

/// Declares the units a formula was derived for.
///
/// Each `name = "unit"` pair gives the expected unit of one parameter, and
/// `res_unit = "unit"` gives the unit of the result. Parameters without a
/// pair, such as dimensionless correction coefficients, are left unchecked.
///
/// When applied to a function, this macro:
///
/// - Leaves the function unchanged, so it can still be called directly.
/// - Generates a unit struct named after the function in `UpperCamelCase`
///   that implements `unitcheck_core::Formula` by forwarding to the function.
/// - Adds a `checked()` constructor returning a `unitcheck_core::Checked` wrapper that
///   carries the declared contract.
///
/// ## Restrictions
///
/// The contract is validated at compile time. It is an error to:
///
/// - name a parameter the function does not have,
/// - declare a parameter twice, or give an empty unit,
/// - omit `res_unit` or declare no parameter units at all.
///
/// The function must take only `f64` parameters and return `f64` or
/// `Result<f64, E>`. Generic, async, and method functions are rejected.
///
/// ## Example
///
/// ### Input
///
/// ```ignore
/// #[unitcheck(L = "kg/s", rhol = "kg/m**3", Ft = "m**2", res_unit = "m**3/(m**2*s)")]
/// pub fn calc_ucoef(L: f64, rhol: f64, Ft: f64) -> f64 {
///     L / (rhol * Ft)
/// }
/// ```
///
/// ### Expanded
///
/// ```ignore
/// pub fn calc_ucoef(L: f64, rhol: f64, Ft: f64) -> f64 {
///     L / (rhol * Ft)
/// }
///
/// #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// pub struct CalcUcoef;
///
/// impl CalcUcoef {
///     pub const PARAMETERS: &'static [&'static str] = &["L", "rhol", "Ft"];
///     pub const PARAMETER_UNITS: &'static [(&'static str, &'static str)] =
///         &[("L", "kg/s"), ("rhol", "kg/m**3"), ("Ft", "m**2")];
///     pub const RESULT_UNIT: &'static str = "m**3/(m**2*s)";
///
///     pub fn checked() -> unitcheck_core::Checked<Self> { /* ... */ }
/// }
///
/// impl unitcheck_core::Formula for CalcUcoef {
///     type Error = core::convert::Infallible;
///     // `compute` forwards to `calc_ucoef`
/// }
/// ```
#[proc_macro_attribute]
pub fn unitcheck(attr: TokenStream, item: TokenStream) -> TokenStream {
    match unitcheck::Parsed::new(attr.into(), item.into()) {
        Ok(parsed) => parsed.expand().into(),
        Err(error) => error.to_compile_error().into(),
    }
}
