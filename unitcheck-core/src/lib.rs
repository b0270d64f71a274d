//! Unit contracts for engineering formulas.
//!
//! Column-sizing formulas are plain numeric functions that only give correct
//! answers for inputs in the units they were derived for. This crate attaches
//! those units to a formula as a [`UnitContract`] and checks them:
//!
//! - when the contract is declared, against the formula's parameter names,
//! - when the formula is called, against any units the caller states.
//!
//! Every result comes back as a [`Measured`] value tagged with the contract's
//! result unit, so it can feed another checked formula.
//!
//! Contracts are declared at runtime with [`declare`], or at compile time with
//! the `#[unitcheck]` attribute (enabled by the default `macros` feature).

mod arguments;
mod checked;
mod contract;
mod error;
mod formula;
mod unit;

pub use arguments::{Argument, Arguments};
pub use checked::{Checked, Measured, unit_contract};
pub use contract::{Declaration, UnitContract, declare};
pub use error::{CallError, ConfigurationError, UnitMismatchError};
pub use formula::{FnFormula, Formula, TryFnFormula, formula, try_formula};
pub use unit::Unit;

#[cfg(feature = "macros")]
pub use unitcheck_macros::unitcheck;
