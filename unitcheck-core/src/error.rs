use thiserror::Error;

use crate::Unit;

/// Errors raised when a unit contract is declared or attached to a formula.
///
/// A configuration error is fatal to the declaration that produced it.
/// It never occurs while a checked formula is being called.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The contract declares no parameter units.
    #[error("unit contract must declare at least one parameter unit")]
    EmptyContract,

    /// The result unit label is empty.
    #[error("unit contract must declare a non-empty result unit")]
    EmptyResultUnit,

    /// A parameter was declared with an empty unit label.
    #[error("parameter `{parameter}` is declared with an empty unit")]
    EmptyUnit { parameter: String },

    /// A parameter name in the contract is empty.
    #[error("unit contract contains an empty parameter name")]
    EmptyParameterName,

    /// The contract declares the same parameter more than once.
    #[error("parameter `{parameter}` is declared more than once")]
    DuplicateParameter { parameter: String },

    /// The formula lists the same parameter more than once.
    #[error("formula lists parameter `{parameter}` more than once")]
    DuplicateFormulaParameter { parameter: String },

    /// The contract names a parameter the formula does not accept.
    #[error(
        "unit contract names `{parameter}`, which is not a parameter of the formula (accepted: {})",
        .accepted.join(", ")
    )]
    UnknownParameter {
        parameter: String,
        accepted: Vec<String>,
    },
}

/// A caller-declared unit disagrees with the contract for that parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parameter `{parameter}` expects `{expected}` but was given `{found}`")]
pub struct UnitMismatchError {
    pub parameter: String,
    pub expected: Unit,
    pub found: Unit,
}

/// Errors that can occur when calling a [`Checked`](crate::Checked) formula.
///
/// Every variant except [`CallError::Formula`] is detected before the formula
/// is evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError<E> {
    /// An argument carried a unit annotation that contradicts the contract.
    #[error(transparent)]
    UnitMismatch(#[from] UnitMismatchError),

    /// No value was supplied for a formula parameter.
    #[error("missing argument for parameter `{parameter}`")]
    MissingArgument { parameter: String },

    /// A value was supplied for a name the formula does not accept.
    #[error("formula has no parameter named `{name}`")]
    UnexpectedArgument { name: String },

    /// A formula was evaluated with the wrong number of values.
    #[error("formula takes {expected} values but was given {found}")]
    ArgumentCount { expected: usize, found: usize },

    /// The formula itself failed.
    #[error("formula evaluation failed: {0}")]
    Formula(E),
}
