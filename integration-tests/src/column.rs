//! Distillation-column sizing formulas, declared with `#[unitcheck]`.
//!
//! Parameter names follow the reference texts, hence the mixed case.
#![allow(non_snake_case)]

use thiserror::Error;
use unitcheck_core::unitcheck;

/// Mixture viscosity is only defined for positive component viscosities.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("viscosity must be positive, got {0} Pa*s")]
pub struct NonPositiveViscosity(pub f64);

/// Liquid load per unit of column cross-section.
#[unitcheck(L = "kg/s", rhol = "kg/m**3", Ft = "m**2", res_unit = "m**3/(m**2*s)")]
pub fn calc_Ucoef(L: f64, rhol: f64, Ft: f64) -> f64 {
    L / (rhol * Ft)
}

/// Diffusion coefficient of the liquid phase at 20 °C.
///
/// `A` and `B` are dimensionless correction coefficients for the solute and
/// the solvent. Romankov, eq. 6.22.
#[unitcheck(
    Massl = "g/mol",
    Massh = "g/mol",
    mu_solv = "Pa*s",
    nul = "sm**3/mol",
    nuh = "sm**3/mol",
    res_unit = "m**2/s"
)]
pub fn calc_Diffcoef20(
    Massl: f64,
    Massh: f64,
    A: f64,
    B: f64,
    mu_solv: f64,
    nul: f64,
    nuh: f64,
) -> f64 {
    1e-6 * (1.0 / Massl + 1.0 / Massh).sqrt()
        / (A * B * mu_solv.sqrt() * (nul.cbrt() + nuh.cbrt()).powi(2))
}

/// Diffusion coefficient of the liquid phase at the boiling temperature.
///
/// Romankov, eq. 6.23.
#[unitcheck(D20 = "m**2/s", t_boil = "degC", res_unit = "m**2/s")]
pub fn calc_Diffliq(D20: f64, b: f64, t_boil: f64) -> f64 {
    D20 * (1.0 + b * (t_boil - 20.0))
}

/// Working vapor speed in the column. Dytnerskii, eq. 5.33.
#[unitcheck(rliq = "kg/m**3", rvap = "kg/m**3", res_unit = "m/s")]
pub fn w_column(rliq: f64, rvap: f64) -> f64 {
    0.05 * (rliq / rvap).sqrt()
}

/// Viscosity of a binary liquid mixture, `lg μ = x·lg μ₁ + (1 − x)·lg μ₂`.
///
/// Romankov, eq. 1.14.
#[unitcheck(mulow = "Pa*s", muhigh = "Pa*s", xlow = "dimensionless", res_unit = "Pa*s")]
pub fn mu_liq(mulow: f64, muhigh: f64, xlow: f64) -> Result<f64, NonPositiveViscosity> {
    for mu in [mulow, muhigh] {
        if mu <= 0.0 {
            return Err(NonPositiveViscosity(mu));
        }
    }
    Ok(10_f64.powf(xlow * mulow.log10() + (1.0 - xlow) * muhigh.log10()))
}
