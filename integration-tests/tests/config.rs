use std::collections::BTreeMap;

use approx::assert_relative_eq;
use integration_tests::column::{calc_Ucoef, w_column};
use serde::Deserialize;
use unitcheck_core::{
    Arguments, CallError, Declaration, Measured, Unit, UnitContract, declare, formula,
};

/// Contracts for a set of formulas, keyed by formula name.
#[derive(Debug, Deserialize)]
struct Catalog {
    contracts: BTreeMap<String, UnitContract>,
}

const CATALOG: &str = r#"
[contracts.w_column]
result = "m/s"

[contracts.w_column.parameters]
rliq = "kg/m**3"
rvap = "kg/m**3"

[contracts.calc_Ucoef]
result = "m**3/(m**2*s)"

[contracts.calc_Ucoef.parameters]
L = "kg/s"
rhol = "kg/m**3"
Ft = "m**2"
"#;

fn catalog() -> Catalog {
    toml::from_str(CATALOG).expect("catalog should parse")
}

#[test]
fn loaded_contract_equals_declared_contract() {
    let catalog = catalog();

    let declared = declare([("rliq", "kg/m**3"), ("rvap", "kg/m**3")], "m/s").unwrap();
    assert_eq!(&catalog.contracts["w_column"], declared.contract());
}

#[test]
fn loaded_contracts_check_formulas() {
    let mut catalog = catalog();

    let speed = Declaration::from(catalog.contracts.remove("w_column").unwrap())
        .apply(formula(["rliq", "rvap"], |[rliq, rvap]| w_column(rliq, rvap)))
        .unwrap();
    let ucoef = Declaration::from(catalog.contracts.remove("calc_Ucoef").unwrap())
        .apply(formula(["L", "rhol", "Ft"], |[l, rhol, ft]| calc_Ucoef(l, rhol, ft)))
        .unwrap();

    let result = speed
        .call(&Arguments::new().with_unit("rliq", 400.0, "kg/m**3").with("rvap", 1.0))
        .unwrap();
    assert_relative_eq!(result.value, 1.0);

    let error = ucoef
        .call(
            &Arguments::new()
                .with("L", 1.0)
                .with("rhol", 1000.0)
                .with_unit("Ft", 2.0, "cm**2"),
        )
        .unwrap_err();
    assert!(matches!(error, CallError::UnitMismatch(_)));
}

#[test]
fn loaded_contract_still_validates_parameter_names() {
    let contract: UnitContract = toml::from_str(
        r#"
        result = "m/s"

        [parameters]
        rliq = "kg/m**3"
        rgas = "kg/m**3"
        "#,
    )
    .unwrap();

    let error = Declaration::from(contract)
        .apply(formula(["rliq", "rvap"], |[rliq, rvap]| w_column(rliq, rvap)))
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "unit contract names `rgas`, which is not a parameter of the formula (accepted: rliq, rvap)"
    );
}

#[test]
fn malformed_contracts_fail_to_load() {
    let empty = toml::from_str::<UnitContract>(
        r#"
        result = "m/s"
        parameters = {}
        "#,
    )
    .unwrap_err();
    assert!(
        empty
            .to_string()
            .contains("unit contract must declare at least one parameter unit")
    );

    let blank_unit = toml::from_str::<UnitContract>(
        r#"
        result = "m/s"
        parameters = { rliq = "" }
        "#,
    )
    .unwrap_err();
    assert!(
        blank_unit
            .to_string()
            .contains("parameter `rliq` is declared with an empty unit")
    );
}

#[test]
fn measured_results_serialize_with_their_unit() {
    let measured = Measured::new(0.5, Unit::from("m/s"));

    assert_eq!(
        serde_json::to_value(&measured).unwrap(),
        serde_json::json!({ "value": 0.5, "unit": "m/s" })
    );
}
