use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use rust_decimal::Decimal;
use std::process::Command;

fn decimal(value: &serde_json::Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[test]
fn test_export_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("result.csv");

    let mut cmd = Command::new(cargo_bin!("rentcalc"));
    cmd.args(["calculate", "tests/fixtures/products.csv", "--output"])
        .arg(&out);
    cmd.assert().success().stdout(predicate::str::is_empty());

    let mut reader = csv::Reader::from_path(&out).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "에어컨");
    assert_eq!(&rows[0][3], "100000");
    assert_eq!(&rows[1][5], "1185000");
}

#[test]
fn test_json_export_has_every_period() {
    let output = Command::new(cargo_bin!("rentcalc"))
        .args(["calculate", "tests/fixtures/products.csv", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let products: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let products = products.as_array().unwrap();
    assert_eq!(products.len(), 2);

    let fridge = &products[1];
    assert_eq!(fridge["product_name"], "냉장고");
    assert_eq!(decimal(&fridge["supply_price"]), Decimal::from(1_125_000));
    assert_eq!(decimal(&fridge["adjusted_price"]), Decimal::from(1_125_000));

    let breakdowns = fridge["breakdowns"].as_array().unwrap();
    let periods: Vec<u64> = breakdowns
        .iter()
        .map(|b| b["period"].as_u64().unwrap())
        .collect();
    assert_eq!(periods, vec![12, 24, 36, 48]);

    let two_years = &breakdowns[1];
    assert_eq!(decimal(&two_years["total_rental_fee"]), Decimal::from(1_590_000));
    assert_eq!(decimal(&two_years["monthly_rental_fee"]), Decimal::from(66_250));
    assert_eq!(decimal(&two_years["final_monthly_rental_fee"]), Decimal::from(66_000));
    assert_eq!(decimal(&two_years["final_total_rental_fee"]), Decimal::from(1_584_000));
    assert_eq!(decimal(&two_years["rental_company_profit"]), Decimal::from(411_840));
    assert_eq!(decimal(&two_years["supply_value"]), Decimal::from(1_172_160));

    assert_eq!(fridge["selected"]["period"], 12);
}

#[test]
fn test_template_to_stdout() {
    let mut cmd = Command::new(cargo_bin!("rentcalc"));
    cmd.arg("template");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("제품명,모델명,일시불단가"))
        .stdout(predicate::str::contains("냉장고,REF-500,1500000"));
}
