use assert_cmd::Command;
use predicates::prelude::*;

fn write_sales_csv(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("sales.csv");
    std::fs::write(
        &path,
        "Product,Region,OrderDate,Total Price\n\
         Widget,East,2024-01-05,10.00\n\
         Gadget,West,2024-01-20,5.00\n\
         Widget,East,2024-02-01,3.00\n",
    )
    .unwrap();
    path
}

fn salesdash() -> Command {
    Command::cargo_bin("salesdash").unwrap()
}

#[test]
fn view_product_prints_descending_totals() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_sales_csv(dir.path());

    salesdash()
        .args(["view", "product", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Sales by Product"))
        .stdout(predicate::str::contains("$13.00"))
        .stdout(predicate::str::contains("Widget"));
}

#[test]
fn view_region_prints_shares() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_sales_csv(dir.path());

    salesdash()
        .args(["view", "region", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Sales by Region"))
        .stdout(predicate::str::contains("East"))
        .stdout(predicate::str::contains("$18.00"));
}

#[test]
fn view_time_prints_monthly_totals() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_sales_csv(dir.path());

    salesdash()
        .args(["view", "time", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01"))
        .stdout(predicate::str::contains("$15.00"))
        .stdout(predicate::str::contains("$7.00"));
}

#[test]
fn view_overview_full_includes_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_sales_csv(dir.path());

    salesdash()
        .args(["view", "overview", "--full", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("First 5 Rows of the Data"))
        .stdout(predicate::str::contains("Descriptive Statistics"));
}

#[test]
fn view_overview_without_full_omits_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_sales_csv(dir.path());

    salesdash()
        .args(["view", "overview", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Descriptive Statistics").not());
}

#[test]
fn missing_columns_degrade_to_warning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bare.csv");
    std::fs::write(&path, "Quantity,Discount\n1,0.1\n").unwrap();

    salesdash()
        .args(["view", "product", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Required columns 'Product' or 'Total Price' not found in data.",
        ));
}

#[test]
fn missing_file_is_fatal() {
    salesdash()
        .args(["view", "product", "--file", "/nonexistent/sales.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn bad_order_date_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(
        &path,
        "OrderDate,Total Price\n2024-01-05,10.00\nyesterday,5.00\n",
    )
    .unwrap();

    salesdash()
        .args(["view", "time", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unparseable date"));
}

#[test]
fn demo_writes_a_loadable_sample() {
    let dir = tempfile::tempdir().unwrap();
    let sample = dir.path().join("sample.csv");

    salesdash()
        .args(["demo", "--output"])
        .arg(&sample)
        .assert()
        .success()
        .stdout(predicate::str::contains("sample rows"));

    salesdash()
        .args(["view", "region", "--file"])
        .arg(&sample)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Sales by Region"));
}
