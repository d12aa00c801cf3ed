//! End-to-end tests for the report pipeline, run against a temp data home.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tally::args::ReportArgs;
use tally::{commands, Error, Resolution, ScriptedResolver};
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

fn setup_home() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join("categories.json"),
        r#"{
  "categoryMapper": {
    "Groceries": "Food"
  },
  "internalCategories": ["Food", "Other"]
}"#,
    );
    write(&dir.path().join("history.json"), "{}");
    dir
}

fn report_args(month_csvs: Vec<PathBuf>) -> ReportArgs {
    ReportArgs::new(month_csvs, None, None, None, false)
}

fn no_answers() -> ScriptedResolver {
    ScriptedResolver::new([])
}

#[test]
fn test_single_mapped_row() {
    let home = setup_home();
    let csv_path = home.path().join("2020-01-05-transactions.csv");
    write(
        &csv_path,
        "Category,Description,Transaction Date,Debit,Credit\n\
         Groceries,WholeFoods,2020-01-05,54.32,\n",
    );

    let out = commands::report(home.path(), &report_args(vec![csv_path]), no_answers()).unwrap();
    let summary = out.structure().unwrap();
    assert_eq!(summary.month, "2020-01");
    assert_eq!(summary.aggregated, 1);
    assert_eq!(summary.skipped, 0);

    let output: Value = serde_json::from_str(
        &std::fs::read_to_string(home.path().join("outputs").join("2020-01-output.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(output["totals"], json!({"Food": 54.32, "Other": 0}));
    assert_eq!(
        output["transactions"],
        json!({
            "Food": [{"description": "WholeFoods", "amount": "54.32", "date": "2020-01-05"}],
            "Other": []
        })
    );

    let history: Value = serde_json::from_str(
        &std::fs::read_to_string(home.path().join("history.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(history["months"]["2020-01"], json!({"Food": 54.32, "Other": 0}));
    assert_eq!(history["averages"], json!({"Food": 54.32, "Other": 0}));

    assert!(home.path().join("outputs").join("2020-01.svg").is_file());
}

#[test]
fn test_credits_and_autopay_are_filtered() {
    let home = setup_home();
    let csv_path = home.path().join("2020-02-01.csv");
    write(
        &csv_path,
        "Category,Description,Transaction Date,Debit,Credit\n\
         Groceries,WholeFoods,2020-02-01,10.00,\n\
         Payroll,Some Other Credit,2020-02-02,,1000.00\n\
         Payment,CAPITAL ONE AUTOPAY PYMT,2020-02-03,250.00,\n",
    );

    let out = commands::report(home.path(), &report_args(vec![csv_path]), no_answers()).unwrap();
    let summary = out.structure().unwrap();
    assert_eq!(summary.aggregated, 1);
    assert_eq!(summary.skipped, 2);

    let output: Value = serde_json::from_str(
        &std::fs::read_to_string(home.path().join("outputs").join("2020-02-output.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(output["totals"], json!({"Food": 10, "Other": 0}));
}

#[test]
fn test_learned_rule_spans_files_and_is_persisted() {
    let home = setup_home();
    let first = home.path().join("2020-03-01-checking.csv");
    let second = home.path().join("2020-03-01-card.csv");
    write(
        &first,
        "Category,Description,Transaction Date,Debit,Credit\n\
         Internet,COMCAST,2020-03-02,80.00,\n",
    );
    write(
        &second,
        "Category,Description,Transaction Date,Debit,Credit\n\
         Internet,COMCAST,2020-03-17,80.00,\n",
    );

    // One scripted answer: the second COMCAST row must resolve through the
    // rule learned from the first.
    let resolver = ScriptedResolver::new([Resolution {
        category: "Other".to_string(),
        learn: true,
    }]);
    let out = commands::report(home.path(), &report_args(vec![first, second]), resolver).unwrap();
    let summary = out.structure().unwrap();
    assert_eq!(summary.files, 2);
    assert_eq!(summary.aggregated, 2);
    assert_eq!(summary.learned, 1);

    let categories: Value = serde_json::from_str(
        &std::fs::read_to_string(home.path().join("categories.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        categories["categoryMapper"]["Internet"],
        json!({"COMCAST": "Other"})
    );

    let output: Value = serde_json::from_str(
        &std::fs::read_to_string(home.path().join("outputs").join("2020-03-output.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(output["totals"]["Other"], json!(160));
}

#[test]
fn test_rerunning_a_month_overwrites_history() {
    let home = setup_home();
    let csv_path = home.path().join("2020-04-01.csv");
    write(
        &csv_path,
        "Category,Description,Transaction Date,Debit,Credit\n\
         Groceries,WholeFoods,2020-04-01,30.00,\n",
    );
    let args = report_args(vec![csv_path.clone()]);
    commands::report(home.path(), &args, no_answers()).unwrap();

    // Correct the export and re-run the same month.
    write(
        &csv_path,
        "Category,Description,Transaction Date,Debit,Credit\n\
         Groceries,WholeFoods,2020-04-01,40.00,\n",
    );
    commands::report(home.path(), &args, no_answers()).unwrap();

    let history: Value = serde_json::from_str(
        &std::fs::read_to_string(home.path().join("history.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(history["months"]["2020-04"]["Food"], json!(40));
    assert_eq!(history["averages"]["Food"], json!(40));
}

#[test]
fn test_bad_filename_fails_before_any_io() {
    let home = setup_home();
    // The file does not even exist; the name check must fire first.
    let err = commands::report(
        home.path(),
        &report_args(vec![home.path().join("no-date-here.csv")]),
        no_answers(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::BadMonthPrefix(_)));
}

#[test]
fn test_malformed_debit_aborts_without_touching_the_stores() {
    let home = setup_home();
    let categories_before =
        std::fs::read_to_string(home.path().join("categories.json")).unwrap();
    let csv_path = home.path().join("2020-05-01.csv");
    write(
        &csv_path,
        "Category,Description,Transaction Date,Debit,Credit\n\
         Internet,COMCAST,2020-05-02,80.00,\n\
         Groceries,WholeFoods,2020-05-03,oops,\n",
    );

    // The first row learns a rule; the malformed second row aborts the run
    // before anything is persisted.
    let resolver = ScriptedResolver::new([Resolution {
        category: "Other".to_string(),
        learn: true,
    }]);
    let err =
        commands::report(home.path(), &report_args(vec![csv_path]), resolver).unwrap_err();
    assert!(matches!(err, Error::MalformedRecord(_)));

    let categories_after =
        std::fs::read_to_string(home.path().join("categories.json")).unwrap();
    assert_eq!(categories_before, categories_after);
    let history_after = std::fs::read_to_string(home.path().join("history.json")).unwrap();
    assert_eq!(history_after, "{}");
    assert!(!home.path().join("outputs").exists());
}

#[test]
fn test_missing_category_store_is_fatal() {
    let home = TempDir::new().unwrap();
    write(&home.path().join("history.json"), "{}");
    let csv_path = home.path().join("2020-06-01.csv");
    write(
        &csv_path,
        "Category,Description,Transaction Date,Debit,Credit\n",
    );
    let err = commands::report(home.path(), &report_args(vec![csv_path]), no_answers())
        .unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable { .. }));
}

#[test]
fn test_missing_history_is_fatal_but_store_is_already_saved() {
    let home = setup_home();
    std::fs::remove_file(home.path().join("history.json")).unwrap();
    let csv_path = home.path().join("2020-07-01.csv");
    write(
        &csv_path,
        "Category,Description,Transaction Date,Debit,Credit\n\
         Groceries,WholeFoods,2020-07-01,12.00,\n",
    );
    let err = commands::report(home.path(), &report_args(vec![csv_path]), no_answers())
        .unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable { .. }));
}
