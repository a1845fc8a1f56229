//! Unit tests for test case loading

use crate::common::TestCaseFixture;
use diffst::DiffstError;

const CASE: &str = r#"
Source:
  DB: left_db
  SQL: |
    select id, amount
    from payments
    order by id;
Target:
  DB: right_db
  SQL: select id, amount from payments order by id
Fuzzy: [amount]
BatchSize: 500
OutputLimit: 10
"#;

#[test]
fn test_load_full_test_case() {
    let fixture = TestCaseFixture::new().unwrap();
    fixture.write_case("0042", CASE).unwrap();

    let case = fixture.dir.load("0042").unwrap();
    assert_eq!(case.source.db, "left_db");
    assert!(case.source.sql.contains("from payments"));
    assert_eq!(case.fuzzy, vec!["amount".to_string()]);
    assert_eq!(case.batch_size, Some(500));
    assert_eq!(case.output_limit, Some(10));
}

#[test]
fn test_malformed_yaml_reports_file() {
    let fixture = TestCaseFixture::new().unwrap();
    fixture.write_case("bad", "Source: [unclosed").unwrap();

    let err = fixture.dir.load("bad").unwrap_err();
    assert!(matches!(err, DiffstError::Generic(_)));
    assert!(err.to_string().contains("dfbad.yml"));
}

#[test]
fn test_zero_output_limit_rejected() {
    let fixture = TestCaseFixture::new().unwrap();
    let yaml = CASE.replace("OutputLimit: 10", "OutputLimit: 0");
    fixture.write_case("0043", &yaml).unwrap();

    assert!(matches!(
        fixture.dir.load("0043"),
        Err(DiffstError::Config { .. })
    ));
}

#[test]
fn test_empty_id_rejected() {
    let fixture = TestCaseFixture::new().unwrap();
    assert!(matches!(
        fixture.dir.load(""),
        Err(DiffstError::InvalidInput { .. })
    ));
}

#[test]
fn test_missing_directory() {
    let fixture = TestCaseFixture::new().unwrap();
    let missing = fixture.temp_dir.path().join("nope");
    assert!(diffst::testcase::TestCaseDir::new(missing).is_err());
}
