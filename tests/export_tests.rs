mod common;
use common::{admin, alice, bob, kk, setup_data_dir, store_with_sample_roster};
use kiemke::core::aggregate::department_stats;
use kiemke::core::checkin::CheckinLogic;
use kiemke::core::export::{ExportLogic, ExportRequest, default_file_name};
use kiemke::errors::AppError;
use kiemke::export::ExportFormat;
use kiemke::models::CheckinStatus;
use std::fs;

#[test]
fn test_select_on_empty_ledger() {
    assert!(matches!(
        ExportLogic::select(&[], None, false),
        Err(AppError::EmptyLedger)
    ));
    assert!(matches!(
        ExportLogic::select(&[], Some("Sales"), false),
        Err(AppError::EmptyLedger)
    ));
}

#[test]
fn test_select_by_department() {
    let dir = setup_data_dir("export_select_department");
    let store = store_with_sample_roster(&dir);
    CheckinLogic::submit(&store, &alice(), CheckinStatus::InProgress).expect("submit");
    CheckinLogic::submit(&store, &alice(), CheckinStatus::Completed).expect("submit");
    CheckinLogic::submit(&store, &admin(), CheckinStatus::InProgress).expect("submit");

    let ledger = store.ledger().expect("ledger");

    let sales = ExportLogic::select(ledger.events(), Some("Sales"), false).expect("sales rows");
    assert_eq!(sales.len(), 2);
    assert!(sales.iter().all(|r| r.department == "Sales"));
    assert_eq!(sales[1].status, "COMPLETED");

    let all = ExportLogic::select(ledger.events(), None, false).expect("all rows");
    assert_eq!(all.len(), 3);

    assert!(matches!(
        ExportLogic::select(ledger.events(), Some("Warehouse"), false),
        Err(AppError::NoMatchingRecords(d)) if d == "Warehouse"
    ));
}

#[test]
fn test_latest_export_matches_dashboard_counts() {
    let dir = setup_data_dir("export_latest_matches_dashboard");
    let store = store_with_sample_roster(&dir);
    CheckinLogic::submit(&store, &alice(), CheckinStatus::InProgress).expect("submit");
    CheckinLogic::submit(&store, &bob(), CheckinStatus::InProgress).expect("submit");
    CheckinLogic::submit(&store, &alice(), CheckinStatus::Completed).expect("submit");

    let roster = store.roster().expect("roster");
    let ledger = store.ledger().expect("ledger");
    let stats = department_stats(&roster, ledger.events());
    let sales = stats.iter().find(|s| s.department == "Sales").expect("sales");

    let rows = ExportLogic::select(ledger.events(), Some("Sales"), true).expect("rows");
    assert_eq!(rows.len(), sales.started());
}

#[test]
fn test_build_requires_admin() {
    let dir = setup_data_dir("export_build_admin");
    let store = store_with_sample_roster(&dir);
    CheckinLogic::submit(&store, &alice(), CheckinStatus::InProgress).expect("submit");

    let req = ExportRequest {
        department: None,
        format: ExportFormat::Csv,
        latest_only: false,
    };
    assert!(matches!(
        ExportLogic::build(&store, &alice(), &req),
        Err(AppError::AdminRequired)
    ));

    let out = ExportLogic::build(&store, &admin(), &req).expect("admin export");
    assert_eq!(out.file_name, "KQ_TAT_CA.csv");
    assert_eq!(out.rows, 1);

    let text = String::from_utf8(out.bytes).expect("utf8");
    let text = text.trim_start_matches('\u{feff}');
    assert!(text.starts_with("employee_id,name,department,timestamp,status"));
    assert!(text.contains("E1,Alice,Sales,"));
}

#[test]
fn test_build_json_and_xlsx() {
    let dir = setup_data_dir("export_build_formats");
    let store = store_with_sample_roster(&dir);
    CheckinLogic::submit(&store, &alice(), CheckinStatus::CrossChecking).expect("submit");

    let json = ExportLogic::build(
        &store,
        &admin(),
        &ExportRequest {
            department: Some("Sales".into()),
            format: ExportFormat::Json,
            latest_only: false,
        },
    )
    .expect("json export");
    let parsed: serde_json::Value = serde_json::from_slice(&json.bytes).expect("valid json");
    assert_eq!(parsed[0]["status"], "CROSS_CHECKING");
    assert_eq!(json.file_name, "KQ_Sales.json");

    let xlsx = ExportLogic::build(
        &store,
        &admin(),
        &ExportRequest {
            department: Some("Sales".into()),
            format: ExportFormat::Xlsx,
            latest_only: false,
        },
    )
    .expect("xlsx export");
    // XLSX is a zip container
    assert_eq!(&xlsx.bytes[..2], b"PK");
}

#[test]
fn test_default_file_name() {
    assert_eq!(default_file_name(None, ExportFormat::Csv), "KQ_TAT_CA.csv");
    assert_eq!(default_file_name(Some("Kho A/B"), ExportFormat::Xlsx), "KQ_Kho_A_B.xlsx");
}

#[test]
fn test_cli_export_department_csv() {
    let dir = setup_data_dir("export_cli_department");
    let roster = common::write_file(&dir, "upload.csv", common::SAMPLE_ROSTER);
    let out = dir.join("sales.csv");

    kk(&dir).args(["roster", "import", "--file"]).arg(&roster).assert().success();
    kk(&dir).args(["login", "--id", "E1", "--password", "pw1"]).assert().success();
    kk(&dir).args(["checkin", "IN_PROGRESS"]).assert().success();
    kk(&dir).args(["login", "--id", "A1", "--password", "adminpw"]).assert().success();

    kk(&dir)
        .args(["export", "--department", "Sales", "--format", "csv", "--file"])
        .arg(&out)
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read exported csv");
    assert!(content.contains("E1,Alice,Sales,"));
    assert!(content.contains("IN_PROGRESS"));
}

#[test]
fn test_cli_export_without_matching_rows_writes_nothing() {
    let dir = setup_data_dir("export_cli_no_rows");
    let roster = common::write_file(&dir, "upload.csv", common::SAMPLE_ROSTER);
    let out = dir.join("hq.csv");

    kk(&dir).args(["roster", "import", "--file"]).arg(&roster).assert().success();
    kk(&dir).args(["login", "--id", "E1", "--password", "pw1"]).assert().success();
    kk(&dir).args(["checkin", "COMPLETED"]).assert().success();
    kk(&dir).args(["login", "--id", "A1", "--password", "adminpw"]).assert().success();

    kk(&dir)
        .args(["export", "--department", "HQ", "--file"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicates::str::contains("No check-in records for department HQ"));

    assert!(!out.exists());
}
