use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{SAMPLE_ROSTER, kk, setup_data_dir, write_file};

fn import_sample(dir: &std::path::Path) {
    let roster = write_file(dir, "upload.csv", SAMPLE_ROSTER);
    kk(dir)
        .args(["roster", "import", "--file"])
        .arg(&roster)
        .assert()
        .success()
        .stdout(contains("Roster imported: 3 employees in 2 departments"));
}

#[test]
fn test_init_in_test_mode() {
    let dir = setup_data_dir("cli_init");
    kk(&dir)
        .args(["--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));
}

#[test]
fn test_login_rejects_bad_credentials() {
    let dir = setup_data_dir("cli_bad_login");
    import_sample(&dir);

    kk(&dir)
        .args(["login", "--id", "E1", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(contains("Authentication failed"));

    assert!(!dir.join("session.token").exists());
}

#[test]
fn test_commands_without_session_are_rejected() {
    let dir = setup_data_dir("cli_no_session");
    import_sample(&dir);

    for args in [
        vec!["status"],
        vec!["checkin", "IN_PROGRESS"],
        vec!["dashboard"],
        vec!["export"],
    ] {
        kk(&dir)
            .args(&args)
            .assert()
            .failure()
            .stderr(contains("No active session"));
    }
}

#[test]
fn test_employee_checkin_flow() {
    let dir = setup_data_dir("cli_checkin_flow");
    import_sample(&dir);

    kk(&dir)
        .args(["login", "--id", "E1", "--password", "pw1"])
        .assert()
        .success()
        .stdout(contains("Logged in as Alice"));

    kk(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Not started"));

    kk(&dir).args(["checkin", "in_progress"]).assert().success();
    kk(&dir).args(["checkin", "COMPLETED"]).assert().success();

    kk(&dir)
        .args(["checkin", "IN_PROGRESS"])
        .assert()
        .failure()
        .stderr(contains("already completed"));

    kk(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(contains("IN_PROGRESS").and(contains("COMPLETED")));

    // users get their own status instead of the department table
    kk(&dir)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(contains("Completed").and(contains("Department").not()));

    kk(&dir)
        .args(["export"])
        .assert()
        .failure()
        .stderr(contains("administrator"));

    let ledger = std::fs::read_to_string(dir.join("checkin.csv")).expect("ledger file");
    assert_eq!(ledger.lines().count(), 3); // header + 2 events
}

#[test]
fn test_admin_dashboard_json() {
    let dir = setup_data_dir("cli_admin_dashboard");
    import_sample(&dir);

    kk(&dir).args(["login", "--id", "E1", "--password", "pw1"]).assert().success();
    kk(&dir).args(["checkin", "IN_PROGRESS"]).assert().success();
    kk(&dir).args(["checkin", "COMPLETED"]).assert().success();

    kk(&dir)
        .args(["login", "--id", "A1", "--password", "adminpw"])
        .assert()
        .success();

    let output = kk(&dir)
        .args(["dashboard", "--json"])
        .output()
        .expect("run dashboard");
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json stats");
    let sales = stats
        .as_array()
        .and_then(|a| a.iter().find(|s| s["department"] == "Sales"))
        .expect("sales row");
    assert_eq!(sales["total"], 2);
    assert_eq!(sales["completed"], 1);
    assert_eq!(sales["not_started"], 1);
    assert_eq!(sales["in_progress"], 0);
    assert_eq!(sales["completion_percentage"], 50.0);

    kk(&dir)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(contains("Sales").and(contains("50.0%")).and(contains("TOTAL")));
}

#[test]
fn test_roster_reimport_requires_admin_and_keeps_roster_on_error() {
    let dir = setup_data_dir("cli_roster_reimport");
    import_sample(&dir);

    let bad = write_file(&dir, "bad.csv", "Ma_NV,Ho_ten\nX,Nobody\n");

    // second import needs a session
    kk(&dir)
        .args(["roster", "import", "--file"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(contains("No active session"));

    kk(&dir).args(["login", "--id", "A1", "--password", "adminpw"]).assert().success();

    kk(&dir)
        .args(["roster", "import", "--file"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(contains("Malformed roster"));

    // previous roster still works
    kk(&dir)
        .args(["login", "--id", "E2", "--password", "pw2"])
        .assert()
        .success();
}

#[test]
fn test_logout_and_audit_log() {
    let dir = setup_data_dir("cli_logout");
    import_sample(&dir);

    kk(&dir).args(["login", "--id", "E2", "--password", "pw2"]).assert().success();
    kk(&dir).arg("whoami").assert().success().stdout(contains("Bob"));
    kk(&dir).arg("logout").assert().success().stdout(contains("Logged out"));
    kk(&dir).arg("whoami").assert().failure();

    kk(&dir)
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("roster_import").and(contains("login")).and(contains("logout")));
}

#[test]
fn test_missing_secret_is_a_config_error() {
    let dir = setup_data_dir("cli_missing_secret");
    import_sample(&dir);

    kk(&dir)
        .env_remove("KIEMKE_SESSION_SECRET")
        .args(["login", "--id", "E1", "--password", "pw1"])
        .assert()
        .failure()
        .stderr(contains("session_secret is not set"));
}

#[test]
fn test_roster_import_from_xlsx_workbook() {
    let dir = setup_data_dir("cli_roster_xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    let rows = [
        ["Ma_NV", "Ho_ten", "Bo_phan_KK", "Mat_khau", "Vai_tro"],
        ["A1", "Admin", "HQ", "adminpw", "yes"],
        ["E1", "Alice", "Sales", "pw1", "no"],
    ];
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write(r as u32, c as u16, *value).expect("write cell");
        }
    }
    let path = dir.join("data.xlsx");
    std::fs::write(&path, workbook.save_to_buffer().expect("save workbook")).expect("write workbook");

    kk(&dir)
        .args(["roster", "import", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("Roster imported: 2 employees in 2 departments"));

    kk(&dir)
        .args(["login", "--id", "E1", "--password", "pw1"])
        .assert()
        .success();
}
