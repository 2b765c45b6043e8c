mod common;
use chrono::NaiveDateTime;
use common::{admin, alice, bob, session, setup_data_dir, store_with_sample_roster};
use kiemke::core::auth::AuthLogic;
use kiemke::core::checkin::{CheckinLogic, parse_submission};
use kiemke::core::session::SessionKeys;
use kiemke::errors::AppError;
use kiemke::ledger::Ledger;
use kiemke::models::{CheckinStatus, Role};
use kiemke::store::Store;
use std::fs;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("timestamp")
}

#[test]
fn test_no_events_means_not_started() {
    let dir = setup_data_dir("checkin_not_started");
    let store = store_with_sample_roster(&dir);

    for id in ["E1", "E2", "A1", "unknown"] {
        assert_eq!(
            CheckinLogic::current_status(&store, id).expect("status"),
            CheckinStatus::NotStarted
        );
    }
}

#[test]
fn test_latest_event_is_current_status() {
    let dir = setup_data_dir("checkin_latest");
    let store = store_with_sample_roster(&dir);

    CheckinLogic::submit_at(&store, &alice(), CheckinStatus::CrossChecking, at("2025-10-01 08:00:00"))
        .expect("first");
    // going back is allowed while not completed
    CheckinLogic::submit_at(&store, &alice(), CheckinStatus::InProgress, at("2025-10-01 09:00:00"))
        .expect("second");

    let view = CheckinLogic::status_of(&store, &alice()).expect("status view");
    assert_eq!(view.status, CheckinStatus::InProgress);
    assert_eq!(view.department, "Sales");
    assert_eq!(view.last_update.as_deref(), Some("2025-10-01 09:00:00"));
}

#[test]
fn test_submission_after_completion_is_rejected_and_not_appended() {
    let dir = setup_data_dir("checkin_terminal");
    let store = store_with_sample_roster(&dir);

    let steps = [
        CheckinStatus::InProgress,
        CheckinStatus::CrossChecking,
        CheckinStatus::Completed,
    ];
    for (i, s) in steps.iter().enumerate() {
        CheckinLogic::submit_at(&store, &alice(), *s, at(&format!("2025-10-01 1{i}:00:00")))
            .expect("escalating submission");
    }

    let err = CheckinLogic::submit(&store, &alice(), CheckinStatus::InProgress).unwrap_err();
    assert!(matches!(err, AppError::TerminalStateViolation(id) if id == "E1"));

    let err = CheckinLogic::submit(&store, &alice(), CheckinStatus::Completed).unwrap_err();
    assert!(matches!(err, AppError::TerminalStateViolation(_)));

    assert_eq!(store.ledger().expect("ledger").len(), steps.len());
    let on_disk = Ledger::open(&dir.join("checkin.csv")).expect("reopen ledger");
    assert_eq!(on_disk.len(), steps.len());

    // other employees are unaffected
    CheckinLogic::submit(&store, &bob(), CheckinStatus::InProgress).expect("bob can check in");
}

#[test]
fn test_not_started_cannot_be_submitted() {
    let dir = setup_data_dir("checkin_not_started_submit");
    let store = store_with_sample_roster(&dir);

    let err = CheckinLogic::submit(&store, &alice(), CheckinStatus::NotStarted).unwrap_err();
    assert!(matches!(err, AppError::InvalidStatus(_)));
    assert!(store.ledger().expect("ledger").is_empty());

    assert!(parse_submission("not_started").is_err());
    assert!(parse_submission("bogus").is_err());
    assert_eq!(
        parse_submission(" cross-checking ").expect("parse"),
        CheckinStatus::CrossChecking
    );
}

#[test]
fn test_event_snapshots_roster_fields() {
    let dir = setup_data_dir("checkin_snapshot");
    let store = store_with_sample_roster(&dir);

    let event = CheckinLogic::submit(&store, &alice(), CheckinStatus::InProgress).expect("submit");
    assert_eq!(event.name, "Alice");
    assert_eq!(event.department, "Sales");

    // Alice moves to HQ; the recorded event keeps Sales
    store
        .import_roster("id,name,department,password\nE1,Alice B.,HQ,pw1\n".as_bytes())
        .expect("re-upload");

    let ledger = store.ledger().expect("ledger");
    let recorded = ledger.latest_for("E1").expect("event");
    assert_eq!(recorded.department, "Sales");
    assert_eq!(recorded.name, "Alice");
}

#[test]
fn test_unknown_employee_cannot_check_in() {
    let dir = setup_data_dir("checkin_unknown");
    let store = store_with_sample_roster(&dir);

    let ghost = session("Z9", "Ghost", Role::User);
    assert!(matches!(
        CheckinLogic::submit(&store, &ghost, CheckinStatus::InProgress),
        Err(AppError::UnknownEmployee(_))
    ));
}

#[test]
fn test_admin_on_roster_can_also_check_in() {
    let dir = setup_data_dir("checkin_admin");
    let store = store_with_sample_roster(&dir);

    CheckinLogic::submit(&store, &admin(), CheckinStatus::Completed).expect("admin check-in");
    assert_eq!(
        CheckinLogic::current_status(&store, "A1").expect("status"),
        CheckinStatus::Completed
    );
}

#[test]
fn test_ledger_reads_legacy_file() {
    let dir = setup_data_dir("checkin_legacy_ledger");
    let path = common::write_file(
        &dir,
        "legacy.csv",
        "\u{feff}Ma_NV,Ho_ten,Bo_phan_KK,Thoi_gian,Trang_thai\n\
         E1,Alice,Sales,2025-09-30 08:00:00,Đang KK\n\
         E1,Alice,Sales,2025-09-30 17:00:00,Kết thúc KK\n",
    );

    let ledger = Ledger::open(&path).expect("open legacy ledger");
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.current_status("E1"), CheckinStatus::Completed);
}

#[test]
fn test_login_issues_verifiable_token() {
    let dir = setup_data_dir("checkin_login");
    let store = store_with_sample_roster(&dir);
    let keys = SessionKeys::new(common::SECRET, 1);

    let (session, token) = AuthLogic::login(&store, &keys, "A1", "adminpw").expect("login");
    assert_eq!(session.role, Role::Admin);

    let verified = keys.verify(&token).expect("verify");
    assert_eq!(verified, session);

    let other_keys = SessionKeys::new("another-secret", 1);
    assert!(matches!(other_keys.verify(&token), Err(AppError::SessionMissing)));
    assert!(matches!(keys.authorize(None), Err(AppError::SessionMissing)));
}

#[test]
fn test_login_failure_does_not_reveal_field() {
    let dir = setup_data_dir("checkin_login_failure");
    let store = store_with_sample_roster(&dir);

    let wrong_password = AuthLogic::authenticate(&store, "E1", "nope").unwrap_err();
    let wrong_id = AuthLogic::authenticate(&store, "nobody", "pw1").unwrap_err();

    assert!(matches!(wrong_password, AppError::AuthenticationFailed));
    assert!(matches!(wrong_id, AppError::AuthenticationFailed));
    assert_eq!(wrong_password.to_string(), wrong_id.to_string());
}

#[test]
fn test_concurrent_submissions_are_all_persisted() {
    use std::sync::Arc;
    use std::thread;

    let dir = setup_data_dir("checkin_concurrent");
    let store = Arc::new(store_with_sample_roster(&dir));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let who = if i % 2 == 0 { alice() } else { bob() };
                CheckinLogic::submit(&store, &who, CheckinStatus::InProgress)
            })
        })
        .collect();

    for h in handles {
        h.join().expect("thread").expect("submission");
    }

    assert_eq!(store.ledger().expect("ledger").len(), 8);
    let on_disk = Ledger::open(&dir.join("checkin.csv")).expect("reopen ledger");
    assert_eq!(on_disk.len(), 8);
}

#[test]
fn test_completion_by_another_store_is_seen_before_appending() {
    let dir = setup_data_dir("checkin_two_stores");
    let first = store_with_sample_roster(&dir);
    let second = Store::open(&dir.join("roster.csv"), &dir.join("checkin.csv")).expect("second store");

    CheckinLogic::submit_at(&first, &alice(), CheckinStatus::Completed, at("2025-10-01 08:00:00"))
        .expect("completed through the first store");

    let err = CheckinLogic::submit(&second, &alice(), CheckinStatus::InProgress).unwrap_err();
    assert!(matches!(err, AppError::TerminalStateViolation(_)));

    assert_eq!(second.ledger().expect("ledger").len(), 1);
    assert_eq!(
        CheckinLogic::current_status(&second, "E1").expect("status"),
        CheckinStatus::Completed
    );

    let on_disk = Ledger::open(&dir.join("checkin.csv")).expect("reopen ledger");
    assert_eq!(on_disk.len(), 1);
    assert_eq!(on_disk.current_status("E1"), CheckinStatus::Completed);

    // and the other way round: the first store sees what the second appends
    CheckinLogic::submit(&second, &bob(), CheckinStatus::CrossChecking).expect("bob");
    assert_eq!(
        CheckinLogic::current_status(&first, "E2").expect("status"),
        CheckinStatus::CrossChecking
    );
}

#[test]
fn test_failed_persist_is_not_reported_or_recorded() {
    let dir = setup_data_dir("checkin_persist_failure");
    let store = store_with_sample_roster(&dir);

    // a directory where the ledger file should be cannot be appended to
    fs::create_dir_all(dir.join("checkin.csv")).expect("block ledger path");

    let result = CheckinLogic::submit(&store, &alice(), CheckinStatus::InProgress);
    assert!(result.is_err());
    assert!(store.ledger().expect("ledger").is_empty());
    assert_eq!(
        CheckinLogic::current_status(&store, "E1").expect("status"),
        CheckinStatus::NotStarted
    );
}

#[test]
fn test_append_follows_existing_column_order() {
    let dir = setup_data_dir("checkin_legacy_column_order");
    common::write_file(
        &dir,
        "checkin.csv",
        "Thoi_gian,Trang_thai,Ma_NV,Ho_ten,Bo_phan_KK\n\
         2025-09-30 17:00:00,Kết thúc KK,E1,Alice,Sales\n",
    );
    let store = store_with_sample_roster(&dir);

    CheckinLogic::submit_at(&store, &bob(), CheckinStatus::InProgress, at("2025-10-02 08:00:00"))
        .expect("append to legacy ledger");

    let text = fs::read_to_string(dir.join("checkin.csv")).expect("ledger file");
    assert_eq!(
        text.lines().last(),
        Some("2025-10-02 08:00:00,IN_PROGRESS,E2,Bob,Sales")
    );

    let ledger = Ledger::open(&dir.join("checkin.csv")).expect("reopen ledger");
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.current_status("E1"), CheckinStatus::Completed);
    let bob_event = ledger.latest_for("E2").expect("bob event");
    assert_eq!(bob_event.department, "Sales");
    assert_eq!(bob_event.status, CheckinStatus::InProgress);
}

#[test]
fn test_huge_session_lifetime_still_issues_a_token() {
    let dir = setup_data_dir("checkin_huge_ttl");
    let store = store_with_sample_roster(&dir);
    let keys = SessionKeys::new(common::SECRET, i64::MAX);

    let (session, token) = AuthLogic::login(&store, &keys, "E1", "pw1").expect("login");
    assert_eq!(keys.verify(&token).expect("verify"), session);
}
