#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use kiemke::core::session::Session;
use kiemke::models::Role;
use kiemke::store::Store;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const SECRET: &str = "test-secret-do-not-use";

/// Roster of the reference scenario: two Sales employees and one HQ admin.
/// Header cells carry stray spaces on purpose.
pub const SAMPLE_ROSTER: &str = "\
 Ma_NV , Ho_ten ,Bo_phan_KK, Mat_khau ,Vai_tro
E1,Alice,Sales,pw1,no
E2,Bob,Sales,pw2,
A1,Admin,HQ,adminpw,yes
";

/// CLI command isolated from the user's home and config.
pub fn kk(data_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("kiemke");
    cmd.env("HOME", data_dir)
        .env("APPDATA", data_dir)
        .env("KIEMKE_SESSION_SECRET", SECRET)
        .env("NO_COLOR", "1")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

/// Create an empty, unique data directory inside the system temp dir.
pub fn setup_data_dir(name: &str) -> PathBuf {
    let mut path = env::temp_dir();
    path.push(format!("kiemke_test_{name}"));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create test data dir");
    path
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write test file");
    path
}

/// Store with the sample roster already imported.
pub fn store_with_sample_roster(dir: &Path) -> Store {
    let store = Store::open(&dir.join("roster.csv"), &dir.join("checkin.csv")).expect("open store");
    store
        .import_roster(SAMPLE_ROSTER.as_bytes())
        .expect("import sample roster");
    store
}

pub fn session(id: &str, name: &str, role: Role) -> Session {
    Session {
        employee_id: id.to_string(),
        name: name.to_string(),
        role,
    }
}

pub fn alice() -> Session {
    session("E1", "Alice", Role::User)
}

pub fn bob() -> Session {
    session("E2", "Bob", Role::User)
}

pub fn admin() -> Session {
    session("A1", "Admin", Role::Admin)
}
