#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use qrattend::db::initialize::init_db;
use qrattend::db::pool::DbPool;
use qrattend::db::queries;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Isolated HOME (config + session file) and database for one test.
pub struct TestEnv {
    pub home: PathBuf,
    pub db: String,
}

/// Create a unique test directory inside the system temp dir, wiping any
/// leftovers from a previous run.
pub fn setup(name: &str) -> TestEnv {
    let home = env::temp_dir().join(format!("qrattend_it_{name}"));
    fs::remove_dir_all(&home).ok();
    fs::create_dir_all(&home).expect("create test home");
    let db = home.join("qrattend.sqlite").to_string_lossy().to_string();
    TestEnv { home, db }
}

impl TestEnv {
    /// The binary with HOME and `--db` pointing into the test directory.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("qrattend");
        cmd.env("HOME", &self.home).args(["--db", &self.db]);
        cmd
    }

    pub fn init(&self) {
        self.cmd().args(["--test", "init"]).assert().success();
    }

    pub fn conn(&self) -> rusqlite::Connection {
        let pool = DbPool::new(&self.db).expect("open db");
        init_db(&pool.conn).expect("init db");
        pool.into_inner()
    }

    pub fn add_student(&self, name: &str, email: &str) {
        queries::add_student(&self.conn(), name, email).expect("add student");
    }

    /// Insert an attendance row directly, as another entry channel would.
    pub fn seed_attendance(&self, name: &str, date: &str, time: &str, method: &str) {
        self.conn()
            .execute(
                "INSERT INTO Attendance (Name, Date, Time, Method) VALUES (?1, ?2, ?3, ?4)",
                [name, date, time, method],
            )
            .expect("seed attendance");
    }

    pub fn attendance_count(&self, name: &str) -> i64 {
        self.conn()
            .query_row(
                "SELECT COUNT(*) FROM Attendance WHERE Name = ?1",
                [name],
                |r| r.get(0),
            )
            .expect("count")
    }

    pub fn log_count(&self, operation: &str) -> i64 {
        self.conn()
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = ?1",
                [operation],
                |r| r.get(0),
            )
            .expect("count")
    }

    /// init + one registered student, logged in.
    pub fn logged_in(name: &str) -> TestEnv {
        let env = setup(name);
        env.init();
        env.add_student("Alice Smith", "parent@gmail.com");
        env.cmd()
            .args(["login", "--name", "Alice Smith", "--email", "parent@gmail.com"])
            .assert()
            .success();
        env
    }

    pub fn out(&self, file: &str) -> String {
        self.home.join(file).to_string_lossy().to_string()
    }
}

/// A token for `class` issued `age` seconds ago.
pub fn token(class: &str, age: i64) -> String {
    format!("SESSION:{class}:T1:{}", chrono::Utc::now().timestamp() - age)
}
