use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{TestEnv, setup, token};

#[test]
fn test_login_with_wrong_email_fails() {
    let env = setup("login_wrong_email");
    env.init();
    env.add_student("Alice Smith", "parent@gmail.com");

    env.cmd()
        .args(["login", "--name", "Alice Smith", "--email", "other@gmail.com"])
        .assert()
        .code(1)
        .stderr(contains("Invalid credentials"));

    env.cmd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains("Not logged in"));
}

#[test]
fn test_login_stores_uppercase_name() {
    let env = TestEnv::logged_in("login_ok");

    env.cmd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains("ALICE SMITH"));

    assert_eq!(env.log_count("login"), 1);
}

#[test]
fn test_scan_marks_once_per_day() {
    let env = TestEnv::logged_in("scan_once");

    env.cmd()
        .args(["scan", "--session-id", "MATH101", "--payload", &token("MATH101", 0)])
        .assert()
        .success()
        .stdout(contains("Attendance marked for ALICE SMITH"));

    env.cmd()
        .args(["scan", "--session-id", "MATH101", "--payload", &token("MATH101", 0)])
        .assert()
        .success()
        .stdout(contains("already marked"));

    assert_eq!(env.attendance_count("ALICE SMITH"), 1);
    assert_eq!(env.log_count("marked"), 1);
    assert_eq!(env.log_count("duplicate"), 1);
}

#[test]
fn test_whoami_reports_todays_attendance() {
    let env = TestEnv::logged_in("whoami_today");

    env.cmd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains("ALICE SMITH").and(contains("Not marked today")));

    env.cmd()
        .args(["scan", "--session-id", "MATH101", "--payload", &token("MATH101", 0)])
        .assert()
        .success();

    env.cmd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains("Marked today").and(contains("via Student App")));
}

#[test]
fn test_scan_respects_record_from_other_channel() {
    let env = TestEnv::logged_in("scan_other_channel");
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    env.seed_attendance("ALICE SMITH", &today, "07:55:00", "Teacher");

    env.cmd()
        .args(["scan", "--session-id", "MATH101", "--payload", &token("MATH101", 0)])
        .assert()
        .success()
        .stdout(contains("already marked"));

    assert_eq!(env.attendance_count("ALICE SMITH"), 1);
}

#[test]
fn test_expired_token_is_rejected() {
    let env = TestEnv::logged_in("scan_expired");

    env.cmd()
        .args(["scan", "--session-id", "MATH101", "--payload", &token("MATH101", 120)])
        .assert()
        .code(2)
        .stderr(contains("Invalid or expired QR code"));

    assert_eq!(env.attendance_count("ALICE SMITH"), 0);
    assert_eq!(env.log_count("rejected"), 1);
}

#[test]
fn test_wrong_session_is_rejected() {
    let env = TestEnv::logged_in("scan_wrong_session");

    env.cmd()
        .args(["scan", "--session-id", "MATH101", "--payload", &token("PHYS200", 0)])
        .assert()
        .code(2)
        .stderr(contains("another session"));

    assert_eq!(env.attendance_count("ALICE SMITH"), 0);
}

#[test]
fn test_non_session_payload_is_rejected() {
    let env = TestEnv::logged_in("scan_foreign_payload");

    env.cmd()
        .args(["scan", "--session-id", "MATH101", "--payload", "https://example.com"])
        .assert()
        .code(2);

    env.cmd()
        .args(["scan", "--session-id", "MATH101", "--payload", "SESSION:MATH101:T1:notanumber"])
        .assert()
        .code(2)
        .stderr(contains("not a number"));
}

#[test]
fn test_scan_requires_login() {
    let env = setup("scan_logged_out");
    env.init();

    env.cmd()
        .args(["scan", "--session-id", "MATH101", "--payload", &token("MATH101", 0)])
        .assert()
        .code(1)
        .stderr(contains("Not logged in"));
}

#[test]
fn test_scan_reads_payloads_from_stdin() {
    let env = TestEnv::logged_in("scan_stdin");
    let input = format!("\nnot-a-token\n{}\n", token("MATH101", 1));

    env.cmd()
        .args(["scan", "--session-id", "MATH101", "--payload-file", "-"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Attendance marked"));

    assert_eq!(env.attendance_count("ALICE SMITH"), 1);
}

#[test]
fn test_payload_file_keeps_surrounding_whitespace() {
    let env = TestEnv::logged_in("scan_padded_line");
    let input = format!(" {}\n", token("MATH101", 0));

    env.cmd()
        .args(["scan", "--session-id", "MATH101", "--payload-file", "-"])
        .write_stdin(input)
        .assert()
        .code(2)
        .stderr(contains("not a SESSION token"));

    assert_eq!(env.attendance_count("ALICE SMITH"), 0);
}

#[test]
fn test_empty_payload_file_means_no_qr_code() {
    let env = TestEnv::logged_in("scan_empty_file");

    env.cmd()
        .args(["scan", "--session-id", "MATH101", "--payload-file", "-"])
        .write_stdin("\n\n")
        .assert()
        .code(2)
        .stderr(contains("No QR code detected"));
}

#[test]
fn test_logout_then_scan_fails() {
    let env = TestEnv::logged_in("logout");

    env.cmd()
        .arg("logout")
        .assert()
        .success()
        .stdout(contains("Logged out"));

    env.cmd()
        .args(["scan", "--session-id", "MATH101", "--payload", &token("MATH101", 0)])
        .assert()
        .code(1);

    assert_eq!(env.log_count("logout"), 1);
}

#[test]
fn test_verify_is_a_dry_run() {
    let env = setup("verify");
    env.init();

    env.cmd()
        .args(["verify", &token("MATH101", 2), "--session-id", "MATH101"])
        .assert()
        .success()
        .stdout(contains("Valid token").and(contains("class MATH101")));

    env.cmd()
        .args(["verify", &token("MATH101", 60), "--session-id", "MATH101"])
        .assert()
        .code(2)
        .stderr(contains("60s old").or(contains("61s old")));

    env.cmd()
        .args(["verify", &token("MATH101", 0)])
        .assert()
        .code(2)
        .stderr(contains("no session id"));

    assert_eq!(env.attendance_count("MATH101"), 0);
}
