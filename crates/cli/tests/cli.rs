use assert_cmd::Command;

fn stacks(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("stacks").unwrap();
    cmd.current_dir(dir)
        .env("STACKS_CONFIG_DIR", dir)
        .env_remove("STACKS_ENV")
        .env("DATABASE_URL", format!("sqlite://{}", dir.join("cli.db").display()));
    cmd
}

#[test]
fn check_config_reports_environment() {
    let dir = tempfile::tempdir().unwrap();
    let output = stacks(dir.path()).arg("check-config").output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("configuration ok (local)"));
}

#[test]
fn migrate_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();

    let first = stacks(dir.path()).arg("migrate").output().unwrap();
    assert!(first.status.success());
    assert!(String::from_utf8_lossy(&first.stdout).contains("applied 3 migration(s)"));

    let second = stacks(dir.path()).arg("migrate").output().unwrap();
    assert!(second.status.success());
    assert!(String::from_utf8_lossy(&second.stdout).contains("applied 0 migration(s)"));
}

#[test]
fn unknown_environment_fails() {
    let dir = tempfile::tempdir().unwrap();
    stacks(dir.path())
        .env("STACKS_ENV", "qa")
        .arg("check-config")
        .assert()
        .failure();
}
