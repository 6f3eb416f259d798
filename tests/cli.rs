use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tally(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env("TALLY_DATA_DIR", dir.path())
        .env_remove("TALLY_PIN")
        .env_remove("TALLY_LOG");
    cmd
}

fn registered(name: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    tally(&dir)
        .args(["user", "register", name, "--pin", "1234", "--currency", "USD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered user"));
    dir
}

fn add(dir: &TempDir, args: &[&str]) {
    tally(dir).args(["txn", "add"]).args(args).assert().success();
}

#[test]
fn init_creates_settings() {
    let dir = TempDir::new().unwrap();
    tally(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));
    assert!(dir.path().join("config.json").exists());
}

#[test]
fn commands_need_a_login() {
    let dir = TempDir::new().unwrap();
    tally(&dir)
        .args(["txn", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn wrong_pin_is_rejected() {
    let dir = registered("ann");
    tally(&dir).args(["user", "logout"]).assert().success();
    tally(&dir)
        .args(["user", "login", "ann", "--pin", "9999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username or PIN"));
    tally(&dir)
        .args(["user", "login", "ANN", "--pin", "1234"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome back, ann!"));
}

#[test]
fn add_list_and_search() {
    let dir = registered("ann");
    add(&dir, &["expense", "45.50", "Groceries", "--date", "2025-01-15"]);
    add(&dir, &["expense", "12", "Transport", "--date", "2025-01-20"]);
    add(&dir, &["income", "3000", "Salary", "--date", "2025-01-28"]);

    tally(&dir)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 transaction(s)"));

    tally(&dir)
        .args(["txn", "search", "--type", "expense", "--min", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Transport").not())
        .stdout(predicate::str::contains("1 transaction(s)"));

    tally(&dir)
        .args(["txn", "search", "--from", "2025-02-01", "--to", "2025-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Out of range"));
}

#[test]
fn budget_check_reports_overspend() {
    let dir = registered("ann");
    add(&dir, &["expense", "620", "Food", "--date", "2025-02-01"]);

    tally(&dir)
        .args(["budget", "set", "Food", "500"])
        .assert()
        .success();
    tally(&dir)
        .args(["budget", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food"))
        .stdout(predicate::str::contains("120.00"));
}

#[test]
fn recurring_process_generates_due_instances() {
    let dir = registered("ann");
    tally(&dir)
        .args([
            "recurring", "add", "expense", "100", "Rent", "--start", "2024-01-01", "--every", "30",
        ])
        .assert()
        .success();

    tally(&dir)
        .args(["recurring", "process", "--today", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 3 transaction(s)"));

    tally(&dir)
        .args(["recurring", "process", "--today", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No recurring transactions due."));

    tally(&dir)
        .args(["recurring", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-31"));
}

#[test]
fn dashboard_and_export() {
    let dir = registered("ann");
    add(&dir, &["income", "1000", "Salary", "--date", "2025-03-01"]);
    add(&dir, &["expense", "250", "Rent", "--date", "2025-03-02"]);

    tally(&dir)
        .args(["report", "dashboard", "--today", "2025-03-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("March 2025"))
        .stdout(predicate::str::contains("Rent"));

    let out = dir.path().join("export.json");
    tally(&dir)
        .args(["export", "--format", "json", "--output"])
        .arg(&out)
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["user"], "ann");
    assert_eq!(value["metadata"]["transaction_count"], 2);
}

#[test]
fn menu_exits_on_end_of_input() {
    let dir = TempDir::new().unwrap();
    tally(&dir)
        .arg("menu")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to Tally"));
}
