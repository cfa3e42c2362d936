use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use uuid::Uuid;

fn unique_workspace(prefix: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{prefix}-{}", Uuid::now_v7()));
    std::fs::create_dir_all(&path).expect("workspace should be creatable");
    path
}

fn db_path(root: &Path) -> PathBuf {
    root.join("state.sqlite")
}

fn run_aqua(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aquahabit"))
        .arg("--db")
        .arg(db)
        .args(args)
        .env_remove("AQUAHABIT_DB_PATH")
        .output()
        .expect("aqua command should run")
}

fn assert_success(output: &Output, context: &str) {
    assert!(
        output.status.success(),
        "{context} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn add_today_and_rm_round_trip() {
    let root = unique_workspace("aqua-dispatch");
    let db = db_path(&root);

    let added = run_aqua(&db, &["add", "water", "500", "--json"]);
    assert_success(&added, "add water");
    let event = stdout_json(&added);
    assert_eq!(event["kindId"], "water");
    assert_eq!(event["hydrationContribution"], 500);
    let id = event["id"].as_str().expect("event id should be a string");

    let today = run_aqua(&db, &["today", "--json"]);
    assert_success(&today, "today");
    let stats = stdout_json(&today);
    assert_eq!(stats["totalHydration"], 500);
    assert_eq!(stats["goal"], 2000);
    assert_eq!(stats["percentage"], 25.0);
    assert_eq!(stats["goalReached"], false);
    assert_eq!(stats["events"].as_array().map(Vec::len), Some(1));

    let removed = run_aqua(&db, &["rm", id]);
    assert_success(&removed, "rm");
    let stdout = String::from_utf8_lossy(&removed.stdout);
    assert!(stdout.contains("removed"), "unexpected output: {stdout}");

    let empty = run_aqua(&db, &["today", "--json"]);
    assert_success(&empty, "today after rm");
    let stats = stdout_json(&empty);
    assert_eq!(stats["totalHydration"], 0);
    assert_eq!(stats["events"].as_array().map(Vec::len), Some(0));

    let again = run_aqua(&db, &["rm", id]);
    assert!(!again.status.success(), "second rm should fail");
    let stderr = String::from_utf8_lossy(&again.stderr);
    assert!(stderr.contains("no event"), "unexpected stderr: {stderr}");

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn validation_failures_exit_nonzero_with_a_reason() {
    let root = unique_workspace("aqua-dispatch");
    let db = db_path(&root);

    let unknown = run_aqua(&db, &["add", "beer", "300"]);
    assert!(!unknown.status.success());
    let stderr = String::from_utf8_lossy(&unknown.stderr);
    assert!(stderr.contains("unknown intake kind"), "{stderr}");

    let unlabeled = run_aqua(&db, &["add", "medicine", "1"]);
    assert!(!unlabeled.status.success());
    let stderr = String::from_utf8_lossy(&unlabeled.stderr);
    assert!(stderr.contains("requires a label"), "{stderr}");

    let zero = run_aqua(&db, &["add", "water", "0"]);
    assert!(!zero.status.success());
    let stderr = String::from_utf8_lossy(&zero.stderr);
    assert!(stderr.contains("positive"), "{stderr}");

    // None of the failures may have written anything.
    let today = run_aqua(&db, &["today", "--json"]);
    assert_success(&today, "today");
    assert_eq!(stdout_json(&today)["events"].as_array().map(Vec::len), Some(0));

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn week_reports_seven_buckets_with_today_marked() {
    let root = unique_workspace("aqua-dispatch");
    let db = db_path(&root);

    let added = run_aqua(&db, &["add", "coffee", "--json"]);
    assert_success(&added, "add coffee");
    // default coffee amount is 100 ml at factor 0.85
    assert_eq!(stdout_json(&added)["hydrationContribution"], 85);

    let week = run_aqua(&db, &["week", "--json"]);
    assert_success(&week, "week");
    let buckets = stdout_json(&week);
    let buckets = buckets.as_array().expect("week should be an array");
    assert_eq!(buckets.len(), 7);

    let today: Vec<&Value> = buckets
        .iter()
        .filter(|bucket| bucket["isToday"] == true)
        .collect();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0]["total"], 85);
    assert_eq!(buckets[6]["isToday"], true);

    let older: i64 = buckets[..6]
        .iter()
        .map(|bucket| bucket["total"].as_i64().expect("total should be a number"))
        .sum();
    assert_eq!(older, 0);

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn settings_set_round_trips_through_show() {
    let root = unique_workspace("aqua-dispatch");
    let db = db_path(&root);

    let set = run_aqua(
        &db,
        &[
            "settings", "set", "--goal", "2500", "--theme", "dark", "--notifications", "off",
        ],
    );
    assert_success(&set, "settings set");

    let show = run_aqua(&db, &["settings", "show", "--json"]);
    assert_success(&show, "settings show");
    let settings = stdout_json(&show);
    assert_eq!(settings["goal"], 2500);
    assert_eq!(settings["theme"], "dark");
    assert_eq!(settings["notificationsEnabled"], false);
    assert_eq!(settings["wakeTime"], "08:00");

    let bad = run_aqua(&db, &["settings", "set", "--goal", "0"]);
    assert!(!bad.status.success(), "zero goal should be rejected");

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn kinds_lists_the_full_catalog() {
    let root = unique_workspace("aqua-dispatch");
    let db = db_path(&root);

    let kinds = run_aqua(&db, &["kinds", "--json"]);
    assert_success(&kinds, "kinds");
    let catalog = stdout_json(&kinds);
    let catalog = catalog.as_array().expect("kinds should be an array");
    assert_eq!(catalog.len(), 6);

    let water = catalog
        .iter()
        .find(|kind| kind["id"] == "water")
        .expect("water should be listed");
    assert_eq!(water["factor"], 1.0);
    assert_eq!(water["unit"], "ml");

    let medicine = catalog
        .iter()
        .find(|kind| kind["id"] == "medicine")
        .expect("medicine should be listed");
    assert_eq!(medicine["requires_custom_label"], true);

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn legacy_consumed_documents_migrate_on_first_use() {
    let root = unique_workspace("aqua-dispatch");
    let db = db_path(&root);

    // First invocation creates the schema.
    let init = run_aqua(&db, &["today", "--json"]);
    assert_success(&init, "initial today");

    // Seed the oldest document shape underneath the binary.
    let conn = rusqlite::Connection::open(&db).expect("db should open");
    conn.execute(
        r#"
INSERT INTO document (name, body, updated_at)
VALUES ('ledger', ?1, '2024-06-01T00:00:00Z')
ON CONFLICT(name) DO UPDATE SET body = excluded.body
"#,
        rusqlite::params![r#"{"consumed":1200,"currentDate":"01/06/2024"}"#],
    )
    .expect("legacy seed should insert");
    drop(conn);

    let imported = run_aqua(&db, &["today", "--date", "2024-06-01", "--json"]);
    assert_success(&imported, "today for imported day");
    let stats = stdout_json(&imported);
    assert_eq!(stats["totalHydration"], 1200);
    assert_eq!(stats["events"][0]["label"], "Water (imported)");
    assert_eq!(stats["events"][0]["unit"], "ml");

    // Migration must be idempotent across repeated invocations.
    let again = run_aqua(&db, &["today", "--date", "2024-06-01", "--json"]);
    assert_success(&again, "second today for imported day");
    assert_eq!(stdout_json(&again)["totalHydration"], 1200);

    let _ = std::fs::remove_dir_all(root);
}
