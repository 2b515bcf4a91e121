//! Sync command tests.
//!
//! Drive `strata sync` end to end against the file store.

mod support;
use support::*;

use std::fs;

#[test]
fn test_dry_run_reports_without_writing() {
    let t = Test::with_secret_file(APP_FILE, APP_SECRETS);

    let output = t.sync_dry_run(SECRETS_DIR);
    assert_success(&output);
    assert_stdout_contains(&output, "app");
    assert_stdout_contains(&output, "+ API_KEY");
    assert_stdout_contains(&output, "+ DATABASE_URL");
    assert_stdout_contains(&output, "dry run");

    let output = t.namespaces();
    assert_success(&output);
    assert!(lines(&output).is_empty(), "dry run wrote to the store");
}

#[test]
fn test_sync_writes_and_second_run_is_noop() {
    let t = Test::with_secret_file(APP_FILE, APP_SECRETS);

    let output = t.sync(SECRETS_DIR);
    assert_success(&output);
    assert_stdout_contains(&output, "app: 2 written, 0 deleted");

    let output = t.namespaces();
    assert_eq!(lines(&output), vec!["app"]);

    let output = t.sync(SECRETS_DIR);
    assert_success(&output);
    assert_stdout_contains(&output, "no changes");
    assert_stdout_contains(&output, "already in sync");
}

#[test]
fn test_synced_values_decrypt() {
    let t = Test::with_secret_file(APP_FILE, APP_SECRETS);
    assert_success(&t.sync(SECRETS_DIR));

    let output = t.get("app", "API_KEY");
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "sk-test-12345");
}

#[test]
fn test_removed_key_is_deleted() {
    let t = Test::with_secret_file(APP_FILE, APP_SECRETS);
    assert_success(&t.sync(SECRETS_DIR));

    let contents = t.read(APP_FILE);
    let file: serde_yaml::Value = serde_yaml::from_str(&contents).unwrap();
    let kept: Vec<_> = file
        .as_sequence()
        .unwrap()
        .iter()
        .filter(|item| item["key"].as_str() != Some("API_KEY"))
        .cloned()
        .collect();
    t.write(APP_FILE, &serde_yaml::to_string(&kept).unwrap());

    let output = t.sync(SECRETS_DIR);
    assert_success(&output);
    assert_stdout_contains(&output, "- API_KEY");

    let output = t.get("app", "API_KEY");
    assert_failure(&output);
    assert_stderr_contains(&output, "secret not found: app/API_KEY");
}

#[test]
fn test_nested_directories_become_namespaces() {
    let t = Test::init();
    assert_success(&t.encrypt_add("A", "1", "secrets/production/web.yaml"));
    assert_success(&t.encrypt_add("B", "2", "secrets/staging/worker.yml"));

    assert_success(&t.sync(SECRETS_DIR));

    let output = t.namespaces();
    assert_eq!(lines(&output), vec!["production/web", "staging/worker"]);
}

#[test]
fn test_hidden_and_foreign_files_ignored() {
    let t = Test::with_secret_file(APP_FILE, APP_SECRETS);
    t.write("secrets/.draft.yaml", "- key: X\n  value: y\n");
    t.write("secrets/README.md", "# secrets\n");

    assert_success(&t.sync(SECRETS_DIR));

    let output = t.namespaces();
    assert_eq!(lines(&output), vec!["app"]);
}

#[test]
fn test_stale_namespace_reported_not_removed() {
    let t = Test::with_secret_file(APP_FILE, APP_SECRETS);
    assert_success(&t.encrypt_add("OLD", "x", "secrets/legacy.yaml"));
    assert_success(&t.sync(SECRETS_DIR));

    fs::remove_file(t.path("secrets/legacy.yaml")).unwrap();
    let output = t.sync(SECRETS_DIR);

    assert_success(&output);
    assert_stderr_contains(&output, "without a secret file");
    assert_stdout_contains(&output, "legacy");

    let output = t.namespaces();
    assert_eq!(lines(&output), vec!["app", "legacy"]);
}

#[test]
fn test_namespace_argument_limits_sync() {
    let t = Test::with_secret_file(APP_FILE, APP_SECRETS);
    assert_success(&t.encrypt_add("B", "2", "secrets/other.yaml"));

    let output = t.run(&["sync", SECRETS_DIR, "other"]);
    assert_success(&output);

    let output = t.namespaces();
    assert_eq!(lines(&output), vec!["other"]);
}

#[test]
fn test_unknown_namespace_argument_fails() {
    let t = Test::with_secret_file(APP_FILE, APP_SECRETS);

    let output = t.run(&["sync", SECRETS_DIR, "nope"]);

    assert_failure(&output);
    assert_stderr_contains(&output, "no secret file for namespace nope");
}

#[test]
fn test_sync_without_table_suggests_init() {
    let t = Test::new();
    t.write(APP_FILE, "- key: A\n  value: x\n");

    let output = t.sync(SECRETS_DIR);

    assert_failure(&output);
    assert_stderr_contains(&output, "sync stopped at namespace app");
    assert_stderr_contains(&output, "run: strata init");
}

#[test]
fn test_malformed_file_names_file() {
    let t = Test::init();
    t.write("secrets/bad.yaml", "key: [unclosed\n");

    let output = t.sync(SECRETS_DIR);

    assert_failure(&output);
    assert_stderr_contains(&output, "bad.yaml");
    assert_stderr_contains(&output, "load failed for namespace bad");
}

#[test]
fn test_includes_are_expanded() {
    let t = Test::init();
    assert_success(&t.encrypt_add("SHARED", "s", "secrets/common.yaml"));
    t.write("secrets/app.yaml", "- key: _include\n  value: common\n");
    assert_success(&t.encrypt_add("OWN", "o", APP_FILE));

    assert_success(&t.sync(SECRETS_DIR));

    let output = t.get("app", "SHARED");
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "s");
}

#[test]
fn test_circular_include_fails() {
    let t = Test::init();
    t.write("secrets/a.yaml", "- key: _include\n  value: b\n");
    t.write("secrets/b.yaml", "- key: _include\n  value: a\n");

    let output = t.sync(SECRETS_DIR);

    assert_failure(&output);
    assert_stderr_contains(&output, "circular include: a -> b -> a");
}

#[test]
fn test_memory_store_leaves_file_store_untouched() {
    let t = Test::with_secret_file(APP_FILE, APP_SECRETS);

    let output = t.run(&["--store", "memory", "sync", SECRETS_DIR]);

    assert_success(&output);
    assert_stdout_contains(&output, "+ API_KEY");
    assert!(lines(&t.namespaces()).is_empty());
}

#[test]
fn test_table_name_flag() {
    let t = Test::with_secret_file(APP_FILE, APP_SECRETS);
    assert_success(&t.run(&["--table-name", "other", "init"]));

    assert_success(&t.run(&["--table-name", "other", "sync", SECRETS_DIR]));

    assert!(lines(&t.namespaces()).is_empty());
    assert_eq!(
        lines(&t.run(&["--table-name", "other", "namespaces"])),
        vec!["app"]
    );
}

#[test]
fn test_store_path_flag() {
    let t = Test::with_secret_file(APP_FILE, APP_SECRETS);
    let run_shared = |args: &[&str]| {
        let mut all = vec!["--store-path", "shared/store.json"];
        all.extend_from_slice(args);
        t.run(&all)
    };

    assert_success(&run_shared(&["init"]));
    assert_success(&run_shared(&["sync", SECRETS_DIR]));

    assert!(t.path("shared/store.json").exists());
    assert!(lines(&t.namespaces()).is_empty());
    assert_eq!(lines(&run_shared(&["namespaces"])), vec!["app"]);
}

#[test]
fn test_unknown_cipher_flag_fails() {
    let t = Test::init();

    let output = t.run(&["--cipher", "rot13", "list", APP_FILE]);

    assert_failure(&output);
    assert_stderr_contains(&output, "unknown cipher backend: rot13");
}

#[test]
fn test_sync_root_must_be_directory() {
    let t = Test::with_secret_file(APP_FILE, APP_SECRETS);

    let output = t.sync(APP_FILE);

    assert_failure(&output);
    assert_stderr_contains(&output, "not a directory");
    assert!(lines(&t.namespaces()).is_empty());
}

#[test]
fn test_colliding_namespaces_fail() {
    let t = Test::with_secret_file(APP_FILE, APP_SECRETS);
    t.write("secrets/app.yml", &t.read(APP_FILE));

    let output = t.sync(SECRETS_DIR);

    assert_failure(&output);
    assert_stderr_contains(&output, "namespace app is declared by both");
    assert!(lines(&t.namespaces()).is_empty());
}
