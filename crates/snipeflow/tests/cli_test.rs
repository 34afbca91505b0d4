#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

use assert_cmd::Command;
use predicates::prelude::*;

/// CLIヘルプが正しく表示されることを確認
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("snipe").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ノートPC在庫"))
        .stdout(predicate::str::contains("laptop"))
        .stdout(predicate::str::contains("user"))
        .stdout(predicate::str::contains("statuses"))
        .stdout(predicate::str::contains("--strict"));
}

/// バージョン表示は設定ファイルもAPIキーも不要
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("snipe").unwrap();
    cmd.current_dir(std::env::temp_dir())
        .env("SNIPE_API_KEY_PATH", "/nonexistent/api_key.txt")
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("snipeflow"));
}

/// laptopコマンドのヘルプにレポート一覧が出ることを確認
#[test]
fn test_laptop_help() {
    let mut cmd = Command::cargo_bin("snipe").unwrap();
    cmd.arg("laptop")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("warranty"))
        .stdout(predicate::str::contains("age"))
        .stdout(predicate::str::contains("manufacturer"))
        .stdout(predicate::str::contains("price"))
        .stdout(predicate::str::contains("info"));
}

/// ageコマンドのオプションを確認
#[test]
fn test_laptop_age_help() {
    let mut cmd = Command::cargo_bin("snipe").unwrap();
    cmd.args(["laptop", "age", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--fleet"))
        .stdout(predicate::str::contains("--older-than"));
}

/// infoはアセットタグが必須
#[test]
fn test_laptop_info_requires_asset_tag() {
    let mut cmd = Command::cargo_bin("snipe").unwrap();
    cmd.args(["laptop", "info"]).assert().failure();
}

/// 不正なコマンドでエラーになることを確認
#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("snipe").unwrap();
    cmd.arg("invalid-command").assert().failure();
}

/// APIキーファイルが無ければ起動時に失敗する
#[test]
fn test_missing_api_key_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("snipe").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("SNIPEFLOW_CONFIG_PATH")
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env("SNIPE_API_KEY_PATH", dir.path().join("missing.txt"))
        .arg("statuses")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.txt"));
}
