//! End-to-end tests for the `ephany` binary.
//!
//! Each test points the configuration directory at a temporary directory so
//! the user's real configuration is never read or written.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ephany(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ephany").unwrap();
    cmd.env("EPHANY_CONFIG_DIR", config_dir.path())
        .env_remove("EPHANY_API_KEY")
        .env_remove("EPHANY_BASE_URL")
        .env_remove("EPHANY_AUTH_SCHEME")
        .env_remove("EPHANY_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn assets_page() -> serde_json::Value {
    json!({
        "count": 2,
        "results": [
            {
                "id": 1,
                "type_id": "CH-01",
                "name": "Lounge Chair",
                "manufacturer_name": "Acme",
                "files": [{ "id": 10, "file": "https://cdn.example/ch01.rfa", "category": "RFA" }]
            },
            {
                "id": 2,
                "type_id": "TB-02",
                "name": "Side Table",
                "manufacturer_name": null,
                "files": null
            }
        ],
        "next": null,
        "previous": null
    })
}

#[test]
fn test_config_path_honors_directory_override() {
    let dir = TempDir::new().unwrap();

    ephany(&dir)
        .arg("config")
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yml"))
        .stdout(predicate::str::contains(
            dir.path().to_string_lossy().to_string(),
        ));
}

#[test]
fn test_config_set_then_show() {
    let dir = TempDir::new().unwrap();

    ephany(&dir)
        .args(["config", "set", "--base-url", "https://catalog.example/api"])
        .args(["--auth-scheme", "user-token", "--timeout", "30"])
        .assert()
        .success();

    ephany(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://catalog.example/api/"))
        .stdout(predicate::str::contains("user-token"))
        .stdout(predicate::str::contains("30"))
        .stdout(predicate::str::contains("secret").not());
}

#[test]
fn test_missing_credential_is_configuration_error() {
    let dir = TempDir::new().unwrap();

    ephany(&dir)
        .args(["asset", "list", "--base-url", "http://127.0.0.1:9/api"])
        .assert()
        .code(78)
        .stderr(predicate::str::contains("credential"));
}

#[tokio::test]
async fn test_asset_list_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/assets/"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "20"))
        .and(header("X-Api-Key", "cli-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(assets_page()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    ephany(&dir)
        .args(["asset", "list", "--format", "json"])
        .env("EPHANY_BASE_URL", format!("{}/api", server.uri()))
        .env("EPHANY_API_KEY", "cli-key")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type_id\":\"CH-01\""))
        .stdout(predicate::str::contains("\"count\":2"));
}

#[tokio::test]
async fn test_asset_list_as_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/assets/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(assets_page()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    ephany(&dir)
        .args(["asset", "list", "--api-key", "cli-key"])
        .args(["--base-url", &format!("{}/api", server.uri())])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lounge Chair"))
        .stdout(predicate::str::contains("[YES]"))
        .stdout(predicate::str::contains("N/A"))
        .stdout(predicate::str::contains(
            "Total Assets: 2 | Showing 2 on this page.",
        ));
}

#[tokio::test]
async fn test_user_token_from_stored_scheme() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/assets/"))
        .and(header("Authorization", "Token person-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(assets_page()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    ephany(&dir)
        .args(["config", "set", "--auth-scheme", "user-token"])
        .args(["--base-url", &format!("{}/api", server.uri())])
        .assert()
        .success();

    ephany(&dir)
        .args(["asset", "revit", "--format", "csv", "--headers"])
        .env("EPHANY_API_KEY", "person-token")
        .assert()
        .success()
        .stdout(predicate::str::contains("ID,TYPE_ID,NAME"))
        .stdout(predicate::str::contains("CH-01"))
        .stdout(predicate::str::contains("TB-02").not());
}

#[tokio::test]
async fn test_rejected_credential_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    ephany(&dir)
        .args(["asset", "search", "chair", "--api-key", "stale"])
        .args(["--base-url", &format!("{}/api", server.uri())])
        .assert()
        .code(100)
        .stderr(predicate::str::contains("invalid or expired"));
}

#[tokio::test]
async fn test_download_by_id_to_output_path() {
    let server = MockServer::start().await;
    let file_url = format!("{}/media/ch01.rfa", server.uri());
    Mock::given(method("GET"))
        .and(path("/api/assets/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{
                "id": 1,
                "type_id": "CH-01",
                "files": [{ "id": 10, "file": file_url, "category": "RFA" }]
            }],
            "next": null,
            "previous": null
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/ch01.rfa"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"family-bytes".to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("chair.rfa");
    ephany(&dir)
        .args(["asset", "download", "--id", "1", "--api-key", "k"])
        .args(["--base-url", &format!("{}/api", server.uri())])
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(b"family-bytes".to_vec(), std::fs::read(&output).unwrap());
}

#[tokio::test]
async fn test_download_unknown_id_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/assets/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(assets_page()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    ephany(&dir)
        .args(["asset", "download", "--id", "999", "--api-key", "k"])
        .args(["--base-url", &format!("{}/api", server.uri())])
        .assert()
        .code(67)
        .stderr(predicate::str::contains("999"));
}
