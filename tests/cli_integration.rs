//! CLI integration tests.
//!
//! End-to-end tests for the `oracle` binary using assert_cmd.

mod common;

use assert_cmd::Command;
use common::{audit_body, decision, MockServices};
use oracle::agent::AgentId;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn oracle_cmd() -> Command {
    let mut cmd = Command::cargo_bin("oracle").unwrap();
    for var in [
        "ORACLE_PORT",
        "ORACLE_HOST",
        "ORACLE_LOG_LEVEL",
        "ORACLE_LOG_FORMAT",
        "ORACLE_ROUTER_URL",
        "ORACLE_AUDITOR_URL",
        "ORACLE_FINANCIAL_REGULATOR_URL",
        "ORACLE_TRADE_OFFICE_URL",
        "ORACLE_SANITARY_OFFICE_URL",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Write a config file pointing at the mock services.
fn write_config(dir: &TempDir, services: &MockServices) -> PathBuf {
    let config = services.config();
    let contents = format!(
        r#"
[services]
router_url = "{}"
auditor_url = "{}"

[services.agents]
financial_regulator = "{}"
trade_office = "{}"
sanitary_office = "{}"

[timeouts]
router_ms = 2000
agent_ms = 2000
merge_audit_ms = 2000
audit_ms = 2000
formatter_ms = 2000
health_ms = 1000
"#,
        config.services.router_url,
        config.services.auditor_url,
        config.services.agents.financial_regulator,
        config.services.agents.trade_office,
        config.services.agents.sanitary_office,
    );
    let path = dir.path().join("oracle.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_version_output() {
    oracle_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("oracle"));
}

#[test]
fn test_help_shows_all_commands() {
    oracle_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("health"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_serve_help() {
    oracle_cmd()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--host"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("oracle.toml");

    oracle_cmd()
        .args(["config", "init", "-o"])
        .arg(&path)
        .assert()
        .success();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("[services.agents]"));
    assert!(contents.contains("merge_audit_ms"));
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("oracle.toml");
    std::fs::write(&path, "# mine").unwrap();

    oracle_cmd()
        .args(["config", "init", "-o"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");
}

#[test]
fn test_completions_bash() {
    oracle_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("oracle"));
}

#[test]
fn test_ask_rejects_blank_question() {
    let dir = TempDir::new().unwrap();
    oracle_cmd()
        .current_dir(dir.path())
        .args(["ask", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be empty"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ask_prints_answer_and_cost() {
    let services = MockServices::start().await;
    services
        .mount_route(decision(&["sanitary-office"], "sanitary-office"), 0.25)
        .await;
    services
        .mount_answer(AgentId::SanitaryOffice, json!({"text": "Yes."}), 0.5)
        .await;
    Mock::given(method("POST"))
        .and(path("/audit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(audit_body("approved", 0.125)))
        .mount(&services.auditor)
        .await;
    services.mount_format("# Cheese import\nA permit is required.").await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &services);

    oracle_cmd()
        .args(["ask", "Do I need a permit to import cheese?", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("A permit is required."))
        .stdout(predicate::str::contains("SANITARY-OFFICE"))
        .stdout(predicate::str::contains("$0.8750"))
        .stderr(predicate::str::contains("Routing to SANITARY-OFFICE"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ask_json_out_of_scope_exits_nonzero() {
    let services = MockServices::start().await;
    services
        .mount_route(json!({"agent": "out_of_scope", "confidence": 0.99}), 0.0)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &services);

    let output = oracle_cmd()
        .args(["ask", "What's the weather?", "--json", "-c"])
        .arg(&config)
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let result: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(result["success"], false);
    assert_eq!(result["failure"], "out_of_scope");
    assert_eq!(result["agents_consulted"], json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ask_reads_service_urls_from_env() {
    let services = MockServices::start().await;
    services
        .mount_route(json!({"agent": "out_of_scope"}), 0.0)
        .await;

    let dir = TempDir::new().unwrap();
    oracle_cmd()
        .current_dir(dir.path())
        .env("ORACLE_ROUTER_URL", services.router.uri())
        .args(["ask", "Hello?", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"out_of_scope\""));

    assert_eq!(MockServices::calls(&services.router, "/route").await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ask_honors_logging_section() {
    let services = MockServices::start().await;
    services
        .mount_route(json!({"agent": "out_of_scope"}), 0.0)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &services);

    oracle_cmd()
        .env_remove("RUST_LOG")
        .args(["ask", "Hello?", "-c"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pipeline finished"));

    let mut contents = std::fs::read_to_string(&config).unwrap();
    contents.push_str("\n[logging]\nlevel = \"error\"\n");
    std::fs::write(&config, contents).unwrap();

    oracle_cmd()
        .env_remove("RUST_LOG")
        .args(["ask", "Hello?", "-c"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pipeline finished").not());
}

#[test]
fn test_health_json_with_services_down_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let output = oracle_cmd()
        .current_dir(dir.path())
        .env("ORACLE_ROUTER_URL", "http://127.0.0.1:1")
        .env("ORACLE_AUDITOR_URL", "http://127.0.0.1:1")
        .env("ORACLE_FINANCIAL_REGULATOR_URL", "http://127.0.0.1:1")
        .env("ORACLE_TRADE_OFFICE_URL", "http://127.0.0.1:1")
        .env("ORACLE_SANITARY_OFFICE_URL", "http://127.0.0.1:1")
        .args(["health", "--json"])
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let report: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["healthy"], false);
    assert_eq!(report["services"]["router"]["healthy"], false);
}
