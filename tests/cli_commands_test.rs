// Integration tests for CLI commands
// Run with: cargo test --test cli_commands_test

use std::process::{Command, Output};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VAPID_KEY: &str =
    "BGsX0fLhLEJH-Lzm5WOkQPJ3A32BLeszoPShOUXYmMKWT-NC4v4af5uO5-tKfA-eFivOM1drMV7Oy7ZAaDe_UfU";

fn pawsome_push(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pawsome-push"))
        .args(args)
        .env_remove("PAWSOME_API_URL")
        .env_remove("PAWSOME_VAPID_PUBLIC_KEY")
        .env_remove("PAWSOME_TOKEN")
        .output()
        .expect("Failed to execute pawsome-push")
}

#[test]
fn test_check_key_accepts_uncompressed_point() {
    let output = pawsome_push(&["check-key", VAPID_KEY]);

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("65 bytes"), "Should report key length: {stdout}");
}

#[test]
fn test_check_key_rejects_truncated_key() {
    let output = pawsome_push(&["check-key", "BGsX0fLhLEJH"]);
    assert!(!output.status.success(), "Truncated key should fail");
}

#[test]
fn test_config_prints_overridden_api_url() {
    let output = pawsome_push(&["--api-url", "https://api.pawsome.test/", "config"]);

    assert!(output.status.success(), "Command should succeed");
    let config: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("config output is JSON");
    assert_eq!(config["api_url"], "https://api.pawsome.test");
}

#[test]
fn test_register_requires_credential() {
    let output = pawsome_push(&[
        "--api-url",
        "http://127.0.0.1:59997",
        "register",
        "--endpoint",
        "https://push.example.com/1",
        "--p256dh",
        "key",
        "--auth",
        "secret",
    ]);
    assert!(!output.status.success(), "Missing credential should fail");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register_submits_to_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notifications/subscribe"))
        .and(header("Authorization", "Bearer cli_token"))
        .and(body_json(serde_json::json!({
            "endpoint": "https://push.example.com/1",
            "p256dh": "key",
            "auth": "secret",
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let api_url = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        pawsome_push(&[
            "--api-url",
            &api_url,
            "register",
            "--credential",
            "cli_token",
            "--endpoint",
            "https://push.example.com/1",
            "--p256dh",
            "key",
            "--auth",
            "secret",
        ])
    })
    .await
    .expect("join");

    assert!(
        output.status.success(),
        "Command should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
