//! Argument handling and startup failures

use super::common::TestContext;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_help_lists_options() {
    let ctx = TestContext::new();
    ctx.octocheese()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Copy PyPI packages to GitHub Releases"))
        .stdout(predicate::str::contains("--token"))
        .stdout(predicate::str::contains("--no-self-promotion"))
        .stdout(predicate::str::contains("--max-tags"));
}

#[test]
fn test_missing_token_is_usage_error() {
    let ctx = TestContext::new();
    ctx.octocheese()
        .args(["hello", "--repo", "octocat/hello"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--token"));
}

#[test]
fn test_zero_max_tags_is_usage_error() {
    let ctx = TestContext::new();
    ctx.octocheese()
        .args(["hello", "--token", "abc", "--repo", "octocat/hello"])
        .args(["--max-tags", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--max-tags"));
}

#[test]
fn test_invalid_repository_exits_with_2() {
    let ctx = TestContext::new();
    ctx.octocheese()
        .args(["hello", "--token", "abc", "--repo", "not a repository"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid repository"));
}

#[test]
fn test_not_a_git_repository_exits_with_2() {
    let ctx = TestContext::new();
    ctx.octocheese()
        .args(["hello", "--token", "abc"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a git repository"));
}

#[test]
fn test_missing_config_file_fails() {
    let ctx = TestContext::new();
    ctx.octocheese()
        .args(["hello", "--token", "abc", "--repo", "octocat/hello"])
        .args(["--config", "does-not-exist.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_credentials_exit_with_2() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Bad credentials"
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::new();
    let config = ctx.write_config(&server.uri());

    let assert = tokio::task::spawn_blocking(move || {
        ctx.octocheese()
            .args(["hello", "--token", "wrong", "--repo", "octocat/hello"])
            .arg("--config")
            .arg(&config)
            .assert()
    })
    .await
    .unwrap();

    assert
        .code(2)
        .stderr(predicate::str::contains("Invalid credentials for GitHub REST API"))
        .stderr(predicate::str::contains("wrong").not());
}
