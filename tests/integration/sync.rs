//! A complete run against mocked GitHub and PyPI

use super::common::TestContext;
use octocheese::release::checksum::sha256_hex;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SDIST: &[u8] = b"pretend this is a tarball";

async fn mount_github_basics(server: &MockServer, tags: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "octocat" })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": { "core": { "limit": 5000, "remaining": 4990, "reset": 0 } }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "hello",
            "full_name": "octocat/hello",
            "default_branch": "master",
            "description": null
        })))
        .mount(server)
        .await;

    let tags: Vec<_> = tags
        .iter()
        .map(|t| json!({ "name": t, "commit": { "sha": "0123abc" } }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tags))
        .mount(server)
        .await;
}

async fn mount_pypi(server: &MockServer) {
    let file_url = format!("{}/files/hello-1.0.0.tar.gz", server.uri());
    Mock::given(method("GET"))
        .and(path("/pypi/hello/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "info": { "name": "hello" },
            "releases": {
                "1.0.0": [
                    { "url": file_url, "digests": { "sha256": sha256_hex(SDIST) } }
                ]
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/hello-1.0.0.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(SDIST))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_creates_release_and_uploads_file() {
    let server = MockServer::start().await;
    mount_github_basics(&server, &["v1.0.0", "v0.1.0"]).await;
    mount_pypi(&server).await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/releases/tags/v1.0.0"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/octocat/hello/releases"))
        .and(header("authorization", "Bearer s3cr3t"))
        .and(body_partial_json(json!({
            "tag_name": "v1.0.0",
            "name": "Version 1.0.0",
            "prerelease": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7,
            "tag_name": "v1.0.0",
            "name": "Version 1.0.0",
            "draft": false,
            "prerelease": false,
            "body": "",
            "created_at": "2020-07-04T00:00:00Z",
            "upload_url": format!(
                "{}/uploads/repos/octocat/hello/releases/7/assets{{?name,label}}",
                server.uri()
            ),
            "assets": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/uploads/repos/octocat/hello/releases/7/assets"))
        .and(query_param("name", "hello-1.0.0.tar.gz"))
        .and(header("content-type", "application/gzip"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 70,
            "name": "hello-1.0.0.tar.gz",
            "size": SDIST.len()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::new();
    let config = ctx.write_config(&server.uri());

    let assert = tokio::task::spawn_blocking(move || {
        ctx.octocheese()
            .args(["hello", "--token", "s3cr3t", "--repo", "octocat/hello"])
            .arg("--config")
            .arg(&config)
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("4990 requests available."))
        .stdout(predicate::str::contains("Processing release for 1.0.0"))
        .stdout(predicate::str::contains(
            "No PyPI release found for tag 'v0.1.0'. Skipping.",
        ))
        .stdout(predicate::str::contains("s3cr3t").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_reads_action_environment() {
    let server = MockServer::start().await;
    mount_github_basics(&server, &["v1.0.0"]).await;
    mount_pypi(&server).await;

    // Existing release that already has the file: edited, nothing uploaded
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/releases/tags/v1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "tag_name": "v1.0.0",
            "name": "Version 1.0.0",
            "prerelease": false,
            "body": format!("<!-- Octocheese: Last Updated {} -->\n", today),
            "created_at": "2020-07-04T00:00:00Z",
            "upload_url": format!(
                "{}/uploads/repos/octocat/hello/releases/9/assets{{?name,label}}",
                server.uri()
            )
        })))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/repos/octocat/hello/releases/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "tag_name": "v1.0.0",
            "name": "Version 1.0.0",
            "prerelease": false,
            "body": "",
            "created_at": "2020-07-04T00:00:00Z",
            "upload_url": format!(
                "{}/uploads/repos/octocat/hello/releases/9/assets{{?name,label}}",
                server.uri()
            )
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/releases/9/assets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 90, "name": "hello-1.0.0.tar.gz", "size": 25 }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/uploads/repos/octocat/hello/releases/9/assets"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = TestContext::new();
    let config = ctx.write_config(&server.uri());

    let assert = tokio::task::spawn_blocking(move || {
        ctx.octocheese()
            .env("GITHUB_TOKEN", "s3cr3t")
            .env("GITHUB_REPOSITORY", "octocat/hello")
            .env("INPUT_PYPI_NAME", "hello")
            .arg("--config")
            .arg(&config)
            .assert()
    })
    .await
    .unwrap();

    assert.success().stdout(predicate::str::contains(
        "File 'hello-1.0.0.tar.gz' already exists for release 'v1.0.0'. Skipping.",
    ));
}
