//! GitHub API client implementation

use crate::config::Config;
use crate::core::{OctoError, OctoResult, Secret};
use crate::di::traits::GitHubProvider;
use crate::github::repo::RepoRef;
use crate::github::types::{
    ApiErrorBody, AuthenticatedUser, GitHubRelease, GitHubRepo, GitHubTag, RateLimit,
    RateLimitResponse, ReleaseAsset, ReleaseDraft,
};
use async_trait::async_trait;
use reqwest::{header, Client as HttpClient, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;

/// Largest page size the GitHub REST API allows
const MAX_PER_PAGE: usize = 100;

/// GitHub API client
pub struct GitHubClient {
    http_client: HttpClient,
    api_url: String,
    rate_limiter: Arc<RateLimiter>,
}

/// Rate limit state from the last response headers
struct RateLimiter {
    remaining: Mutex<u64>,
    reset_time: Mutex<SystemTime>,
}

impl GitHubClient {
    /// Create a new GitHub client authenticated with `token`
    pub fn new(config: &Config, token: &Secret) -> OctoResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            header::HeaderValue::from_static("2022-11-28"),
        );

        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .map_err(|_| OctoError::Config("Invalid GitHub token".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        let http_client = HttpClient::builder()
            .user_agent(concat!("octocheese/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OctoError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter {
                remaining: Mutex::new(u64::MAX),
                reset_time: Mutex::new(SystemTime::now()),
            }),
        })
    }

    /// Check the token by fetching the authenticated user; returns the login
    pub async fn verify_credentials(&self) -> OctoResult<String> {
        let url = format!("{}/user", self.api_url);
        let user: AuthenticatedUser = self.api_get(&url).await?;
        Ok(user.login)
    }

    /// Get the core rate limit bucket
    pub async fn rate_limit(&self) -> OctoResult<RateLimit> {
        let url = format!("{}/rate_limit", self.api_url);
        let response: RateLimitResponse = self.api_get(&url).await?;
        Ok(response.resources.core)
    }

    /// Get repository information
    pub async fn get_repo(&self, repo: &RepoRef) -> OctoResult<GitHubRepo> {
        let url = format!("{}/repos/{}/{}", self.api_url, repo.owner, repo.name);
        let response = self.api_request(self.http_client.get(&url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(OctoError::NotFound(format!("Repository {}", repo)));
        }

        Self::parse_json(Self::check_status(response).await?).await
    }

    /// Get tags for a repository, newest first, stopping after `limit` tags
    pub async fn list_tags(
        &self,
        repo: &RepoRef,
        limit: Option<usize>,
    ) -> OctoResult<Vec<GitHubTag>> {
        if limit == Some(0) {
            return Ok(Vec::new());
        }

        let per_page = limit.map_or(MAX_PER_PAGE, |n| n.clamp(1, MAX_PER_PAGE));
        let mut tags = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/repos/{}/{}/tags?per_page={}&page={}",
                self.api_url, repo.owner, repo.name, per_page, page
            );
            let batch: Vec<GitHubTag> = self.api_get(&url).await?;
            let exhausted = batch.len() < per_page;
            tags.extend(batch);

            if let Some(limit) = limit {
                if tags.len() >= limit {
                    tags.truncate(limit);
                    break;
                }
            }
            if exhausted {
                break;
            }
            page += 1;
        }

        Ok(tags)
    }

    /// Get the release for a tag; `Ok(None)` if there isn't one
    pub async fn get_release_by_tag(
        &self,
        repo: &RepoRef,
        tag_name: &str,
    ) -> OctoResult<Option<GitHubRelease>> {
        let url = format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.api_url,
            repo.owner,
            repo.name,
            urlencoding::encode(tag_name)
        );
        let response = self.api_request(self.http_client.get(&url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let release = Self::parse_json(Self::check_status(response).await?).await?;
        Ok(Some(release))
    }

    /// Create a release for an existing tag
    pub async fn create_release(
        &self,
        repo: &RepoRef,
        draft: &ReleaseDraft,
    ) -> OctoResult<GitHubRelease> {
        let url = format!("{}/repos/{}/{}/releases", self.api_url, repo.owner, repo.name);
        let response = self
            .api_request(self.http_client.post(&url).json(draft))
            .await?;
        Self::parse_json(Self::check_status(response).await?).await
    }

    /// Edit the name, body and prerelease flag of a release
    pub async fn update_release(
        &self,
        repo: &RepoRef,
        release_id: u64,
        draft: &ReleaseDraft,
    ) -> OctoResult<GitHubRelease> {
        let url = format!(
            "{}/repos/{}/{}/releases/{}",
            self.api_url, repo.owner, repo.name, release_id
        );
        let response = self
            .api_request(self.http_client.patch(&url).json(draft))
            .await?;
        Self::parse_json(Self::check_status(response).await?).await
    }

    /// List the assets attached to a release
    pub async fn list_assets(
        &self,
        repo: &RepoRef,
        release_id: u64,
    ) -> OctoResult<Vec<ReleaseAsset>> {
        let mut assets = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/repos/{}/{}/releases/{}/assets?per_page={}&page={}",
                self.api_url, repo.owner, repo.name, release_id, MAX_PER_PAGE, page
            );
            let batch: Vec<ReleaseAsset> = self.api_get(&url).await?;
            let exhausted = batch.len() < MAX_PER_PAGE;
            assets.extend(batch);
            if exhausted {
                break;
            }
            page += 1;
        }

        Ok(assets)
    }

    /// Upload a file as a new release asset
    pub async fn upload_asset(
        &self,
        release: &GitHubRelease,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> OctoResult<ReleaseAsset> {
        let url = upload_endpoint(&release.upload_url, filename);
        let request = self
            .http_client
            .post(&url)
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes);

        let response = self.api_request(request).await?;
        Self::parse_json(Self::check_status(response).await?).await
    }

    /// Send a request and handle rate limiting
    async fn api_request(&self, request: RequestBuilder) -> OctoResult<Response> {
        self.check_rate_limit().await?;

        let response = request.send().await?;

        self.update_rate_limit(&response).await;

        if response.status() == StatusCode::UNAUTHORIZED {
            let message = Self::error_message(response).await;
            return Err(OctoError::Authentication(message));
        }

        Ok(response)
    }

    /// Make an API GET request and parse JSON response
    async fn api_get<T: serde::de::DeserializeOwned>(&self, url: &str) -> OctoResult<T> {
        let response = self.api_request(self.http_client.get(url)).await?;
        Self::parse_json(Self::check_status(response).await?).await
    }

    async fn check_status(response: Response) -> OctoResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let message = Self::error_message(response).await;
        Err(OctoError::GitHub { status, message })
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> OctoResult<T> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn error_message(response: Response) -> String {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            })
    }

    /// Check if we're within rate limits
    async fn check_rate_limit(&self) -> OctoResult<()> {
        let remaining = *self.rate_limiter.remaining.lock().await;
        let reset_time = *self.rate_limiter.reset_time.lock().await;

        if remaining == 0 {
            let now = SystemTime::now();
            if now < reset_time {
                let wait_duration = reset_time.duration_since(now).unwrap_or(Duration::ZERO);
                return Err(OctoError::RateLimited {
                    reset: wait_duration.as_secs(),
                });
            }
        }

        Ok(())
    }

    /// Update rate limit from response headers
    async fn update_rate_limit(&self, response: &Response) {
        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
        {
            *self.rate_limiter.remaining.lock().await = remaining;
        }

        if let Some(reset) = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
        {
            *self.rate_limiter.reset_time.lock().await =
                SystemTime::UNIX_EPOCH + Duration::from_secs(reset);
        }
    }
}

/// Expand a release's `upload_url` template for one file
fn upload_endpoint(upload_url: &str, filename: &str) -> String {
    let base = upload_url.split('{').next().unwrap_or(upload_url);
    format!("{}?name={}", base, urlencoding::encode(filename))
}

// Implement GitHubProvider trait
#[async_trait]
impl GitHubProvider for GitHubClient {
    async fn verify_credentials(&self) -> OctoResult<String> {
        Self::verify_credentials(self).await
    }

    async fn rate_limit(&self) -> OctoResult<RateLimit> {
        Self::rate_limit(self).await
    }

    async fn get_repo(&self, repo: &RepoRef) -> OctoResult<GitHubRepo> {
        Self::get_repo(self, repo).await
    }

    async fn list_tags(&self, repo: &RepoRef, limit: Option<usize>) -> OctoResult<Vec<GitHubTag>> {
        Self::list_tags(self, repo, limit).await
    }

    async fn get_release_by_tag(
        &self,
        repo: &RepoRef,
        tag_name: &str,
    ) -> OctoResult<Option<GitHubRelease>> {
        Self::get_release_by_tag(self, repo, tag_name).await
    }

    async fn create_release(
        &self,
        repo: &RepoRef,
        draft: &ReleaseDraft,
    ) -> OctoResult<GitHubRelease> {
        Self::create_release(self, repo, draft).await
    }

    async fn update_release(
        &self,
        repo: &RepoRef,
        release_id: u64,
        draft: &ReleaseDraft,
    ) -> OctoResult<GitHubRelease> {
        Self::update_release(self, repo, release_id, draft).await
    }

    async fn list_assets(&self, repo: &RepoRef, release_id: u64) -> OctoResult<Vec<ReleaseAsset>> {
        Self::list_assets(self, repo, release_id).await
    }

    async fn upload_asset(
        &self,
        _repo: &RepoRef,
        release: &GitHubRelease,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> OctoResult<ReleaseAsset> {
        Self::upload_asset(self, release, filename, content_type, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GitHubClient {
        let config = Config {
            github_api_url: server.uri(),
            ..Default::default()
        };
        GitHubClient::new(&config, &Secret::new("test-token")).unwrap()
    }

    fn repo() -> RepoRef {
        RepoRef::new("octocat", "hello_world")
    }

    fn release_json(server: &MockServer, id: u64, tag: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "tag_name": tag,
            "name": format!("Version {}", tag.trim_start_matches('v')),
            "draft": false,
            "prerelease": false,
            "body": "hello",
            "created_at": "2020-07-04T12:00:00Z",
            "upload_url": format!("{}/uploads/repos/octocat/hello_world/releases/{}/assets{{?name,label}}", server.uri(), id),
            "assets": []
        })
    }

    fn tags_json(names: &[&str]) -> serde_json::Value {
        serde_json::Value::Array(
            names
                .iter()
                .map(|n| serde_json::json!({"name": n, "commit": {"sha": "abc", "url": "u"}}))
                .collect(),
        )
    }

    #[test]
    fn test_upload_endpoint_strips_template() {
        assert_eq!(
            upload_endpoint(
                "https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}",
                "pkg 1.0.tar.gz"
            ),
            "https://uploads.github.com/repos/o/r/releases/1/assets?name=pkg%201.0.tar.gz"
        );
    }

    #[tokio::test]
    async fn test_sends_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"login": "octocat"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert_eq!(client.verify_credentials().await.unwrap(), "octocat");
    }

    #[tokio::test]
    async fn test_unauthorized_is_authentication_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "Bad credentials"})),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        match client.verify_credentials().await {
            Err(OctoError::Authentication(message)) => assert_eq!(message, "Bad credentials"),
            other => panic!("expected authentication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "resources": {"core": {"limit": 5000, "remaining": 4990, "reset": 1600000000, "used": 10}},
                "rate": {"limit": 5000, "remaining": 4990, "reset": 1600000000}
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let rate = client.rate_limit().await.unwrap();
        assert_eq!(rate.remaining, 4990);
        assert_eq!(rate.limit, 5000);
    }

    #[tokio::test]
    async fn test_get_repo_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello_world"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert!(matches!(
            client.get_repo(&repo()).await,
            Err(OctoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_release_by_tag_found_and_missing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello_world/releases/tags/v1.0.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(release_json(&mock_server, 7, "v1.0.0")))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello_world/releases/tags/v2.0.0"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "Not Found"})),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        let found = client.get_release_by_tag(&repo(), "v1.0.0").await.unwrap().unwrap();
        assert_eq!(found.id, 7);
        assert_eq!(found.body(), "hello");

        assert!(client.get_release_by_tag(&repo(), "v2.0.0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_github_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello_world/releases/tags/v1.0.0"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.get_release_by_tag(&repo(), "v1.0.0").await;
        assert!(matches!(result, Err(OctoError::GitHub { status: 502, .. })));
    }

    #[tokio::test]
    async fn test_list_tags_respects_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello_world/tags"))
            .and(query_param("per_page", "2"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tags_json(&["v5", "v4"])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let tags = client.list_tags(&repo(), Some(2)).await.unwrap();
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["v5", "v4"]);
    }

    #[tokio::test]
    async fn test_list_tags_unbounded_follows_pages() {
        let mock_server = MockServer::start().await;

        let first_page: Vec<String> = (0..100).map(|i| format!("v{}", 200 - i)).collect();
        let first_refs: Vec<&str> = first_page.iter().map(String::as_str).collect();

        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello_world/tags"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tags_json(&first_refs)))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello_world/tags"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tags_json(&["v1"])))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let tags = client.list_tags(&repo(), None).await.unwrap();
        assert_eq!(tags.len(), 101);
        assert_eq!(tags[0].name, "v200");
        assert_eq!(tags[100].name, "v1");
    }

    #[tokio::test]
    async fn test_create_release_sends_draft() {
        let mock_server = MockServer::start().await;

        let draft = ReleaseDraft {
            tag_name: "v1.0.0".to_string(),
            name: "Version 1.0.0".to_string(),
            body: "body".to_string(),
            prerelease: false,
        };

        Mock::given(method("POST"))
            .and(path("/repos/octocat/hello_world/releases"))
            .and(body_json(serde_json::json!({
                "tag_name": "v1.0.0",
                "name": "Version 1.0.0",
                "body": "body",
                "prerelease": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(release_json(&mock_server, 9, "v1.0.0")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let release = client.create_release(&repo(), &draft).await.unwrap();
        assert_eq!(release.id, 9);
    }

    #[tokio::test]
    async fn test_upload_asset_uses_upload_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/uploads/repos/octocat/hello_world/releases/3/assets"))
            .and(query_param("name", "pkg-1.0.tar.gz"))
            .and(header("content-type", "application/gzip"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 11,
                "name": "pkg-1.0.tar.gz",
                "size": 7,
                "content_type": "application/gzip"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let release: GitHubRelease =
            serde_json::from_value(release_json(&mock_server, 3, "v1.0")).unwrap();

        let asset = client
            .upload_asset(&release, "pkg-1.0.tar.gz", "application/gzip", b"archive".to_vec())
            .await
            .unwrap();
        assert_eq!(asset.name, "pkg-1.0.tar.gz");
    }

    #[tokio::test]
    async fn test_rate_limit_exhausted_blocks_requests() {
        let mock_server = MockServer::start().await;

        let reset = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 600;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", reset.to_string().as_str())
                    .set_body_json(serde_json::json!({"login": "octocat"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        client.verify_credentials().await.unwrap();

        let second = client.verify_credentials().await;
        match second {
            Err(OctoError::RateLimited { reset }) => assert!(reset > 0 && reset <= 600),
            other => panic!("expected rate limit error, got {:?}", other),
        }
    }
}
