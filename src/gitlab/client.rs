use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::gitlab::source::MergeRequestSource;
use crate::models::{Member, MergeRequest, Project};

pub struct GitLabClient {
    client: Client,
    base_url: Url,
    per_page: u32,
}

impl GitLabClient {
    pub fn new(token: &str, base_url: &str, per_page: u32) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut token = header::HeaderValue::from_str(token)?;
        token.set_sensitive(true);
        headers.insert(header::HeaderName::from_static("private-token"), token);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("mr-reminder/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        let base_url = Url::parse(base_url).map_err(|e| Error::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                url: base_url.to_string(),
                reason: "not usable as a base URL".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url,
            per_page,
        })
    }

    /// Appends each segment as its own path component, so `parent/child`
    /// becomes `parent%2Fchild` the way GitLab expects namespaced ids.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Fetches the first page only; pagination headers are not followed.
    async fn get_page<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let mut url = self.endpoint(segments);
        url.query_pairs_mut()
            .extend_pairs(query)
            .append_pair("per_page", &self.per_page.to_string());

        tracing::debug!("Fetching: {}", url);
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                endpoint: url.path().to_string(),
                status: response.status(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MergeRequestSource for GitLabClient {
    async fn list_members(&self, group: &str) -> Result<Vec<Member>> {
        tracing::info!("Fetching members of group: {}", group);
        self.get_page(&["groups", group, "members"], &[]).await
    }

    async fn list_projects(&self, group: &str) -> Result<Vec<Project>> {
        tracing::info!("Fetching projects of group: {}", group);
        self.get_page(&["groups", group, "projects"], &[]).await
    }

    async fn list_merge_requests_by_author(&self, username: &str) -> Result<Vec<MergeRequest>> {
        self.get_page(
            &["merge_requests"],
            &[
                ("author_username", username),
                ("scope", "all"),
                ("state", "opened"),
            ],
        )
        .await
    }

    async fn list_merge_requests_by_project(&self, project_id: u64) -> Result<Vec<MergeRequest>> {
        let id = project_id.to_string();
        self.get_page(&["projects", &id, "merge_requests"], &[("state", "opened")])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> GitLabClient {
        GitLabClient::new("test-token", &format!("{}/api/v4", server.uri()), 100).unwrap()
    }

    fn merge_request_json(iid: u64, title: &str) -> serde_json::Value {
        serde_json::json!({
            "iid": iid,
            "title": title,
            "created_at": "2024-03-01T10:00:00Z",
            "author": { "name": "Ada" },
            "references": { "full": format!("backend/api!{iid}") },
            "user_notes_count": 0,
            "web_url": format!("https://gitlab.example.com/backend/api/-/merge_requests/{iid}")
        })
    }

    #[tokio::test]
    async fn test_list_members_sends_token_and_page_size() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/groups/backend/members"))
            .and(header("private-token", "test-token"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": 1, "username": "ada", "access_level": 30 },
                { "id": 2, "username": "grace", "access_level": 40 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let members = test_client(&server).list_members("backend").await.unwrap();

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].username, "ada");
        assert_eq!(members[1].access_level, 40);
    }

    #[tokio::test]
    async fn test_nested_group_is_encoded_as_one_segment() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/groups/platform%2Fbackend/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": 12, "name": "api" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let projects = test_client(&server)
            .list_projects("platform/backend")
            .await
            .unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, 12);
    }

    #[tokio::test]
    async fn test_merge_requests_by_author_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/merge_requests"))
            .and(query_param("author_username", "ada"))
            .and(query_param("scope", "all"))
            .and(query_param("state", "opened"))
            .and(query_param("per_page", "100"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([merge_request_json(7, "Fix bug")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mrs = test_client(&server)
            .list_merge_requests_by_author("ada")
            .await
            .unwrap();

        assert_eq!(mrs.len(), 1);
        assert_eq!(mrs[0].references.full, "backend/api!7");
    }

    #[tokio::test]
    async fn test_merge_requests_by_project_always_sets_page_size() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/projects/12/merge_requests"))
            .and(query_param("state", "opened"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let mrs = test_client(&server)
            .list_merge_requests_by_project(12)
            .await
            .unwrap();

        assert!(mrs.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_is_protocol_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/groups/backend/members"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .list_members("backend")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert!(matches!(
            err,
            Error::Api { status, .. } if status == reqwest::StatusCode::FORBIDDEN
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/groups/backend/members"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .list_members("backend")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Reserve a free port, then release it so nothing is listening there.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client =
            GitLabClient::new("test-token", &format!("http://127.0.0.1:{port}/api/v4"), 100)
                .unwrap();

        let err = client.list_members("backend").await.unwrap_err();

        assert!(matches!(err, Error::Network(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(matches!(
            GitLabClient::new("t", "not a url", 100),
            Err(Error::InvalidUrl { .. })
        ));
    }
}
