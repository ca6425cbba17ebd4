use crate::api::{ApiError, AssignmentService};
use crate::models::{AssignmentReport, SubmissionEntry};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

#[derive(Clone)]
pub struct LmsClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl LmsClient {
    pub fn new(base_url: String, token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token)).unwrap(),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("assignment-viewer"));
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a GET and hand back the status plus raw body text. The body is
    /// read for error and success cases alike so failures can quote it.
    async fn get_raw(&self, path: &str) -> Result<(StatusCode, String, String), ApiError> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .headers(self.build_headers())
            .send()
            .await
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;

        Ok((status, body, url))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let (status, body, url) = self.get_raw(path).await?;

        if !status.is_success() {
            return Err(ApiError::Status { status, url, body });
        }

        decode(&url, &body)
    }

    async fn post(&self, path: &str, body: Option<serde_json::Value>) -> Result<(), ApiError> {
        let url = self.url(path);
        let mut request = self.client.post(&url).headers(self.build_headers());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|source| ApiError::Network {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, url, body });
        }

        Ok(())
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        snippet: body.chars().take(500).collect(),
        source,
    })
}

/// Map the report-read response to `Some(report)` / `None` / error. 404 is
/// the backend's "no report yet" answer and must never surface as a failure.
fn report_from_response(
    status: StatusCode,
    body: &str,
    url: &str,
) -> Result<Option<AssignmentReport>, ApiError> {
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }

    if !status.is_success() {
        return Err(ApiError::Status {
            status,
            url: url.to_string(),
            body: body.to_string(),
        });
    }

    decode(url, body).map(Some)
}

#[async_trait]
impl AssignmentService for LmsClient {
    async fn get_report(
        &self,
        assignment_id: &str,
        user_id: &str,
    ) -> Result<Option<AssignmentReport>, ApiError> {
        let path = format!("/api/assignments/{}/report/{}", assignment_id, user_id);
        let (status, body, url) = self.get_raw(&path).await?;
        report_from_response(status, &body, &url)
    }

    async fn submit(&self, assignment_id: &str, file_link: &str) -> Result<(), ApiError> {
        let path = format!("/api/assignments/{}/submit", assignment_id);
        self.post(&path, Some(serde_json::json!({ "fileLink": file_link })))
            .await
    }

    async fn unsubmit(&self, assignment_id: &str) -> Result<(), ApiError> {
        let path = format!("/api/assignments/{}/unsubmit", assignment_id);
        self.post(&path, None).await
    }

    async fn list_submissions(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<SubmissionEntry>, ApiError> {
        let path = format!("/api/assignments/{}/submissions", assignment_id);
        self.get_json(&path).await
    }
}
