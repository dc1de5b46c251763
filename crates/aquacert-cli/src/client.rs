// HTTP client for the AquaCert REST API

use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use aquacert_core::{
    Certificate, CertificatePatch, CertificatePayload, CertificateStatus, CertificateSummary,
};

/// Listing returned by `GET /api/v1/certificates`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub certificates: Vec<Certificate>,
    pub summary: CertificateSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusChange {
    status: CertificateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_version: Option<i64>,
}

/// Error body returned by the API for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    issues: Vec<String>,
}

pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/certificates{}", self.base_url, path)
    }

    pub fn list(&self, status: Option<CertificateStatus>) -> Result<Listing> {
        let mut request = self.agent.get(&self.url(""));
        if let Some(status) = status {
            request = request.query("status", status.as_str());
        }
        read_json(request.call())
    }

    pub fn summary(&self) -> Result<CertificateSummary> {
        read_json(self.agent.get(&self.url("/summary")).call())
    }

    pub fn get(&self, id: Uuid) -> Result<Certificate> {
        read_json(self.agent.get(&self.url(&format!("/{}", id))).call())
    }

    pub fn create(&self, payload: &CertificatePayload) -> Result<Certificate> {
        read_json(self.agent.post(&self.url("")).send_json(payload))
    }

    pub fn update(&self, id: Uuid, patch: &CertificatePatch) -> Result<Certificate> {
        read_json(
            self.agent
                .request("PATCH", &self.url(&format!("/{}", id)))
                .send_json(patch),
        )
    }

    pub fn change_status(
        &self,
        id: Uuid,
        status: CertificateStatus,
        expected_version: Option<i64>,
    ) -> Result<Certificate> {
        let body = StatusChange {
            status,
            expected_version,
        };
        read_json(
            self.agent
                .post(&self.url(&format!("/{}/status", id)))
                .send_json(&body),
        )
    }
}

fn read_json<T: DeserializeOwned>(response: Result<ureq::Response, ureq::Error>) -> Result<T> {
    match response {
        Ok(response) => response
            .into_json()
            .map_err(|e| anyhow!("Failed to parse API response: {}", e)),
        Err(ureq::Error::Status(code, response)) => {
            let body = response.into_string().unwrap_or_default();
            Err(anyhow!(describe_error(code, &body)))
        }
        Err(e) => Err(anyhow!("Failed to reach API: {}", e)),
    }
}

/// Renders an API error response as a single message, issues on their own lines.
/// Plain-text bodies are passed through as the message.
fn describe_error(code: u16, body: &str) -> String {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).unwrap_or_else(|_| ApiErrorBody {
        error: body.trim().to_string(),
        issues: Vec::new(),
    });
    let mut message = if parsed.error.is_empty() {
        format!("API returned {}", code)
    } else {
        format!("API returned {}: {}", code, parsed.error)
    };
    for issue in parsed.issues {
        message.push_str("\n  - ");
        message.push_str(&issue);
    }
    message
}
