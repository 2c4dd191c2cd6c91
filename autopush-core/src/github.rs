use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::json;

use crate::{
    error::{Error, Result, truncate_body},
    secrets::{GITHUB_TOKEN_VAR, ISSUE_REPO_VAR},
};

const GITHUB_API_URL: &str = "https://api.github.com";
const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// External GitHub collaborator: profile mutation plus tracking issues.
#[async_trait]
pub trait ProfileHost: Send + Sync {
    async fn update_bio(&self, content: &str) -> Result<()>;
    async fn update_status(&self, content: &str) -> Result<()>;
    async fn create_issue(&self, title: &str, body: &str, labels: &[&str]) -> Result<()>;
}

/// GitHub REST/GraphQL client authenticated with a personal access token.
#[derive(Debug, Clone)]
pub struct GithubClient {
    token: String,
    issue_repo: Option<String>,
    http: Client,
}

impl GithubClient {
    pub fn new(token: String, issue_repo: Option<String>) -> Self {
        Self {
            token,
            issue_repo,
            http: Client::new(),
        }
    }

    /// Credentials from the environment. Construction never fails: a
    /// missing token becomes a placeholder the API rejects at request
    /// time, which keeps all failures inside the updater's reporting
    /// wrapper.
    pub fn from_env() -> Self {
        let token =
            std::env::var(GITHUB_TOKEN_VAR).unwrap_or_else(|_| "default_token".to_string());
        let issue_repo = std::env::var(ISSUE_REPO_VAR).ok();
        Self::new(token, issue_repo)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(header::ACCEPT, "application/vnd.github+json")
            .header(header::USER_AGENT, "autopush")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn send_checked(&self, req: reqwest::RequestBuilder) -> Result<()> {
        let res = req.send().await.map_err(|source| Error::Request {
            service: "github",
            source,
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| Error::Request {
            service: "github",
            source,
        })?;

        if !status.is_success() {
            return Err(Error::Status {
                service: "github",
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ProfileHost for GithubClient {
    async fn update_bio(&self, content: &str) -> Result<()> {
        let req = self
            .authed(self.http.patch(format!("{GITHUB_API_URL}/user")))
            .json(&json!({ "bio": content }));
        self.send_checked(req).await
    }

    async fn update_status(&self, content: &str) -> Result<()> {
        let query = r#"
            mutation ($message: String!) {
                changeUserStatus(input: {emoji: ":computer:", limitedAvailability: false, message: $message}) {
                    status {
                        message
                        emoji
                    }
                }
            }
        "#;

        let req = self.authed(self.http.post(GITHUB_GRAPHQL_URL)).json(&json!({
            "query": query,
            "variables": { "message": content },
        }));
        self.send_checked(req).await
    }

    async fn create_issue(&self, title: &str, body: &str, labels: &[&str]) -> Result<()> {
        let repo = self
            .issue_repo
            .as_deref()
            .ok_or(Error::MissingSecret(ISSUE_REPO_VAR))?;

        let req = self
            .authed(self.http.post(format!("{GITHUB_API_URL}/repos/{repo}/issues")))
            .json(&json!({
                "title": title,
                "body": body,
                "labels": labels,
            }));
        self.send_checked(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_issue_requires_a_target_repo() {
        let client = GithubClient::new("token".into(), None);
        let err = client
            .create_issue("title", "body", &["bug"])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MissingSecret(ISSUE_REPO_VAR)));
    }
}
