use super::*;

impl ScopedClient {
    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
    ) -> Result<reqwest::blocking::Response> {
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            anyhow::bail!(
                "unauthorized (credential invalid/expired; run `studio login --url ... --token ...`)"
            );
        }
        if resp.status() == reqwest::StatusCode::FORBIDDEN {
            anyhow::bail!("forbidden (row-level policy denied the request)");
        }
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("{}: not found", label);
        }
        if resp.status().is_client_error() {
            let status = resp.status();
            let msg = resp
                .json::<serde_json::Value>()
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| status.to_string());
            anyhow::bail!("{}: {}", label, msg);
        }
        resp.error_for_status()
            .with_context(|| format!("{} status", label))
    }

    /// Attaches the bearer credential when the session has one; anonymous otherwise.
    pub(super) fn authorize(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.credential {
            Some(token) => req.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token)),
            None => req,
        }
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
