//! Spotify HTTP 请求方法

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::{HttpResponse, HttpUtils};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::SpotifyProvider;

impl SpotifyProvider {
    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str, ctx: ErrorContext) -> Result<T> {
        let request = self
            .client
            .get(url)
            .bearer_auth(self.token()?);

        let response = HttpUtils::send(request, self.provider_name(), &format!("GET {url}")).await?;
        self.check_status(&response, ctx)?;
        HttpUtils::parse_json(&response.body, self.provider_name())
    }

    /// 执行 POST 请求（JSON 请求体）
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let payload =
            serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                provider: self.provider_name().to_string(),
                detail: e.to_string(),
            })?;

        let request = self
            .client
            .post(url)
            .bearer_auth(self.token()?)
            .header("Content-Type", "application/json")
            .body(payload);

        let response =
            HttpUtils::send(request, self.provider_name(), &format!("POST {url}")).await?;
        self.check_status(&response, ctx)?;
        HttpUtils::parse_json(&response.body, self.provider_name())
    }

    fn token(&self) -> Result<&str> {
        let token = self.credentials.access_token.trim();
        if token.is_empty() {
            return Err(ProviderError::MissingCredential {
                provider: self.provider_name().to_string(),
            });
        }
        Ok(token)
    }

    fn check_status(&self, response: &HttpResponse, ctx: ErrorContext) -> Result<()> {
        if response.is_success() {
            return Ok(());
        }
        log::error!("[{}] API 错误: HTTP {}", self.provider_name(), response.status);
        Err(self.map_error(
            RawApiError::with_status(response.status, response.body.trim()),
            ctx,
        ))
    }
}
