//! 从用户粘贴的内容中提取访问凭证
//!
//! 用户可以直接粘贴 token，也可以粘贴浏览器导出的 HAR 文件内容，
//! 此时从 token 接口的响应中取出 `accessToken`。

use serde::Deserialize;

use crate::error::{ProviderError, Result};
use crate::types::ProviderCredentials;

/// 颁发 Web Player token 的接口
pub const TOKEN_ENDPOINT: &str = "https://open.spotify.com/api/token";

#[derive(Debug, Deserialize)]
struct HarDocument {
    log: HarLog,
}

#[derive(Debug, Deserialize)]
struct HarLog {
    entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
struct HarEntry {
    request: HarRequest,
    response: HarResponse,
}

#[derive(Debug, Deserialize)]
struct HarRequest {
    url: String,
}

#[derive(Debug, Deserialize)]
struct HarResponse {
    content: HarContent,
}

#[derive(Debug, Deserialize)]
struct HarContent {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
}

impl ProviderCredentials {
    /// 解析粘贴内容
    ///
    /// HAR 中找不到 token 时退回到把原文当作 token
    pub fn from_pasted(text: &str) -> Result<Self> {
        let token = extract_from_har(text).unwrap_or_else(|| text.trim().to_string());
        if token.is_empty() {
            return Err(ProviderError::MissingCredential {
                provider: "spotify".to_string(),
            });
        }
        Ok(Self::new(token))
    }
}

fn extract_from_har(text: &str) -> Option<String> {
    let har: HarDocument = serde_json::from_str(text).ok()?;
    let entry = har
        .log
        .entries
        .into_iter()
        .find(|entry| entry.request.url.contains(TOKEN_ENDPOINT))?;
    let body = entry.response.content.text?;
    let token: TokenResponse = serde_json::from_str(&body).ok()?;
    log::debug!("Extracted access token from HAR document");
    Some(token.access_token)
}
