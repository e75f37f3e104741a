//! 通用 HTTP 工具
//!
//! Provider 自己构造请求（URL、鉴权头、请求体）并决定状态码如何映射为错误，
//! 这里只负责发送、记录日志和解析 JSON。

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;

/// 日志中响应体的最大长度
const MAX_LOGGED_BODY: usize = 2048;

/// 已读取完毕的响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 工具函数集
pub struct HttpUtils;

impl HttpUtils {
    /// 发送请求并读取完整响应体
    ///
    /// 只有连接或读取失败才返回 `NetworkError`，非 2xx 状态码原样返回给调用方
    pub async fn send(
        request: RequestBuilder,
        provider: &str,
        label: &str,
    ) -> Result<HttpResponse, ProviderError> {
        log::debug!("[{provider}] {label}");

        let network_error = |detail: String| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail,
        };

        let response = request.send().await.map_err(|e| network_error(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| network_error(format!("读取响应失败: {e}")))?;

        log::debug!("[{provider}] HTTP {status}: {}", truncate_for_log(&body));
        Ok(HttpResponse { status, body })
    }

    /// 解析 JSON 响应体，失败时返回 `ParseError`
    pub fn parse_json<T: DeserializeOwned>(body: &str, provider: &str) -> Result<T, ProviderError> {
        serde_json::from_str(body).map_err(|e| {
            log::error!(
                "[{provider}] JSON 解析失败: {e}; 原始响应: {}",
                truncate_for_log(body)
            );
            ProviderError::ParseError {
                provider: provider.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

fn truncate_for_log(text: &str) -> &str {
    if text.len() <= MAX_LOGGED_BODY {
        return text;
    }
    let mut end = MAX_LOGGED_BODY;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
