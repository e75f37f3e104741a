//! Spotify 关注图 Provider
//!
//! 使用 Web Player 的私有接口：
//! - pathfinder 持久化查询 `profileAttributes` 获取当前用户
//! - spclient `user-profile-view` 获取粉丝 / 关注列表

mod error;
mod http;
mod provider;
mod types;

use reqwest::{Client, Url};

use crate::error::{ProviderError, Result};
use crate::traits::ProviderErrorMapper;
use crate::types::ProviderCredentials;

pub(crate) use types::{PathfinderRequest, PathfinderResponse, ProfileListResponse};

pub(crate) const PATHFINDER_URL: &str = "https://api-partner.spotify.com/pathfinder/v2/query";
pub(crate) const SPCLIENT_BASE: &str = "https://spclient.wg.spotify.com";
pub(crate) const PROFILE_ATTRIBUTES_OPERATION: &str = "profileAttributes";
pub(crate) const PROFILE_ATTRIBUTES_HASH: &str =
    "53bcb064f6cd18c23f752bc324a791194d20df612d8e1239c735144ab0399ced";

/// 接口地址（测试时可指向本地服务）
#[derive(Debug, Clone)]
pub struct SpotifyEndpoints {
    pub pathfinder_url: String,
    pub spclient_base: String,
}

impl Default for SpotifyEndpoints {
    fn default() -> Self {
        Self {
            pathfinder_url: PATHFINDER_URL.to_string(),
            spclient_base: SPCLIENT_BASE.to_string(),
        }
    }
}

/// Spotify 关注图 Provider
pub struct SpotifyProvider {
    pub(crate) client: Client,
    pub(crate) credentials: ProviderCredentials,
    pub(crate) endpoints: SpotifyEndpoints,
}

impl SpotifyProvider {
    pub fn new(credentials: ProviderCredentials) -> Self {
        Self::with_endpoints(credentials, SpotifyEndpoints::default())
    }

    pub fn with_endpoints(credentials: ProviderCredentials, endpoints: SpotifyEndpoints) -> Self {
        Self {
            client: Client::new(),
            credentials,
            endpoints,
        }
    }

    /// 关系列表地址，账号 ID 作为单独的路径段编码
    pub(crate) fn relations_url(&self, account_id: &str, relation: &str) -> Result<Url> {
        let invalid_base = || ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_message: format!("无效的 spclient 地址: {}", self.endpoints.spclient_base),
        };
        let mut url = Url::parse(&self.endpoints.spclient_base).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|()| invalid_base())?
            .pop_if_empty()
            .extend(["user-profile-view", "v3", "profile", account_id, relation]);
        Ok(url)
    }
}
