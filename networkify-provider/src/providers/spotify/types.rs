//! Spotify 私有接口类型定义

use serde::{Deserialize, Serialize};

use crate::types::{AccountRef, normalize_account_id};

// ============ pathfinder ============

/// pathfinder 持久化查询请求体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathfinderRequest {
    pub variables: serde_json::Value,
    pub operation_name: &'static str,
    pub extensions: PathfinderExtensions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathfinderExtensions {
    pub persisted_query: PersistedQuery,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedQuery {
    pub version: u32,
    pub sha256_hash: &'static str,
}

impl PathfinderRequest {
    pub fn persisted(operation_name: &'static str, sha256_hash: &'static str) -> Self {
        Self {
            variables: serde_json::json!({}),
            operation_name,
            extensions: PathfinderExtensions {
                persisted_query: PersistedQuery {
                    version: 1,
                    sha256_hash,
                },
            },
        }
    }
}

/// pathfinder 响应
#[derive(Debug, Deserialize)]
pub struct PathfinderResponse {
    pub data: Option<PathfinderData>,
}

#[derive(Debug, Deserialize)]
pub struct PathfinderData {
    pub me: Option<PathfinderMe>,
}

#[derive(Debug, Deserialize)]
pub struct PathfinderMe {
    pub profile: Option<MeProfile>,
}

#[derive(Debug, Deserialize)]
pub struct MeProfile {
    pub username: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<Avatar>,
}

#[derive(Debug, Deserialize)]
pub struct Avatar {
    #[serde(default)]
    pub sources: Vec<ImageSource>,
}

#[derive(Debug, Deserialize)]
pub struct ImageSource {
    pub url: String,
    #[allow(dead_code)]
    pub height: Option<u32>,
    #[allow(dead_code)]
    pub width: Option<u32>,
}

impl MeProfile {
    /// 转换为账号引用；缺少用户名时返回 `None`
    pub fn into_account_ref(self) -> Option<AccountRef> {
        let username = self.username.filter(|u| !u.is_empty())?;
        let display_name = self.name.unwrap_or_else(|| username.clone());
        // 最后一个 source 分辨率最高
        let avatar_url = self
            .avatar
            .and_then(|avatar| avatar.sources.into_iter().last())
            .map(|source| source.url);

        Some(AccountRef {
            id: normalize_account_id(&username),
            display_name,
            avatar_url,
        })
    }
}

// ============ spclient ============

/// 粉丝 / 关注列表响应
#[derive(Debug, Deserialize)]
pub struct ProfileListResponse {
    /// 列表为空时上游会直接省略该字段
    #[serde(default)]
    pub profiles: Option<Vec<SpotifyProfile>>,
}

/// 列表中的单个主页
#[derive(Debug, Deserialize)]
pub struct SpotifyProfile {
    pub uri: String,
    pub name: String,
    pub image_url: Option<String>,
    #[allow(dead_code)]
    pub followers_count: Option<u64>,
}

impl SpotifyProfile {
    pub fn into_account_ref(self) -> AccountRef {
        AccountRef {
            id: normalize_account_id(&self.uri),
            display_name: self.name,
            avatar_url: self.image_url.filter(|url| !url.is_empty()),
        }
    }
}

impl ProfileListResponse {
    pub fn into_account_refs(self) -> Vec<AccountRef> {
        self.profiles
            .unwrap_or_default()
            .into_iter()
            .filter(|profile| !profile.uri.is_empty())
            .map(SpotifyProfile::into_account_ref)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_list_keeps_artists_tagged() {
        let body = r#"{
            "profiles": [
                {"uri": "spotify:user:alice", "name": "Alice", "image_url": "https://i/a.jpg", "followers_count": 3},
                {"uri": "spotify:artist:4Z8W4fKeB5YxbusRsdQVPb", "name": "Radiohead", "followers_count": 900}
            ]
        }"#;
        let parsed: ProfileListResponse = serde_json::from_str(body).unwrap();
        let refs = parsed.into_account_refs();

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].id, "alice");
        assert_eq!(refs[0].avatar_url.as_deref(), Some("https://i/a.jpg"));
        assert_eq!(refs[1].id, "spotify:artist:4Z8W4fKeB5YxbusRsdQVPb");
        assert!(!refs[1].is_account());
    }

    #[test]
    fn missing_profiles_is_empty() {
        let parsed: ProfileListResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_account_refs().is_empty());
    }

    #[test]
    fn me_profile_uses_last_avatar_source() {
        let body = r#"{
            "data": {"me": {"profile": {
                "username": "me",
                "name": "Me Myself",
                "avatar": {"sources": [
                    {"url": "https://i/small.jpg", "height": 64, "width": 64},
                    {"url": "https://i/large.jpg", "height": 300, "width": 300}
                ]}
            }}}
        }"#;
        let parsed: PathfinderResponse = serde_json::from_str(body).unwrap();
        let account = parsed
            .data
            .and_then(|d| d.me)
            .and_then(|m| m.profile)
            .and_then(MeProfile::into_account_ref)
            .unwrap();

        assert_eq!(account.id, "me");
        assert_eq!(account.display_name, "Me Myself");
        assert_eq!(account.avatar_url.as_deref(), Some("https://i/large.jpg"));
    }

    #[test]
    fn request_body_matches_persisted_query_shape() {
        let body = PathfinderRequest::persisted("profileAttributes", "abc");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["operationName"], "profileAttributes");
        assert_eq!(value["extensions"]["persistedQuery"]["sha256Hash"], "abc");
        assert_eq!(value["extensions"]["persistedQuery"]["version"], 1);
    }
}
