//! 公共类型定义

use std::fmt;

use serde::{Deserialize, Serialize};

// ============ 账号引用 ============

/// Provider 返回的账号引用（瞬态）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    /// 账号 ID；普通用户为裸 ID，其他实体保留类型前缀（如 `spotify:artist:xxx`）
    #[serde(alias = "username")]
    pub id: String,
    /// 显示名称
    #[serde(alias = "name")]
    pub display_name: String,
    /// 头像地址
    #[serde(default, alias = "image_url", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl AccountRef {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar_url: None,
        }
    }

    #[must_use]
    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }

    /// 是否为用户账号（而非 artist 等其他实体）
    pub fn is_account(&self) -> bool {
        is_account_id(&self.id)
    }
}

/// 一个账号的关注关系
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowRelations {
    /// 关注该账号的人
    pub followers: Vec<AccountRef>,
    /// 该账号关注的人
    pub following: Vec<AccountRef>,
}

// ============ 实体 ID ============

/// 用户类型 URI 中的 kind 段
pub const ACCOUNT_KIND: &str = "user";

/// 解析后的实体 ID
///
/// 支持两种形式：
/// - 裸 ID：`alice`，视为用户账号
/// - URI：`<platform>:<kind>:<id>`，`kind == "user"` 时视为用户账号
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityId {
    /// 用户账号（已去掉 URI 前缀）
    Account(String),
    /// 非账号实体，不参与抓取和建图
    NonAccount { kind: String, raw: String },
}

impl EntityId {
    /// 解析原始 ID，空串返回 `None`
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let mut parts = raw.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(_platform), Some(kind), Some(id)) => {
                if kind == ACCOUNT_KIND {
                    if id.is_empty() {
                        None
                    } else {
                        Some(Self::Account(id.to_string()))
                    }
                } else {
                    Some(Self::NonAccount {
                        kind: kind.to_string(),
                        raw: raw.to_string(),
                    })
                }
            }
            _ => Some(Self::Account(raw.to_string())),
        }
    }

    /// 账号 ID（非账号实体返回 `None`）
    pub fn account_id(&self) -> Option<&str> {
        match self {
            Self::Account(id) => Some(id),
            Self::NonAccount { .. } => None,
        }
    }
}

/// 判断原始 ID 是否指向用户账号
pub fn is_account_id(raw: &str) -> bool {
    matches!(EntityId::parse(raw), Some(EntityId::Account(_)))
}

/// 归一化 ID：用户 URI 去掉前缀，其他实体原样返回
pub fn normalize_account_id(raw: &str) -> String {
    match EntityId::parse(raw) {
        Some(EntityId::Account(id)) => id,
        Some(EntityId::NonAccount { raw, .. }) => raw,
        None => String::new(),
    }
}

// ============ Provider 类型与凭证 ============

/// 支持的平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Spotify,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spotify => write!(f, "spotify"),
        }
    }
}

/// Provider 访问凭证（不透明的 Bearer token）
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentials {
    pub access_token: String,
}

impl ProviderCredentials {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

// ============ Provider 元数据 ============

/// Provider 元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    pub id: ProviderType,
    pub name: String,
    pub description: String,
    /// 获取凭证的说明
    pub credential_help: String,
    /// 可访问主页的 URL 模板，`{id}` 会被替换为账号 ID
    pub profile_url_template: String,
}
