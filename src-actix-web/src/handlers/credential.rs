//! 凭证处理模块

use serde::{Deserialize, Serialize};

use networkify_core::types::{AccountRef, ProviderMetadata, ProviderType};

use crate::error::ApiError;
use crate::state::AppState;

// ============ 请求参数类型 ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTokenArgs {
    #[serde(default = "default_provider")]
    pub provider_type: ProviderType,
    /// HAR 文件内容或裸 token
    pub token: String,
    /// 设置后立即校验凭证
    #[serde(default)]
    pub validate: bool,
}

fn default_provider() -> ProviderType {
    ProviderType::Spotify
}

// ============ 响应类型 ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTokenResponse {
    pub provider_type: ProviderType,
    /// 校验时获取到的当前账号
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_account: Option<AccountRef>,
}

// ============ 处理函数 ============

pub async fn set_token(state: &AppState, args: SetTokenArgs) -> Result<SetTokenResponse, ApiError> {
    state.credentials.set_token(args.provider_type, &args.token)?;

    let current_account = if args.validate {
        match state.credentials.validate().await {
            Ok(account) => Some(account),
            Err(e) => {
                state.credentials.clear_credentials();
                return Err(e.into());
            }
        }
    } else {
        None
    };

    Ok(SetTokenResponse {
        provider_type: args.provider_type,
        current_account,
    })
}

pub fn clear_token(state: &AppState) {
    state.credentials.clear_credentials();
}

pub fn list_providers(state: &AppState) -> Vec<ProviderMetadata> {
    state.providers.list_providers()
}
