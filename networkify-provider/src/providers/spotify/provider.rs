//! Spotify Provider Trait 实现

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{ErrorContext, FollowGraphProvider, ProviderErrorMapper};
use crate::types::{AccountRef, FollowRelations, ProviderType};

use super::types::MeProfile;
use super::{
    PROFILE_ATTRIBUTES_HASH, PROFILE_ATTRIBUTES_OPERATION, PathfinderRequest, PathfinderResponse,
    ProfileListResponse, SpotifyProvider,
};

impl SpotifyProvider {
    async fn fetch_profile_list(
        &self,
        account_id: &str,
        relation: &'static str,
    ) -> Result<Vec<AccountRef>> {
        let url = self.relations_url(account_id, relation)?;
        let response: ProfileListResponse = self
            .get(url.as_str(), ErrorContext::for_account(account_id, relation))
            .await?;
        Ok(response.into_account_refs())
    }
}

#[async_trait]
impl FollowGraphProvider for SpotifyProvider {
    fn id(&self) -> ProviderType {
        ProviderType::Spotify
    }

    async fn fetch_current_account(&self) -> Result<AccountRef> {
        let body =
            PathfinderRequest::persisted(PROFILE_ATTRIBUTES_OPERATION, PROFILE_ATTRIBUTES_HASH);
        let ctx = ErrorContext {
            account_id: None,
            operation: Some(PROFILE_ATTRIBUTES_OPERATION),
        };

        let response: PathfinderResponse = self
            .post(&self.endpoints.pathfinder_url, &body, ctx)
            .await?;

        response
            .data
            .and_then(|data| data.me)
            .and_then(|me| me.profile)
            .and_then(MeProfile::into_account_ref)
            .ok_or_else(|| self.parse_error("响应中缺少当前用户信息"))
    }

    async fn fetch_follow_relations(&self, account_id: &str) -> Result<FollowRelations> {
        let following = self.fetch_profile_list(account_id, "following").await?;
        let followers = self.fetch_profile_list(account_id, "followers").await?;

        log::debug!(
            "[{}] {account_id}: {} followers, {} following",
            self.provider_name(),
            followers.len(),
            following.len()
        );

        Ok(FollowRelations {
            followers,
            following,
        })
    }
}
