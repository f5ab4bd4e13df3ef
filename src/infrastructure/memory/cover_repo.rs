//! In-Memory Cover Repository

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{CoverRepositoryPort, RepositoryError};
use crate::domain::book::ProfileId;
use crate::domain::cover::CoverConfiguration;

/// 内存封面仓储
pub struct InMemoryCoverRepository {
    covers: DashMap<ProfileId, CoverConfiguration>,
}

impl InMemoryCoverRepository {
    pub fn new() -> Self {
        Self {
            covers: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn insert(&self, profile_id: ProfileId, configuration: CoverConfiguration) {
        self.covers.insert(profile_id, configuration);
    }
}

impl Default for InMemoryCoverRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoverRepositoryPort for InMemoryCoverRepository {
    async fn find_by_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Option<CoverConfiguration>, RepositoryError> {
        Ok(self.covers.get(&profile_id).map(|c| c.clone()))
    }
}
