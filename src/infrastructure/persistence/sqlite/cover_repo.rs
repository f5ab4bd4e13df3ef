//! SQLite Cover Repository

use async_trait::async_trait;

use super::DbPool;
use crate::application::ports::{CoverRepositoryPort, RepositoryError};
use crate::domain::book::ProfileId;
use crate::domain::cover::CoverConfiguration;

/// SQLite Cover Repository（只读）
pub struct SqliteCoverRepository {
    pool: DbPool,
}

impl SqliteCoverRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CoverRepositoryPort for SqliteCoverRepository {
    async fn find_by_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Option<CoverConfiguration>, RepositoryError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT cover_data FROM book_covers WHERE profile_id = ?")
                .bind(profile_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(|(data,)| {
            serde_json::from_str(&data)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))
        })
        .transpose()
    }
}
