//! SQLite Story Repository

use async_trait::async_trait;
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use super::{parse_timestamp, DbPool};
use crate::application::ports::{RepositoryError, StoryRepositoryPort};
use crate::domain::book::{
    MediaId, ProfileId, Story, StoryId, StoryMediaItem, StoryWithMedia,
};

/// SQLite Story Repository
pub struct SqliteStoryRepository {
    pool: DbPool,
}

impl SqliteStoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(value).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

#[derive(FromRow)]
struct StoryRow {
    id: String,
    profile_id: String,
    title: Option<String>,
    content: Option<String>,
    share_token: Option<String>,
    created_at: String,
}

impl TryFrom<StoryRow> for Story {
    type Error = RepositoryError;

    fn try_from(row: StoryRow) -> Result<Self, Self::Error> {
        let story = Story::new(
            StoryId::from_uuid(parse_uuid(&row.id)?),
            ProfileId::from_uuid(parse_uuid(&row.profile_id)?),
            row.title,
            row.content.unwrap_or_default(),
            parse_timestamp(&row.created_at)?,
        );
        Ok(match row.share_token {
            Some(token) => story.with_share_token(token),
            None => story,
        })
    }
}

#[derive(FromRow)]
struct MediaRow {
    id: String,
    story_id: String,
    content_type: String,
    file_path: String,
    caption: Option<String>,
    created_at: String,
}

impl TryFrom<MediaRow> for StoryMediaItem {
    type Error = RepositoryError;

    fn try_from(row: MediaRow) -> Result<Self, Self::Error> {
        Ok(StoryMediaItem::new(
            MediaId::from_uuid(parse_uuid(&row.id)?),
            StoryId::from_uuid(parse_uuid(&row.story_id)?),
            row.content_type,
            row.file_path,
            row.caption,
            parse_timestamp(&row.created_at)?,
        ))
    }
}

#[async_trait]
impl StoryRepositoryPort for SqliteStoryRepository {
    async fn find_by_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<StoryWithMedia>, RepositoryError> {
        let story_rows: Vec<StoryRow> = sqlx::query_as(
            r#"
            SELECT id, profile_id, title, content, share_token, created_at
            FROM stories
            WHERE profile_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(profile_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let media_rows: Vec<MediaRow> = sqlx::query_as(
            r#"
            SELECT m.id, m.story_id, m.content_type, m.file_path, m.caption, m.created_at
            FROM story_media m
            JOIN stories s ON s.id = m.story_id
            WHERE s.profile_id = ?
            ORDER BY m.created_at ASC, m.id ASC
            "#,
        )
        .bind(profile_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let mut media_by_story: HashMap<StoryId, Vec<StoryMediaItem>> = HashMap::new();
        for row in media_rows {
            let item = StoryMediaItem::try_from(row)?;
            media_by_story.entry(item.story_id()).or_default().push(item);
        }

        let stories = story_rows
            .into_iter()
            .map(|row| {
                let story = Story::try_from(row)?;
                let media = media_by_story.remove(&story.id()).unwrap_or_default();
                Ok(StoryWithMedia::new(story, media))
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        tracing::debug!(
            profile_id = %profile_id,
            stories = stories.len(),
            "Stories loaded"
        );
        Ok(stories)
    }

    async fn find_by_id(&self, id: StoryId) -> Result<Option<Story>, RepositoryError> {
        let row: Option<StoryRow> = sqlx::query_as(
            "SELECT id, profile_id, title, content, share_token, created_at FROM stories WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(Story::try_from).transpose()
    }
}
