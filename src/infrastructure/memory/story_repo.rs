//! In-Memory Story Repository

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{RepositoryError, StoryRepositoryPort};
use crate::domain::book::{ProfileId, Story, StoryId, StoryMediaItem, StoryWithMedia};

/// 内存故事仓储
pub struct InMemoryStoryRepository {
    stories: DashMap<StoryId, Story>,
    media: DashMap<StoryId, Vec<StoryMediaItem>>,
}

impl InMemoryStoryRepository {
    pub fn new() -> Self {
        Self {
            stories: DashMap::new(),
            media: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn insert_story(&self, story: Story) {
        self.stories.insert(story.id(), story);
    }

    pub fn insert_media(&self, item: StoryMediaItem) {
        self.media.entry(item.story_id()).or_default().push(item);
    }
}

impl Default for InMemoryStoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoryRepositoryPort for InMemoryStoryRepository {
    async fn find_by_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<StoryWithMedia>, RepositoryError> {
        let mut stories: Vec<Story> = self
            .stories
            .iter()
            .filter(|entry| entry.owner_id() == profile_id)
            .map(|entry| entry.value().clone())
            .collect();
        stories.sort_by_key(|story| story.created_at());

        Ok(stories
            .into_iter()
            .map(|story| {
                let mut media = self
                    .media
                    .get(&story.id())
                    .map(|items| items.clone())
                    .unwrap_or_default();
                media.sort_by_key(|item| item.created_at());
                StoryWithMedia::new(story, media)
            })
            .collect())
    }

    async fn find_by_id(&self, id: StoryId) -> Result<Option<Story>, RepositoryError> {
        Ok(self.stories.get(&id).map(|story| story.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::domain::book::MediaId;

    #[tokio::test]
    async fn test_find_by_profile_orders_by_creation() {
        let repo = InMemoryStoryRepository::new();
        let owner = ProfileId::new();
        let now = Utc::now();

        let later = Story::new(StoryId::new(), owner, Some("Later".into()), "b", now);
        let earlier = Story::new(
            StoryId::new(),
            owner,
            Some("Earlier".into()),
            "a",
            now - Duration::days(1),
        );
        let foreign = Story::new(StoryId::new(), ProfileId::new(), None, "c", now);

        repo.insert_media(StoryMediaItem::new(
            MediaId::new(),
            later.id(),
            "image/png",
            "photos/1.png",
            None,
            now,
        ));
        repo.insert_story(later.clone());
        repo.insert_story(earlier.clone());
        repo.insert_story(foreign);

        let stories = repo.find_by_profile(owner).await.unwrap();
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].story.id(), earlier.id());
        assert_eq!(stories[1].story.id(), later.id());
        assert_eq!(stories[1].media.len(), 1);
        assert!(stories[0].media.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let repo = InMemoryStoryRepository::new();
        let story = Story::new(StoryId::new(), ProfileId::new(), None, "text", Utc::now());
        repo.insert_story(story.clone());

        assert_eq!(repo.find_by_id(story.id()).await.unwrap(), Some(story));
        assert_eq!(repo.find_by_id(StoryId::new()).await.unwrap(), None);
    }
}
