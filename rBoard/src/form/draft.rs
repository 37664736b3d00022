//! Locally saved drafts of unsent post forms.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::{CacheStorage, CacheStorageExt};
use crate::error::Result;
use crate::models::PostId;

use super::{PostForm, PostFormAction};

/// Prefix of every draft key.
pub const DRAFT_KEY_PREFIX: &str = "post_draft_";

/// Key for the draft of a post, or of a new post.
pub fn draft_key(post_id: Option<PostId>) -> String {
    match post_id {
        Some(id) => format!("{}{}", DRAFT_KEY_PREFIX, id),
        None => format!("{}new", DRAFT_KEY_PREFIX),
    }
}

/// Saved form content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub content: String,
    #[serde(rename = "videoUrl", default)]
    pub video_url: String,
    #[serde(rename = "lastSaved")]
    pub last_saved: DateTime<Utc>,
}

impl Draft {
    fn from_form(form: &PostForm, at: DateTime<Utc>) -> Self {
        Self {
            title: form.title.clone(),
            content: form.content.clone(),
            video_url: form.video_url.clone(),
            last_saved: at,
        }
    }
}

/// Stores drafts in a cache backend.
#[derive(Debug, Clone)]
pub struct DraftStore {
    cache: Arc<dyn CacheStorage>,
}

impl DraftStore {
    pub fn new(cache: Arc<dyn CacheStorage>) -> Self {
        Self { cache }
    }

    /// Save the form as a draft if it holds any input.
    ///
    /// Returns the save time, or `None` when nothing was saved.
    pub async fn save(&self, form: &PostForm) -> Result<Option<DateTime<Utc>>> {
        if !form.is_dirty() {
            return Ok(None);
        }
        let now = Utc::now();
        let key = form.draft_key();
        self.cache
            .set_json(&key, &Draft::from_form(form, now), None)
            .await?;
        log::debug!("saved draft {}", key);
        Ok(Some(now))
    }

    /// Load the draft for a post, or for a new post.
    pub async fn load(&self, post_id: Option<PostId>) -> Option<Draft> {
        self.cache.get_json(&draft_key(post_id)).await
    }

    /// Remove the draft for a post, or for a new post.
    pub async fn discard(&self, post_id: Option<PostId>) {
        self.cache.remove(&draft_key(post_id)).await;
    }

    /// All saved drafts with their keys.
    pub async fn list(&self) -> Vec<(String, Draft)> {
        let mut keys = self.cache.scan_prefix(DRAFT_KEY_PREFIX).await;
        keys.sort();

        let mut drafts = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(draft) = self.cache.get_json::<Draft>(&key).await {
                drafts.push((key, draft));
            }
        }
        drafts
    }

    /// Copy a draft into a form, including the video preview.
    pub fn restore_into(form: &mut PostForm, draft: Draft) {
        form.apply(PostFormAction::SetTitle(draft.title));
        form.apply(PostFormAction::SetContent(draft.content));
        form.apply(PostFormAction::SetVideoUrl(draft.video_url));
        form.apply(PostFormAction::SetLastSaved(Some(draft.last_saved)));
    }
}
