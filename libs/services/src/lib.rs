use std::sync::Arc;

use anyhow::Result;

mod models;
mod node;
mod store;
mod utils;

pub use models::{NewVideo, Video, seed_videos};
pub use node::{NodeEntity, NodeKind, resolve_node};
pub use store::{InMemoryVideoStore, VideoStore};
pub use utils::video_id_for_title;

#[derive(Clone)]
pub struct VideoService {
    store: Arc<dyn VideoStore>,
}

impl VideoService {
    pub fn new(store: Arc<dyn VideoStore>) -> Self {
        tracing::debug!("Initializing video service");
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryVideoStore::seeded()))
    }

    pub async fn get_video(&self, id: &str) -> Option<Video> {
        tracing::debug!("Looking up video with id: {}", id);
        let video = self.store.get_by_id(id);
        if video.is_none() {
            tracing::debug!("No video found with id: {}", id);
        }
        video
    }

    pub async fn list_videos(&self) -> Vec<Video> {
        let videos = self.store.get_all();
        tracing::debug!("Listing {} videos", videos.len());
        videos
    }

    pub async fn create_video(&self, input: NewVideo) -> Video {
        tracing::info!("Creating video titled: {}", input.title);
        let video = self.store.create(input);
        tracing::debug!("Created video {:?}", video);
        video
    }

    pub async fn resolve_node(&self, type_name: &str, local_id: &str) -> Result<Option<NodeEntity>> {
        tracing::debug!("Resolving node of type {} with id {}", type_name, local_id);
        match resolve_node(self.store.as_ref(), type_name, local_id) {
            Ok(entity) => Ok(entity),
            Err(e) => {
                tracing::warn!("Failed to resolve node: {}", e);
                Err(e)
            }
        }
    }
}
