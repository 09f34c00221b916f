use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    models::{NewVideo, Video, seed_videos},
    utils::video_id_for_title,
};

/// Backing storage for videos. Lookups are plain synchronous calls; a store
/// doing real I/O would sit behind the same interface.
pub trait VideoStore: Send + Sync {
    /// Returns the first video whose local id equals `id`.
    fn get_by_id(&self, id: &str) -> Option<Video>;

    /// Returns all videos in insertion order.
    fn get_all(&self) -> Vec<Video>;

    /// Appends a new video. Ids are derived from the title, so they are not
    /// guaranteed to be unique.
    fn create(&self, input: NewVideo) -> Video;
}

#[derive(Debug)]
pub struct InMemoryVideoStore {
    videos: RwLock<Vec<Video>>,
}

impl InMemoryVideoStore {
    pub fn new(videos: Vec<Video>) -> Self {
        Self {
            videos: RwLock::new(videos),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_videos())
    }

    // The vector is only ever appended to, so a poisoned lock still guards
    // consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Video>> {
        self.videos.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Video>> {
        self.videos.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryVideoStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl VideoStore for InMemoryVideoStore {
    fn get_by_id(&self, id: &str) -> Option<Video> {
        self.read().iter().find(|video| video.id == id).cloned()
    }

    fn get_all(&self) -> Vec<Video> {
        self.read().clone()
    }

    fn create(&self, input: NewVideo) -> Video {
        let video = Video {
            id: video_id_for_title(&input.title),
            title: input.title,
            duration: input.duration,
            watched: input.watched,
        };
        self.write().push(video.clone());
        video
    }
}
