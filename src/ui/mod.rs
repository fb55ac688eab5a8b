/// Presentation layer
///
/// Everything here only renders state from `state::reel` and turns user
/// input into `Message`s.

use std::collections::HashMap;

use iced::widget::image::Handle;
use tracing::warn;

use crate::media::ingest::decode_data_url;
use crate::state::data::Story;

pub mod gesture;
pub mod progress;
pub mod strip;
pub mod viewer;

/// Decoded image handles keyed by story id
///
/// Data URLs are decoded once per story rather than on every frame.
#[derive(Debug, Default)]
pub struct ImageCache {
    handles: HashMap<String, Handle>,
}

impl ImageCache {
    /// Bring the cache in line with the current collection
    pub fn sync(&mut self, stories: &[Story]) {
        self.handles
            .retain(|id, _| stories.iter().any(|story| &story.id == id));

        for story in stories {
            if self.handles.contains_key(&story.id) {
                continue;
            }
            match decode_data_url(&story.image_data) {
                Ok(bytes) => {
                    self.handles.insert(story.id.clone(), Handle::from_bytes(bytes));
                }
                Err(e) => warn!("⚠️  Story {} has unreadable image data: {}", story.id, e),
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Handle> {
        self.handles.get(id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.handles.len()
    }
}
