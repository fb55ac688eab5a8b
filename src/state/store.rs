/// The authoritative story collection.
///
/// Every mutation builds the next collection as a new value, writes it
/// through to storage, then swaps it in. Storage failures never block a
/// mutation: the in-memory collection stays authoritative for the session.

use tracing::{debug, info, warn};

use super::data::{Story, StoryArchive};
use super::expiry::{is_live, Sweeper};
use super::storage::Storage;
use crate::config::Settings;
use crate::error::Result;

pub struct StoryStore {
    stories: Vec<Story>,
    storage: Box<dyn Storage>,
    key: String,
    sweeper: Sweeper,
    last_persist_error: Option<String>,
}

impl StoryStore {
    /// Read the persisted collection and drop anything already expired.
    ///
    /// Missing or corrupt data yields an empty collection.
    pub fn load(storage: Box<dyn Storage>, settings: &Settings, now: i64) -> Self {
        let key = settings.storage_key.clone();
        let persisted = match read_archive(storage.as_ref(), &key) {
            Ok(Some(archive)) => {
                debug!("Loaded archive v{} with {} stories", archive.version, archive.stories.len());
                archive.stories
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("⚠️  Discarding unreadable story archive: {}", e);
                Vec::new()
            }
        };

        let total = persisted.len();
        let stories: Vec<Story> = persisted
            .into_iter()
            .filter(|story| is_live(story, now, settings.ttl_ms))
            .collect();

        let mut store = StoryStore {
            stories: Vec::new(),
            storage,
            key,
            sweeper: Sweeper::new(settings),
            last_persist_error: None,
        };

        if stories.len() != total {
            info!("🧹 Dropped {} expired stories on load", total - stories.len());
            store.commit(stories);
        } else {
            store.stories = stories;
        }

        store
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Story> {
        self.stories.get(index)
    }

    /// How often `sweep` should run
    pub fn sweep_interval(&self) -> std::time::Duration {
        self.sweeper.interval
    }

    /// Message from the most recent failed write, cleared by the next success
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Append a story to the end of the collection
    pub fn add(&mut self, story: Story) {
        let mut updated = self.stories.clone();
        updated.push(story);
        self.commit(updated);
    }

    /// Mint a new unseen story with a unique, creation-ordered id and append it
    pub fn create(&mut self, image_data: String, now: i64) -> Story {
        let story = Story::new(self.next_id(now).to_string(), image_data, now);
        self.add(story.clone());
        story
    }

    /// Remove the story with `id`, returning the index it occupied
    pub fn delete(&mut self, id: &str) -> Option<usize> {
        let index = self.stories.iter().position(|story| story.id == id)?;
        let updated = self
            .stories
            .iter()
            .filter(|story| story.id != id)
            .cloned()
            .collect();
        self.commit(updated);
        Some(index)
    }

    /// Mark the story at `index` as seen. Returns true if it changed.
    pub fn mark_seen(&mut self, index: usize) -> bool {
        match self.stories.get(index) {
            Some(story) if !story.seen => {}
            _ => return false,
        }

        let updated = self
            .stories
            .iter()
            .enumerate()
            .map(|(idx, story)| {
                let mut story = story.clone();
                if idx == index {
                    story.seen = true;
                }
                story
            })
            .collect();
        self.commit(updated);
        true
    }

    /// Drop expired stories. Returns the removed indices in ascending order.
    pub fn sweep(&mut self, now: i64) -> Vec<usize> {
        match self.sweeper.sweep(&self.stories, now) {
            Some((live, expired)) => {
                info!("🧹 Swept {} expired stories", expired.len());
                self.commit(live);
                expired
            }
            None => Vec::new(),
        }
    }

    fn next_id(&self, now: i64) -> i64 {
        let newest = self.stories.iter().filter_map(Story::numeric_id).max();
        match newest {
            Some(newest) if newest >= now => newest + 1,
            _ => now,
        }
    }

    /// Persist `updated`, then make it the current collection
    fn commit(&mut self, updated: Vec<Story>) {
        match self.persist(&updated) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                warn!("⚠️  Failed to persist {} stories: {}", updated.len(), e);
                self.last_persist_error = Some(e.to_string());
            }
        }
        self.stories = updated;
    }

    fn persist(&mut self, stories: &[Story]) -> Result<()> {
        let json = StoryArchive::new(stories.to_vec()).to_json()?;
        self.storage.write(&self.key, &json)
    }
}

fn read_archive(storage: &dyn Storage, key: &str) -> Result<Option<StoryArchive>> {
    match storage.read(key)? {
        Some(json) => StoryArchive::from_json(&json).map(Some),
        None => Ok(None),
    }
}

impl std::fmt::Debug for StoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryStore")
            .field("stories", &self.stories.len())
            .field("key", &self.key)
            .finish()
    }
}
