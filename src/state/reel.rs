/// The stories component: collection, viewer and expiry in one place.
///
/// Every user intent from the UI lands here. Whenever the viewer comes to
/// show a story, that story is marked seen.

use tracing::{debug, info};

use super::data::Story;
use super::playback::{PlaybackEngine, TickOutcome, TimerId};
use super::storage::Storage;
use super::store::StoryStore;
use crate::config::Settings;
use crate::media::ingest::EncodedImage;

#[derive(Debug)]
pub struct Reel {
    store: StoryStore,
    playback: PlaybackEngine,
}

impl Reel {
    /// Load persisted stories, expiring stale ones before anything is shown
    pub fn load(storage: Box<dyn Storage>, settings: &Settings, now: i64) -> Self {
        let store = StoryStore::load(storage, settings, now);
        info!("🎞️  Story reel loaded with {} stories", store.len());

        Self {
            store,
            playback: PlaybackEngine::new(settings),
        }
    }

    pub fn stories(&self) -> &[Story] {
        self.store.stories()
    }

    #[cfg(test)]
    pub fn playback(&self) -> &PlaybackEngine {
        &self.playback
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.playback.is_open()
    }

    /// Viewer is held by a press
    pub fn is_paused(&self) -> bool {
        self.playback.is_paused()
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        self.store.sweep_interval()
    }

    /// The story on screen, if the viewer is open
    pub fn current(&self) -> Option<&Story> {
        self.playback.current().and_then(|idx| self.store.get(idx))
    }

    pub fn active_timer(&self) -> Option<TimerId> {
        self.playback.active_timer()
    }

    pub fn progress(&self) -> Vec<f64> {
        self.playback.progress()
    }

    pub fn persist_error(&self) -> Option<&str> {
        self.store.last_persist_error()
    }

    /// Store a freshly ingested image as a new story
    pub fn add_image(&mut self, image: EncodedImage, now: i64) -> Story {
        let story = self.store.create(image.data_url, now);
        info!("➕ Added story {} ({}x{})", story.id, image.width, image.height);
        story
    }

    /// Thumbnail `index` was selected
    pub fn select(&mut self, index: usize) {
        if self.playback.open(index, self.store.len()) {
            self.store.mark_seen(index);
        }
    }

    pub fn delete(&mut self, id: &str) {
        if let Some(index) = self.store.delete(id) {
            debug!("Deleted story {} at index {}", id, index);
            let shown = self.playback.remove(index, self.store.len());
            self.seen(shown);
        }
    }

    pub fn next(&mut self) {
        let shown = self.playback.next();
        self.seen(shown);
    }

    pub fn prev(&mut self) {
        let shown = self.playback.prev();
        self.seen(shown);
    }

    pub fn close(&mut self) {
        self.playback.close();
    }

    pub fn pointer_down(&mut self) {
        self.playback.pointer_down();
    }

    pub fn pointer_up(&mut self) {
        self.playback.pointer_up();
    }

    pub fn drag_end(&mut self, offset_x: f32) {
        let shown = self.playback.drag_end(offset_x);
        self.seen(shown);
    }

    /// Pointer released after a press: resume, then evaluate the swipe
    pub fn release(&mut self, offset_x: f32) {
        self.pointer_up();
        self.drag_end(offset_x);
    }

    pub fn tick(&mut self, timer: TimerId) -> TickOutcome {
        let outcome = self.playback.tick(timer);
        if let TickOutcome::Advanced(index) = outcome {
            self.store.mark_seen(index);
        }
        outcome
    }

    /// Expire stale stories, re-indexing an open viewer
    pub fn sweep(&mut self, now: i64) {
        let removed = self.store.sweep(now);
        if removed.is_empty() {
            return;
        }

        // All removals land on the engine first, then the final story is marked
        let shown = self.playback.remove_many(&removed, self.store.len());
        self.seen(shown);
    }

    fn seen(&mut self, shown: Option<usize>) {
        if let Some(index) = shown {
            self.store.mark_seen(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::playback::Viewer;
    use crate::state::store::tests::{MemoryStorage, NOW};

    fn image(tag: &str) -> EncodedImage {
        EncodedImage {
            data_url: format!("data:image/jpeg;base64,{}", tag),
            width: 10,
            height: 10,
        }
    }

    fn reel_with(count: usize) -> (Reel, MemoryStorage) {
        let memory = MemoryStorage::default();
        let mut reel = Reel::load(Box::new(memory.clone()), &Settings::default(), NOW);
        for i in 0..count {
            reel.add_image(image(&i.to_string()), NOW + i as i64);
        }
        (reel, memory)
    }

    fn tick_until_change(reel: &mut Reel) -> TickOutcome {
        loop {
            let timer = reel.active_timer().expect("timer running");
            match reel.tick(timer) {
                TickOutcome::Progressed => continue,
                other => return other,
            }
        }
    }

    #[test]
    fn test_select_marks_seen() {
        let (mut reel, _) = reel_with(2);
        reel.select(1);

        assert!(reel.stories()[1].seen);
        assert!(!reel.stories()[0].seen);
        assert_eq!(reel.current().unwrap().id, reel.stories()[1].id);
    }

    #[test]
    fn test_view_flags_follow_viewer() {
        let (mut reel, _) = reel_with(0);
        assert!(reel.is_empty());
        assert_eq!(reel.sweep_interval(), Settings::default().sweep_interval);

        reel.add_image(image("a"), NOW);
        reel.select(0);
        assert!(!reel.is_empty());
        assert!(reel.is_open());
        assert!(!reel.is_paused());

        reel.pointer_down();
        assert!(reel.is_paused());

        reel.close();
        assert!(!reel.is_open());
    }

    #[test]
    fn test_full_playthrough_closes_and_marks_all_seen() {
        let (mut reel, _) = reel_with(3);
        reel.select(0);

        assert_eq!(tick_until_change(&mut reel), TickOutcome::Advanced(1));
        assert_eq!(tick_until_change(&mut reel), TickOutcome::Advanced(2));
        assert_eq!(tick_until_change(&mut reel), TickOutcome::Closed);

        assert_eq!(reel.playback().viewer(), &Viewer::Closed);
        assert!(reel.stories().iter().all(|s| s.seen));
    }

    #[test]
    fn test_seen_survives_reload() {
        let (mut reel, memory) = reel_with(1);
        reel.select(0);
        reel.close();

        let reloaded = Reel::load(Box::new(memory), &Settings::default(), NOW + 1_000);
        assert!(reloaded.stories()[0].seen);
        assert!(reloaded.current().is_none());
    }

    #[test]
    fn test_release_resumes_and_swipes() {
        let (mut reel, _) = reel_with(2);
        reel.select(0);
        reel.pointer_down();
        assert!(reel.active_timer().is_none());

        reel.release(-150.0);
        assert_eq!(reel.playback().current(), Some(1));
        assert!(reel.active_timer().is_some());
        assert!(reel.stories()[1].seen);
    }

    #[test]
    fn test_release_without_swipe_only_resumes() {
        let (mut reel, _) = reel_with(2);
        reel.select(0);
        reel.pointer_down();
        reel.release(40.0);

        assert_eq!(reel.playback().current(), Some(0));
        assert!(!reel.playback().is_paused());
        assert!(reel.active_timer().is_some());
    }

    #[test]
    fn test_delete_open_story_moves_to_successor() {
        let (mut reel, _) = reel_with(3);
        reel.select(1);
        let doomed = reel.stories()[1].id.clone();
        let successor = reel.stories()[2].id.clone();

        reel.delete(&doomed);
        assert_eq!(reel.stories().len(), 2);
        assert_eq!(reel.current().unwrap().id, successor);
        assert!(reel.current().unwrap().seen);
    }

    #[test]
    fn test_delete_last_remaining_closes() {
        let (mut reel, _) = reel_with(1);
        reel.select(0);
        let id = reel.stories()[0].id.clone();

        reel.delete(&id);
        assert!(reel.current().is_none());
        assert!(reel.active_timer().is_none());
    }

    #[test]
    fn test_sweep_while_open_reindexes() {
        let memory = MemoryStorage::default();
        let mut reel = Reel::load(Box::new(memory), &Settings::default(), NOW);
        reel.add_image(image("old"), NOW - 86_000_000);
        reel.add_image(image("new"), NOW);
        reel.select(1);
        let current = reel.current().unwrap().id.clone();

        reel.sweep(NOW + 1_000_000);
        assert_eq!(reel.stories().len(), 1);
        assert_eq!(reel.playback().current(), Some(0));
        assert_eq!(reel.current().unwrap().id, current);
    }

    #[test]
    fn test_sweep_of_open_and_earlier_story_marks_successor() {
        let memory = MemoryStorage::default();
        let mut reel = Reel::load(Box::new(memory), &Settings::default(), NOW);
        reel.add_image(image("a"), NOW - 86_000_000);
        reel.add_image(image("b"), NOW - 86_000_000);
        reel.add_image(image("c"), NOW);
        reel.select(1);
        let survivor = reel.stories()[2].id.clone();

        reel.sweep(NOW + 1_000_000);
        assert_eq!(reel.stories().len(), 1);
        let current = reel.current().unwrap();
        assert_eq!(current.id, survivor);
        assert!(current.seen);
    }

    #[test]
    fn test_sweep_scattered_marks_only_story_on_screen() {
        let memory = MemoryStorage::default();
        let mut reel = Reel::load(Box::new(memory.clone()), &Settings::default(), NOW);
        reel.add_image(image("s0"), NOW - 86_000_000);
        reel.add_image(image("s1"), NOW);
        reel.add_image(image("s2"), NOW - 86_000_000);
        reel.add_image(image("s3"), NOW);
        reel.add_image(image("s4"), NOW);
        reel.select(2);
        let s3 = reel.stories()[3].id.clone();

        reel.sweep(NOW + 1_000_000);
        let seen: Vec<bool> = reel.stories().iter().map(|s| s.seen).collect();
        assert_eq!(seen, vec![false, true, false]);
        assert_eq!(reel.current().unwrap().id, s3);

        let reloaded = Reel::load(Box::new(memory), &Settings::default(), NOW + 1_000_000);
        let seen: Vec<bool> = reloaded.stories().iter().map(|s| s.seen).collect();
        assert_eq!(seen, vec![false, true, false]);
    }

    #[test]
    fn test_sweep_of_open_story_closes_when_empty() {
        let (mut reel, _) = reel_with(1);
        reel.select(0);

        reel.sweep(NOW + 86_400_001);
        assert!(reel.stories().is_empty());
        assert!(!reel.playback().is_open());
    }
}
