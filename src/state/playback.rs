/// Story viewer state machine.
///
/// The engine is either `Closed` or showing one story with a progress
/// array parallel to the collection. Progress is counted in whole ticks so
/// a story completes after exactly `duration / tick` ticks.
///
/// The engine owns the only playback timer handle. Starting a timer always
/// cancels the previous one first, and ticks carrying a stale handle are
/// ignored, so progress can never advance twice per tick.

use tracing::debug;

use crate::config::Settings;

/// Handle of a running progress timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// State of an open viewer
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub index: usize,
    /// Elapsed ticks per story
    ticks: Vec<u32>,
    pub paused: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Viewer {
    Closed,
    Open(Session),
}

/// What a timer tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No active timer, or the tick came from a cancelled one
    Ignored,
    Progressed,
    /// The current story finished and the viewer moved on to this index
    Advanced(usize),
    /// The last story finished
    Closed,
}

#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    viewer: Viewer,
    timer: Option<TimerId>,
    next_timer: u64,
    ticks_per_story: u32,
    step: f64,
    swipe_threshold: f32,
}

impl PlaybackEngine {
    pub fn new(settings: &Settings) -> Self {
        Self {
            viewer: Viewer::Closed,
            timer: None,
            next_timer: 0,
            ticks_per_story: settings.ticks_per_story(),
            step: settings.progress_step(),
            swipe_threshold: settings.swipe_threshold,
        }
    }

    #[cfg(test)]
    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn is_open(&self) -> bool {
        matches!(self.viewer, Viewer::Open(_))
    }

    /// Index of the story on screen
    pub fn current(&self) -> Option<usize> {
        match &self.viewer {
            Viewer::Open(session) => Some(session.index),
            Viewer::Closed => None,
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(&self.viewer, Viewer::Open(session) if session.paused)
    }

    /// The running timer, if any. At most one exists at a time.
    pub fn active_timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Progress percentage (0..=100) for `index`
    #[cfg(test)]
    pub fn progress_at(&self, index: usize) -> f64 {
        match &self.viewer {
            Viewer::Open(session) => session
                .ticks
                .get(index)
                .map(|&ticks| self.percent(ticks))
                .unwrap_or(0.0),
            Viewer::Closed => 0.0,
        }
    }

    /// Progress for every story, parallel to the collection
    pub fn progress(&self) -> Vec<f64> {
        match &self.viewer {
            Viewer::Open(session) => session.ticks.iter().map(|&t| self.percent(t)).collect(),
            Viewer::Closed => Vec::new(),
        }
    }

    /// Open the viewer on `index` with all progress reset.
    /// Returns false if `index` is out of range.
    pub fn open(&mut self, index: usize, len: usize) -> bool {
        if index >= len {
            debug!("Ignoring open of story {} (collection has {})", index, len);
            return false;
        }

        self.viewer = Viewer::Open(Session {
            index,
            ticks: vec![0; len],
            paused: false,
        });
        self.restart_timer();
        true
    }

    /// Move to the next story, closing after the last one.
    /// Returns the new index when still open.
    pub fn next(&mut self) -> Option<usize> {
        let (index, len) = match &self.viewer {
            Viewer::Open(session) => (session.index, session.ticks.len()),
            Viewer::Closed => return None,
        };

        if index + 1 < len {
            self.show(index + 1);
            Some(index + 1)
        } else {
            self.close();
            None
        }
    }

    /// Move to the previous story; no-op on the first one
    pub fn prev(&mut self) -> Option<usize> {
        match &self.viewer {
            Viewer::Open(session) if session.index > 0 => {
                let index = session.index - 1;
                self.show(index);
                Some(index)
            }
            _ => None,
        }
    }

    pub fn close(&mut self) {
        self.cancel_timer();
        self.viewer = Viewer::Closed;
    }

    /// Press or touch start: freeze progress
    pub fn pointer_down(&mut self) {
        if let Viewer::Open(session) = &mut self.viewer {
            session.paused = true;
            self.cancel_timer();
        }
    }

    /// Release or touch end: resume from the frozen progress
    pub fn pointer_up(&mut self) {
        if let Viewer::Open(session) = &mut self.viewer {
            session.paused = false;
            self.restart_timer();
        }
    }

    /// Horizontal drag released. Returns the new index if it navigated
    /// and the viewer is still open.
    pub fn drag_end(&mut self, offset_x: f32) -> Option<usize> {
        if offset_x < -self.swipe_threshold {
            self.next()
        } else if offset_x > self.swipe_threshold {
            self.prev()
        } else {
            None
        }
    }

    /// Advance the current story by one tick of `timer`
    pub fn tick(&mut self, timer: TimerId) -> TickOutcome {
        if self.timer != Some(timer) {
            return TickOutcome::Ignored;
        }

        let finished = match &mut self.viewer {
            Viewer::Open(session) => match session.ticks.get_mut(session.index) {
                Some(ticks) => {
                    *ticks = (*ticks + 1).min(self.ticks_per_story);
                    *ticks >= self.ticks_per_story
                }
                None => return TickOutcome::Ignored,
            },
            Viewer::Closed => return TickOutcome::Ignored,
        };

        if !finished {
            return TickOutcome::Progressed;
        }

        match self.next() {
            Some(index) => TickOutcome::Advanced(index),
            None => TickOutcome::Closed,
        }
    }

    /// The story at `removed` left the collection, which now has `new_len`
    /// entries. Returns the index to show if the open story changed.
    pub fn remove(&mut self, removed: usize, new_len: usize) -> Option<usize> {
        self.remove_many(&[removed], new_len)
    }

    /// Several stories left at once. `removed` holds their indices from
    /// before the removal, ascending. The viewer is re-indexed in one step,
    /// so at most one new story is shown and one timer started.
    pub fn remove_many(&mut self, removed: &[usize], new_len: usize) -> Option<usize> {
        let session = match &mut self.viewer {
            Viewer::Open(session) => session,
            Viewer::Closed => return None,
        };

        let current = session.index;
        let mut ticks: Vec<u32> = session
            .ticks
            .iter()
            .enumerate()
            .filter(|(idx, _)| !removed.contains(idx))
            .map(|(_, &ticks)| ticks)
            .collect();
        ticks.resize(new_len, 0);
        session.ticks = ticks;

        if new_len == 0 {
            self.close();
            return None;
        }

        let shift = removed.iter().filter(|&&idx| idx < current).count();
        if removed.contains(&current) {
            let index = (current - shift).min(new_len - 1);
            self.show(index);
            Some(index)
        } else {
            session.index = current - shift;
            None
        }
    }

    /// Switch to `index` with fresh progress and a fresh timer
    fn show(&mut self, index: usize) {
        if let Viewer::Open(session) = &mut self.viewer {
            session.index = index;
            session.paused = false;
            if let Some(ticks) = session.ticks.get_mut(index) {
                *ticks = 0;
            }
        }
        self.restart_timer();
    }

    fn restart_timer(&mut self) {
        self.cancel_timer();
        self.next_timer += 1;
        self.timer = Some(TimerId(self.next_timer));
    }

    fn cancel_timer(&mut self) {
        self.timer = None;
    }

    fn percent(&self, ticks: u32) -> f64 {
        if ticks >= self.ticks_per_story {
            100.0
        } else {
            (f64::from(ticks) * self.step).min(100.0)
        }
    }
}
