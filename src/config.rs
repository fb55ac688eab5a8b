/// Fixed settings for the story reel
///
/// Every timing and size constant lives here so the core can be driven
/// with shorter windows in tests.

use std::path::PathBuf;
use std::time::Duration;

/// Stories expire 24 hours after creation
pub const STORY_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Environment variable that overrides the database location
pub const DB_PATH_ENV: &str = "STORY_REEL_DB";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Time-to-live of a story in milliseconds
    pub ttl_ms: i64,
    /// How often expired stories are swept
    pub sweep_interval: Duration,
    /// Playback progress tick
    pub tick: Duration,
    /// Total display time of one story
    pub story_duration: Duration,
    /// Upload bounding box (scale down only)
    pub max_width: u32,
    pub max_height: u32,
    /// Lossy re-encode quality in 0.0..=1.0
    pub quality: f32,
    /// Horizontal drag distance that must be exceeded to navigate
    pub swipe_threshold: f32,
    /// Key holding the serialized collection
    pub storage_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ttl_ms: STORY_TTL_MS,
            sweep_interval: Duration::from_secs(60),
            tick: Duration::from_millis(50),
            story_duration: Duration::from_millis(3000),
            max_width: 1080,
            max_height: 1920,
            quality: 0.7,
            swipe_threshold: 100.0,
            storage_key: "stories".to_string(),
        }
    }
}

impl Settings {
    /// Number of ticks needed to play one story to the end
    pub fn ticks_per_story(&self) -> u32 {
        let tick = self.tick.as_millis().max(1);
        let ticks = self.story_duration.as_millis().div_ceil(tick);
        ticks.clamp(1, u32::MAX as u128) as u32
    }

    /// Progress percentage gained per tick
    pub fn progress_step(&self) -> f64 {
        100.0 / f64::from(self.ticks_per_story())
    }

    /// Get the path where the story database should be stored
    ///
    /// `STORY_REEL_DB` wins when set; otherwise the user's data directory:
    /// - Linux: ~/.local/share/story-reel/story_reel.db
    /// - macOS: ~/Library/Application Support/story-reel/story_reel.db
    /// - Windows: %APPDATA%\story-reel\story_reel.db
    pub fn db_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(DB_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        let mut path = dirs::data_dir().or_else(dirs::home_dir)?;
        path.push("story-reel");
        path.push("story_reel.db");
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_is_sixty_ticks() {
        let settings = Settings::default();
        assert_eq!(settings.ticks_per_story(), 60);
        assert!((settings.progress_step() - 100.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_ttl_is_one_day() {
        assert_eq!(Settings::default().ttl_ms, 86_400_000);
    }

    #[test]
    fn test_zero_duration_still_takes_a_tick() {
        let settings = Settings {
            story_duration: Duration::ZERO,
            ..Settings::default()
        };
        assert_eq!(settings.ticks_per_story(), 1);
    }
}
