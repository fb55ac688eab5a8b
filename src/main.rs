use iced::keyboard::{self, key, Key};
use iced::widget::{column, container, opaque, stack, text, Column};
use iced::{time, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use tracing::{info, warn};

mod config;
mod error;
mod media;
mod state;
mod ui;

use config::Settings;
use media::ingest::{self, EncodedImage};
use state::playback::TimerId;
use state::reel::Reel;
use state::storage::{LocalStorage, Storage};

/// Main application state
struct StoryApp {
    /// Stories, viewer and expiry
    reel: Reel,
    /// Decoded images for the strip and the viewer
    images: ui::ImageCache,
    settings: Settings,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked the "+" button
    Upload,
    /// Background ingestion finished
    Ingested(Result<EncodedImage, String>),
    /// Thumbnail at this index was clicked
    Select(usize),
    /// Delete button of the story with this id was clicked
    Delete(String),
    Next,
    Prev,
    Close,
    /// Press or touch start on the story image
    PointerDown,
    /// Release or touch end, with the horizontal drag distance
    PointerUp { offset_x: f32 },
    /// Progress tick from the playback timer
    Tick(TimerId),
    /// Expiry sweeper tick
    Sweep,
}

impl StoryApp {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::default();
        let reel = Reel::load(open_storage(), &settings, now_ms());

        let mut images = ui::ImageCache::default();
        images.sync(reel.stories());

        let status = format!("{} active stories.", reel.stories().len());

        (
            StoryApp {
                reel,
                images,
                settings,
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Upload => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Add a story")
                    .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
                    .pick_file();

                if let Some(path) = file {
                    self.status = format!("Processing {}...", path.display());
                    return Task::perform(
                        ingest::ingest_file(path, self.settings.clone()),
                        |result| Message::Ingested(result.map_err(|e| e.to_string())),
                    );
                }
            }
            Message::Ingested(Ok(image)) => {
                let story = self.reel.add_image(image, now_ms());
                self.images.sync(self.reel.stories());
                self.status = format!("Story {} added.", story.id);
            }
            Message::Ingested(Err(e)) => {
                warn!("❌ Upload failed: {}", e);
                self.status = format!("Upload failed: {}", e);
            }
            Message::Select(index) => self.reel.select(index),
            Message::Delete(id) => {
                self.reel.delete(&id);
                self.images.sync(self.reel.stories());
            }
            Message::Next => self.reel.next(),
            Message::Prev => self.reel.prev(),
            Message::Close => self.reel.close(),
            Message::PointerDown => self.reel.pointer_down(),
            Message::PointerUp { offset_x } => self.reel.release(offset_x),
            Message::Tick(timer) => {
                self.reel.tick(timer);
            }
            Message::Sweep => {
                self.reel.sweep(now_ms());
                self.images.sync(self.reel.stories());
            }
        }

        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let notice = match self.reel.persist_error() {
            Some(e) => format!("{}  (changes not saved: {})", self.status, e),
            None if self.reel.is_empty() => format!("{}  Tap + to add a story.", self.status),
            None => self.status.clone(),
        };

        let content: Column<Message> = column![
            text("Stories").size(32),
            ui::strip::view(self.reel.stories(), &self.images),
            text(notice).size(14),
        ]
        .spacing(12)
        .padding(24);

        let page = container(content).width(Length::Fill).height(Length::Fill);

        match self.reel.current() {
            Some(story) => stack![
                page,
                opaque(ui::viewer::view(
                    story,
                    self.reel.progress(),
                    self.reel.is_paused(),
                    &self.images,
                )),
            ]
            .into(),
            None => page.into(),
        }
    }

    /// Timers: the expiry sweeper always, the progress tick while playing
    fn subscription(&self) -> Subscription<Message> {
        let sweeper = time::every(self.reel.sweep_interval()).map(|_| Message::Sweep);

        // Arrow keys and Esc only drive an open viewer
        let keys = if self.reel.is_open() {
            keyboard::on_key_press(handle_key)
        } else {
            Subscription::none()
        };

        // Keyed by timer id, so a new id replaces the previous interval
        let playback = match self.reel.active_timer() {
            Some(timer) => time::every(self.settings.tick)
                .with(timer)
                .map(|(timer, _)| Message::Tick(timer)),
            None => Subscription::none(),
        };

        Subscription::batch([sweeper, keys, playback])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn handle_key(key: Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key {
        Key::Named(key::Named::ArrowRight) => Some(Message::Next),
        Key::Named(key::Named::ArrowLeft) => Some(Message::Prev),
        Key::Named(key::Named::Escape) => Some(Message::Close),
        _ => None,
    }
}

/// Open the story database, falling back to memory when the disk is unavailable
fn open_storage() -> Box<dyn Storage> {
    let opened = Settings::db_path()
        .ok_or_else(|| "no data directory".to_string())
        .and_then(|path| LocalStorage::open(&path).map_err(|e| e.to_string()));

    match opened {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            warn!("⚠️  Stories will not survive a restart: {}", e);
            Box::new(
                LocalStorage::open_in_memory()
                    .expect("Failed to open in-memory story storage"),
            )
        }
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "story_reel=info".into()),
        )
        .init();

    info!("🎞️  Starting Story Reel");

    iced::application("Story Reel", StoryApp::update, StoryApp::view)
        .subscription(StoryApp::subscription)
        .theme(StoryApp::theme)
        .centered()
        .run_with(StoryApp::new)
}
