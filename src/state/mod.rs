/// State management module
///
/// This module handles all application state, including:
/// - Local key-value storage (storage.rs)
/// - Shared data structures and the persisted archive (data.rs)
/// - The authoritative story collection (store.rs)
/// - TTL expiry sweeps (expiry.rs)
/// - The viewer playback state machine (playback.rs)
/// - The component root tying them together (reel.rs)

pub mod storage;
pub mod data;
pub mod store;
pub mod expiry;
pub mod playback;
pub mod reel;
