/// Media handling module
///
/// This module handles:
/// - Decoding uploaded images
/// - Bounding their resolution
/// - Re-encoding them into self-contained JPEG data URLs

pub mod ingest;
