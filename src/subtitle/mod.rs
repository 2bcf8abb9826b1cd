//! Caption file handling
//!
//! This module turns the files yt-dlp writes into plain text:
//! - Locating the caption file a request produced
//! - Cleaning WebVTT cues into continuous transcript text

pub mod cleaner;
pub mod locator;

pub use cleaner::clean;
pub use locator::find_caption_file;
