//! `presentdeck` - Local presentation and asset bundle manager
//!
//! This library keeps presentation metadata and each presentation's asset
//! bundle (three logos and a video) in a local `SQLite` store, and keeps the
//! two collections consistent with each other.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod model;
pub mod payload;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use manager::{Playback, PresentationManager, ReconcileReport};
pub use model::{AssetBundle, AssetRecord, PresentationRecord, LOGO_SLOTS};
pub use payload::Payload;
pub use storage::{Records, Store};
