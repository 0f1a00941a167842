//! Little Story - backend for the Little Story visual novel app
//!
//! Serves authored story content, meters episode starts with a regenerating
//! hearts resource, and keeps per-story player progress.
//!
//! ## Data Layout
//!
//! ```text
//! data/
//! ├── user.json          # hearts, max_hearts, last_regen_time
//! ├── progress.json      # { story_id: { flag: value, ... } }
//! └── stories/
//!     └── <folder>/
//!         ├── manifest.json
//!         └── episodes/*.json
//! ```
//!
//! All state belongs to a single player. Stores read and rewrite whole JSON
//! files on every call; there is no locking between concurrent requests, so
//! two saves racing on the same file can lose one of the updates.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod library;
pub mod profile;
pub mod progress;
pub mod session;

// Re-exports
pub use api::create_router;
pub use clock::{Clock, SystemClock};
#[doc(hidden)]
pub use clock::ManualClock;
pub use config::Config;
pub use error::StoryError;
pub use library::{EpisodeData, LibraryEntry, LibraryScan, StoryManifest, StoryRepository};
pub use profile::{ProfileStatus, ProfileStore, UserProfile};
pub use progress::{merge_shallow, ProgressStore, StateMap};
pub use session::EpisodeSessionService;
