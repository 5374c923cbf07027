pub mod id;
pub mod ops;
pub mod types;

pub use id::{generate_id, now_iso, today_iso};
pub use ops::{DanglingLink, NodeKind, StoryRef, MAX_STORIES_PER_CARD};
pub use types::*;
