//! Authentication: token persistence and session lifecycle

pub mod session;
pub mod store;

pub use session::{AuthSession, SessionEvent, SessionStatus};
pub use store::{FileBackend, MemoryBackend, TokenStore};
