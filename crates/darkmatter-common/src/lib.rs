//! darkmatter-common — Shared types, errors, and the sandboxed HTTP client used across all Dark Matter crates.

pub mod error;
pub mod notice;
pub mod sandbox;
pub mod session;

// Re-export commonly used types
pub use error::{DarkMatterError, Result};
pub use notice::{Notice, NoticeLevel};
pub use sandbox::SandboxClient;
pub use session::SessionState;
