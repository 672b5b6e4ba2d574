//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Announcement, event, program, publication and gallery commands
pub mod content;

/// General utility commands
pub mod general;

/// Giving and receipt export commands
pub mod giving;

/// Content management commands
pub mod manage;

// Export commands
pub use content::*;
pub use general::*;
pub use giving::*;
pub use manage::*;
