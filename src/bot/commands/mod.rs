//! Discord command implementations organized by category.

/// Developer-only diagnostic commands
pub mod dev;

/// General utility commands
pub mod general;

/// Statistics chart commands
pub mod statistics;

/// Status update and lookup commands
pub mod tracking;

// Export commands
pub use dev::*;
pub use general::*;
pub use statistics::*;
pub use tracking::*;
