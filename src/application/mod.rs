//! Application layer: tree descriptions, rendering and playback
//!
//! This layer connects the domain to files and terminals.

pub mod description;
pub mod error;
pub mod error_ext;
pub mod playback;
pub mod render;

pub use description::{EdgeSpec, TreeDescription};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use playback::Player;
