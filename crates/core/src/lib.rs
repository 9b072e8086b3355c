//! Core types, session state, and errors for the resume engine.

pub mod error;
pub mod format;
pub mod guide;
pub mod limits;
pub mod resume;
pub mod session;

pub use error::{Error, Result};
pub use guide::*;
pub use resume::*;
pub use session::*;
