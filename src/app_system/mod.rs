//! System composition: store scoping, app wiring, and tracing setup.

pub mod app;
pub mod scope;
pub mod tracing;

pub use self::app::*;
pub use self::scope::*;
pub use self::tracing::*;
