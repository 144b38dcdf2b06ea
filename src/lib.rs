//! A library to save and restore multi-monitor layouts through `kscreen-doctor`.
//!
//! [`Profile::extract`] turns the live output inventory into a portable profile,
//! [`plan`] turns a profile and a fresh inventory back into the directives that
//! [`DisplayTool::apply`] hands to the tool.

mod directive;
mod display;
mod profile;
mod types;

pub use directive::*;
pub use display::*;
pub use profile::*;
pub use types::*;
