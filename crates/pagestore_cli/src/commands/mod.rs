//! CLI command implementations.

pub mod allocate;
pub mod list;
pub mod page;
pub mod reset;
pub mod status;
