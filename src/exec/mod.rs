// src/exec/mod.rs

//! Minifier collaborators.
//!
//! - [`backend`] defines the `Minifier` trait the monitor core talks to and
//!   the `MinifyOutcome` it gets back. Tests plug in a fake implementation.
//! - [`command`] is the production minifier: it runs an external compressor
//!   through the platform shell and treats any stderr output as failure.
//! - [`tools`] has the PATH lookup and shell quoting helpers used to build
//!   those commands.

pub mod backend;
pub mod command;
pub mod tools;

pub use backend::{Minifier, MinifyOutcome};
pub use command::{CommandMinifier, MinifierCommands};
