//! LSP Protocol Implementation
//!
//! Thin protocol layer over the validation engine.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod server;

pub use backend::Backend;
