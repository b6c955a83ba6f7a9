//! Core engine for todotxt: the task line codec, the task list store, filtering and
//! command dispatch.

pub mod action;
pub mod commands;
pub mod config;
pub mod error;
pub mod line;
pub mod query;
pub mod store;

pub use error::TodoError;
