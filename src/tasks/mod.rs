//! Task module - in-memory task records for the JSON API

pub mod registry;

pub use registry::{Task, TaskRegistry};
