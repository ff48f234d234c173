//! Smart garden monitor: polls environment and soil sensors, drives the grow
//! light and the water pump from threshold rules, and appends every reading
//! to a local SQLite database.

pub mod actuators;
pub mod db;
pub mod error;
pub mod garden;
pub mod observe;
pub mod sampling;
pub mod sensors;

pub use error::{Error, Result};
