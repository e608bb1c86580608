//! Boarding pass terminal user interface
//!
//! A single form screen driving the [`FormController`](crate::controller::FormController).

pub mod app;
pub mod components;
pub mod ui;

pub use app::{App, Focus};
