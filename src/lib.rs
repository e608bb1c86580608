//! Boarding pass request form: validation, submission state machine and terminal UI.

pub mod cli;
pub mod config;
pub mod controller;
pub mod errors;
pub mod models;
pub mod service;
pub mod tui;
