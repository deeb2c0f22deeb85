//! Flashcard generation service - library exports for testing

pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;
