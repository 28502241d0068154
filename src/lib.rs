//! Core of the end-of-day logger: the entry store, the summary renderer and
//! the editing/displaying session, plus the terminal front end built on them.

pub mod app;
pub mod catalog;
pub mod clipboard;
pub mod clock;
pub mod config;
pub mod engine;
pub mod event;
pub mod logging;
pub mod session;
pub mod ui;
