//! Force-directed layout and interaction engine for repository dependency
//! graphs, with an egui front-end.

pub mod app;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod layout;
pub mod util;
