#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]

#[macro_use]
pub mod logging;

pub mod api;
pub mod components;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod summary;

pub use components::app::App;
pub use error::GeometryError;
