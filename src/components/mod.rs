#![allow(clippy::needless_pass_by_value)]

pub mod app;
pub mod orbit_controls;
pub mod status_panel;
pub mod viewer;
