pub mod data;

pub use data::{fetch_infrastructure, fetch_timetable};
