mod infrastructure;
mod timetable;

pub use infrastructure::{Infrastructure, Node, Point, Resource, ResourceKind, ResourceType};
pub use timetable::{Operation, Timetable, Train};
