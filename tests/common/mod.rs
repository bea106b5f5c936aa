mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from textcrops for tests
pub use textcrops::{BoundingRect, Point, Region, RegionAnnotations, RegionList};
