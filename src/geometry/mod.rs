pub mod hit_testing;
pub mod polygon;
pub mod rect;

pub use hit_testing::{clamp_to_surface, hit_test_handles, HANDLE_RADIUS};
pub use polygon::{Polygon, RoiPoint, Vertex, VertexId};
pub use rect::RectRoi;
