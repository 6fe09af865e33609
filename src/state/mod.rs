mod polygon_state;

pub use polygon_state::PolygonState;
