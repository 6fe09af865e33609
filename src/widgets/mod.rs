mod vertex_handle;

pub use vertex_handle::VertexHandle;
