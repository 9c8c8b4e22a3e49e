pub mod path;
pub mod vertex_cache;

pub use path::{Path, Subpath};
pub use vertex_cache::{CachedVertex, VertexCache};
