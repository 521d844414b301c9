pub mod camera;
pub mod context;
pub mod mesh;
pub mod shader;
pub mod style;

pub use camera::OrbitCamera;
pub use context::RenderContext;
pub use mesh::GlIndex;
