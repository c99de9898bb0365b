//! WebGPU rendering module
//!
//! GPU context, the Phong scene pipeline, mesh upload, and the figure
//! renderer that draws the scene graph.

pub mod context;
pub mod figure;
pub mod mesh;
pub mod pipeline;

pub use context::GpuContext;
pub use figure::FigureRenderer;
pub use mesh::{Mesh, Vertex};
pub use pipeline::{ScenePipeline, Uniforms};
