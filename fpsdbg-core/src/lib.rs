/// fpsdbg Core Library - geometry and camera math for the demo window
///
/// This library is independent of any windowing or GPU backend: flat-normal
/// computation, the camera transform pipeline, the drawable-object world and
/// STL import.

pub mod camera;
pub mod geometry;
pub mod stl;
pub mod transform;
pub mod world;

// Re-export commonly used types
pub use camera::{aspect_for, Camera};
pub use geometry::{flat_normals, Mesh, Triangle};
pub use stl::MeshError;
pub use transform::Transform;
pub use world::{DrawObject, Topology, World};
