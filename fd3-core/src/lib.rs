/// FD3 Core Library - the free distributive lattice on three generators
///
/// Builds the lattice's order and Hasse layout, the exact 3D wire-frame
/// embedding and its tessellated solid, and reads and writes STL. Viewing
/// lives in `fd3-terminal`; everything here is stateless.

pub mod config;
pub mod error;
pub mod exact;
pub mod geometry;
pub mod hasse;
pub mod lattice;
pub mod projection;
pub mod stl;
pub mod transform;
pub mod wireframe;

// Re-export commonly used types
pub use config::{Config, ExportConfig, ModelConfig, StartView, StlFormat, ViewerConfig};
pub use error::{Fd3Error, Result};
pub use exact::{ExactPoint, Surd};
pub use geometry::{Mesh, Triangle, Vertex};
pub use hasse::HasseLayout;
pub use lattice::{Element, Poset, COVERS, ELEMENT_COUNT, MAX_ELEMENTS};
pub use projection::{Camera, ProjectionMode};
pub use transform::{RotationState, Transform};
pub use wireframe::WireframeModel;
