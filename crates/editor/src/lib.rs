// Library crate: the renderer-independent editor core. Everything here is
// exercised headlessly by the integration tests through the harness; the
// binary adds only logging setup and scene-file plumbing.

pub mod assets;
pub mod camera;
pub mod codec;
pub mod fixtures;
pub mod harness;
pub mod mesh;
pub mod picking;
pub mod state;
pub mod topology;
