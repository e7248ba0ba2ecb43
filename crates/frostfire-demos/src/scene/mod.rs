//! Scene description shared by the three demos: objects, lights, props and
//! the forward renderer that draws them.

mod lights;
mod object;
mod renderer;
pub mod shapes;

pub use lights::{Light, LightKind, LightsUniform, MAX_LIGHTS};
pub use object::{Material, ObjectId, ObjectUniform, Pattern, SceneObject, SceneRegistry};
pub use renderer::{SceneParams, SceneRenderer, SceneView, Shading};
