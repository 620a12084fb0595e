//! The trellis component model.
//!
//! This crate supplies the host-side contracts the injection layer builds
//! on: class-style components with render methods and static metadata, an
//! ambient context threaded from ancestors to descendants, an
//! element-instantiation primitive, and a mount loop that re-renders
//! reactive components when observables they read change.

pub mod component;
pub mod context;
pub mod element;
pub mod error;
pub mod log;
pub mod props;
pub mod reactivity;
pub mod render;

pub use component::{Component, ComponentClass, Reactive, Statics, hoist_statics, make_reactive};
pub use context::{Context, ContextCapabilities, Stores};
pub use element::{ComponentElement, Element, Instance, InstanceRef};
pub use error::{TrellisError, TrellisResult, handle_error};
pub use props::{PropValue, Props, prop};
pub use render::{Mounted, Output, mount};

pub mod prelude {
    pub use crate::component::{Component, ComponentClass, make_reactive};
    pub use crate::context::{Context, ContextCapabilities, Stores};
    pub use crate::element::{Element, InstanceRef};
    pub use crate::props::{PropValue, Props, prop};
    pub use crate::reactivity::{Observable, create_scope, dispose, effect, on_cleanup, untrack};
    pub use crate::render::{Mounted, Output, mount};
    pub use crate::{TrellisError, TrellisResult};
}
