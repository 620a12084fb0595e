//! Ambient store injection for component trees.
//!
//! An ancestor publishes a name-to-store mapping through a
//! [`StoreProvider`]; any descendant wraps itself with [`inject`] and
//! receives the stores it names as ordinary input properties, no matter
//! how many layers sit in between.
//!
//! ```
//! use std::rc::Rc;
//! use trellis::prelude::*;
//!
//! let profile: Rc<dyn Component> = Rc::new(ComponentClass::new("Profile", |props, _ctx| {
//!     let name = props.get_as::<String>("session").cloned().unwrap_or_default();
//!     Ok(Element::text(name))
//! }));
//!
//! let profile = inject("session")(profile);
//!
//! let stores = Stores::new().with("session", prop(String::from("ada")));
//! let app = StoreProvider::new(stores)
//!     .child(Element::component(profile, Props::new()))
//!     .into_element();
//!
//! let mounted = mount(&app, &Context::new()).unwrap();
//! assert_eq!(mounted.output(), Output::Text("ada".into()));
//! ```

pub mod inject;
pub mod provider;

pub use inject::resolve::{IntoResolver, Resolver, StoreMapFn};
pub use inject::{INJECTOR_CAPABILITIES, Injector, create_injector, inject};
pub use provider::StoreProvider;

pub use trellis_core::component::{
    Component, ComponentClass, Reactive, Statics, hoist_statics, make_reactive,
};
pub use trellis_core::context::{Context, ContextCapabilities, Stores};
pub use trellis_core::element::{ComponentElement, Element, Instance, InstanceRef};
pub use trellis_core::error::{TrellisError, TrellisResult, handle_error};
pub use trellis_core::props::{PropValue, Props, prop};
pub use trellis_core::render::{Mounted, Output, mount};

pub mod prelude {
    pub use crate::inject::{Injector, create_injector, inject};
    pub use crate::inject::resolve::{IntoResolver, Resolver};
    pub use crate::provider::StoreProvider;
    pub use trellis_core::prelude::*;
}
