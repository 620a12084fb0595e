//! Store injection: wrap a component so named stores from the ambient
//! mapping arrive as ordinary input properties.

pub mod resolve;

use crate::inject::resolve::{IntoResolver, ResolveFn, Resolver};
use std::rc::Rc;
use trellis_core::component::{Component, Reactive, Statics, hoist_statics};
use trellis_core::context::{Context, ContextCapabilities, Stores};
use trellis_core::element::{Element, Instance, InstanceRef};
use trellis_core::error::TrellisResult;
use trellis_core::log::console_warn;
use trellis_core::props::Props;

/// The one ambient capability every injector declares: read access to the
/// store mapping published by an ancestor provider. Shared by all
/// injectors, so the host can compare declarations by address.
pub static INJECTOR_CAPABILITIES: ContextCapabilities = ContextCapabilities::new(&["stores"]);

/// Metadata names the injector owns; never taken from the wrapped
/// component when hoisting its statics.
const RESERVED_STATICS: &[&str] = &[
    "display_name",
    "wrapped_component",
    "context_capabilities",
    "is_injector",
];

/// A component that resolves stores out of the ambient context and renders
/// its wrapped component with them merged into the properties.
pub struct Injector {
    name: String,
    resolve: ResolveFn,
    wrapped: Rc<dyn Component>,
    wrapped_instance: InstanceRef,
    statics: Statics,
}

/// Builds an injector component around `target`.
///
/// `label`, when present, is appended to the display name as
/// `inject-Target-with-<label>`; the name-shape entry point passes the
/// joined store names. Static metadata on `target` is hoisted onto the
/// injector, minus the names the injector owns.
pub fn create_injector(
    resolver: Resolver,
    target: Rc<dyn Component>,
    label: Option<&str>,
) -> Injector {
    let mut name = format!("inject-{}", target.display_name());
    // An empty label (no store names) leaves the plain `inject-X` name.
    if let Some(label) = label.filter(|l| !l.is_empty()) {
        name.push_str("-with-");
        name.push_str(label);
    }

    let statics = hoist_statics(target.as_ref(), RESERVED_STATICS);

    Injector {
        name,
        resolve: resolver.into_resolve_fn(),
        wrapped: target,
        wrapped_instance: InstanceRef::new(),
        statics,
    }
}

impl Injector {
    /// Rejected with a warning: an injector always declares the shared
    /// store capability. Declare context capabilities on the wrapped
    /// component instead; it is accessible through
    /// [`Component::wrapped_component`].
    pub fn set_context_capabilities(&self, _capabilities: &'static ContextCapabilities) {
        console_warn(&format!(
            "Injector: you are trying to replace `context_capabilities` on `{}`, a component produced by `inject`. Declare context capabilities on the wrapped component instead; it is accessible through `wrapped_component()`.",
            self.name
        ));
    }
}

impl Component for Injector {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn render(&self, props: &Props, ctx: &Context) -> TrellisResult<Element> {
        // A fresh container every cycle; the caller keeps ownership of the
        // incoming properties.
        let mut merged = props.clone();

        let empty;
        let stores = match ctx.stores() {
            Some(stores) => stores.as_ref(),
            None => {
                empty = Stores::new();
                &empty
            }
        };
        (self.resolve)(stores, &mut merged, ctx)?;

        Ok(Element::component(self.wrapped.clone(), merged)
            .with_instance_ref(self.wrapped_instance.clone()))
    }

    fn statics(&self) -> Option<&Statics> {
        Some(&self.statics)
    }

    fn context_capabilities(&self) -> Option<&'static ContextCapabilities> {
        Some(&INJECTOR_CAPABILITIES)
    }

    fn is_injector(&self) -> bool {
        true
    }

    fn wrapped_component(&self) -> Option<&Rc<dyn Component>> {
        Some(&self.wrapped)
    }

    fn wrapped_instance(&self) -> Option<Rc<Instance>> {
        self.wrapped_instance.get()
    }
}

/// Wraps a component so ambient stores arrive as input properties.
///
/// Returns a decorator: apply it to the component to wrap. Two shapes are
/// accepted:
///
/// - store names (`inject("user")`, `inject(("user", "cart"))`): each
///   named store is passed through under its own name, explicit properties
///   win, and a missing store is an error;
/// - a mapping function (`inject(|stores, props, ctx| ...)`): its output
///   is merged over the incoming properties, and the decorated component
///   re-renders when observables the mapping reads change.
///
/// ```ignore
/// let profile = inject("user")(profile);
/// let badge = inject(|stores: &Stores, _: &Props, _: &Context| {
///     let cart = stores.get_as::<CartStore>("cart")?;
///     Some(Props::new().with("count", prop(cart.len())))
/// })(badge);
/// ```
pub fn inject<S: IntoResolver>(input: S) -> impl Fn(Rc<dyn Component>) -> Rc<dyn Component> {
    let resolver = input.into_resolver();
    move |target: Rc<dyn Component>| -> Rc<dyn Component> {
        match &resolver {
            Resolver::Names(names) => {
                let label = names.join("-");
                Rc::new(create_injector(
                    Resolver::Names(names.clone()),
                    target,
                    Some(label.as_str()),
                ))
            }
            Resolver::Custom(map) => {
                let injector = create_injector(Resolver::Custom(map.clone()), target, None);
                // Reads inside the custom mapping must re-render the
                // injector, so it is wrapped through the internal path;
                // `make_reactive` would warn about wrapping an injector,
                // which only concerns external callers.
                Reactive::wrap(Rc::new(injector))
            }
        }
    }
}
