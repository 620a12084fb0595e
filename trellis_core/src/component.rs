use crate::context::{Context, ContextCapabilities};
use crate::element::{Element, Instance};
use crate::error::TrellisResult;
use crate::log::console_warn;
use crate::props::{PropValue, Props};
use indexmap::IndexMap;
use std::rc::Rc;

/// Static metadata attached to a component family rather than to an
/// instance: version markers, form bindings, anything a framework wants to
/// read off the component without rendering it.
pub type Statics = IndexMap<String, PropValue>;

/// A renderable unit in the tree.
///
/// Everything beyond [`render`](Component::render) has a default: plain
/// components ignore context, carry no statics, and render exactly once
/// per mount.
pub trait Component {
    fn display_name(&self) -> &str;

    /// Produces this component's output for one render cycle.
    fn render(&self, props: &Props, ctx: &Context) -> TrellisResult<Element>;

    fn statics(&self) -> Option<&Statics> {
        None
    }

    /// The ambient context keys this component reads.
    fn context_capabilities(&self) -> Option<&'static ContextCapabilities> {
        None
    }

    /// The context this component's descendants should see, or `None` to
    /// pass the incoming context through unchanged.
    fn child_context(&self, props: &Props, ctx: &Context) -> Option<Context> {
        let _ = (props, ctx);
        None
    }

    /// Whether the host should re-render this component when observables
    /// read during its render change.
    fn reactive(&self) -> bool {
        false
    }

    fn is_injector(&self) -> bool {
        false
    }

    /// The component this one wraps, for wrapper components; `None` for
    /// ordinary components.
    fn wrapped_component(&self) -> Option<&Rc<dyn Component>> {
        None
    }

    /// The wrapped component's most recently rendered instance; `None` for
    /// ordinary components or before the first render.
    fn wrapped_instance(&self) -> Option<Rc<Instance>> {
        None
    }
}

/// A class-style component assembled from a render function plus optional
/// metadata.
pub struct ComponentClass {
    name: String,
    render: Rc<dyn Fn(&Props, &Context) -> TrellisResult<Element>>,
    statics: Statics,
    capabilities: Option<&'static ContextCapabilities>,
}

impl ComponentClass {
    pub fn new<F>(name: impl Into<String>, render: F) -> Self
    where
        F: Fn(&Props, &Context) -> TrellisResult<Element> + 'static,
    {
        Self {
            name: name.into(),
            render: Rc::new(render),
            statics: Statics::new(),
            capabilities: None,
        }
    }

    pub fn with_static(mut self, name: impl Into<String>, value: PropValue) -> Self {
        self.statics.insert(name.into(), value);
        self
    }

    pub fn with_capabilities(mut self, capabilities: &'static ContextCapabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    pub fn into_component(self) -> Rc<dyn Component> {
        Rc::new(self)
    }
}

impl Component for ComponentClass {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn render(&self, props: &Props, ctx: &Context) -> TrellisResult<Element> {
        (self.render)(props, ctx)
    }

    fn statics(&self) -> Option<&Statics> {
        Some(&self.statics)
    }

    fn context_capabilities(&self) -> Option<&'static ContextCapabilities> {
        self.capabilities
    }
}

/// Copies static metadata from `source`, skipping names in `reserved`.
/// Wrapper components call this so the wrapped component's metadata stays
/// visible through the wrapper, while the wrapper keeps ownership of its
/// own fields.
pub fn hoist_statics(source: &dyn Component, reserved: &[&str]) -> Statics {
    let mut hoisted = Statics::new();
    if let Some(statics) = source.statics() {
        for (name, value) in statics {
            if reserved.contains(&name.as_str()) {
                continue;
            }
            hoisted.insert(name.clone(), value.clone());
        }
    }
    hoisted
}

/// Marks a component as reactive; everything else is delegated.
pub struct Reactive {
    inner: Rc<dyn Component>,
}

impl Reactive {
    /// Wraps without diagnostics. Wrapper-producing APIs that wrap on the
    /// caller's behalf use this path; external callers go through
    /// [`make_reactive`].
    pub fn wrap(inner: Rc<dyn Component>) -> Rc<dyn Component> {
        Rc::new(Reactive { inner })
    }
}

/// Makes a component re-render when observables read during its render
/// change.
///
/// Applying this to a store injector is almost always a mistake: the
/// injector's own render only resolves stores. A warning is logged and the
/// component is wrapped anyway.
pub fn make_reactive(component: Rc<dyn Component>) -> Rc<dyn Component> {
    if component.is_injector() {
        console_warn(&format!(
            "make_reactive: `{}` is an injector. Make the wrapped component reactive instead; it is accessible through `wrapped_component()`.",
            component.display_name()
        ));
    }
    Reactive::wrap(component)
}

impl Component for Reactive {
    fn display_name(&self) -> &str {
        self.inner.display_name()
    }

    fn render(&self, props: &Props, ctx: &Context) -> TrellisResult<Element> {
        self.inner.render(props, ctx)
    }

    fn statics(&self) -> Option<&Statics> {
        self.inner.statics()
    }

    fn context_capabilities(&self) -> Option<&'static ContextCapabilities> {
        self.inner.context_capabilities()
    }

    fn child_context(&self, props: &Props, ctx: &Context) -> Option<Context> {
        self.inner.child_context(props, ctx)
    }

    fn reactive(&self) -> bool {
        true
    }

    fn is_injector(&self) -> bool {
        self.inner.is_injector()
    }

    fn wrapped_component(&self) -> Option<&Rc<dyn Component>> {
        self.inner.wrapped_component()
    }

    fn wrapped_instance(&self) -> Option<Rc<Instance>> {
        self.inner.wrapped_instance()
    }
}
