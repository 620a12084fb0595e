use crate::component::Component;
use crate::props::Props;
use std::cell::RefCell;
use std::rc::Rc;

/// What a render produces: nothing, a text leaf, or an instruction to
/// instantiate another component.
#[derive(Clone)]
pub enum Element {
    Empty,
    Text(String),
    Component(ComponentElement),
}

/// A pending component instantiation.
#[derive(Clone)]
pub struct ComponentElement {
    pub component: Rc<dyn Component>,
    pub props: Props,
    pub instance_ref: Option<InstanceRef>,
}

impl Element {
    pub fn text(text: impl Into<String>) -> Element {
        Element::Text(text.into())
    }

    /// The host's component-instantiation primitive.
    pub fn component(component: Rc<dyn Component>, props: Props) -> Element {
        Element::Component(ComponentElement {
            component,
            props,
            instance_ref: None,
        })
    }

    /// Attaches a forwarding slot that receives the rendered instance.
    /// No effect on non-component elements.
    pub fn with_instance_ref(mut self, slot: InstanceRef) -> Element {
        if let Element::Component(ce) = &mut self {
            ce.instance_ref = Some(slot);
        }
        self
    }

    pub fn as_component(&self) -> Option<&ComponentElement> {
        match self {
            Element::Component(ce) => Some(ce),
            _ => None,
        }
    }
}

/// A rendered component instance: the component plus the final properties
/// it was instantiated with.
pub struct Instance {
    pub component: Rc<dyn Component>,
    pub props: Props,
}

/// Forwarding slot recording the most recently rendered instance of an
/// element. Attach to an element before mounting, read after.
#[derive(Clone, Default)]
pub struct InstanceRef(Rc<RefCell<Option<Rc<Instance>>>>);

impl InstanceRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last rendered instance, or `None` before the first render.
    pub fn get(&self) -> Option<Rc<Instance>> {
        self.0.borrow().clone()
    }

    /// Loads the rendered instance. Called by the host during mount.
    pub fn load(&self, instance: Instance) {
        *self.0.borrow_mut() = Some(Rc::new(instance));
    }
}
