use crate::context::Context;
use crate::element::{ComponentElement, Element, Instance};
use crate::error::{TrellisResult, handle_error};
use crate::reactivity::{NodeId, create_scope, dispose, effect, untrack};
use std::cell::RefCell;
use std::rc::Rc;

/// The fully rendered result of a mounted element tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Empty,
    Text(String),
}

/// Handle to a mounted tree: the live output plus the reactive scope that
/// owns every effect created during the mount.
pub struct Mounted {
    output: Rc<RefCell<Output>>,
    scope: NodeId,
}

impl Mounted {
    pub fn output(&self) -> Output {
        self.output.borrow().clone()
    }

    /// Tears the tree down; reactive re-renders stop.
    pub fn dispose(self) {
        dispose(self.scope);
    }
}

/// Mounts an element under the given ambient context.
///
/// Plain components render exactly once, untracked. Components marked
/// reactive render inside an effect and re-render when observables they
/// read change. Errors reached during the initial mount abort it and are
/// returned; errors inside later reactive re-renders go through
/// [`handle_error`] instead, since no caller is on the stack.
pub fn mount(element: &Element, ctx: &Context) -> TrellisResult<Mounted> {
    let output = Rc::new(RefCell::new(Output::Empty));
    let slot = output.clone();
    let element = element.clone();
    let ctx = ctx.clone();

    let mut result = Ok(());
    let scope = create_scope(|| {
        result = mount_element(&element, &ctx, &slot);
    });

    match result {
        Ok(()) => Ok(Mounted { output, scope }),
        Err(err) => {
            dispose(scope);
            Err(err)
        }
    }
}

fn mount_element(
    element: &Element,
    ctx: &Context,
    output: &Rc<RefCell<Output>>,
) -> TrellisResult<()> {
    match element {
        Element::Empty => {
            *output.borrow_mut() = Output::Empty;
            Ok(())
        }
        Element::Text(text) => {
            *output.borrow_mut() = Output::Text(text.clone());
            Ok(())
        }
        Element::Component(ce) => mount_component(ce, ctx, output),
    }
}

fn mount_component(
    ce: &ComponentElement,
    ctx: &Context,
    output: &Rc<RefCell<Output>>,
) -> TrellisResult<()> {
    if ce.component.reactive() {
        let ce = ce.clone();
        let ctx = ctx.clone();
        let output = output.clone();
        effect(move || {
            if let Err(err) = render_pass(&ce, &ctx, &output, true) {
                handle_error(err);
            }
        });
        Ok(())
    } else {
        render_pass(ce, ctx, output, false)
    }
}

/// One render cycle: render (tracked or not), forward the instance, thread
/// the child context, recurse into the produced element.
fn render_pass(
    ce: &ComponentElement,
    ctx: &Context,
    output: &Rc<RefCell<Output>>,
    tracked: bool,
) -> TrellisResult<()> {
    let rendered = if tracked {
        ce.component.render(&ce.props, ctx)?
    } else {
        untrack(|| ce.component.render(&ce.props, ctx))?
    };

    if let Some(slot) = &ce.instance_ref {
        slot.load(Instance {
            component: ce.component.clone(),
            props: ce.props.clone(),
        });
    }

    match ce.component.child_context(&ce.props, ctx) {
        Some(child_ctx) => mount_element(&rendered, &child_ctx, output),
        None => mount_element(&rendered, ctx, output),
    }
}
