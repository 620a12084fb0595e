//! The ancestor side of store injection.

use std::rc::Rc;
use trellis_core::component::Component;
use trellis_core::context::{Context, Stores};
use trellis_core::element::Element;
use trellis_core::error::TrellisResult;
use trellis_core::log::console_warn;
use trellis_core::props::Props;

/// Publishes a named store mapping into the ambient context for every
/// descendant.
///
/// Nested providers merge: descendants see the union of all ancestor
/// mappings, and the nearest provider wins on a name collision. A
/// collision logs a warning, since silently swapping a store out from
/// under a subtree is usually a bug.
pub struct StoreProvider {
    stores: Stores,
    child: Element,
}

impl StoreProvider {
    pub fn new(stores: Stores) -> Self {
        Self {
            stores,
            child: Element::Empty,
        }
    }

    /// Sets the subtree this provider renders.
    pub fn child(mut self, child: Element) -> Self {
        self.child = child;
        self
    }

    /// The provider as a mountable element.
    pub fn into_element(self) -> Element {
        Element::component(Rc::new(self), Props::new())
    }
}

impl Component for StoreProvider {
    fn display_name(&self) -> &str {
        "StoreProvider"
    }

    fn render(&self, _props: &Props, _ctx: &Context) -> TrellisResult<Element> {
        Ok(self.child.clone())
    }

    fn child_context(&self, _props: &Props, ctx: &Context) -> Option<Context> {
        let mut merged = ctx
            .stores()
            .map(|stores| stores.as_ref().clone())
            .unwrap_or_default();
        for (name, store) in self.stores.iter() {
            if merged.contains(name) {
                console_warn(&format!(
                    "StoreProvider: store `{}` is already provided by an ancestor; the nearer provider wins.",
                    name
                ));
            }
            merged.insert(name, store.clone());
        }
        Some(ctx.with_stores(merged))
    }
}
