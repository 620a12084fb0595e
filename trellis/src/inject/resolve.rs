//! Resolver variants: how an injector decides which properties to add.

use std::rc::Rc;
use trellis_core::context::{Context, Stores};
use trellis_core::error::{TrellisError, TrellisResult};
use trellis_core::props::Props;

/// Normalized resolution shape shared by both variants: merge additional
/// properties into `props` in place. The injector passes a container it
/// owns, so merging never touches caller state.
pub(crate) type ResolveFn = Rc<dyn Fn(&Stores, &mut Props, &Context) -> TrellisResult<()>>;

/// A caller-supplied mapping from the ambient stores (plus the incoming
/// properties and the ambient context) to additional properties. `None`
/// means "nothing to add this cycle".
pub type StoreMapFn = Rc<dyn Fn(&Stores, &Props, &Context) -> Option<Props>>;

/// The two resolution strategies [`inject`](crate::inject::inject)
/// accepts.
#[derive(Clone)]
pub enum Resolver {
    /// Pass the named stores through one-to-one. A name the caller already
    /// passed as an explicit property is skipped; a name no ancestor
    /// provides is an error.
    Names(Vec<String>),
    /// Run a caller-supplied mapping function. Its output overwrites
    /// same-named incoming properties.
    Custom(StoreMapFn),
}

impl Resolver {
    pub fn names<I, S>(names: I) -> Resolver
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Resolver::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn custom<F>(map: F) -> Resolver
    where
        F: Fn(&Stores, &Props, &Context) -> Option<Props> + 'static,
    {
        Resolver::Custom(Rc::new(map))
    }

    pub(crate) fn into_resolve_fn(self) -> ResolveFn {
        match self {
            Resolver::Names(names) => Rc::new(move |stores, props, _ctx| {
                for name in &names {
                    // Explicitly passed properties win over ambient stores.
                    if props.contains(name) {
                        continue;
                    }
                    match stores.get(name) {
                        Some(store) => props.insert(name.clone(), store.clone()),
                        None => return Err(TrellisError::MissingStore(name.clone())),
                    }
                }
                Ok(())
            }),
            Resolver::Custom(map) => Rc::new(move |stores, props, ctx| {
                if let Some(additional) = map(stores, props, ctx) {
                    props.merge(additional);
                }
                Ok(())
            }),
        }
    }
}

/// Input shapes accepted by [`inject`](crate::inject::inject): one store
/// name, several store names as a tuple, array, or vector, or a custom
/// mapping function.
pub trait IntoResolver {
    fn into_resolver(self) -> Resolver;
}

impl IntoResolver for Resolver {
    fn into_resolver(self) -> Resolver {
        self
    }
}

impl IntoResolver for &str {
    fn into_resolver(self) -> Resolver {
        Resolver::Names(vec![self.to_string()])
    }
}

impl IntoResolver for String {
    fn into_resolver(self) -> Resolver {
        Resolver::Names(vec![self])
    }
}

impl<const N: usize> IntoResolver for [&str; N] {
    fn into_resolver(self) -> Resolver {
        Resolver::names(self)
    }
}

impl IntoResolver for Vec<String> {
    fn into_resolver(self) -> Resolver {
        Resolver::Names(self)
    }
}

impl IntoResolver for Vec<&str> {
    fn into_resolver(self) -> Resolver {
        Resolver::names(self)
    }
}

impl<F> IntoResolver for F
where
    F: Fn(&Stores, &Props, &Context) -> Option<Props> + 'static,
{
    fn into_resolver(self) -> Resolver {
        Resolver::Custom(Rc::new(self))
    }
}

impl IntoResolver for (&str, &str) {
    fn into_resolver(self) -> Resolver {
        Resolver::names([self.0, self.1])
    }
}

impl IntoResolver for (&str, &str, &str) {
    fn into_resolver(self) -> Resolver {
        Resolver::names([self.0, self.1, self.2])
    }
}

impl IntoResolver for (&str, &str, &str, &str) {
    fn into_resolver(self) -> Resolver {
        Resolver::names([self.0, self.1, self.2, self.3])
    }
}
