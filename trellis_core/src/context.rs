use crate::props::PropValue;
use indexmap::IndexMap;
use std::rc::Rc;

/// The ambient name-to-store mapping published by an ancestor provider.
#[derive(Clone, Default)]
pub struct Stores {
    entries: IndexMap<String, PropValue>,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, store: PropValue) {
        self.entries.insert(name.into(), store);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, store: PropValue) -> Self {
        self.insert(name, store);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.get(name)
    }

    /// Looks up a store and downcasts it to `T`.
    pub fn get_as<T: 'static>(&self, name: &str) -> Option<&T> {
        self.entries.get(name).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Declares which ambient context keys a component reads, so the host can
/// see a component's context dependencies without rendering it.
///
/// Declarations are `'static`: a component family shares one descriptor,
/// and the host may compare descriptors by address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextCapabilities {
    keys: &'static [&'static str],
}

impl ContextCapabilities {
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &'static [&'static str] {
        self.keys
    }

    pub fn declares(&self, key: &str) -> bool {
        self.keys.iter().any(|k| *k == key)
    }
}

/// Ambient context threaded from ancestors to descendants during a mount.
///
/// The store mapping travels in its own slot; everything else lives in a
/// general key-value area. Contexts are immutable: extending one for a
/// subtree produces a new `Context`, ancestors keep seeing their own.
#[derive(Clone, Default)]
pub struct Context {
    stores: Option<Rc<Stores>>,
    values: IndexMap<String, PropValue>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ambient store mapping, if any ancestor provided one.
    pub fn stores(&self) -> Option<&Rc<Stores>> {
        self.stores.as_ref()
    }

    /// A context identical to this one but carrying `stores`.
    pub fn with_stores(&self, stores: Stores) -> Context {
        Context {
            stores: Some(Rc::new(stores)),
            values: self.values.clone(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.values.get(key)
    }

    /// A context identical to this one but with `key` set.
    pub fn with_value(&self, key: impl Into<String>, value: PropValue) -> Context {
        let mut next = self.clone();
        next.values.insert(key.into(), value);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::prop;

    #[test]
    fn with_stores_leaves_original_untouched() {
        let ctx = Context::new();
        let extended = ctx.with_stores(Stores::new().with("user", prop(1i32)));
        assert!(ctx.stores().is_none());
        assert!(extended.stores().unwrap().contains("user"));
    }

    #[test]
    fn capability_lookup() {
        static CAPS: ContextCapabilities = ContextCapabilities::new(&["stores", "theme"]);
        assert!(CAPS.declares("theme"));
        assert!(!CAPS.declares("router"));
        assert_eq!(CAPS.keys().len(), 2);
    }

    #[test]
    fn with_value_shadows_per_subtree() {
        let ctx = Context::new().with_value("depth", prop(1i32));
        let child = ctx.with_value("depth", prop(2i32));
        assert_eq!(ctx.get("depth").unwrap().downcast_ref::<i32>(), Some(&1));
        assert_eq!(child.get("depth").unwrap().downcast_ref::<i32>(), Some(&2));
    }
}
