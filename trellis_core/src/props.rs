use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A single property or store value. Values are reference-counted and
/// untyped; readers downcast to the concrete type they expect.
pub type PropValue = Rc<dyn Any>;

/// Boxes a value as a [`PropValue`].
pub fn prop<T: 'static>(value: T) -> PropValue {
    Rc::new(value)
}

/// An ordered name-to-value property container.
///
/// Iteration order is insertion order, so a component sees its properties
/// in the order they were assembled. Cloning is cheap: values are shared,
/// not copied.
#[derive(Clone, Default)]
pub struct Props {
    entries: IndexMap<String, PropValue>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: PropValue) {
        self.entries.insert(name.into(), value);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: PropValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.get(name)
    }

    /// Looks up a property and downcasts it to `T`.
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

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merges `other` in, overwriting entries with the same name.
    pub fn merge(&mut self, other: Props) {
        for (name, value) in other.entries {
            self.entries.insert(name, value);
        }
    }
}

/// Equality is per-entry identity: same names in the same order, each
/// pointing at the same shared value.
impl PartialEq for Props {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && Rc::ptr_eq(va, vb))
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}
