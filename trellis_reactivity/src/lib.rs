//! The reactive runtime underneath trellis.
//!
//! A thread-local arena of nodes holds type-erased observable values and the
//! effects subscribed to them. Reading a value inside a running effect
//! registers a dependency; writing a value queues and re-runs every
//! subscribed effect. Nodes form an ownership tree: effects and scopes own
//! whatever was created while they ran, and dispose it before re-running.

use slotmap::{SecondaryMap, SlotMap, new_key_type};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

new_key_type! {
    /// Unique identifier of a node in the reactive graph.
    pub struct NodeId;
}

struct Node {
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    cleanups: Vec<Box<dyn FnOnce()>>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: Vec::new(),
            parent: None,
            cleanups: Vec::new(),
        }
    }
}

struct SignalData {
    value: Box<dyn Any>,
    subscribers: Vec<NodeId>,
}

struct EffectData {
    computation: Rc<dyn Fn()>,
    dependencies: Vec<NodeId>,
}

struct Runtime {
    nodes: RefCell<SlotMap<NodeId, Node>>,
    signals: RefCell<SecondaryMap<NodeId, SignalData>>,
    effects: RefCell<SecondaryMap<NodeId, EffectData>>,
    current_owner: RefCell<Option<NodeId>>,
    observer_queue: RefCell<VecDeque<NodeId>>,
    queued_observers: RefCell<SecondaryMap<NodeId, ()>>,
    running_queue: Cell<bool>,
}

thread_local! {
    static RUNTIME: Runtime = Runtime::new();
}

impl Runtime {
    fn new() -> Self {
        Self {
            nodes: RefCell::new(SlotMap::with_key()),
            signals: RefCell::new(SecondaryMap::new()),
            effects: RefCell::new(SecondaryMap::new()),
            current_owner: RefCell::new(None),
            observer_queue: RefCell::new(VecDeque::new()),
            queued_observers: RefCell::new(SecondaryMap::new()),
            running_queue: Cell::new(false),
        }
    }

    /// Registers a fresh node owned by the current owner, if any.
    fn register_node(&self) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let parent = *self.current_owner.borrow();
        let mut node = Node::new();
        node.parent = parent;

        let id = nodes.insert(node);

        if let Some(parent_id) = parent {
            if let Some(parent_node) = nodes.get_mut(parent_id) {
                parent_node.children.push(id);
            }
        }
        id
    }

    /// Subscribes the currently running effect (if any) to `signal_id`.
    fn track_dependency(&self, signal_id: NodeId) {
        let Some(owner) = *self.current_owner.borrow() else {
            return;
        };
        if owner == signal_id {
            return;
        }

        let mut effects = self.effects.borrow_mut();
        if let Some(effect_data) = effects.get_mut(owner) {
            if effect_data.dependencies.contains(&signal_id) {
                return;
            }
            let mut signals = self.signals.borrow_mut();
            if let Some(signal_data) = signals.get_mut(signal_id) {
                effect_data.dependencies.push(signal_id);
                signal_data.subscribers.push(owner);
            }
        }
    }

    fn queue_dependents(&self, signal_id: NodeId) {
        let subscribers = {
            let signals = self.signals.borrow();
            signals
                .get(signal_id)
                .map(|data| data.subscribers.clone())
                .unwrap_or_default()
        };

        let mut queue = self.observer_queue.borrow_mut();
        let mut queued = self.queued_observers.borrow_mut();

        for id in subscribers {
            if !queued.contains_key(id) {
                queued.insert(id, ());
                queue.push_back(id);
            }
        }
    }

    fn run_queue(&self) {
        if self.running_queue.get() {
            return;
        }
        self.running_queue.set(true);

        loop {
            let next = self.observer_queue.borrow_mut().pop_front();
            match next {
                Some(id) => {
                    self.queued_observers.borrow_mut().remove(id);
                    run_effect(id);
                }
                None => break,
            }
        }
        self.running_queue.set(false);
    }

    /// Disposes children created during the previous run, fires cleanup
    /// callbacks and unsubscribes from stale dependencies.
    fn release(
        &self,
        self_id: NodeId,
        children: Vec<NodeId>,
        cleanups: Vec<Box<dyn FnOnce()>>,
        dependencies: Vec<NodeId>,
    ) {
        for child in children {
            self.dispose_node(child, false);
        }
        for cleanup in cleanups {
            cleanup();
        }
        if !dependencies.is_empty() {
            let mut signals = self.signals.borrow_mut();
            for signal_id in dependencies {
                if let Some(signal_data) = signals.get_mut(signal_id) {
                    if let Some(idx) = signal_data.subscribers.iter().position(|&x| x == self_id) {
                        signal_data.subscribers.swap_remove(idx);
                    }
                }
            }
        }
    }

    fn clean_node(&self, id: NodeId) {
        let (children, cleanups) = {
            let mut nodes = self.nodes.borrow_mut();
            if let Some(node) = nodes.get_mut(id) {
                (
                    std::mem::take(&mut node.children),
                    std::mem::take(&mut node.cleanups),
                )
            } else {
                return;
            }
        };

        let dependencies = {
            let mut effects = self.effects.borrow_mut();
            if let Some(effect_data) = effects.get_mut(id) {
                std::mem::take(&mut effect_data.dependencies)
            } else {
                Vec::new()
            }
        };

        self.release(id, children, cleanups, dependencies);
    }

    fn dispose_node(&self, id: NodeId, remove_from_parent: bool) {
        self.clean_node(id);

        let mut nodes = self.nodes.borrow_mut();
        if remove_from_parent {
            let parent_id = nodes.get(id).and_then(|n| n.parent);
            if let Some(parent) = parent_id {
                if let Some(parent_node) = nodes.get_mut(parent) {
                    if let Some(idx) = parent_node.children.iter().position(|&x| x == id) {
                        parent_node.children.swap_remove(idx);
                    }
                }
            }
        }
        nodes.remove(id);
        drop(nodes);

        self.signals.borrow_mut().remove(id);
        self.effects.borrow_mut().remove(id);
        if self.queued_observers.borrow().contains_key(id) {
            self.queued_observers.borrow_mut().remove(id);
        }
    }
}

fn run_effect(effect_id: NodeId) {
    RUNTIME.with(|rt| {
        let (children, cleanups) = {
            let mut nodes = rt.nodes.borrow_mut();
            if let Some(node) = nodes.get_mut(effect_id) {
                (
                    std::mem::take(&mut node.children),
                    std::mem::take(&mut node.cleanups),
                )
            } else {
                return;
            }
        };

        let (computation, dependencies) = {
            let mut effects = rt.effects.borrow_mut();
            if let Some(effect_data) = effects.get_mut(effect_id) {
                (
                    effect_data.computation.clone(),
                    std::mem::take(&mut effect_data.dependencies),
                )
            } else {
                return;
            }
        };

        rt.release(effect_id, children, cleanups, dependencies);

        let prev_owner = *rt.current_owner.borrow();
        *rt.current_owner.borrow_mut() = Some(effect_id);
        computation();
        *rt.current_owner.borrow_mut() = prev_owner;
    })
}

// --- Public API ---

/// Registers a new observable value, returning its handle.
pub fn signal<T: 'static>(value: T) -> NodeId {
    RUNTIME.with(|rt| {
        let id = rt.register_node();
        rt.signals.borrow_mut().insert(
            id,
            SignalData {
                value: Box::new(value),
                subscribers: Vec::new(),
            },
        );
        id
    })
}

/// Reads the value at `id`, subscribing the currently running effect to it.
/// Returns `None` if the value was disposed or `T` does not match.
pub fn try_with_signal<T: 'static, R>(id: NodeId, f: impl FnOnce(&T) -> R) -> Option<R> {
    RUNTIME.with(|rt| {
        rt.track_dependency(id);

        let signals = rt.signals.borrow();
        signals
            .get(id)
            .and_then(|signal| signal.value.downcast_ref::<T>())
            .map(f)
    })
}

/// Reads the value at `id` without registering a dependency.
pub fn try_with_signal_untracked<T: 'static, R>(id: NodeId, f: impl FnOnce(&T) -> R) -> Option<R> {
    RUNTIME.with(|rt| {
        let signals = rt.signals.borrow();
        signals
            .get(id)
            .and_then(|signal| signal.value.downcast_ref::<T>())
            .map(f)
    })
}

/// Updates the value at `id` in place and re-runs every subscribed effect.
/// A disposed id or a mismatched `T` is ignored.
pub fn update_signal<T: 'static>(id: NodeId, f: impl FnOnce(&mut T)) {
    RUNTIME.with(|rt| {
        {
            let mut signals = rt.signals.borrow_mut();
            match signals.get_mut(id) {
                Some(signal) => match signal.value.downcast_mut::<T>() {
                    Some(val) => f(val),
                    None => return,
                },
                None => return,
            }
        }

        rt.queue_dependents(id);
        rt.run_queue();
    })
}

/// Registers an effect and runs it once to collect its dependencies.
/// The effect re-runs whenever one of the observables it read changes.
pub fn effect<F: Fn() + 'static>(f: F) -> NodeId {
    let id = RUNTIME.with(|rt| {
        let id = rt.register_node();
        rt.effects.borrow_mut().insert(
            id,
            EffectData {
                computation: Rc::new(f),
                dependencies: Vec::new(),
            },
        );
        id
    });
    run_effect(id);
    id
}

/// Runs `f` without dependency tracking: observable reads inside it do not
/// subscribe the currently running effect.
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    RUNTIME.with(|rt| {
        let prev_owner = *rt.current_owner.borrow();
        *rt.current_owner.borrow_mut() = None;
        let t = f();
        *rt.current_owner.borrow_mut() = prev_owner;
        t
    })
}

/// Creates an ownership scope. Everything registered while `f` runs is
/// owned by the returned node and freed when it is disposed.
pub fn create_scope<F>(f: F) -> NodeId
where
    F: FnOnce(),
{
    RUNTIME.with(|rt| {
        let id = rt.register_node();

        let prev_owner = *rt.current_owner.borrow();
        *rt.current_owner.borrow_mut() = Some(id);
        f();
        *rt.current_owner.borrow_mut() = prev_owner;

        id
    })
}

/// Disposes a node and everything it owns.
pub fn dispose(id: NodeId) {
    RUNTIME.with(|rt| {
        rt.dispose_node(id, true);
    });
}

/// Registers a callback that fires when the current owner is cleaned up or
/// re-run. No-op outside an owner scope.
pub fn on_cleanup(f: impl FnOnce() + 'static) {
    RUNTIME.with(|rt| {
        if let Some(owner) = *rt.current_owner.borrow() {
            let mut nodes = rt.nodes.borrow_mut();
            if let Some(node) = nodes.get_mut(owner) {
                node.cleanups.push(Box::new(f));
            }
        }
    });
}
