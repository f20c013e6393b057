use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::graph::{EdgeId, NodeId, RegionGraph};

/// One growth event: append a default slot.
///
/// Implemented by the shared storage of [`NodeMap`]/[`EdgeMap`]; the graph
/// holds only `Weak` references, so dropping a map unsubscribes it (the dead
/// reference is pruned on the next growth event).
pub(crate) trait GrowSlot {
    fn grow(&self);
}

impl<T: Default> GrowSlot for RefCell<Vec<T>> {
    fn grow(&self) {
        self.borrow_mut().push(T::default());
    }
}

/// Dense per-node attribute storage, auto-extended when the graph grows.
#[derive(Debug)]
pub struct NodeMap<T> {
    values: Rc<RefCell<Vec<T>>>,
}

impl<T: Default + 'static> NodeMap<T> {
    pub fn new(graph: &mut RegionGraph) -> Self {
        let values: Vec<T> = std::iter::repeat_with(T::default)
            .take(graph.num_nodes())
            .collect();
        Self::subscribe(graph, values)
    }

    /// Seeds the map with pre-computed values, one per existing node (e.g.
    /// fragment voxel counts produced by the watershed).
    pub fn from_values(graph: &mut RegionGraph, values: Vec<T>) -> Self {
        assert_eq!(
            values.len(),
            graph.num_nodes(),
            "seed values must cover every node"
        );
        Self::subscribe(graph, values)
    }

    fn subscribe(graph: &mut RegionGraph, values: Vec<T>) -> Self {
        let values = Rc::new(RefCell::new(values));
        let slot: Weak<RefCell<Vec<T>>> = Rc::downgrade(&values);
        graph.subscribe_node_slot(slot);
        Self { values }
    }
}

impl<T> NodeMap<T> {
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    pub fn get(&self, n: NodeId) -> T
    where
        T: Clone,
    {
        self.values.borrow()[n].clone()
    }

    pub fn set(&self, n: NodeId, value: T) {
        self.values.borrow_mut()[n] = value;
    }

    /// Mutates the slot for `n` in place.
    pub fn update<R>(&self, n: NodeId, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.values.borrow_mut()[n])
    }
}

/// Dense per-edge attribute storage, auto-extended when the graph grows.
#[derive(Debug)]
pub struct EdgeMap<T> {
    values: Rc<RefCell<Vec<T>>>,
}

impl<T: Default + 'static> EdgeMap<T> {
    pub fn new(graph: &mut RegionGraph) -> Self {
        let values: Vec<T> = std::iter::repeat_with(T::default)
            .take(graph.num_edges())
            .collect();
        let values = Rc::new(RefCell::new(values));
        let slot: Weak<RefCell<Vec<T>>> = Rc::downgrade(&values);
        graph.subscribe_edge_slot(slot);
        Self { values }
    }
}

impl<T> EdgeMap<T> {
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    pub fn get(&self, e: EdgeId) -> T
    where
        T: Clone,
    {
        self.values.borrow()[e].clone()
    }

    pub fn set(&self, e: EdgeId, value: T) {
        self.values.borrow_mut()[e] = value;
    }

    /// Mutates the slot for `e` in place.
    pub fn update<R>(&self, e: EdgeId, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.values.borrow_mut()[e])
    }

    /// Replaces the slot for `e` with its default and returns the old value.
    pub fn take(&self, e: EdgeId) -> T
    where
        T: Default,
    {
        std::mem::take(&mut self.values.borrow_mut()[e])
    }
}
