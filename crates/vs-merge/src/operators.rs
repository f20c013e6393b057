//! Operator scorers that combine child scoring functions.
//!
//! Operators forward the ingest and merge callbacks to every child, so an
//! operator tree behaves like a single scoring function.

use std::marker::PhantomData;

use vs_graph::{EdgeId, NodeId, RegionGraph};

use crate::score::ScoringFunction;

pub trait UnaryOp {
    fn apply(x: f32) -> f32;
}

pub trait BinaryOp {
    fn apply(left: f32, right: f32) -> f32;
}

#[derive(Debug)]
pub struct UnaryOperator<F, Op> {
    inner: F,
    _op: PhantomData<Op>,
}

impl<F: ScoringFunction, Op: UnaryOp> UnaryOperator<F, Op> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            _op: PhantomData,
        }
    }
}

impl<F: ScoringFunction, Op: UnaryOp> ScoringFunction for UnaryOperator<F, Op> {
    fn score(&mut self, graph: &RegionGraph, e: EdgeId) -> f32 {
        Op::apply(self.inner.score(graph, e))
    }

    fn notify_new_edge(&mut self, e: EdgeId) {
        self.inner.notify_new_edge(e);
    }

    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.inner.add_affinity(e, affinity);
    }

    fn add_voxel(&mut self, n: NodeId, x: usize, y: usize, z: usize) {
        self.inner.add_voxel(n, x, y, z);
    }

    fn notify_node_merge(&mut self, a: NodeId, b: NodeId, c: NodeId) {
        self.inner.notify_node_merge(a, b, c);
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        self.inner.notify_edge_merge(from, to);
    }
}

#[derive(Debug)]
pub struct BinaryOperator<F1, F2, Op> {
    left: F1,
    right: F2,
    _op: PhantomData<Op>,
}

impl<F1: ScoringFunction, F2: ScoringFunction, Op: BinaryOp> BinaryOperator<F1, F2, Op> {
    pub fn new(left: F1, right: F2) -> Self {
        Self {
            left,
            right,
            _op: PhantomData,
        }
    }
}

impl<F1: ScoringFunction, F2: ScoringFunction, Op: BinaryOp> ScoringFunction
    for BinaryOperator<F1, F2, Op>
{
    fn score(&mut self, graph: &RegionGraph, e: EdgeId) -> f32 {
        Op::apply(self.left.score(graph, e), self.right.score(graph, e))
    }

    fn notify_new_edge(&mut self, e: EdgeId) {
        self.left.notify_new_edge(e);
        self.right.notify_new_edge(e);
    }

    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.left.add_affinity(e, affinity);
        self.right.add_affinity(e, affinity);
    }

    fn add_voxel(&mut self, n: NodeId, x: usize, y: usize, z: usize) {
        self.left.add_voxel(n, x, y, z);
        self.right.add_voxel(n, x, y, z);
    }

    fn notify_node_merge(&mut self, a: NodeId, b: NodeId, c: NodeId) {
        self.left.notify_node_merge(a, b, c);
        self.right.notify_node_merge(a, b, c);
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        self.left.notify_edge_merge(from, to);
        self.right.notify_edge_merge(from, to);
    }
}

#[derive(Debug)]
pub struct OneMinusOp;

impl UnaryOp for OneMinusOp {
    fn apply(x: f32) -> f32 {
        1.0 - x
    }
}

#[derive(Debug)]
pub struct InvertOp;

impl UnaryOp for InvertOp {
    fn apply(x: f32) -> f32 {
        1.0 / x
    }
}

#[derive(Debug)]
pub struct SquareOp;

impl UnaryOp for SquareOp {
    fn apply(x: f32) -> f32 {
        x * x
    }
}

#[derive(Debug)]
pub struct AddOp;

impl BinaryOp for AddOp {
    fn apply(left: f32, right: f32) -> f32 {
        left + right
    }
}

#[derive(Debug)]
pub struct MultiplyOp;

impl BinaryOp for MultiplyOp {
    fn apply(left: f32, right: f32) -> f32 {
        left * right
    }
}

#[derive(Debug)]
pub struct DivideOp;

impl BinaryOp for DivideOp {
    fn apply(left: f32, right: f32) -> f32 {
        left / right
    }
}

pub type OneMinus<F> = UnaryOperator<F, OneMinusOp>;
pub type Invert<F> = UnaryOperator<F, InvertOp>;
pub type Square<F> = UnaryOperator<F, SquareOp>;
pub type Add<F1, F2> = BinaryOperator<F1, F2, AddOp>;
pub type Multiply<F1, F2> = BinaryOperator<F1, F2, MultiplyOp>;
pub type Divide<F1, F2> = BinaryOperator<F1, F2, DivideOp>;

pub fn one_minus<F: ScoringFunction>(inner: F) -> OneMinus<F> {
    UnaryOperator::new(inner)
}

pub fn invert<F: ScoringFunction>(inner: F) -> Invert<F> {
    UnaryOperator::new(inner)
}

pub fn square<F: ScoringFunction>(inner: F) -> Square<F> {
    UnaryOperator::new(inner)
}

pub fn add<F1: ScoringFunction, F2: ScoringFunction>(left: F1, right: F2) -> Add<F1, F2> {
    BinaryOperator::new(left, right)
}

pub fn multiply<F1: ScoringFunction, F2: ScoringFunction>(left: F1, right: F2) -> Multiply<F1, F2> {
    BinaryOperator::new(left, right)
}

pub fn divide<F1: ScoringFunction, F2: ScoringFunction>(left: F1, right: F2) -> Divide<F1, F2> {
    BinaryOperator::new(left, right)
}
