//! Pass-through pointer bindings for node icons and edge lines.
//!
//! Nothing in the crate invokes these callbacks on its own. A host that owns
//! the event loop turns a pointer position into a [`HitTarget`] (usually via
//! [`Scene::hit_test`](crate::layout::Scene::hit_test)) and forwards it with
//! [`Interactions::dispatch`].

use crate::ir::GridNode;
use crate::layout::HitTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Enter,
    Leave,
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self { kind, x, y }
    }
}

pub type GraphEventFn<T> = Box<dyn Fn(&PointerEvent, &GridNode<T>, &[&GridNode<T>])>;

pub struct Interactions<T> {
    pub on_node_enter: Option<GraphEventFn<T>>,
    pub on_node_leave: Option<GraphEventFn<T>>,
    pub on_node_click: Option<GraphEventFn<T>>,
    pub on_edge_enter: Option<GraphEventFn<T>>,
    pub on_edge_leave: Option<GraphEventFn<T>>,
    pub on_edge_click: Option<GraphEventFn<T>>,
}

impl<T> Default for Interactions<T> {
    fn default() -> Self {
        Self {
            on_node_enter: None,
            on_node_leave: None,
            on_node_click: None,
            on_edge_enter: None,
            on_edge_leave: None,
            on_edge_click: None,
        }
    }
}

impl<T> Interactions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: PointerKind, target: &HitTarget<'_, '_, T>) -> Option<&GraphEventFn<T>> {
        let slot = match (target, kind) {
            (HitTarget::Node(_), PointerKind::Enter) => &self.on_node_enter,
            (HitTarget::Node(_), PointerKind::Leave) => &self.on_node_leave,
            (HitTarget::Node(_), PointerKind::Click) => &self.on_node_click,
            (HitTarget::Edge(_), PointerKind::Enter) => &self.on_edge_enter,
            (HitTarget::Edge(_), PointerKind::Leave) => &self.on_edge_leave,
            (HitTarget::Edge(_), PointerKind::Click) => &self.on_edge_click,
        };
        slot.as_ref()
    }

    /// Forwards `event` to the callback bound for `target`. Node targets
    /// report the node with all of its incomes; edge targets report the
    /// edge's node with that single income. Returns whether a callback ran.
    pub fn dispatch(&self, event: &PointerEvent, target: &HitTarget<'_, '_, T>) -> bool {
        let Some(callback) = self.slot(event.kind, target) else {
            return false;
        };
        let (node, incomes) = target.subject();
        callback(event, node, &incomes);
        true
    }
}
