//! Anchor pinning without duplicate constraints.
//!
//! A constraint ties one anchor of a view to a constant or to an anchor of
//! another view. At most one constraint per [`Signature`] lives in an
//! owner's set: applying a [`Pin`] first deactivates every constraint with
//! the same signature, so repeated pins with new parameters replace rather
//! than stack.
//!
//! The layout engine itself sits behind [`LayoutEngine`]; [`AnchorLayout`]
//! is the in-crate store the slider uses for its parts.

use std::fmt;

use tracing::trace;

use crate::geometry::Attribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Relation {
    LessThanOrEqual,
    #[default]
    Equal,
    GreaterThanOrEqual,
}

/// Constraint priority, 1–1000.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Priority(pub f32);

impl Priority {
    pub const REQUIRED: Priority = Priority(1000.0);
    pub const HIGH: Priority = Priority(750.0);
    pub const LOW: Priority = Priority(250.0);
}

impl Default for Priority {
    fn default() -> Self {
        Priority::REQUIRED
    }
}

/// `first.first_attribute <relation> multiplier * second.second_attribute + constant`
///
/// Without a second item the right-hand side is just `constant`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint<V> {
    pub first_item: V,
    pub first_attribute: Attribute,
    pub second_item: Option<V>,
    pub second_attribute: Attribute,
    pub relation: Relation,
    pub multiplier: f64,
    pub constant: f64,
    pub priority: Priority,
    pub identifier: Option<String>,
}

/// Which relationship a constraint expresses, ignoring its numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature<V> {
    pub first_item: V,
    pub second_item: Option<V>,
    pub first_attribute: Attribute,
    pub second_attribute: Attribute,
}

impl<V: Copy> Constraint<V> {
    pub fn signature(&self) -> Signature<V> {
        Signature {
            first_item: self.first_item,
            second_item: self.second_item,
            first_attribute: self.first_attribute,
            second_attribute: self.second_attribute,
        }
    }
}

impl<V: PartialEq> Constraint<V> {
    /// True if `view` appears on either side.
    pub fn involves(&self, view: &V) -> bool {
        self.first_item == *view || self.second_item.as_ref() == Some(view)
    }
}

/// The layout engine the constraint manager issues instructions to.
///
/// Each view owns a set of active constraints. Implementations assume
/// exclusive access for the duration of each call.
pub trait LayoutEngine {
    type View: Copy + Eq + fmt::Debug;

    /// Active constraints owned by `owner`.
    fn constraints(&self, owner: Self::View) -> &[Constraint<Self::View>];

    fn activate(&mut self, owner: Self::View, constraint: Constraint<Self::View>);

    /// Deactivate every constraint of `owner` matching `predicate`, returning how many went.
    fn deactivate_where(
        &mut self,
        owner: Self::View,
        predicate: &mut dyn FnMut(&Constraint<Self::View>) -> bool,
    ) -> usize;

    /// Stop the view from positioning itself from its own frame.
    fn disable_implicit_positioning(&mut self, view: Self::View);

    fn insert_child(&mut self, parent: Self::View, child: Self::View);
}

/// Builder for a single constraint, applied with last-write-wins semantics.
///
/// Defaults: multiplier 1, offset 0, [`Relation::Equal`],
/// [`Priority::REQUIRED`], no identifier, owned by the pinned view.
#[derive(Debug, Clone)]
pub struct Pin<V> {
    view: V,
    attribute: Attribute,
    target: Option<(V, Attribute)>,
    owner: Option<V>,
    offset: f64,
    ratio: f64,
    relation: Relation,
    priority: Priority,
    identifier: Option<String>,
}

impl<V: Copy + Eq + fmt::Debug> Pin<V> {
    pub fn new(view: V, attribute: Attribute) -> Self {
        Self {
            view,
            attribute,
            target: None,
            owner: None,
            offset: 0.0,
            ratio: 1.0,
            relation: Relation::Equal,
            priority: Priority::REQUIRED,
            identifier: None,
        }
    }

    /// Pin to the same attribute of `other`.
    pub fn to(self, other: V) -> Self {
        let attribute = self.attribute;
        self.to_attribute(other, attribute)
    }

    pub fn to_attribute(mut self, other: V, attribute: Attribute) -> Self {
        self.target = Some((other, attribute));
        self
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn relation(mut self, relation: Relation) -> Self {
        self.relation = relation;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Store the constraint in `owner`'s set instead of the pinned view's.
    pub fn owned_by(mut self, owner: V) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn build(&self) -> Constraint<V> {
        let (second_item, second_attribute) = match self.target {
            Some((item, attribute)) => (Some(item), attribute),
            None => (None, Attribute::NotAnAttribute),
        };
        Constraint {
            first_item: self.view,
            first_attribute: self.attribute,
            second_item,
            second_attribute,
            relation: self.relation,
            multiplier: self.ratio,
            constant: self.offset,
            priority: self.priority,
            identifier: self.identifier.clone(),
        }
    }

    /// Replace any constraint with the same signature and activate this one.
    pub fn apply<E>(self, engine: &mut E) -> Constraint<V>
    where
        E: LayoutEngine<View = V>,
    {
        let owner = self.owner.unwrap_or(self.view);
        let constraint = self.build();
        let signature = constraint.signature();
        let removed =
            engine.deactivate_where(owner, &mut |c: &Constraint<V>| c.signature() == signature);
        if removed > 0 {
            trace!(?signature, removed, "superseded constraint");
        }
        engine.activate(owner, constraint.clone());
        constraint
    }
}

/// Fix `attribute` of `view` to `value`.
pub fn pin_constant<E: LayoutEngine>(
    engine: &mut E,
    view: E::View,
    attribute: Attribute,
    value: f64,
) -> Constraint<E::View> {
    Pin::new(view, attribute).offset(value).apply(engine)
}

/// Align `attribute` of `child` with the same attribute of `parent`, offset by `diff`.
pub fn pin_to_parent<E: LayoutEngine>(
    engine: &mut E,
    parent: E::View,
    child: E::View,
    attribute: Attribute,
    diff: f64,
) -> Constraint<E::View> {
    Pin::new(child, attribute)
        .to(parent)
        .offset(diff)
        .owned_by(parent)
        .apply(engine)
}

/// Pin `a.attribute_a` to `b.attribute_b`; `None` reuses `attribute_a`.
///
/// The constraint lives in `a`'s set, and replacement only scans that set.
/// A [`pin_to_parent`] with the same signature lives in the parent's set, so
/// the two do not replace each other. Use [`Pin::owned_by`] to pick the set.
pub fn pin_between<E: LayoutEngine>(
    engine: &mut E,
    a: E::View,
    attribute_a: Attribute,
    b: E::View,
    attribute_b: Option<Attribute>,
    diff: f64,
) -> Constraint<E::View> {
    Pin::new(a, attribute_a)
        .to_attribute(b, attribute_b.unwrap_or(attribute_a))
        .offset(diff)
        .apply(engine)
}

/// Insert `child` under `parent` and pin each of `attributes` flush to the parent.
pub fn attach_subview<E: LayoutEngine>(
    engine: &mut E,
    parent: E::View,
    child: E::View,
    attributes: &[Attribute],
) -> Vec<Constraint<E::View>> {
    engine.disable_implicit_positioning(child);
    engine.insert_child(parent, child);
    attributes
        .iter()
        .map(|&attribute| pin_to_parent(engine, parent, child, attribute, 0.0))
        .collect()
}

/// Handle to a node in an [`AnchorLayout`]. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    implicit_positioning: bool,
    overlay: Option<NodeId>,
    constraints: Vec<Constraint<NodeId>>,
}

impl Node {
    fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            implicit_positioning: true,
            overlay: None,
            constraints: Vec::new(),
        }
    }
}

/// Arena of nodes with single-parent hierarchy and per-node constraint sets.
///
/// Calls with a removed or foreign [`NodeId`] are no-ops.
#[derive(Debug, Default)]
pub struct AnchorLayout {
    nodes: Vec<Option<Node>>,
}

impl AnchorLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self) -> NodeId {
        self.nodes.push(Some(Node::new()));
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn is_implicitly_positioned(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.implicit_positioning)
    }

    /// True if `ancestor` is `id` or one of its parents.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// First constraint in `owner`'s set carrying `identifier`.
    pub fn find(&self, owner: NodeId, identifier: &str) -> Option<&Constraint<NodeId>> {
        self.constraints(owner)
            .iter()
            .find(|c| c.identifier.as_deref() == Some(identifier))
    }

    /// Every active constraint in the store.
    pub fn active(&self) -> impl Iterator<Item = &Constraint<NodeId>> {
        self.nodes
            .iter()
            .flatten()
            .flat_map(|n| n.constraints.iter())
    }

    pub fn overlay(&self, owner: NodeId) -> Option<NodeId> {
        self.node(owner).and_then(|n| n.overlay)
    }

    /// Make `overlay` the exclusively owned overlay child of `owner`, pinned
    /// to all four edges. A previous overlay is torn down.
    pub fn set_overlay(&mut self, owner: NodeId, overlay: NodeId) -> Vec<Constraint<NodeId>> {
        if !self.contains(owner) || !self.contains(overlay) {
            return Vec::new();
        }
        if let Some(previous) = self.overlay(owner) {
            if previous != overlay {
                self.remove(previous);
            }
        }
        if let Some(node) = self.node_mut(owner) {
            node.overlay = Some(overlay);
        }
        attach_subview(
            self,
            owner,
            overlay,
            &[
                Attribute::Top,
                Attribute::Bottom,
                Attribute::Left,
                Attribute::Right,
            ],
        )
    }

    /// Tear down the overlay of `owner`, if any.
    pub fn clear_overlay(&mut self, owner: NodeId) {
        if let Some(overlay) = self.overlay(owner) {
            self.remove(overlay);
        }
    }

    /// Remove `id` and its subtree. Their constraints go with them, as does
    /// every constraint elsewhere that references a removed node.
    pub fn remove(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        if let Some(parent) = self.parent(id) {
            if let Some(p) = self.node_mut(parent) {
                p.children.retain(|&c| c != id);
                if p.overlay == Some(id) {
                    p.overlay = None;
                }
            }
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                stack.extend(node.children);
                removed.push(current);
            }
        }

        for node in self.nodes.iter_mut().flatten() {
            node.constraints
                .retain(|c| !removed.iter().any(|r| c.involves(r)));
        }
        trace!(?id, nodes = removed.len(), "removed subtree");
    }
}

impl LayoutEngine for AnchorLayout {
    type View = NodeId;

    fn constraints(&self, owner: NodeId) -> &[Constraint<NodeId>] {
        self.node(owner)
            .map(|n| n.constraints.as_slice())
            .unwrap_or(&[])
    }

    fn activate(&mut self, owner: NodeId, constraint: Constraint<NodeId>) {
        let items_live = self.contains(constraint.first_item)
            && constraint.second_item.map_or(true, |item| self.contains(item));
        if !items_live {
            let signature = constraint.signature();
            trace!(?owner, ?signature, "ignored constraint on removed node");
            return;
        }
        if let Some(node) = self.node_mut(owner) {
            node.constraints.push(constraint);
        }
    }

    fn deactivate_where(
        &mut self,
        owner: NodeId,
        predicate: &mut dyn FnMut(&Constraint<NodeId>) -> bool,
    ) -> usize {
        let Some(node) = self.node_mut(owner) else {
            return 0;
        };
        let before = node.constraints.len();
        node.constraints.retain(|c| !predicate(c));
        before - node.constraints.len()
    }

    fn disable_implicit_positioning(&mut self, view: NodeId) {
        if let Some(node) = self.node_mut(view) {
            node.implicit_positioning = false;
        }
    }

    fn insert_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor(child, parent) {
            trace!(?parent, ?child, "ignored child insertion");
            return;
        }
        if let Some(old) = self.parent(child) {
            if old == parent {
                return;
            }
            if let Some(p) = self.node_mut(old) {
                p.children.retain(|&c| c != child);
                if p.overlay == Some(child) {
                    p.overlay = None;
                }
            }
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family() -> (AnchorLayout, NodeId, NodeId) {
        let mut layout = AnchorLayout::new();
        let parent = layout.add_node();
        let child = layout.add_node();
        layout.insert_child(parent, child);
        (layout, parent, child)
    }

    #[test]
    fn repeated_pin_keeps_one_constraint() {
        let (mut layout, parent, child) = family();
        pin_to_parent(&mut layout, parent, child, Attribute::Top, 5.0);
        pin_to_parent(&mut layout, parent, child, Attribute::Top, 5.0);
        assert_eq!(layout.constraints(parent).len(), 1);
    }

    #[test]
    fn last_write_wins() {
        let (mut layout, parent, child) = family();
        pin_to_parent(&mut layout, parent, child, Attribute::Top, 5.0);
        pin_to_parent(&mut layout, parent, child, Attribute::Top, 10.0);
        let tops: Vec<_> = layout
            .constraints(parent)
            .iter()
            .filter(|c| c.first_attribute == Attribute::Top)
            .collect();
        assert_eq!(tops.len(), 1);
        assert_eq!(tops[0].constant, 10.0);
    }

    #[test]
    fn different_signatures_coexist() {
        let (mut layout, parent, child) = family();
        pin_to_parent(&mut layout, parent, child, Attribute::Top, 0.0);
        pin_to_parent(&mut layout, parent, child, Attribute::Bottom, 0.0);
        pin_between(&mut layout, parent, Attribute::Top, child, Some(Attribute::Bottom), 0.0);
        assert_eq!(layout.constraints(parent).len(), 3);
    }

    #[test]
    fn pin_constant_has_no_counterpart() {
        let mut layout = AnchorLayout::new();
        let view = layout.add_node();
        pin_constant(&mut layout, view, Attribute::Width, 44.0);
        let c = pin_constant(&mut layout, view, Attribute::Width, 48.0);
        assert_eq!(c.second_item, None);
        assert_eq!(c.second_attribute, Attribute::NotAnAttribute);
        assert_eq!(layout.constraints(view), &[c]);
    }

    #[test]
    fn pin_between_defaults_to_symmetric_attribute() {
        let (mut layout, parent, child) = family();
        let c = pin_between(&mut layout, child, Attribute::CenterY, parent, None, 2.0);
        assert_eq!(c.second_attribute, Attribute::CenterY);
        assert_eq!(layout.constraints(child).len(), 1);
    }

    #[test]
    fn builder_carries_parameters() {
        let (mut layout, parent, child) = family();
        let c = Pin::new(child, Attribute::Height)
            .to_attribute(parent, Attribute::Width)
            .ratio(0.5)
            .relation(Relation::LessThanOrEqual)
            .priority(Priority::LOW)
            .identifier("aspect")
            .apply(&mut layout);
        assert_eq!(c.multiplier, 0.5);
        assert_eq!(c.relation, Relation::LessThanOrEqual);
        assert_eq!(layout.find(child, "aspect"), Some(&c));
    }

    #[test]
    fn attach_subview_pins_each_edge() {
        let mut layout = AnchorLayout::new();
        let parent = layout.add_node();
        let child = layout.add_node();
        let edges = [
            Attribute::Top,
            Attribute::Bottom,
            Attribute::Left,
            Attribute::Right,
        ];
        let created = attach_subview(&mut layout, parent, child, &edges);
        assert_eq!(created.len(), 4);
        for (c, edge) in created.iter().zip(edges) {
            assert_eq!(c.first_item, child);
            assert_eq!(c.second_item, Some(parent));
            assert_eq!(c.first_attribute, edge);
            assert_eq!(c.second_attribute, edge);
            assert_eq!(c.constant, 0.0);
        }
        assert!(!layout.is_implicitly_positioned(child));
        assert_eq!(layout.children(parent), &[child]);
        assert_eq!(layout.constraints(parent).len(), 4);
    }

    #[test]
    fn remove_drops_referencing_constraints() {
        let (mut layout, parent, child) = family();
        let grandchild = layout.add_node();
        attach_subview(&mut layout, child, grandchild, &[Attribute::Top]);
        pin_to_parent(&mut layout, parent, child, Attribute::Left, 0.0);
        pin_constant(&mut layout, parent, Attribute::Width, 100.0);
        layout.remove(child);
        assert!(!layout.contains(grandchild));
        assert!(layout.children(parent).is_empty());
        assert_eq!(layout.active().count(), 1);
    }

    #[test]
    fn overlay_is_replaced_not_accumulated() {
        let mut layout = AnchorLayout::new();
        let owner = layout.add_node();
        let first = layout.add_node();
        let second = layout.add_node();
        layout.set_overlay(owner, first);
        layout.set_overlay(owner, second);
        assert_eq!(layout.overlay(owner), Some(second));
        assert!(!layout.contains(first));
        assert_eq!(layout.constraints(owner).len(), 4);
        layout.clear_overlay(owner);
        assert_eq!(layout.overlay(owner), None);
        assert!(layout.constraints(owner).is_empty());
    }

    #[test]
    fn hierarchy_rejects_cycles() {
        let (mut layout, parent, child) = family();
        layout.insert_child(child, parent);
        assert_eq!(layout.parent(parent), None);
        layout.insert_child(child, child);
        assert!(layout.children(child).is_empty());
    }

    #[test]
    fn stale_ids_are_ignored() {
        let (mut layout, parent, child) = family();
        layout.remove(child);
        pin_to_parent(&mut layout, parent, child, Attribute::Top, 0.0);
        pin_between(&mut layout, parent, Attribute::Left, child, None, 0.0);
        assert!(layout.constraints(parent).is_empty());
        pin_constant(&mut layout, child, Attribute::Width, 1.0);
        assert!(layout.constraints(child).is_empty());
        assert!(layout.active().all(|c| c.first_item != child && c.second_item != Some(child)));
    }

    #[test]
    fn owners_deduplicate_independently() {
        let (mut layout, parent, child) = family();
        pin_to_parent(&mut layout, parent, child, Attribute::Top, 1.0);
        pin_between(&mut layout, child, Attribute::Top, parent, None, 2.0);
        assert_eq!(layout.constraints(parent).len(), 1);
        assert_eq!(layout.constraints(child).len(), 1);
        assert_eq!(layout.active().count(), 2);
    }
}
