// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node arena and structural operations on a [`Scene`].
//!
//! Structural edits (create, destroy, reparent, relayer) take effect
//! immediately. Activation changes are queued and applied by
//! [`Scene::apply_pending`].

use arbor_geometry::{Align, Transform, Vector2};

use crate::behavior::Behavior;
use crate::diagnostics::{self, Severity, check};
use crate::error::{SetupError, TreeError};
use crate::layers::LayerBuckets;
use crate::node::{Detached, Node, NodeKind, TextNode};
use crate::scene::{Pending, Scene};
use crate::types::{AttachMode, NodeConfig, NodeId, TextConfig};

impl Scene {
    /// Create a node under `parent` (or as a root if `None`).
    ///
    /// An active node joins its container's active list immediately; an
    /// inactive one is owned but not traversed. Any `config.children` are
    /// then adopted as with [`Scene::add_child`]; a child that cannot be
    /// adopted is reported and skipped, and the node is still created.
    ///
    /// Fails if `parent` is stale.
    #[track_caller]
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        config: NodeConfig,
    ) -> Result<NodeId, SetupError> {
        self.insert_node(parent, config, None)
    }

    /// Create a text node under `parent` (or as a root if `None`).
    ///
    /// The text is rendered before this returns.
    #[track_caller]
    pub fn insert_text(
        &mut self,
        parent: Option<NodeId>,
        config: NodeConfig,
        text: TextConfig,
    ) -> Result<NodeId, SetupError> {
        self.insert_node(parent, config, Some(text))
    }

    #[track_caller]
    fn insert_node(
        &mut self,
        parent: Option<NodeId>,
        config: NodeConfig,
        text: Option<TextConfig>,
    ) -> Result<NodeId, SetupError> {
        if let Some(p) = parent
            && !self.is_alive(p)
        {
            let err = SetupError::StaleParent(p);
            diagnostics::report(Severity::Error, &err);
            return Err(err);
        }

        let NodeConfig {
            name,
            active,
            position,
            scale,
            rotation,
            size,
            align,
            layer,
            children,
            behavior,
        } = config;
        let mut node = Node::new(0, name, Transform::new(position, scale, rotation, size));
        node.align = align;
        node.layer = layer;
        node.active = active;
        node.behavior = behavior;
        if let Some(text) = text {
            node.kind = NodeKind::Text(Box::new(TextNode::new(text)));
        }

        let id = self.allocate(node);
        self.link(id, parent, active);
        for child in children {
            if let Err(err) = self.add_child(id, child) {
                tracing::debug!(scene = %self.name(), ?id, ?child, %err, "configured child not adopted");
            }
        }
        if self.node(id).text().is_some() {
            self.render_text(id);
        }
        tracing::trace!(scene = %self.name(), ?id, ?parent, "node created");
        Ok(id)
    }

    fn allocate(&mut self, mut node: Node) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            node.generation = generation;
            self.nodes[idx] = Some(node);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            node.generation = generation;
            self.nodes.push(Some(node));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Destroy `id` and its whole subtree, including inactive descendants.
    ///
    /// The node leaves its parent's (or the scene's) lists, any pending
    /// activation changes for the subtree are dropped, and every id in the
    /// subtree goes stale. Destroying a stale id reports and does nothing.
    #[track_caller]
    pub fn destroy(&mut self, id: NodeId) -> Result<(), TreeError> {
        check(self.live(id))?;
        self.unlink(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes[current.idx()].take() else {
                continue;
            };
            stack.extend(node.children.iter().chain(node.detached.iter()).copied());
            self.pending_activations.remove(&current);
            self.pending_deactivations.remove(&current);
            self.free_list.push(current.idx());
        }
        tracing::trace!(scene = %self.name(), ?id, "node destroyed");
        Ok(())
    }

    /// Make `child` a child of `parent`, detaching it from wherever it was.
    ///
    /// Errors if `child` already belongs to `parent`, or if `parent` is
    /// `child` or one of its descendants.
    #[track_caller]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        check(self.adopt(parent, child))
    }

    fn adopt(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.live(parent)?;
        self.live(child)?;
        if self.node(child).parent == Some(parent) {
            return Err(TreeError::DuplicateChild { parent, child });
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(TreeError::Cycle {
                node: child,
                parent,
            });
        }
        self.reparent(child, Some(parent));
        Ok(())
    }

    /// Detach `child` from `parent`, making it a root.
    ///
    /// Errors if `child` does not belong to `parent`.
    #[track_caller]
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        check(self.disown(parent, child))
    }

    fn disown(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.live(parent)?;
        self.live(child)?;
        if self.node(child).parent != Some(parent) {
            return Err(TreeError::MissingChild { parent, child });
        }
        self.reparent(child, None);
        Ok(())
    }

    /// Move `id` under `parent`, or make it a root with `None`.
    ///
    /// Setting the current parent again is a no-op. Errors if `parent` is
    /// `id` itself or one of its descendants.
    #[track_caller]
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), TreeError> {
        check(self.move_to(id, parent))
    }

    fn move_to(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), TreeError> {
        self.live(id)?;
        if let Some(p) = parent {
            self.live(p)?;
            if p == id || self.is_ancestor(id, p) {
                return Err(TreeError::Cycle { node: id, parent: p });
            }
        }
        if self.node(id).parent != parent {
            self.reparent(id, parent);
        }
        Ok(())
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    fn reparent(&mut self, id: NodeId, parent: Option<NodeId>) {
        let was_member = self.unlink(id);
        // Membership under an inactive ancestor may be stale; settle it now
        // that the node can become reachable.
        let member = was_member && (self.node(id).active || self.pending_deactivations.contains_key(&id));
        self.link(id, parent, member);
        if member {
            self.reconcile_subtree(id);
        }
        self.refresh_subtree(id);
    }

    /// Remove `id` from its container's lists; returns whether it was a member.
    fn unlink(&mut self, id: NodeId) -> bool {
        let was_member = match self.node(id).parent {
            Some(p) => {
                let n = self.node_mut(p);
                let was_member = n.children.contains(&id);
                n.children.retain(|c| *c != id);
                n.detached.retain(|c| *c != id);
                was_member
            }
            None => {
                let was_member = self.roots.contains(&id);
                self.roots.retain(|r| *r != id);
                self.detached_roots.retain(|r| *r != id);
                was_member
            }
        };
        self.resort_container(id);
        was_member
    }

    fn link(&mut self, id: NodeId, parent: Option<NodeId>, member: bool) {
        self.node_mut(id).parent = parent;
        match parent {
            Some(p) => {
                let n = self.node_mut(p);
                if member {
                    n.children.push(id);
                } else {
                    n.detached.push(id);
                }
            }
            None => {
                if member {
                    self.roots.push(id);
                } else {
                    self.detached_roots.push(id);
                }
            }
        }
        self.resort_container(id);
    }

    /// Move `id` into or out of its container's active list.
    pub(crate) fn set_membership(&mut self, id: NodeId, member: bool) {
        let changed = match self.node(id).parent {
            Some(p) => {
                let n = self.node_mut(p);
                move_member(&mut n.children, &mut n.detached, id, member)
            }
            None => move_member(&mut self.roots, &mut self.detached_roots, id, member),
        };
        if changed {
            self.resort_container(id);
        }
    }

    fn resort_container(&mut self, id: NodeId) {
        match self.node(id).parent {
            Some(p) => self.resort_children(p),
            None => self.resort_roots(),
        }
    }

    fn resort_children(&mut self, parent: NodeId) {
        let n = self.node_mut(parent);
        let members = core::mem::take(&mut n.children);
        let mut sorted = core::mem::take(&mut n.sorted_children);
        sorted.rebuild(&members, |c| self.node(c).layer);
        let n = self.node_mut(parent);
        n.children = members;
        n.sorted_children = sorted;
    }

    fn resort_roots(&mut self) {
        let roots = core::mem::take(&mut self.roots);
        let mut sorted = core::mem::take(&mut self.sorted_roots);
        sorted.rebuild(&roots, |r| self.node(r).layer);
        self.roots = roots;
        self.sorted_roots = sorted;
    }

    /// Move `id` to `layer` among its siblings.
    #[track_caller]
    pub fn set_layer(&mut self, id: NodeId, layer: i32) -> Result<(), TreeError> {
        check(self.live(id))?;
        if self.node(id).layer != layer {
            self.node_mut(id).layer = layer;
            self.resort_container(id);
        }
        Ok(())
    }

    /// Request that `id` be activated or deactivated.
    ///
    /// The node's flag changes now; its membership changes at the next
    /// [`Scene::apply_pending`]. A request cancels an opposite pending one.
    /// A reactivated node rejoins at the end of its layer group.
    /// Deactivating under an inactive ancestor only records the flag, since
    /// the node is unreachable either way; it is taken out of the list when
    /// that ancestor is activated again.
    #[track_caller]
    pub fn set_active(&mut self, id: NodeId, active: bool) -> Result<(), TreeError> {
        check(self.live(id))?;
        if self.node(id).active == active {
            return Ok(());
        }
        self.node_mut(id).active = active;
        let mode = self.attach_mode(id);
        if active {
            self.pending_deactivations.remove(&id);
            let seq = self.next_seq();
            self.pending_activations
                .entry(id)
                .and_modify(|p| p.mode = mode)
                .or_insert(Pending { mode, seq });
        } else {
            self.pending_activations.remove(&id);
            if self.ancestors_active(id) {
                let seq = self.next_seq();
                self.pending_deactivations
                    .entry(id)
                    .and_modify(|p| p.mode = mode)
                    .or_insert(Pending { mode, seq });
            }
        }
        Ok(())
    }

    fn ancestors_active(&self, id: NodeId) -> bool {
        let mut current = self.node(id).parent;
        while let Some(p) = current {
            let n = self.node(p);
            if !n.active {
                return false;
            }
            current = n.parent;
        }
        true
    }

    pub(crate) fn attach_mode(&self, id: NodeId) -> AttachMode {
        if self.node(id).parent.is_some() {
            AttachMode::Child
        } else {
            AttachMode::Root
        }
    }

    /// Change the anchor of `id`.
    #[track_caller]
    pub fn set_align(&mut self, id: NodeId, align: Align) -> Result<(), TreeError> {
        check(self.live(id))?;
        self.node_mut(id).align = align;
        Ok(())
    }

    /// Rename `id`.
    #[track_caller]
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), TreeError> {
        check(self.live(id))?;
        self.node_mut(id).name = name.into();
        Ok(())
    }

    /// Replace the per-frame hooks of `id`.
    #[track_caller]
    pub fn set_behavior(&mut self, id: NodeId, behavior: impl Behavior) -> Result<(), TreeError> {
        check(self.live(id))?;
        self.node_mut(id).behavior = Some(Box::new(behavior));
        Ok(())
    }

    /// Edit the local transform of `id`.
    ///
    /// If the edit changed scale, rotation, or size, text under `id` is
    /// re-rendered before this returns. Position edits re-render nothing:
    /// global positions are computed on read.
    #[track_caller]
    pub fn edit_transform<R>(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut Transform) -> R,
    ) -> Result<R, TreeError> {
        check(self.live(id))?;
        let transform = &mut self.node_mut(id).transform;
        let out = edit(transform);
        if transform.take_changes() > 0 {
            self.refresh_subtree(id);
        }
        Ok(out)
    }

    /// Set the local position of `id`.
    #[track_caller]
    pub fn set_position(&mut self, id: NodeId, position: Vector2) -> Result<(), TreeError> {
        self.edit_transform(id, |t| t.set_position(position))
    }

    /// Set the local scale of `id`.
    #[track_caller]
    pub fn set_scale(&mut self, id: NodeId, scale: Vector2) -> Result<(), TreeError> {
        self.edit_transform(id, |t| t.set_scale(scale))
    }

    /// Set the local rotation of `id` in degrees.
    #[track_caller]
    pub fn set_rotation(&mut self, id: NodeId, degrees: f64) -> Result<(), TreeError> {
        self.edit_transform(id, |t| t.set_rotation(degrees))
    }

    /// Set the box size of `id`.
    #[track_caller]
    pub fn set_size(&mut self, id: NodeId, size: Vector2) -> Result<(), TreeError> {
        self.edit_transform(id, |t| t.set_size(size))
    }

    /// Re-render every text node in the subtree of `id`, inactive ones included.
    pub(crate) fn refresh_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current);
            stack.extend(node.children.iter().chain(node.detached.iter()).copied());
            if node.text().is_some() {
                self.render_text(current);
            }
        }
    }

    /// Returns `true` if `id` refers to a live node.
    ///
    /// A `NodeId` is live if its slot exists and its generation matches the
    /// generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    fn live(&self, id: NodeId) -> Result<(), TreeError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(TreeError::StaleNode(id))
        }
    }

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    pub(crate) fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Whether the scene has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(Option::is_none)
    }

    /// The first live node called `name`, in slot order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().enumerate().find_map(|(idx, slot)| {
            let n = slot.as_ref().filter(|n| n.name == name)?;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Slots are only ever created with 32-bit indices."
            )]
            Some(NodeId::new(idx as u32, n.generation))
        })
    }

    /// Name of a live node.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.node_opt(id).map(|n| n.name.as_str())
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Active children of a node in insertion order, or empty if stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Children owned by a node but outside its active list.
    pub fn inactive_children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.detached.as_slice()).unwrap_or(&[])
    }

    /// Active roots in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Roots outside the active list.
    pub fn inactive_roots(&self) -> &[NodeId] {
        &self.detached_roots
    }

    /// Layer-grouped active children of `parent`, or the scene's roots for
    /// `None`. `None` is also returned for a stale parent.
    pub fn layer_groups(&self, parent: Option<NodeId>) -> Option<&LayerBuckets> {
        match parent {
            Some(p) => self.node_opt(p).map(|n| &n.sorted_children),
            None => Some(&self.sorted_roots),
        }
    }

    /// Layer of a live node.
    pub fn layer_of(&self, id: NodeId) -> Option<i32> {
        self.node_opt(id).map(|n| n.layer)
    }

    /// The node's own active flag; `false` for stale ids.
    pub fn is_active(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(|n| n.active)
    }

    /// Whether the node is in its container's active list.
    pub fn is_member(&self, id: NodeId) -> bool {
        match self.node_opt(id) {
            Some(n) => match n.parent {
                Some(p) => self.children_of(p).contains(&id),
                None => self.roots.contains(&id),
            },
            None => false,
        }
    }

    /// Whether the traversals reach the node: it and every ancestor are members.
    pub fn is_reachable(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            if !self.is_member(n) {
                return false;
            }
            current = self.parent_of(n);
        }
        true
    }

    /// Pending activation of a node, if any.
    pub fn pending_activation(&self, id: NodeId) -> Option<AttachMode> {
        self.pending_activations.get(&id).map(|p| p.mode)
    }

    /// Pending deactivation of a node, if any.
    pub fn pending_deactivation(&self, id: NodeId) -> Option<AttachMode> {
        self.pending_deactivations.get(&id).map(|p| p.mode)
    }

    /// Anchor of a live node.
    pub fn align_of(&self, id: NodeId) -> Option<Align> {
        self.node_opt(id).map(|n| n.align)
    }

    /// Local transform of a live node.
    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.node_opt(id).map(|n| &n.transform)
    }

    /// The topmost ancestor of `id` (itself for roots).
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.node_opt(id).map(|_| id)?;
        while let Some(p) = self.parent_of(current) {
            current = p;
        }
        Some(current)
    }

    /// Offset contributed by the node's anchor.
    ///
    /// Roots are placed inside the screen; children are placed just outside
    /// their parent's box. Sizes are in reference pixels and are scaled by the
    /// screen's scale factor first.
    pub fn alignment_offset(&self, id: NodeId) -> Option<Vector2> {
        let n = self.node_opt(id)?;
        let scale_factor = self.screen().scale_factor();
        let size = n.transform.size() * scale_factor;
        Some(match n.parent {
            None => n.align.offset_in(self.screen().resolution(), size),
            Some(p) => {
                let parent_size = self.node(p).transform.size() * scale_factor;
                n.align.offset_outside(parent_size, size)
            }
        })
    }

    /// Screen position of the node's box:
    /// anchor offset + local position + parent's global position.
    pub fn global_position(&self, id: NodeId) -> Option<Vector2> {
        let mut total = Vector2::ZERO;
        let mut current = Some(id);
        while let Some(n) = current {
            let node = self.node_opt(n)?;
            total += self.alignment_offset(n)? + node.transform.position();
            current = node.parent;
        }
        Some(total)
    }

    /// Product of local scales from the root down to the node.
    pub fn global_scale(&self, id: NodeId) -> Option<Vector2> {
        let mut total = Vector2::ONE;
        let mut current = Some(id);
        while let Some(n) = current {
            let node = self.node_opt(n)?;
            total *= node.transform.scale();
            current = node.parent;
        }
        Some(total)
    }

    /// Sum of local rotations from the root down to the node, in degrees.
    pub fn global_rotation(&self, id: NodeId) -> Option<f64> {
        let mut total = 0.0;
        let mut current = Some(id);
        while let Some(n) = current {
            let node = self.node_opt(n)?;
            total += node.transform.rotation();
            current = node.parent;
        }
        Some(total)
    }
}

fn move_member(members: &mut Vec<NodeId>, detached: &mut Detached, id: NodeId, member: bool) -> bool {
    if member {
        if members.contains(&id) {
            return false;
        }
        detached.retain(|d| *d != id);
        members.push(id);
    } else {
        if !members.contains(&id) {
            return false;
        }
        members.retain(|m| *m != id);
        if !detached.contains(&id) {
            detached.push(id);
        }
    }
    true
}
