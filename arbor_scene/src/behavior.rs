// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node frame hooks.

use crate::platform::Canvas;
use crate::scene::Scene;
use crate::screen::Screen;
use crate::types::NodeId;

/// Hooks run for a node during the update and draw traversals.
///
/// Both hooks default to doing nothing. A node's hooks only run while the node
/// is a member of its parent's (or the scene's) active list.
pub trait Behavior: 'static {
    /// Called once per frame, before activation changes are applied.
    ///
    /// The scene may be mutated freely through `cx`; activation changes made
    /// here take effect after the traversal finishes.
    fn update(&mut self, cx: &mut UpdateCx<'_>) {
        let _ = cx;
    }

    /// Called once per frame after the node's own content is drawn and before
    /// its children.
    fn draw(&self, cx: &DrawCx<'_>, canvas: &mut dyn Canvas) {
        let _ = (cx, canvas);
    }
}

/// Context handed to [`Behavior::update`].
pub struct UpdateCx<'a> {
    pub(crate) scene: &'a mut Scene,
    pub(crate) node: NodeId,
}

impl core::fmt::Debug for UpdateCx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UpdateCx")
            .field("scene", &self.scene.name())
            .field("node", &self.node)
            .finish()
    }
}

impl UpdateCx<'_> {
    /// The node being updated.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// The scene, mutably.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }

    /// The screen the scene renders to.
    pub fn screen(&self) -> &Screen {
        self.scene.screen()
    }

    /// Seconds elapsed during the current frame.
    pub fn delta_time(&self) -> f64 {
        self.scene.screen().delta_time()
    }

    /// Ask the scene manager to switch to another scene after this frame.
    pub fn switch_scene(&mut self, name: impl Into<String>) {
        self.scene.request_switch(name);
    }
}

/// Context handed to [`Behavior::draw`].
pub struct DrawCx<'a> {
    pub(crate) scene: &'a Scene,
    pub(crate) node: NodeId,
}

impl core::fmt::Debug for DrawCx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DrawCx")
            .field("scene", &self.scene.name())
            .field("node", &self.node)
            .finish()
    }
}

impl DrawCx<'_> {
    /// The node being drawn.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// The screen the scene renders to.
    pub fn screen(&self) -> &Screen {
        self.scene.screen()
    }
}

/// A [`Behavior`] with only an update hook, built from a closure.
///
/// ```rust
/// use arbor_scene::{NodeConfig, UpdateFn};
///
/// let config = NodeConfig::new("spinner").with_behavior(UpdateFn(|cx: &mut arbor_scene::UpdateCx<'_>| {
///     let node = cx.node();
///     let dt = cx.delta_time();
///     let _ = cx.scene_mut().edit_transform(node, |t| t.set_rotation(t.rotation() + 90.0 * dt));
/// }));
/// assert!(config.behavior.is_some());
/// ```
pub struct UpdateFn<F>(pub F);

impl<F> core::fmt::Debug for UpdateFn<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("UpdateFn")
    }
}

impl<F> Behavior for UpdateFn<F>
where
    F: FnMut(&mut UpdateCx<'_>) + 'static,
{
    fn update(&mut self, cx: &mut UpdateCx<'_>) {
        (self.0)(cx);
    }
}
