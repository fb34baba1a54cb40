// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scenes: node ownership, deferred activation, and the frame loop.

use std::rc::Rc;

use hashbrown::HashMap;

use arbor_text::Color;

use crate::behavior::{DrawCx, UpdateCx};
use crate::layers::LayerBuckets;
use crate::node::{Detached, Node};
use crate::platform::{Canvas, Platform, PlatformEvent};
use crate::screen::Screen;
use crate::types::{AttachMode, NodeId};

/// What a frame asks the caller to do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Keep running this scene.
    Continue,
    /// The platform asked to quit.
    Quit,
    /// A behavior asked to switch to the named scene.
    SwitchTo(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Pending {
    pub(crate) mode: AttachMode,
    pub(crate) seq: u64,
}

type InitFn = Box<dyn FnMut(&mut Scene)>;

/// A named root set of nodes with its own frame loop.
///
/// A scene owns every node created in it. Nodes are addressed by [`NodeId`]
/// and live in a generational arena; ids of destroyed nodes go stale.
///
/// Each frame runs these phases in order:
///
/// 1. clear the canvas and tick the clock;
/// 2. poll events, stopping on quit;
/// 3. update: pre-order over active members, ascending layer;
/// 4. apply pending activations, then pending deactivations;
/// 5. draw: same order as update;
/// 6. present.
///
/// Activation changes requested during a frame only alter membership lists in
/// phase 4, so update and draw always walk a stable tree.
///
/// ```rust
/// use std::rc::Rc;
///
/// use arbor_geometry::{Align, Vector2};
/// use arbor_scene::{FrameOutcome, HeadlessPlatform, NodeConfig, Scene, Screen, ScreenConfig};
/// use arbor_text::MonospaceRasterizer;
///
/// let mut platform = HeadlessPlatform::new().with_frame_limit(3);
/// let screen = Screen::open(ScreenConfig::default(), &mut platform, Rc::new(MonospaceRasterizer::default())).unwrap();
/// let mut scene = Scene::new("main", screen).with_init(|scene: &mut Scene| {
///     scene
///         .insert(None, NodeConfig::new("box").with_size(Vector2::new(20.0, 20.0)).with_align(Align::TopLeft))
///         .unwrap();
/// });
/// assert_eq!(scene.load(&mut platform), FrameOutcome::Quit);
/// assert_eq!(platform.presented(), 3);
/// assert_eq!(scene.roots().len(), 1);
/// ```
pub struct Scene {
    name: String,
    screen: Rc<Screen>,
    /// slots
    pub(crate) nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    pub(crate) generations: Vec<u32>,
    pub(crate) free_list: Vec<usize>,
    /// Active roots, in insertion order.
    pub(crate) roots: Vec<NodeId>,
    pub(crate) detached_roots: Detached,
    pub(crate) sorted_roots: LayerBuckets,
    pub(crate) pending_activations: HashMap<NodeId, Pending>,
    pub(crate) pending_deactivations: HashMap<NodeId, Pending>,
    next_seq: u64,
    loaded: bool,
    init: Option<InitFn>,
    switch_request: Option<String>,
    frames: u64,
    clear_color: Color,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("loaded", &self.loaded)
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("roots", &self.roots)
            .field("detached_roots", &self.detached_roots)
            .field("pending_activations", &self.pending_activations.len())
            .field("pending_deactivations", &self.pending_deactivations.len())
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Create an empty, unloaded scene rendering to `screen`.
    pub fn new(name: impl Into<String>, screen: Rc<Screen>) -> Self {
        Self {
            name: name.into(),
            screen,
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
            detached_roots: Detached::new(),
            sorted_roots: LayerBuckets::default(),
            pending_activations: HashMap::new(),
            pending_deactivations: HashMap::new(),
            next_seq: 0,
            loaded: false,
            init: None,
            switch_request: None,
            frames: 0,
            clear_color: Color::BLACK,
        }
    }

    /// Set the user initialization run by [`Scene::mount`].
    pub fn with_init(mut self, init: impl FnMut(&mut Self) + 'static) -> Self {
        self.init = Some(Box::new(init));
        self
    }

    /// Set the colour the canvas is cleared to each frame.
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// The scene's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The screen this scene renders to.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub(crate) fn screen_rc(&self) -> Rc<Screen> {
        Rc::clone(&self.screen)
    }

    /// Whether the scene has been mounted and not unloaded since.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Frames run since the scene was last mounted.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Run the user initialization and mark the scene loaded.
    ///
    /// A loaded scene is unloaded first, so mounting twice starts over.
    pub fn mount(&mut self) {
        if self.loaded {
            tracing::debug!(scene = %self.name, "remounting loaded scene");
            self.unload();
        }
        if let Some(mut init) = self.init.take() {
            init(self);
            self.init = Some(init);
        }
        self.loaded = true;
        self.frames = 0;
        tracing::info!(scene = %self.name, roots = self.roots.len(), "scene mounted");
    }

    /// Mount the scene, then run its frame loop.
    pub fn load(&mut self, platform: &mut dyn Platform) -> FrameOutcome {
        self.mount();
        self.run(platform)
    }

    /// Destroy every root, active or not, and discard pending changes.
    pub fn unload(&mut self) {
        let roots: Vec<NodeId> = self
            .roots
            .iter()
            .chain(self.detached_roots.iter())
            .copied()
            .collect();
        for root in roots {
            let _ = self.destroy(root);
        }
        self.roots.clear();
        self.detached_roots.clear();
        self.sorted_roots.clear();
        self.pending_activations.clear();
        self.pending_deactivations.clear();
        self.switch_request = None;
        self.loaded = false;
        tracing::info!(scene = %self.name, "scene unloaded");
    }

    /// Run frames until one returns something other than
    /// [`FrameOutcome::Continue`].
    pub fn run(&mut self, platform: &mut dyn Platform) -> FrameOutcome {
        loop {
            match self.step_frame(platform) {
                FrameOutcome::Continue => {}
                outcome => return outcome,
            }
        }
    }

    /// Run a single frame.
    pub fn step_frame(&mut self, platform: &mut dyn Platform) -> FrameOutcome {
        let _span = tracing::trace_span!("frame", scene = %self.name, frame = self.frames).entered();

        platform.canvas().clear(self.clear_color);
        let delta_time = platform.tick(self.screen.refresh_rate());
        self.screen.record_frame(delta_time, platform.estimated_rate());

        if platform
            .poll_events()
            .iter()
            .any(|event| matches!(event, PlatformEvent::Quit))
        {
            tracing::info!(scene = %self.name, frame = self.frames, "quit requested");
            return FrameOutcome::Quit;
        }

        self.update();
        self.apply_pending();
        self.draw(platform.canvas());
        platform.present();
        self.frames += 1;

        match self.switch_request.take() {
            Some(next) => FrameOutcome::SwitchTo(next),
            None => FrameOutcome::Continue,
        }
    }

    /// Ask for a switch to the scene called `name` at the end of the frame.
    pub fn request_switch(&mut self, name: impl Into<String>) {
        let name = name.into();
        tracing::debug!(scene = %self.name, next = %name, "scene switch requested");
        self.switch_request = Some(name);
    }

    /// Run behavior update hooks over the active tree.
    ///
    /// Roots and children are visited in ascending layer order, parents before
    /// children. The order is taken from the membership lists as they stand
    /// when each list is reached; nodes destroyed mid-traversal are skipped.
    pub fn update(&mut self) {
        for root in self.sorted_roots.snapshot() {
            self.update_node(root);
        }
    }

    fn update_node(&mut self, id: NodeId) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if let Some(mut behavior) = node.behavior.take() {
            behavior.update(&mut UpdateCx {
                scene: self,
                node: id,
            });
            if let Some(node) = self.node_opt_mut(id)
                && node.behavior.is_none()
            {
                node.behavior = Some(behavior);
            }
        }
        let Some(node) = self.node_opt(id) else {
            return;
        };
        for child in node.sorted_children.snapshot() {
            self.update_node(child);
        }
    }

    /// Draw the active tree to `canvas`.
    ///
    /// Each node draws its own content, then runs its behavior's draw hook,
    /// then draws its children.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for root in self.sorted_roots.iter() {
            self.draw_node(root, canvas);
        }
    }

    fn draw_node(&self, id: NodeId, canvas: &mut dyn Canvas) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        if let Some(text) = node.text()
            && let Some(at) = self.render_position(id)
        {
            canvas.blit_text(text.surface(), at);
        }
        if let Some(behavior) = &node.behavior {
            behavior.draw(&DrawCx { scene: self, node: id }, canvas);
        }
        for child in node.sorted_children.iter() {
            self.draw_node(child, canvas);
        }
    }

    pub(crate) fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Apply queued activation changes: activations first, then
    /// deactivations, each in request order.
    ///
    /// Activated nodes are appended to their container's active list, so
    /// they are visited last within their layer.
    ///
    /// The frame loop calls this after the update traversal; it is public for
    /// driving a scene by hand.
    pub fn apply_pending(&mut self) {
        for (id, pending) in drain_in_order(&mut self.pending_activations) {
            self.apply_activation(id, pending.mode);
        }
        for (id, pending) in drain_in_order(&mut self.pending_deactivations) {
            self.apply_deactivation(id, pending.mode);
        }
    }

    fn apply_activation(&mut self, id: NodeId, mode: AttachMode) {
        if !self.is_alive(id) {
            return;
        }
        self.warn_if_moved(id, mode);
        self.set_membership(id, true);
        self.reconcile_subtree(id);
    }

    fn apply_deactivation(&mut self, id: NodeId, mode: AttachMode) {
        if !self.is_alive(id) {
            return;
        }
        self.warn_if_moved(id, mode);
        self.set_membership(id, false);
    }

    fn warn_if_moved(&self, id: NodeId, mode: AttachMode) {
        if self.attach_mode(id) != mode {
            tracing::debug!(
                scene = %self.name,
                ?id,
                requested = ?mode,
                "node moved since activation change was requested; using current placement"
            );
        }
    }

    /// Detach inactive members under a node that just became reachable.
    ///
    /// While a node is out of its active list, changes to its descendants'
    /// active flags are not queued, so their membership may be stale. Members
    /// with a queued deactivation are left for the drain.
    pub(crate) fn reconcile_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let children = self.node(current).children.clone();
            for child in children {
                if self.node(child).active || self.pending_deactivations.contains_key(&child) {
                    stack.push(child);
                } else {
                    self.set_membership(child, false);
                }
            }
        }
    }
}

fn drain_in_order(map: &mut HashMap<NodeId, Pending>) -> Vec<(NodeId, Pending)> {
    let mut drained: Vec<_> = map.drain().collect();
    drained.sort_by_key(|(_, pending)| pending.seq);
    drained
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;

    use arbor_geometry::Vector2;

    use super::*;
    use crate::behavior::{Behavior, UpdateFn};
    use crate::testing;
    use crate::types::{NodeConfig, TextConfig};

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn recorder(name: &'static str, log: &Log) -> impl Behavior {
        let log = Rc::clone(log);
        UpdateFn(move |_cx: &mut UpdateCx<'_>| log.borrow_mut().push(name))
    }

    #[test]
    fn deactivation_waits_for_the_drain() {
        let (mut scene, _platform, _fonts) = testing::scene();
        let log = Log::default();
        let root = scene.insert(None, NodeConfig::new("root")).unwrap();
        let a = scene.insert(Some(root), NodeConfig::new("a")).unwrap();
        let b = scene
            .insert(Some(root), NodeConfig::new("b").with_behavior(recorder("b", &log)))
            .unwrap();
        let log_a = Rc::clone(&log);
        scene
            .set_behavior(
                a,
                UpdateFn(move |cx: &mut UpdateCx<'_>| {
                    log_a.borrow_mut().push("a");
                    if cx.scene().is_active(b) {
                        cx.scene_mut().set_active(b, false).unwrap();
                        assert!(cx.scene().is_member(b), "membership unchanged mid-update");
                    }
                }),
            )
            .unwrap();

        scene.update();
        assert_eq!(*log.borrow(), vec!["a", "b"], "b still visited this frame");
        assert_eq!(scene.pending_deactivation(b), Some(AttachMode::Child));

        scene.apply_pending();
        assert!(!scene.is_member(b));
        assert_eq!(scene.inactive_children_of(root), &[b]);

        log.borrow_mut().clear();
        scene.update();
        assert_eq!(*log.borrow(), vec!["a"]);
    }

    #[test]
    fn activation_waits_for_the_drain() {
        let (mut scene, _platform, _fonts) = testing::scene();
        let log = Log::default();
        let sleeper = scene
            .insert(
                None,
                NodeConfig::new("sleeper")
                    .with_active(false)
                    .with_behavior(recorder("sleeper", &log)),
            )
            .unwrap();
        let log_w = Rc::clone(&log);
        scene
            .insert(
                None,
                NodeConfig::new("waker").with_behavior(UpdateFn(move |cx: &mut UpdateCx<'_>| {
                    log_w.borrow_mut().push("waker");
                    cx.scene_mut().set_active(sleeper, true).unwrap();
                })),
            )
            .unwrap();

        scene.update();
        assert_eq!(*log.borrow(), vec!["waker"]);
        assert_eq!(scene.pending_activation(sleeper), Some(AttachMode::Root));
        assert!(!scene.is_member(sleeper));

        scene.apply_pending();
        assert!(scene.is_member(sleeper));
        log.borrow_mut().clear();
        scene.update();
        assert_eq!(*log.borrow(), vec!["waker", "sleeper"], "reactivated root rejoins at the end");
    }

    #[test]
    fn toggles_during_update_show_in_the_same_frame() {
        let (mut scene, mut platform, _fonts) = testing::scene();
        let text = |s: &str| TextConfig::new(s).with_font_size(10.0);
        let shown = scene
            .insert_text(None, NodeConfig::new("shown"), text("ab"))
            .unwrap();
        let hidden = scene
            .insert_text(None, NodeConfig::new("hidden").with_active(false), text("abcd"))
            .unwrap();
        scene
            .insert(
                None,
                NodeConfig::new("switch").with_behavior(UpdateFn(move |cx: &mut UpdateCx<'_>| {
                    let scene = cx.scene_mut();
                    if scene.is_active(shown) {
                        scene.set_active(shown, false).unwrap();
                        scene.set_active(hidden, true).unwrap();
                    }
                })),
            )
            .unwrap();

        assert_eq!(scene.step_frame(&mut platform), FrameOutcome::Continue);
        let widths: Vec<f64> = platform.last_frame_text().map(|(s, _)| s.size().x).collect();
        assert_eq!(widths, vec![20.0], "only the newly active text is drawn");
        assert!(scene.is_member(hidden) && !scene.is_member(shown));
    }

    #[test]
    fn opposite_requests_cancel() {
        let (mut scene, _platform, _fonts) = testing::scene();
        let n = scene.insert(None, NodeConfig::new("n")).unwrap();
        scene.set_active(n, false).unwrap();
        scene.set_active(n, true).unwrap();
        assert!(scene.pending_deactivation(n).is_none());
        scene.apply_pending();
        assert!(scene.is_member(n));

        let m = scene
            .insert(None, NodeConfig::new("m").with_active(false))
            .unwrap();
        scene.set_active(m, true).unwrap();
        scene.set_active(m, false).unwrap();
        assert!(scene.pending_activation(m).is_none());
        scene.apply_pending();
        assert!(!scene.is_member(m));
        assert_eq!(scene.inactive_roots(), &[m]);
    }

    #[test]
    fn reactivated_ancestor_drops_stale_members() {
        let (mut scene, _platform, _fonts) = testing::scene();
        let parent = scene.insert(None, NodeConfig::new("parent")).unwrap();
        let child = scene.insert(Some(parent), NodeConfig::new("child")).unwrap();

        scene.set_active(parent, false).unwrap();
        scene.apply_pending();
        assert!(!scene.is_reachable(child));

        scene.set_active(child, false).unwrap();
        assert!(scene.pending_deactivation(child).is_none(), "not queued under inactive ancestor");
        assert!(scene.is_member(child));

        scene.set_active(parent, true).unwrap();
        scene.apply_pending();
        assert!(scene.is_member(parent));
        assert!(!scene.is_member(child));
        assert_eq!(scene.inactive_children_of(parent), &[child]);
    }

    #[test]
    fn behavior_may_destroy_its_own_node() {
        let (mut scene, _platform, _fonts) = testing::scene();
        let doomed = scene
            .insert(
                None,
                NodeConfig::new("doomed").with_behavior(UpdateFn(|cx: &mut UpdateCx<'_>| {
                    let me = cx.node();
                    cx.scene_mut().destroy(me).unwrap();
                })),
            )
            .unwrap();
        let _child = scene.insert(Some(doomed), NodeConfig::new("child")).unwrap();
        scene.update();
        assert!(!scene.is_alive(doomed));
        assert!(scene.is_empty());
    }

    #[test]
    fn frame_draws_active_text_in_layer_order() {
        let (mut scene, mut platform, _fonts) = testing::scene();
        let text = |s: &str| TextConfig::new(s).with_font_size(10.0);
        let high = scene
            .insert_text(None, NodeConfig::new("high").on_layer(1), text("high"))
            .unwrap();
        let low = scene
            .insert_text(None, NodeConfig::new("low"), text("lo"))
            .unwrap();
        let hidden = scene
            .insert_text(None, NodeConfig::new("hidden").with_active(false), text("x"))
            .unwrap();

        assert_eq!(scene.step_frame(&mut platform), FrameOutcome::Continue);
        let widths: Vec<f64> = platform.last_frame_text().map(|(s, _)| s.size().x).collect();
        assert_eq!(widths, vec![10.0, 20.0], "layer 0 before layer 1, inactive skipped");
        let first = platform.last_frame_text().next().map(|(_, at)| at);
        assert_eq!(first, scene.render_position(low));
        assert!(scene.is_alive(high) && scene.is_alive(hidden));
        assert_eq!(platform.presented(), 1);
        assert_eq!(scene.frame_count(), 1);
    }

    #[test]
    fn frame_records_timing_and_stops_on_quit() {
        let (mut scene, mut platform, _fonts) = testing::scene();
        platform.push_frame_events(vec![]);
        platform.push_frame_events(vec![PlatformEvent::Quit]);
        assert_eq!(scene.step_frame(&mut platform), FrameOutcome::Continue);
        assert!((scene.screen().delta_time() - 1.0 / 60.0).abs() < 1e-12);
        assert!((scene.screen().fps() - 60.0).abs() < 1e-9);
        assert_eq!(scene.step_frame(&mut platform), FrameOutcome::Quit);
        assert_eq!(platform.presented(), 1, "quit frame is not presented");
    }

    #[test]
    fn switch_request_ends_the_frame_loop() {
        let (mut scene, mut platform, _fonts) = testing::scene();
        scene
            .insert(
                None,
                NodeConfig::new("door").with_behavior(UpdateFn(|cx: &mut UpdateCx<'_>| {
                    cx.switch_scene("next");
                })),
            )
            .unwrap();
        assert_eq!(scene.run(&mut platform), FrameOutcome::SwitchTo("next".into()));
        assert_eq!(platform.presented(), 1);
    }

    #[test]
    fn mount_and_unload_cycle() {
        let (scene, _platform, _fonts) = testing::scene();
        let mut scene = scene.with_init(|scene: &mut Scene| {
            let root = scene.insert(None, NodeConfig::new("root")).unwrap();
            scene
                .insert(Some(root), NodeConfig::new("child").at(Vector2::new(1.0, 1.0)))
                .unwrap();
            let idle = scene
                .insert(None, NodeConfig::new("idle").with_active(false))
                .unwrap();
            scene.set_active(idle, true).unwrap();
        });

        scene.mount();
        assert!(scene.is_loaded());
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.roots().len(), 1);

        scene.mount();
        assert_eq!(scene.len(), 3, "remounting starts over");

        scene.unload();
        assert!(!scene.is_loaded());
        assert!(scene.is_empty());
        assert!(scene.roots().is_empty() && scene.inactive_roots().is_empty());
        assert!(scene.pending_activations.is_empty());
    }
}
