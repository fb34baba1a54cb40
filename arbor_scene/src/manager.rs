// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A registry of named scenes with at most one loaded at a time.

use std::rc::Rc;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::error::SetupError;
use crate::platform::Platform;
use crate::scene::{FrameOutcome, Scene};
use crate::screen::Screen;

/// Named scenes sharing one screen.
///
/// Activating a scene unloads the previously active one first, so only one
/// scene holds nodes at any time.
pub struct SceneManager {
    screen: Rc<Screen>,
    scenes: HashMap<String, Scene>,
    active: Option<String>,
}

impl core::fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut names: Vec<&str> = self.scenes.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("SceneManager")
            .field("scenes", &names)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl SceneManager {
    /// An empty manager for scenes rendering to `screen`.
    pub fn new(screen: Rc<Screen>) -> Self {
        Self {
            screen,
            scenes: HashMap::new(),
            active: None,
        }
    }

    /// The shared screen.
    pub fn screen(&self) -> &Rc<Screen> {
        &self.screen
    }

    /// Register a scene built by `init`, replacing any scene of the same name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        init: impl FnMut(&mut Scene) + 'static,
    ) -> &mut Scene {
        let name = name.into();
        let scene = Scene::new(name.clone(), Rc::clone(&self.screen)).with_init(init);
        self.insert(scene)
    }

    /// Register an already-built scene, replacing any scene of the same name.
    pub fn insert(&mut self, scene: Scene) -> &mut Scene {
        let name = scene.name().to_owned();
        if self.active.as_deref() == Some(name.as_str()) {
            tracing::warn!(scene = %name, "replacing the active scene");
            self.active = None;
        }
        match self.scenes.entry(name) {
            Entry::Occupied(mut slot) => {
                tracing::debug!(scene = %slot.key(), "scene replaced");
                slot.insert(scene);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(scene),
        }
    }

    /// Whether a scene called `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// The scene called `name`.
    pub fn get(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name)
    }

    /// The scene called `name`, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.get_mut(name)
    }

    /// Name of the loaded scene.
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The loaded scene.
    pub fn active(&self) -> Option<&Scene> {
        self.scenes.get(self.active.as_deref()?)
    }

    /// The loaded scene, mutably.
    pub fn active_mut(&mut self) -> Option<&mut Scene> {
        self.scenes.get_mut(self.active.as_deref()?)
    }

    /// Unload the current scene and mount the scene called `name`.
    pub fn activate(&mut self, name: &str) -> Result<&mut Scene, SetupError> {
        if !self.scenes.contains_key(name) {
            tracing::error!(scene = %name, "cannot activate unknown scene");
            return Err(SetupError::UnknownScene(name.to_owned()));
        }
        self.unload_active();
        let scene = self
            .scenes
            .get_mut(name)
            .ok_or_else(|| SetupError::UnknownScene(name.to_owned()))?;
        scene.mount();
        self.active = Some(name.to_owned());
        Ok(scene)
    }

    /// Unload the current scene, if any.
    pub fn unload_active(&mut self) {
        if let Some(previous) = self.active.take()
            && let Some(scene) = self.scenes.get_mut(previous.as_str())
        {
            scene.unload();
        }
    }

    /// Activate `name` and run it, following scene switches, until the
    /// platform asks to quit. The last scene is unloaded before returning.
    pub fn load_scene(&mut self, name: &str, platform: &mut dyn Platform) -> Result<(), SetupError> {
        let mut next = name.to_owned();
        loop {
            let outcome = self.activate(&next)?.run(platform);
            match outcome {
                FrameOutcome::SwitchTo(target) => {
                    tracing::info!(from = %next, to = %target, "switching scenes");
                    next = target;
                }
                FrameOutcome::Quit | FrameOutcome::Continue => {
                    self.unload_active();
                    return Ok(());
                }
            }
        }
    }
}
