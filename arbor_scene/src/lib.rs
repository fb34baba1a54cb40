// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Scene: a retained-mode scene graph for resolution-independent 2D UIs.
//!
//! - A [`Scene`] owns a tree of nodes addressed by generational [`NodeId`]s.
//!   Each node has a local [`Transform`](arbor_geometry::Transform), an
//!   [`Align`](arbor_geometry::Align) anchor, a layer, and an active flag.
//! - Roots are anchored inside the [`Screen`]; children are anchored just
//!   outside their parent's box. Global position, scale, and rotation are
//!   composed down the tree on read.
//! - Node sizes are authored against a reference resolution and scaled by the
//!   screen's scale factor, so layouts keep their proportions on any window.
//! - Text nodes keep a rendered surface cached and re-render whenever their
//!   content or any ancestor's scale, rotation, or size changes.
//! - Activation changes are deferred: membership lists only change between the
//!   update and draw traversals of a frame.
//! - A [`SceneManager`] holds named scenes and switches between them.
//!
//! The host system sits behind the [`Platform`] and [`Canvas`] traits.
//! [`HeadlessPlatform`] implements them without a window for tests and batch
//! runs.
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use arbor_geometry::{Align, Vector2};
//! use arbor_scene::{HeadlessPlatform, NodeConfig, Scene, Screen, ScreenConfig};
//! use arbor_text::MonospaceRasterizer;
//!
//! let mut platform = HeadlessPlatform::new();
//! let screen = Screen::open(
//!     ScreenConfig { resolution: Vector2::new(1280.0, 720.0), ..ScreenConfig::default() },
//!     &mut platform,
//!     Rc::new(MonospaceRasterizer::default()),
//! )
//! .unwrap();
//! let mut scene = Scene::new("demo", screen);
//!
//! let panel = scene
//!     .insert(None, NodeConfig::new("panel").with_size(Vector2::new(200.0, 200.0)).with_align(Align::TopLeft))
//!     .unwrap();
//! let badge = scene
//!     .insert(Some(panel), NodeConfig::new("badge").with_align(Align::Right))
//!     .unwrap();
//!
//! assert_eq!(scene.global_position(panel), Some(Vector2::ZERO));
//! assert_eq!(scene.global_position(badge), Some(Vector2::new(200.0, 0.0)));
//! ```
//!
//! Recoverable misuse, such as adding a child twice, is reported through
//! [`diagnostics`] and leaves the tree unchanged.

pub mod diagnostics;

mod behavior;
mod error;
mod headless;
mod layers;
mod manager;
mod node;
mod platform;
mod scene;
mod screen;
mod text;
mod tree;
mod types;

pub use behavior::{Behavior, DrawCx, UpdateCx, UpdateFn};
pub use error::{PlatformError, SetupError, TreeError};
pub use headless::{DrawCommand, HeadlessPlatform, RecordingCanvas};
pub use layers::LayerBuckets;
pub use manager::SceneManager;
pub use node::TextNode;
pub use platform::{Canvas, Platform, PlatformEvent, WindowSpec};
pub use scene::{FrameOutcome, Scene};
pub use screen::{DEFAULT_REFRESH_RATE, Screen, ScreenConfig, WindowFlags, scale_factor};
pub use types::{AttachMode, NodeConfig, NodeId, TextConfig};

#[cfg(test)]
pub(crate) mod testing {
    use std::rc::Rc;

    use arbor_geometry::Vector2;
    use arbor_text::MonospaceRasterizer;

    use crate::{HeadlessPlatform, Scene, Screen, ScreenConfig};

    /// A scene on a fresh headless platform with a 1280x720 window and no scaling.
    pub(crate) fn scene() -> (Scene, HeadlessPlatform, Rc<MonospaceRasterizer>) {
        scene_with(ScreenConfig {
            resolution: Vector2::new(1280.0, 720.0),
            ..ScreenConfig::default()
        })
    }

    pub(crate) fn scene_with(config: ScreenConfig) -> (Scene, HeadlessPlatform, Rc<MonospaceRasterizer>) {
        let mut platform = HeadlessPlatform::new();
        let fonts = Rc::new(MonospaceRasterizer::default());
        let screen = Screen::open(config, &mut platform, fonts.clone()).unwrap();
        (Scene::new("test", screen), platform, fonts)
    }
}
