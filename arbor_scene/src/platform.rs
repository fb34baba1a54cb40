// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary to the host windowing and drawing system.

use std::path::Path;

use arbor_geometry::Vector2;
use arbor_text::{Color, TextSurface};

use crate::error::PlatformError;
use crate::screen::WindowFlags;

/// Parameters for opening the single window.
#[derive(Copy, Clone, Debug)]
pub struct WindowSpec<'a> {
    /// Caption.
    pub title: &'a str,
    /// Optional icon image.
    pub icon: Option<&'a Path>,
    /// Window size in pixels.
    pub resolution: Vector2,
    /// Window creation flags.
    pub flags: WindowFlags,
    /// Whether presentation waits for vertical sync.
    pub vsync: bool,
}

/// Events delivered by the platform's event queue.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum PlatformEvent {
    /// The user asked to close the window.
    Quit,
    /// The window was resized to the given size.
    ///
    /// Scenes ignore this event; layout stays tied to the resolution the
    /// screen was opened with. It is delivered for platform implementations
    /// and hosts that drive frames themselves.
    Resized(Vector2),
    /// Any other event, identified by a platform-specific name.
    Other(String),
}

/// A drawing target for one frame.
pub trait Canvas {
    /// Fill the whole target.
    fn clear(&mut self, color: Color);

    /// Draw a rendered text surface with its top-left corner at `at`.
    fn blit_text(&mut self, surface: &TextSurface, at: Vector2);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, origin: Vector2, size: Vector2, color: Color);
}

/// Window, clock, event queue, and drawing surface.
pub trait Platform {
    /// Whether a window has already been opened.
    fn window_open(&self) -> bool;

    /// Open the window.
    fn open_window(&mut self, spec: &WindowSpec<'_>) -> Result<(), PlatformError>;

    /// Resolution of the primary display.
    fn display_resolution(&self) -> Vector2;

    /// Refresh rate of the primary display, when known.
    fn system_refresh_rate(&self) -> Option<f64>;

    /// Wait so that frames run at most at `target_rate` per second, and return
    /// the seconds elapsed since the previous tick.
    fn tick(&mut self, target_rate: f64) -> f64;

    /// Measured frame rate over recent ticks.
    fn estimated_rate(&self) -> f64;

    /// Drain pending events.
    fn poll_events(&mut self) -> Vec<PlatformEvent>;

    /// The surface drawn to this frame.
    fn canvas(&mut self) -> &mut dyn Canvas;

    /// Present the frame.
    fn present(&mut self);
}
