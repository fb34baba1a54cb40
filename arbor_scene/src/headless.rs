// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic platform that records draw calls instead of drawing.
//!
//! Time advances by a fixed step per tick, events are scripted per frame, and
//! each presented frame's draw commands are kept for inspection.

use std::collections::VecDeque;

use arbor_geometry::Vector2;
use arbor_text::{Color, TextSurface};

use crate::error::PlatformError;
use crate::platform::{Canvas, Platform, PlatformEvent, WindowSpec};

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// The target was cleared.
    Clear(Color),
    /// A text surface was drawn at a position.
    Text {
        /// The surface drawn.
        surface: TextSurface,
        /// Its top-left corner.
        at: Vector2,
    },
    /// A rectangle was filled.
    Rect {
        /// Top-left corner.
        origin: Vector2,
        /// Extent.
        size: Vector2,
        /// Fill colour.
        color: Color,
    },
}

/// A canvas that records commands.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    /// Commands recorded since the last [`RecordingCanvas::take`].
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Remove and return the recorded commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        core::mem::take(&mut self.commands)
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn blit_text(&mut self, surface: &TextSurface, at: Vector2) {
        self.commands.push(DrawCommand::Text {
            surface: surface.clone(),
            at,
        });
    }

    fn fill_rect(&mut self, origin: Vector2, size: Vector2, color: Color) {
        self.commands.push(DrawCommand::Rect {
            origin,
            size,
            color,
        });
    }
}

/// A windowless [`Platform`].
#[derive(Debug)]
pub struct HeadlessPlatform {
    display: Vector2,
    system_rate: Option<f64>,
    step: Option<f64>,
    window: Option<(String, Vector2)>,
    script: VecDeque<Vec<PlatformEvent>>,
    frame_limit: Option<u64>,
    ticks: u64,
    last_delta: f64,
    canvas: RecordingCanvas,
    last_frame: Vec<DrawCommand>,
    presented: u64,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlatform {
    /// A 1920x1080 display at 60 Hz; each tick advances by `1 / target_rate`.
    pub fn new() -> Self {
        Self {
            display: Vector2::new(1920.0, 1080.0),
            system_rate: Some(60.0),
            step: None,
            window: None,
            script: VecDeque::new(),
            frame_limit: None,
            ticks: 0,
            last_delta: 0.0,
            canvas: RecordingCanvas::default(),
            last_frame: Vec::new(),
            presented: 0,
        }
    }

    /// Set the display resolution.
    pub fn with_display(mut self, resolution: Vector2) -> Self {
        self.display = resolution;
        self
    }

    /// Set the display refresh rate.
    pub fn with_system_refresh_rate(mut self, rate: Option<f64>) -> Self {
        self.system_rate = rate;
        self
    }

    /// Advance time by a fixed `seconds` per tick regardless of the target rate.
    pub fn with_fixed_step(mut self, seconds: f64) -> Self {
        self.step = Some(seconds);
        self
    }

    /// Deliver a quit event on the poll of frame `frames` (zero-based), so
    /// exactly `frames` frames complete.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Queue the events delivered by the next unscripted frame.
    pub fn push_frame_events(&mut self, events: Vec<PlatformEvent>) {
        self.script.push_back(events);
    }

    /// Title of the open window.
    pub fn window_title(&self) -> Option<&str> {
        self.window.as_ref().map(|(title, _)| title.as_str())
    }

    /// Size of the open window.
    pub fn window_size(&self) -> Option<Vector2> {
        self.window.as_ref().map(|(_, size)| *size)
    }

    /// Number of frames presented.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Draw commands of the most recently presented frame.
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    /// Text draws of the most recently presented frame.
    pub fn last_frame_text(&self) -> impl Iterator<Item = (&TextSurface, Vector2)> + '_ {
        self.last_frame.iter().filter_map(|c| match c {
            DrawCommand::Text { surface, at } => Some((surface, *at)),
            _ => None,
        })
    }
}

impl Platform for HeadlessPlatform {
    fn window_open(&self) -> bool {
        self.window.is_some()
    }

    fn open_window(&mut self, spec: &WindowSpec<'_>) -> Result<(), PlatformError> {
        if spec.resolution.x <= 0.0 || spec.resolution.y <= 0.0 {
            return Err(PlatformError::WindowCreation(format!(
                "unusable window size {}",
                spec.resolution
            )));
        }
        self.window = Some((spec.title.to_owned(), spec.resolution));
        Ok(())
    }

    fn display_resolution(&self) -> Vector2 {
        self.display
    }

    fn system_refresh_rate(&self) -> Option<f64> {
        self.system_rate
    }

    fn tick(&mut self, target_rate: f64) -> f64 {
        self.ticks += 1;
        self.last_delta = self.step.unwrap_or(if target_rate > 0.0 {
            1.0 / target_rate
        } else {
            0.0
        });
        self.last_delta
    }

    fn estimated_rate(&self) -> f64 {
        if self.last_delta > 0.0 {
            1.0 / self.last_delta
        } else {
            0.0
        }
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        let mut events = self.script.pop_front().unwrap_or_default();
        if self.frame_limit.is_some_and(|limit| self.presented >= limit) {
            events.push(PlatformEvent::Quit);
        }
        events
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        &mut self.canvas
    }

    fn present(&mut self) {
        self.last_frame = self.canvas.take();
        self.presented += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_limit_quits_after_presenting() {
        let mut p = HeadlessPlatform::new().with_frame_limit(1);
        assert!(p.poll_events().is_empty());
        p.canvas().clear(Color::BLACK);
        p.present();
        assert_eq!(p.last_frame(), &[DrawCommand::Clear(Color::BLACK)]);
        assert_eq!(p.poll_events(), vec![PlatformEvent::Quit]);
    }

    #[test]
    fn tick_follows_target_unless_fixed() {
        let mut p = HeadlessPlatform::new();
        assert_eq!(p.tick(50.0), 0.02);
        assert!((p.estimated_rate() - 50.0).abs() < 1e-9);
        let mut p = HeadlessPlatform::new().with_fixed_step(0.5);
        assert_eq!(p.tick(50.0), 0.5);
    }

    #[test]
    fn scripted_events_are_delivered_in_order() {
        let mut p = HeadlessPlatform::new();
        p.push_frame_events(vec![PlatformEvent::Other("key".into())]);
        p.push_frame_events(vec![PlatformEvent::Quit]);
        assert_eq!(p.poll_events(), vec![PlatformEvent::Other("key".into())]);
        assert_eq!(p.poll_events(), vec![PlatformEvent::Quit]);
        assert!(p.poll_events().is_empty());
    }
}
