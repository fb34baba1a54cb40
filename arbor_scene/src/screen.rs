// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The window: resolution, scale factor, frame timing, and font access.

use core::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use arbor_geometry::Vector2;
use arbor_text::FontRasterizer;

use crate::error::SetupError;
use crate::platform::{Platform, WindowSpec};

/// Frame rate used when neither the configuration nor the display gives one.
pub const DEFAULT_REFRESH_RATE: f64 = 60.0;

bitflags::bitflags! {
    /// Window creation flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        /// Take over the whole display.
        const FULLSCREEN    = 0b0000_0001;
        /// The user may resize the window.
        const RESIZABLE     = 0b0000_0010;
        /// No title bar or border.
        const NO_FRAME      = 0b0000_0100;
        /// Double-buffered presentation.
        const DOUBLE_BUFFER = 0b0000_1000;
        /// Prefer a hardware surface.
        const HARDWARE      = 0b0001_0000;
        /// Let the platform scale the surface to the window.
        const SCALED        = 0b0010_0000;
    }
}

/// Options for opening a [`Screen`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenConfig {
    /// Window caption.
    pub title: String,
    /// Optional icon image.
    pub icon: Option<PathBuf>,
    /// Resolution node sizes are authored against. `None` uses the actual
    /// resolution, i.e. a scale factor of 1.
    pub reference_resolution: Option<Vector2>,
    /// Window size. A zero vector uses the display's resolution.
    pub resolution: Vector2,
    /// Weight of the vertical ratio in the scale factor, in `0.0..=1.0`.
    pub priority: f64,
    /// Target frame rate. `None` uses the display's refresh rate, or
    /// [`DEFAULT_REFRESH_RATE`] if that is unknown.
    pub refresh_rate: Option<u32>,
    /// Window creation flags.
    pub flags: WindowFlags,
    /// Wait for vertical sync on present.
    pub vsync: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            title: String::from("Arbor Window"),
            icon: None,
            reference_resolution: None,
            resolution: Vector2::new(480.0, 480.0),
            priority: 0.5,
            refresh_rate: None,
            flags: WindowFlags::empty(),
            vsync: false,
        }
    }
}

/// The single window of an application.
///
/// Fixed at open: resolution, reference resolution, priority, and the derived
/// scale factor. Updated once per frame by the loop: delta time and frame rate.
pub struct Screen {
    title: String,
    resolution: Vector2,
    reference_resolution: Vector2,
    priority: f64,
    scale_factor: f64,
    refresh_rate: f64,
    flags: WindowFlags,
    vsync: bool,
    fonts: Rc<dyn FontRasterizer>,
    delta_time: Cell<f64>,
    fps: Cell<f64>,
    frames: Cell<u64>,
}

impl core::fmt::Debug for Screen {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Screen")
            .field("title", &self.title)
            .field("resolution", &self.resolution)
            .field("reference_resolution", &self.reference_resolution)
            .field("priority", &self.priority)
            .field("scale_factor", &self.scale_factor)
            .field("refresh_rate", &self.refresh_rate)
            .field("flags", &self.flags)
            .field("vsync", &self.vsync)
            .field("delta_time", &self.delta_time.get())
            .field("fps", &self.fps.get())
            .finish_non_exhaustive()
    }
}

impl Screen {
    /// Open the window on `platform`.
    ///
    /// Fails if the platform already has a window, if `priority` is outside
    /// `0.0..=1.0`, if the reference resolution has a non-positive component,
    /// or if the platform refuses to create the window.
    pub fn open(
        config: ScreenConfig,
        platform: &mut dyn Platform,
        fonts: Rc<dyn FontRasterizer>,
    ) -> Result<Rc<Self>, SetupError> {
        if platform.window_open() {
            tracing::error!(title = %config.title, "refusing to open a second screen");
            return Err(SetupError::ScreenAlreadyOpen);
        }
        if !(0.0..=1.0).contains(&config.priority) {
            return Err(SetupError::InvalidPriority(config.priority));
        }

        let resolution = if config.resolution.is_zero() {
            platform.display_resolution()
        } else {
            config.resolution
        };
        let reference_resolution = config.reference_resolution.unwrap_or(resolution);
        if reference_resolution.x <= 0.0 || reference_resolution.y <= 0.0 {
            return Err(SetupError::InvalidReferenceResolution(reference_resolution));
        }
        let refresh_rate = config
            .refresh_rate
            .map(f64::from)
            .or_else(|| platform.system_refresh_rate())
            .unwrap_or(DEFAULT_REFRESH_RATE);

        platform.open_window(&WindowSpec {
            title: &config.title,
            icon: config.icon.as_deref(),
            resolution,
            flags: config.flags,
            vsync: config.vsync,
        })?;

        let scale_factor = scale_factor(resolution, reference_resolution, config.priority);
        tracing::info!(
            title = %config.title,
            %resolution,
            %reference_resolution,
            scale_factor,
            refresh_rate,
            "screen opened"
        );
        Ok(Rc::new(Self {
            title: config.title,
            resolution,
            reference_resolution,
            priority: config.priority,
            scale_factor,
            refresh_rate,
            flags: config.flags,
            vsync: config.vsync,
            fonts,
            delta_time: Cell::new(0.0),
            fps: Cell::new(0.0),
            frames: Cell::new(0),
        }))
    }

    /// Window caption.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Actual window size in pixels.
    pub fn resolution(&self) -> Vector2 {
        self.resolution
    }

    /// Resolution sizes are authored against.
    pub fn reference_resolution(&self) -> Vector2 {
        self.reference_resolution
    }

    /// Weight of the vertical ratio in the scale factor.
    pub fn priority(&self) -> f64 {
        self.priority
    }

    /// Multiplier from reference pixels to actual pixels.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Target frame rate.
    pub fn refresh_rate(&self) -> f64 {
        self.refresh_rate
    }

    /// Window creation flags.
    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    /// Whether presentation waits for vertical sync.
    pub fn vsync(&self) -> bool {
        self.vsync
    }

    /// Font rasterizer used by text nodes.
    pub fn fonts(&self) -> &dyn FontRasterizer {
        &*self.fonts
    }

    /// Seconds elapsed during the last frame.
    pub fn delta_time(&self) -> f64 {
        self.delta_time.get()
    }

    /// Measured frames per second.
    pub fn fps(&self) -> f64 {
        self.fps.get()
    }

    /// Frames run since the screen opened.
    pub fn frame_count(&self) -> u64 {
        self.frames.get()
    }

    pub(crate) fn record_frame(&self, delta_time: f64, fps: f64) {
        self.delta_time.set(delta_time);
        self.fps.set(fps);
        self.frames.set(self.frames.get() + 1);
    }
}

/// `(res.x / ref.x)^(1 - priority) * (res.y / ref.y)^priority`.
///
/// A priority of 0 scales by width alone, 1 by height alone.
pub fn scale_factor(resolution: Vector2, reference: Vector2, priority: f64) -> f64 {
    let ratio = resolution / reference;
    ratio.x.powf(1.0 - priority) * ratio.y.powf(priority)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessPlatform;
    use arbor_text::MonospaceRasterizer;

    fn open(config: ScreenConfig, platform: &mut HeadlessPlatform) -> Result<Rc<Screen>, SetupError> {
        Screen::open(config, platform, Rc::new(MonospaceRasterizer::default()))
    }

    #[test]
    fn matching_resolutions_scale_by_exactly_one() {
        let mut platform = HeadlessPlatform::new();
        let screen = open(
            ScreenConfig {
                resolution: Vector2::new(1920.0, 1080.0),
                reference_resolution: Some(Vector2::new(1920.0, 1080.0)),
                priority: 0.5,
                ..ScreenConfig::default()
            },
            &mut platform,
        )
        .unwrap();
        assert_eq!(screen.scale_factor(), 1.0);
    }

    #[test]
    fn priority_weights_the_axes() {
        let res = Vector2::new(1280.0, 540.0);
        let reference = Vector2::new(640.0, 1080.0);
        assert!((scale_factor(res, reference, 0.0) - 2.0).abs() < 1e-12);
        assert!((scale_factor(res, reference, 1.0) - 0.5).abs() < 1e-12);
        assert!((scale_factor(res, reference, 0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn second_screen_is_refused() {
        let mut platform = HeadlessPlatform::new();
        open(ScreenConfig::default(), &mut platform).unwrap();
        let err = open(ScreenConfig::default(), &mut platform).unwrap_err();
        assert_eq!(err, SetupError::ScreenAlreadyOpen);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut platform = HeadlessPlatform::new();
        let err = open(
            ScreenConfig {
                priority: 1.5,
                ..ScreenConfig::default()
            },
            &mut platform,
        )
        .unwrap_err();
        assert_eq!(err, SetupError::InvalidPriority(1.5));

        let err = open(
            ScreenConfig {
                reference_resolution: Some(Vector2::new(0.0, 1080.0)),
                ..ScreenConfig::default()
            },
            &mut platform,
        )
        .unwrap_err();
        assert!(matches!(err, SetupError::InvalidReferenceResolution(_)));
        assert!(!platform.window_open(), "nothing is opened on failure");
    }

    #[test]
    fn zero_resolution_and_rate_fall_back_to_the_display() {
        let mut platform = HeadlessPlatform::new()
            .with_display(Vector2::new(2560.0, 1440.0))
            .with_system_refresh_rate(Some(144.0));
        let screen = open(
            ScreenConfig {
                resolution: Vector2::ZERO,
                ..ScreenConfig::default()
            },
            &mut platform,
        )
        .unwrap();
        assert_eq!(screen.resolution(), Vector2::new(2560.0, 1440.0));
        assert_eq!(screen.refresh_rate(), 144.0);
        assert_eq!(screen.scale_factor(), 1.0);
    }

    #[test]
    fn unknown_display_rate_defaults_to_sixty() {
        let mut platform = HeadlessPlatform::new().with_system_refresh_rate(None);
        let screen = open(ScreenConfig::default(), &mut platform).unwrap();
        assert_eq!(screen.refresh_rate(), DEFAULT_REFRESH_RATE);
        assert_eq!(platform.window_title(), Some("Arbor Window"));
    }
}
