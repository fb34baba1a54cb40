// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The font rasterizer collaborator and a deterministic stand-in.

use core::cell::Cell;

use arbor_geometry::Vector2;

use crate::color::Color;

/// Handle to a font known to the rasterizer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

impl FontId {
    /// The rasterizer's default system font.
    pub const DEFAULT: Self = Self(0);
}

/// Opaque handle to a rendered glyph image owned by the rasterizer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u64);

/// One line of text rendered to an image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderedLine {
    /// Image holding the glyphs.
    pub image: ImageId,
    /// Measured pixel size of the image.
    pub size: Vector2,
}

/// Renders single lines of text to images.
///
/// This is the boundary to the platform's font engine. Implementations own the
/// pixels; the scene graph only keeps the returned handles and sizes.
pub trait FontRasterizer {
    /// Render `line` in `font` at `size` pixels with `color`.
    ///
    /// An empty line still has the font's line height.
    fn render_line(&self, font: FontId, line: &str, color: Color, size: f64) -> RenderedLine;
}

/// A rasterizer with fixed-advance glyph metrics.
///
/// Each character is `advance * size` wide and each line `line_height * size`
/// tall. It produces no pixels and is meant for headless runs and tests.
#[derive(Debug)]
pub struct MonospaceRasterizer {
    advance: f64,
    line_height: f64,
    next_image: Cell<u64>,
    rendered: Cell<u64>,
}

impl Default for MonospaceRasterizer {
    fn default() -> Self {
        Self::new(0.5, 1.0)
    }
}

impl MonospaceRasterizer {
    /// Create a rasterizer with the given metrics as fractions of the font size.
    pub fn new(advance: f64, line_height: f64) -> Self {
        Self {
            advance,
            line_height,
            next_image: Cell::new(1),
            rendered: Cell::new(0),
        }
    }

    /// Number of lines rendered so far.
    pub fn lines_rendered(&self) -> u64 {
        self.rendered.get()
    }
}

impl FontRasterizer for MonospaceRasterizer {
    fn render_line(&self, _font: FontId, line: &str, _color: Color, size: f64) -> RenderedLine {
        let image = ImageId(self.next_image.get());
        self.next_image.set(image.0 + 1);
        self.rendered.set(self.rendered.get() + 1);
        #[allow(
            clippy::cast_precision_loss,
            reason = "Line lengths are far below f64's exact integer range."
        )]
        let chars = line.chars().count() as f64;
        RenderedLine {
            image,
            size: Vector2::new(chars * self.advance * size, self.line_height * size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monospace_metrics() {
        let r = MonospaceRasterizer::default();
        let a = r.render_line(FontId::DEFAULT, "abcd", Color::WHITE, 20.0);
        let b = r.render_line(FontId::DEFAULT, "", Color::WHITE, 20.0);
        assert_eq!(a.size, Vector2::new(40.0, 20.0));
        assert_eq!(b.size, Vector2::new(0.0, 20.0), "empty line keeps its height");
        assert_ne!(a.image, b.image, "each render yields a fresh image");
        assert_eq!(r.lines_rendered(), 2);
    }
}
