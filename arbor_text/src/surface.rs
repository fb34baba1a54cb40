// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composition of multi-line text into a cached surface.

use arbor_geometry::{HorizontalAlign, Vector2, rotate_then_scale};
use kurbo::Affine;
use smallvec::SmallVec;

use crate::color::Color;
use crate::raster::{FontId, FontRasterizer, ImageId};

/// Everything that determines how text is rasterized, except the text itself.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font to render with.
    pub font: FontId,
    /// Font size in pixels.
    pub size: f64,
    /// Glyph colour.
    pub color: Color,
    /// Placement of each line within the widest line.
    pub align: HorizontalAlign,
    /// Vertical spacing between consecutive lines.
    pub padding: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: FontId::DEFAULT,
            size: 16.0,
            color: Color::WHITE,
            align: HorizontalAlign::Left,
            padding: 0.0,
        }
    }
}

/// A rendered line placed within the unrotated content box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacedLine {
    /// Image holding the line's glyphs.
    pub image: ImageId,
    /// Top-left corner of the line in content space.
    pub offset: Vector2,
    /// Pixel size of the line image.
    pub size: Vector2,
}

/// The cached result of rendering a block of text.
///
/// Lines are stacked in content space; [`TextSurface::transform`] maps content
/// space to surface space (rotation then scale, shifted so the surface starts
/// at the origin), and [`TextSurface::size`] is the surface's pixel extent.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSurface {
    lines: SmallVec<[PlacedLine; 4]>,
    content_size: Vector2,
    transform: Affine,
    size: Vector2,
}

impl Default for TextSurface {
    /// An empty surface with no lines and zero extent.
    fn default() -> Self {
        Self {
            lines: SmallVec::new(),
            content_size: Vector2::ZERO,
            transform: Affine::IDENTITY,
            size: Vector2::ZERO,
        }
    }
}

impl TextSurface {
    /// Lines in top-to-bottom order.
    pub fn lines(&self) -> &[PlacedLine] {
        &self.lines
    }

    /// Size of the stacked lines before rotation and scaling.
    pub fn content_size(&self) -> Vector2 {
        self.content_size
    }

    /// Content space to surface space.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Pixel extent of the surface.
    pub fn size(&self) -> Vector2 {
        self.size
    }
}

/// Render `text` into a [`TextSurface`].
///
/// The text is split on line breaks and each line rendered separately. Lines
/// are stacked with `style.padding` between them, so the content height is
/// the sum of line heights plus `padding * (lines - 1)` and the content width
/// is the widest line. Each line's left edge is placed within that width by
/// `style.align`. The block is then rotated by `rotation` degrees and scaled
/// by `scale`, in that order.
pub fn compose(
    raster: &dyn FontRasterizer,
    text: &str,
    style: &TextStyle,
    rotation: f64,
    scale: Vector2,
) -> TextSurface {
    let rendered: SmallVec<[_; 4]> = text
        .split('\n')
        .map(|line| raster.render_line(style.font, line, style.color, style.size))
        .collect();

    let width = rendered.iter().map(|l| l.size.x).fold(0.0, f64::max);
    let fraction = style.align.anchor().fraction();

    let mut lines = SmallVec::with_capacity(rendered.len());
    let mut y = 0.0;
    for (i, line) in rendered.iter().enumerate() {
        if i > 0 {
            y += style.padding;
        }
        lines.push(PlacedLine {
            image: line.image,
            offset: Vector2::new((width - line.size.x) * fraction, y),
            size: line.size,
        });
        y += line.size.y;
    }

    let content_size = Vector2::new(width, y);
    let (transform, size) = rotate_then_scale(content_size, rotation, scale);
    TextSurface {
        lines,
        content_size,
        transform,
        size,
    }
}
