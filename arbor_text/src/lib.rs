// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Text: composition of multi-line text into cached surfaces.
//!
//! The actual glyph rasterization is delegated to a [`FontRasterizer`], the boundary
//! to whatever font engine the platform provides. This crate only arranges the
//! rendered lines:
//!
//! - split on line breaks, render each line;
//! - stack lines vertically with padding between them;
//! - align each line horizontally within the widest line;
//! - rotate, then scale, and measure the resulting pixel extent.
//!
//! ```rust
//! use arbor_geometry::{HorizontalAlign, Vector2};
//! use arbor_text::{MonospaceRasterizer, TextStyle, compose};
//!
//! let raster = MonospaceRasterizer::default();
//! let style = TextStyle { size: 10.0, padding: 2.0, align: HorizontalAlign::Middle, ..TextStyle::default() };
//! let surface = compose(&raster, "hello\nhi", &style, 0.0, Vector2::ONE);
//! assert_eq!(surface.size(), Vector2::new(25.0, 22.0));
//! ```
//!
//! [`MonospaceRasterizer`] is a pixel-free rasterizer with fixed metrics for headless
//! use and tests.

mod color;
mod raster;
mod surface;

pub use color::Color;
pub use raster::{FontId, FontRasterizer, ImageId, MonospaceRasterizer, RenderedLine};
pub use surface::{PlacedLine, TextStyle, TextSurface, compose};
