// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Geometry: value types and anchor math for the Arbor scene graph.
//!
//! - [`Vector2`]: a 2D value type with elementwise arithmetic. Division by a zero
//!   component yields infinity instead of failing.
//! - [`Transform`]: local position, scale, rotation, and box size of a node. Layout
//!   affecting setters fire a [`Notifier`] exactly once per call; position never does.
//! - [`Align`]: nine box anchors, with [`Align::offset_in`] for placement inside a
//!   container (screen) and [`Align::offset_outside`] for "satellite" placement just
//!   outside a parent box.
//! - [`TextAlign`]: independent horizontal/vertical alignment of content within a box.
//!
//! ```rust
//! use arbor_geometry::{Align, Vector2};
//!
//! let parent = Vector2::new(200.0, 200.0);
//! // A right-anchored child sits just past the parent's right edge.
//! assert_eq!(Align::Right.offset_outside(parent, Vector2::ZERO), Vector2::new(200.0, 0.0));
//! // A root anchored top-left on any screen sits at the origin.
//! let screen = Vector2::new(1280.0, 720.0);
//! assert_eq!(Align::TopLeft.offset_in(screen, parent), Vector2::ZERO);
//! ```

mod align;
mod notifier;
mod transform;
mod util;
mod vector;

pub use align::{Align, AlignParseError, Anchor, HorizontalAlign, TextAlign, VerticalAlign};
pub use notifier::Notifier;
pub use transform::{TrackedVector2, Transform};
pub use util::{rotate_then_scale, transform_rect_bbox};
pub use vector::Vector2;
