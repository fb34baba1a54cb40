// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene graph: node identifiers and construction options.

use arbor_geometry::{Align, TextAlign, Vector2};
use arbor_text::{Color, FontId};

use crate::behavior::Behavior;

/// Identifier for a node in a [`Scene`](crate::Scene) (generational).
///
/// Ids are only meaningful for the scene that issued them. Once a node is
/// destroyed its id goes stale for good: a later node reusing the slot gets a
/// newer generation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Where a pending activation change re-enters the tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttachMode {
    /// Membership of the parent's child list.
    Child,
    /// Membership of the scene's root list.
    Root,
}

/// Options for creating a node.
///
/// Every option except the name has a default: active, at the origin, unit
/// scale, no rotation, zero size, [`Align::Middle`], layer 0, no children, and
/// no behavior.
///
/// ```rust
/// use arbor_geometry::{Align, Vector2};
/// use arbor_scene::NodeConfig;
///
/// let config = NodeConfig::new("panel")
///     .with_size(Vector2::new(200.0, 100.0))
///     .with_align(Align::TopLeft)
///     .on_layer(2);
/// assert_eq!(config.layer, 2);
/// assert!(config.active);
/// ```
pub struct NodeConfig {
    /// Human-readable name.
    pub name: String,
    /// Initial active state.
    pub active: bool,
    /// Local position offset.
    pub position: Vector2,
    /// Local scale.
    pub scale: Vector2,
    /// Local rotation in degrees.
    pub rotation: f64,
    /// Box size in reference-resolution pixels.
    pub size: Vector2,
    /// Anchor relative to the parent box (or the screen, for roots).
    pub align: Align,
    /// Draw order among siblings; higher layers draw later.
    pub layer: i32,
    /// Existing nodes to adopt as children.
    pub children: Vec<NodeId>,
    /// Per-frame hooks.
    pub behavior: Option<Box<dyn Behavior>>,
}

impl core::fmt::Debug for NodeConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeConfig")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("position", &self.position)
            .field("scale", &self.scale)
            .field("rotation", &self.rotation)
            .field("size", &self.size)
            .field("align", &self.align)
            .field("layer", &self.layer)
            .field("children", &self.children)
            .field("has_behavior", &self.behavior.is_some())
            .finish()
    }
}

impl NodeConfig {
    /// Options for a node called `name`, everything else defaulted.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            position: Vector2::ZERO,
            scale: Vector2::ONE,
            rotation: 0.0,
            size: Vector2::ZERO,
            align: Align::default(),
            layer: 0,
            children: Vec::new(),
            behavior: None,
        }
    }

    /// Set the initial active state.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Set the local position.
    pub fn at(mut self, position: impl Into<Vector2>) -> Self {
        self.position = position.into();
        self
    }

    /// Set the local scale.
    pub fn with_scale(mut self, scale: impl Into<Vector2>) -> Self {
        self.scale = scale.into();
        self
    }

    /// Set the local rotation in degrees.
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Set the box size.
    pub fn with_size(mut self, size: impl Into<Vector2>) -> Self {
        self.size = size.into();
        self
    }

    /// Set the anchor.
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Set the layer.
    pub fn on_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Adopt existing nodes as children once created.
    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeId>) -> Self {
        self.children.extend(children);
        self
    }

    /// Attach per-frame hooks.
    pub fn with_behavior(mut self, behavior: impl Behavior) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }
}

/// Options for the text content of a text node.
#[derive(Clone, Debug, PartialEq)]
pub struct TextConfig {
    /// The text; `\n` separates lines.
    pub text: String,
    /// Glyph colour.
    pub color: Color,
    /// Font handle.
    pub font: FontId,
    /// Font size in reference-resolution pixels.
    pub font_size: f64,
    /// Placement of the rendered text within the node's box.
    pub text_align: TextAlign,
    /// Spacing between lines in reference-resolution pixels.
    pub padding: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            text: String::from("Hello, World!"),
            color: Color::WHITE,
            font: FontId::DEFAULT,
            font_size: 16.0,
            text_align: TextAlign::default(),
            padding: 0.0,
        }
    }
}

impl TextConfig {
    /// Options for `text`, everything else defaulted.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the colour.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the font.
    pub fn with_font(mut self, font: FontId) -> Self {
        self.font = font;
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Set the alignment within the box.
    pub fn with_text_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    /// Set the line spacing.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }
}
