// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena records.

use smallvec::SmallVec;

use arbor_geometry::{Align, TextAlign, Transform, Vector2};
use arbor_text::{Color, FontId, TextSurface};

use crate::behavior::Behavior;
use crate::layers::LayerBuckets;
use crate::types::{NodeId, TextConfig};

/// Content and cached render state of a text node.
#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    pub(crate) text: String,
    pub(crate) color: Color,
    pub(crate) font: FontId,
    pub(crate) font_size: f64,
    pub(crate) text_align: TextAlign,
    pub(crate) padding: f64,
    pub(crate) surface: TextSurface,
}

impl TextNode {
    pub(crate) fn new(config: TextConfig) -> Self {
        Self {
            text: config.text,
            color: config.color,
            font: config.font,
            font_size: config.font_size,
            text_align: config.text_align,
            padding: config.padding,
            surface: TextSurface::default(),
        }
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Glyph colour.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Font handle.
    pub fn font(&self) -> FontId {
        self.font
    }

    /// Font size in reference pixels.
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Placement within the node's box.
    pub fn text_align(&self) -> TextAlign {
        self.text_align
    }

    /// Line spacing in reference pixels.
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// The cached rendered surface.
    pub fn surface(&self) -> &TextSurface {
        &self.surface
    }

    /// Pixel extent of the cached surface.
    pub fn preferred_size(&self) -> Vector2 {
        self.surface.size()
    }
}

/// Owned nodes outside an active list.
pub(crate) type Detached = SmallVec<[NodeId; 2]>;

#[derive(Debug)]
pub(crate) enum NodeKind {
    Base,
    Text(Box<TextNode>),
}

pub(crate) struct Node {
    pub(crate) generation: u32,
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    /// Active members, in insertion order.
    pub(crate) children: Vec<NodeId>,
    /// Owned children that are currently not members.
    pub(crate) detached: Detached,
    pub(crate) sorted_children: LayerBuckets,
    pub(crate) transform: Transform,
    pub(crate) align: Align,
    pub(crate) layer: i32,
    pub(crate) active: bool,
    pub(crate) kind: NodeKind,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
}

impl core::fmt::Debug for Node {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("detached", &self.detached)
            .field("transform", &self.transform)
            .field("align", &self.align)
            .field("layer", &self.layer)
            .field("active", &self.active)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Node {
    pub(crate) fn new(generation: u32, name: String, transform: Transform) -> Self {
        Self {
            generation,
            name,
            parent: None,
            children: Vec::new(),
            detached: Detached::new(),
            sorted_children: LayerBuckets::default(),
            transform,
            align: Align::default(),
            layer: 0,
            active: true,
            kind: NodeKind::Base,
            behavior: None,
        }
    }

    pub(crate) fn text(&self) -> Option<&TextNode> {
        match &self.kind {
            NodeKind::Text(t) => Some(t),
            NodeKind::Base => None,
        }
    }

    pub(crate) fn text_mut(&mut self) -> Option<&mut TextNode> {
        match &mut self.kind {
            NodeKind::Text(t) => Some(t),
            NodeKind::Base => None,
        }
    }
}
