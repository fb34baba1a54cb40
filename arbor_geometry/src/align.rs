// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box anchors and text-in-box alignment.

use core::fmt;
use core::str::FromStr;

use crate::vector::Vector2;

/// Position of a node along one axis of its container.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Left or top.
    Start,
    /// Centered.
    Center,
    /// Right or bottom.
    End,
}

impl Anchor {
    /// Offset of a box of extent `node` placed inside a container of extent
    /// `container`.
    pub fn inside(self, container: f64, node: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => container / 2.0 - node / 2.0,
            Self::End => container - node,
        }
    }

    /// Offset of a box of extent `node` placed just outside a parent of
    /// extent `parent`. `Center` keeps the parent's origin.
    pub fn outside(self, parent: f64, node: f64) -> f64 {
        match self {
            Self::Start => -node,
            Self::Center => 0.0,
            Self::End => parent,
        }
    }

    /// Fraction of the free space placed before the content.
    pub fn fraction(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => 0.5,
            Self::End => 1.0,
        }
    }
}

/// One of nine box anchors used to place a node relative to its container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    /// Centered on both axes.
    #[default]
    Middle,
    /// Flush left, vertically centered.
    Left,
    /// Flush right, vertically centered.
    Right,
    /// Flush top, horizontally centered.
    Top,
    /// Flush bottom, horizontally centered.
    Bottom,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl Align {
    /// All anchors, in code order.
    pub const ALL: [Self; 9] = [
        Self::Middle,
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Horizontal and vertical anchors of this alignment.
    pub const fn anchors(self) -> (Anchor, Anchor) {
        use Anchor::{Center, End, Start};
        match self {
            Self::Middle => (Center, Center),
            Self::Left => (Start, Center),
            Self::Right => (End, Center),
            Self::Top => (Center, Start),
            Self::Bottom => (Center, End),
            Self::TopLeft => (Start, Start),
            Self::TopRight => (End, Start),
            Self::BottomLeft => (Start, End),
            Self::BottomRight => (End, End),
        }
    }

    /// Numeric code of this anchor (`1..=9`).
    pub const fn code(self) -> u8 {
        match self {
            Self::Middle => 1,
            Self::Left => 2,
            Self::Right => 3,
            Self::Top => 4,
            Self::Bottom => 5,
            Self::TopLeft => 6,
            Self::TopRight => 7,
            Self::BottomLeft => 8,
            Self::BottomRight => 9,
        }
    }

    /// Look up an anchor by numeric code.
    pub fn from_code(code: u8) -> Result<Self, AlignParseError> {
        Self::ALL
            .into_iter()
            .find(|a| a.code() == code)
            .ok_or(AlignParseError::Code(code))
    }

    /// Lower-case anchor name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Middle => "middle",
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::TopLeft => "topleft",
            Self::TopRight => "topright",
            Self::BottomLeft => "bottomleft",
            Self::BottomRight => "bottomright",
        }
    }

    /// Offset of a root node of `node` size within a screen of `container` size.
    ///
    /// Edge anchors center the cross axis; corners flush both axes to `0` or
    /// `container - node`.
    pub fn offset_in(self, container: Vector2, node: Vector2) -> Vector2 {
        let (h, v) = self.anchors();
        Vector2::new(h.inside(container.x, node.x), v.inside(container.y, node.y))
    }

    /// Offset of a child node of `node` size relative to a parent of `parent` size.
    ///
    /// The child is placed outside the parent's box in the anchor's direction:
    /// `Left` sits just left of the parent, `Right` just past its right edge.
    /// `Middle` overlaps the parent at its origin.
    pub fn offset_outside(self, parent: Vector2, node: Vector2) -> Vector2 {
        let (h, v) = self.anchors();
        Vector2::new(h.outside(parent.x, node.x), v.outside(parent.y, node.y))
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Align {
    type Err = AlignParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|a| a.name() == key)
            .ok_or_else(|| AlignParseError::Name(s.to_owned()))
    }
}

/// Error returned for an unmatched alignment value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AlignParseError {
    /// No anchor has this numeric code.
    #[error("invalid align code {0}; expected 1..=9")]
    Code(u8),
    /// No anchor has this name.
    #[error("invalid align value `{0}`")]
    Name(String),
}

/// Horizontal placement of text lines within a text box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Middle,
    /// Flush right.
    Right,
}

impl HorizontalAlign {
    /// The equivalent axis anchor.
    pub const fn anchor(self) -> Anchor {
        match self {
            Self::Left => Anchor::Start,
            Self::Middle => Anchor::Center,
            Self::Right => Anchor::End,
        }
    }
}

/// Vertical placement of text within a text box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    /// Flush top.
    #[default]
    Top,
    /// Centered.
    Middle,
    /// Flush bottom.
    Bottom,
}

impl VerticalAlign {
    /// The equivalent axis anchor.
    pub const fn anchor(self) -> Anchor {
        match self {
            Self::Top => Anchor::Start,
            Self::Middle => Anchor::Center,
            Self::Bottom => Anchor::End,
        }
    }
}

/// Alignment of glyph content within a text node's own box.
///
/// Independent of [`Align`], which places the box itself.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextAlign {
    /// Horizontal component.
    pub x: HorizontalAlign,
    /// Vertical component.
    pub y: VerticalAlign,
}

impl TextAlign {
    /// Top-left aligned text.
    pub const TOP_LEFT: Self = Self::new(HorizontalAlign::Left, VerticalAlign::Top);
    /// Text centered on both axes.
    pub const CENTER: Self = Self::new(HorizontalAlign::Middle, VerticalAlign::Middle);

    /// Compose the two axis alignments.
    pub const fn new(x: HorizontalAlign, y: VerticalAlign) -> Self {
        Self { x, y }
    }

    /// Offset of `content` within `container`, per axis.
    ///
    /// The free space `container - content` is distributed by the anchor
    /// fraction: nothing before for left/top, half for middle, all for
    /// right/bottom.
    pub fn offset_in(self, container: Vector2, content: Vector2) -> Vector2 {
        let free = container - content;
        Vector2::new(
            free.x * self.x.anchor().fraction(),
            free.y * self.y.anchor().fraction(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_offsets_cover_all_anchors() {
        let screen = Vector2::new(1280.0, 720.0);
        let node = Vector2::new(200.0, 100.0);
        let cases = [
            (Align::Middle, Vector2::new(540.0, 310.0)),
            (Align::Left, Vector2::new(0.0, 310.0)),
            (Align::Right, Vector2::new(1080.0, 310.0)),
            (Align::Top, Vector2::new(540.0, 0.0)),
            (Align::Bottom, Vector2::new(540.0, 620.0)),
            (Align::TopLeft, Vector2::ZERO),
            (Align::TopRight, Vector2::new(1080.0, 0.0)),
            (Align::BottomLeft, Vector2::new(0.0, 620.0)),
            (Align::BottomRight, Vector2::new(1080.0, 620.0)),
        ];
        for (align, expected) in cases {
            assert_eq!(align.offset_in(screen, node), expected, "{align}");
        }
    }

    #[test]
    fn satellite_offsets_sit_outside_parent() {
        let parent = Vector2::new(200.0, 200.0);
        let child = Vector2::new(50.0, 20.0);
        assert_eq!(Align::Middle.offset_outside(parent, child), Vector2::ZERO);
        assert_eq!(Align::Right.offset_outside(parent, Vector2::ZERO), Vector2::new(200.0, 0.0));
        assert_eq!(Align::Left.offset_outside(parent, child), Vector2::new(-50.0, 0.0));
        assert_eq!(Align::Top.offset_outside(parent, child), Vector2::new(0.0, -20.0));
        assert_eq!(Align::Bottom.offset_outside(parent, child), Vector2::new(0.0, 200.0));
        assert_eq!(
            Align::BottomRight.offset_outside(parent, child),
            Vector2::new(200.0, 200.0)
        );
        assert_eq!(
            Align::TopLeft.offset_outside(parent, child),
            Vector2::new(-50.0, -20.0)
        );
    }

    #[test]
    fn parse_codes_and_names() {
        for align in Align::ALL {
            assert_eq!(Align::from_code(align.code()), Ok(align));
            assert_eq!(align.name().parse::<Align>(), Ok(align));
        }
        assert_eq!("Top-Left".parse::<Align>(), Ok(Align::TopLeft));
        assert_eq!(Align::from_code(0), Err(AlignParseError::Code(0)));
        assert!(matches!(
            "diagonal".parse::<Align>(),
            Err(AlignParseError::Name(_))
        ));
    }

    #[test]
    fn text_align_distributes_free_space() {
        let bx = Vector2::new(200.0, 100.0);
        let content = Vector2::new(120.0, 40.0);
        assert_eq!(TextAlign::TOP_LEFT.offset_in(bx, content), Vector2::ZERO);
        assert_eq!(TextAlign::CENTER.offset_in(bx, content), Vector2::new(40.0, 30.0));
        let br = TextAlign::new(HorizontalAlign::Right, VerticalAlign::Bottom);
        assert_eq!(br.offset_in(bx, content), Vector2::new(80.0, 60.0));
    }
}
