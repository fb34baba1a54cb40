// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text nodes: cached rendering kept in sync with content and transforms.

use arbor_geometry::{TextAlign, Vector2};
use arbor_text::{Color, FontId, TextStyle, compose};

use crate::diagnostics::check;
use crate::error::TreeError;
use crate::node::TextNode;
use crate::scene::Scene;
use crate::types::NodeId;

impl Scene {
    /// Re-render the cached surface of a text node.
    ///
    /// Font size and padding are given in reference pixels and scaled by the
    /// screen's scale factor; the result is rotated by the node's global
    /// rotation, then scaled by its global scale.
    pub(crate) fn render_text(&mut self, id: NodeId) {
        let (Some(rotation), Some(scale)) = (self.global_rotation(id), self.global_scale(id)) else {
            return;
        };
        let screen = self.screen_rc();
        let Some(text) = self.node_opt_mut(id).and_then(|n| n.text_mut()) else {
            return;
        };
        let scale_factor = screen.scale_factor();
        let style = TextStyle {
            font: text.font,
            size: text.font_size * scale_factor,
            color: text.color,
            align: text.text_align.x,
            padding: text.padding * scale_factor,
        };
        text.surface = compose(screen.fonts(), &text.text, &style, rotation, scale);
    }

    /// Text content and cached surface of a text node.
    pub fn text(&self, id: NodeId) -> Option<&TextNode> {
        self.node_opt(id).and_then(|n| n.text())
    }

    /// Pixel extent of a text node's rendered surface.
    pub fn preferred_size(&self, id: NodeId) -> Option<Vector2> {
        self.text(id).map(TextNode::preferred_size)
    }

    /// Where a text node's surface is drawn: its box's global position plus
    /// the text alignment of the surface within the scaled box.
    pub fn render_position(&self, id: NodeId) -> Option<Vector2> {
        let text = self.text(id)?;
        let box_size = self.transform(id)?.size() * self.screen().scale_factor();
        let offset = text.text_align.offset_in(box_size, text.preferred_size());
        Some(self.global_position(id)? + offset)
    }

    #[track_caller]
    fn edit_text(&mut self, id: NodeId, edit: impl FnOnce(&mut TextNode)) -> Result<(), TreeError> {
        let result = match self.node_opt_mut(id) {
            None => Err(TreeError::StaleNode(id)),
            Some(n) => match n.text_mut() {
                None => Err(TreeError::NotText(id)),
                Some(text) => {
                    edit(text);
                    Ok(())
                }
            },
        };
        check(result)?;
        self.render_text(id);
        Ok(())
    }

    /// Replace the text of a text node.
    #[track_caller]
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), TreeError> {
        let text = text.into();
        self.edit_text(id, |t| t.text = text)
    }

    /// Set the glyph colour of a text node.
    #[track_caller]
    pub fn set_color(&mut self, id: NodeId, color: Color) -> Result<(), TreeError> {
        self.edit_text(id, |t| t.color = color)
    }

    /// Set the font of a text node.
    #[track_caller]
    pub fn set_font(&mut self, id: NodeId, font: FontId) -> Result<(), TreeError> {
        self.edit_text(id, |t| t.font = font)
    }

    /// Set the font size of a text node, in reference pixels.
    #[track_caller]
    pub fn set_font_size(&mut self, id: NodeId, size: f64) -> Result<(), TreeError> {
        self.edit_text(id, |t| t.font_size = size)
    }

    /// Set how a text node's surface is placed within its box.
    #[track_caller]
    pub fn set_text_align(&mut self, id: NodeId, align: TextAlign) -> Result<(), TreeError> {
        self.edit_text(id, |t| t.text_align = align)
    }

    /// Set the spacing between lines of a text node, in reference pixels.
    #[track_caller]
    pub fn set_padding(&mut self, id: NodeId, padding: f64) -> Result<(), TreeError> {
        self.edit_text(id, |t| t.padding = padding)
    }
}

#[cfg(test)]
mod tests {
    use arbor_geometry::Align;

    use super::*;
    use crate::screen::ScreenConfig;
    use crate::testing;
    use crate::types::{NodeConfig, TextConfig};

    fn label(text: &str) -> TextConfig {
        TextConfig::new(text).with_font_size(10.0)
    }

    fn close(a: Vector2, b: Vector2) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn rendered_on_insert() {
        let (mut scene, _platform, fonts) = testing::scene();
        let t = scene
            .insert_text(None, NodeConfig::new("t"), label("abcd\nab").with_padding(2.0))
            .unwrap();
        assert_eq!(scene.preferred_size(t), Some(Vector2::new(20.0, 22.0)));
        assert_eq!(fonts.lines_rendered(), 2);
        assert_eq!(scene.text(t).map(TextNode::text), Some("abcd\nab"));
    }

    #[test]
    fn setters_re_render_immediately() {
        let (mut scene, _platform, _fonts) = testing::scene();
        let t = scene.insert_text(None, NodeConfig::new("t"), label("ab")).unwrap();
        scene.set_text(t, "abcdef").unwrap();
        assert_eq!(scene.preferred_size(t), Some(Vector2::new(30.0, 10.0)));
        scene.set_font_size(t, 20.0).unwrap();
        assert_eq!(scene.preferred_size(t), Some(Vector2::new(60.0, 20.0)));
        scene.set_color(t, Color::RED).unwrap();
        assert_eq!(scene.text(t).map(TextNode::color), Some(Color::RED));
    }

    #[test]
    fn ancestor_scale_cascades_to_inactive_text() {
        let (mut scene, _platform, _fonts) = testing::scene();
        let parent = scene.insert(None, NodeConfig::new("parent")).unwrap();
        let shown = scene
            .insert_text(Some(parent), NodeConfig::new("shown"), label("abcd"))
            .unwrap();
        let hidden = scene
            .insert_text(
                Some(parent),
                NodeConfig::new("hidden").with_active(false),
                label("abcd"),
            )
            .unwrap();

        scene.set_scale(parent, Vector2::new(2.0, 2.0)).unwrap();
        for t in [shown, hidden] {
            let size = scene.preferred_size(t).unwrap();
            assert!(close(size, Vector2::new(40.0, 20.0)), "{size}");
        }
    }

    #[test]
    fn tracked_scale_edit_cascades_to_text() {
        let (mut scene, _platform, _fonts) = testing::scene();
        let parent = scene.insert(None, NodeConfig::new("parent")).unwrap();
        let t = scene
            .insert_text(Some(parent), NodeConfig::new("t"), label("abcd"))
            .unwrap();
        scene.edit_transform(parent, |tf| tf.scale_mut().y = 3.0).unwrap();
        let size = scene.preferred_size(t).unwrap();
        assert!(close(size, Vector2::new(20.0, 30.0)), "{size}");
    }

    #[test]
    fn ancestor_rotation_turns_text() {
        let (mut scene, _platform, _fonts) = testing::scene();
        let parent = scene.insert(None, NodeConfig::new("parent")).unwrap();
        let t = scene
            .insert_text(Some(parent), NodeConfig::new("t"), label("abcd"))
            .unwrap();
        scene.set_rotation(parent, 90.0).unwrap();
        let size = scene.preferred_size(t).unwrap();
        assert!(close(size, Vector2::new(10.0, 20.0)), "{size}");
    }

    #[test]
    fn reparenting_re_renders() {
        let (mut scene, _platform, _fonts) = testing::scene();
        let big = scene
            .insert(None, NodeConfig::new("big").with_scale((3.0, 3.0)))
            .unwrap();
        let t = scene.insert_text(None, NodeConfig::new("t"), label("ab")).unwrap();
        scene.add_child(big, t).unwrap();
        let size = scene.preferred_size(t).unwrap();
        assert!(close(size, Vector2::new(30.0, 30.0)), "{size}");
    }

    #[test]
    fn moving_does_not_re_render() {
        let (mut scene, _platform, fonts) = testing::scene();
        let parent = scene.insert(None, NodeConfig::new("parent")).unwrap();
        scene
            .insert_text(Some(parent), NodeConfig::new("t"), label("abcd"))
            .unwrap();
        let before = fonts.lines_rendered();
        scene.set_position(parent, Vector2::new(50.0, 50.0)).unwrap();
        assert_eq!(fonts.lines_rendered(), before);
        scene.set_size(parent, Vector2::new(5.0, 5.0)).unwrap();
        assert_eq!(fonts.lines_rendered(), before + 1);
    }

    #[test]
    fn surface_is_aligned_within_the_box() {
        let (mut scene, _platform, _fonts) = testing::scene();
        let t = scene
            .insert_text(
                None,
                NodeConfig::new("t")
                    .with_size((100.0, 50.0))
                    .with_align(Align::TopLeft),
                label("abcd").with_text_align(TextAlign::CENTER),
            )
            .unwrap();
        assert_eq!(scene.render_position(t), Some(Vector2::new(40.0, 20.0)));
        scene.set_text_align(t, TextAlign::TOP_LEFT).unwrap();
        assert_eq!(scene.render_position(t), Some(Vector2::ZERO));
    }

    #[test]
    fn font_size_follows_the_scale_factor() {
        let (mut scene, _platform, _fonts) = testing::scene_with(ScreenConfig {
            resolution: Vector2::new(1920.0, 1080.0),
            reference_resolution: Some(Vector2::new(960.0, 540.0)),
            priority: 0.0,
            ..ScreenConfig::default()
        });
        assert_eq!(scene.screen().scale_factor(), 2.0);
        let t = scene
            .insert_text(None, NodeConfig::new("t"), label("ab\nab").with_padding(3.0))
            .unwrap();
        assert_eq!(scene.preferred_size(t), Some(Vector2::new(20.0, 46.0)));
    }

    #[test]
    fn text_setters_reject_plain_nodes() {
        let (mut scene, _platform, _fonts) = testing::scene();
        let plain = scene.insert(None, NodeConfig::new("plain")).unwrap();
        assert_eq!(scene.set_text(plain, "x"), Err(TreeError::NotText(plain)));
        assert_eq!(scene.preferred_size(plain), None);
        assert_eq!(scene.render_position(plain), None);
    }
}
