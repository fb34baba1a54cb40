// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Rect, Vec2};

use crate::vector::Vector2;

/// Transform an axis-aligned `Rect` by an `Affine` and return a conservative
/// axis-aligned bounding box.
pub fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    let min_x = (a * rect.x0).min(a * rect.x1) + (c * rect.y0).min(c * rect.y1);
    let max_x = (a * rect.x0).max(a * rect.x1) + (c * rect.y0).max(c * rect.y1);
    let min_y = (b * rect.x0).min(b * rect.x1) + (d * rect.y0).min(d * rect.y1);
    let max_y = (b * rect.x0).max(b * rect.x1) + (d * rect.y0).max(d * rect.y1);
    Rect::new(min_x + e, min_y + f, max_x + e, max_y + f)
}

/// Rotate-then-scale a `size` box and return the affine that maps it into the
/// positive quadrant together with the resulting pixel extent.
///
/// Rotation is counter-clockwise on screen for positive degrees (y points
/// down). Rotation is applied before scaling.
pub fn rotate_then_scale(size: Vector2, degrees: f64, scale: Vector2) -> (Affine, Vector2) {
    let composed =
        Affine::scale_non_uniform(scale.x, scale.y) * Affine::rotate(-degrees.to_radians());
    let bbox = transform_rect_bbox(composed, Rect::new(0.0, 0.0, size.x, size.y));
    let normalized = Affine::translate(Vec2::new(-bbox.x0, -bbox.y0)) * composed;
    (normalized, Vector2::new(bbox.width(), bbox.height()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector2, b: Vector2) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn identity_keeps_extent() {
        let (_, extent) = rotate_then_scale(Vector2::new(30.0, 10.0), 0.0, Vector2::ONE);
        assert!(close(extent, Vector2::new(30.0, 10.0)), "{extent}");
    }

    #[test]
    fn quarter_turn_swaps_axes_before_scaling() {
        // Rotating first swaps width and height; the scale then applies to the
        // rotated box, so the order is observable.
        let (affine, extent) =
            rotate_then_scale(Vector2::new(30.0, 10.0), 90.0, Vector2::new(2.0, 1.0));
        assert!(close(extent, Vector2::new(20.0, 30.0)), "{extent}");
        let placed = transform_rect_bbox(affine, Rect::new(0.0, 0.0, 30.0, 10.0));
        assert!(placed.x0.abs() < 1e-9 && placed.y0.abs() < 1e-9, "normalized to origin");
    }

    #[test]
    fn diagonal_turn_grows_bbox() {
        let (_, extent) = rotate_then_scale(Vector2::new(10.0, 10.0), 45.0, Vector2::ONE);
        let diag = 10.0 * core::f64::consts::SQRT_2;
        assert!(close(extent, Vector2::new(diag, diag)), "{extent}");
    }
}
