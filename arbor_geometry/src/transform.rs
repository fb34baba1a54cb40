// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node local transform with change notification.

use core::ops::{Deref, DerefMut};

use crate::notifier::Notifier;
use crate::vector::Vector2;

/// Local position, scale, rotation, and box size of a node.
///
/// Every setter for scale, rotation, width, height, or the combined size fires
/// [`Transform::changes`] exactly once per call. Position changes are relative
/// to the node's anchor and never fire it.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    position: Vector2,
    scale: Vector2,
    rotation: f64,
    size: Vector2,
    changes: Notifier,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vector2::ZERO, Vector2::ONE, 0.0, Vector2::ZERO)
    }
}

impl Transform {
    /// Create a transform. No notification is pending afterwards.
    pub const fn new(position: Vector2, scale: Vector2, rotation: f64, size: Vector2) -> Self {
        Self {
            position,
            scale,
            rotation,
            size,
            changes: Notifier::new(),
        }
    }

    /// Local position relative to the node's anchor.
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Set the local position. Does not notify.
    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    /// Mutable access to the local position. Does not notify.
    pub fn position_mut(&mut self) -> &mut Vector2 {
        &mut self.position
    }

    /// Local scale.
    pub fn scale(&self) -> Vector2 {
        self.scale
    }

    /// Replace the local scale.
    pub fn set_scale(&mut self, scale: Vector2) {
        self.scale = scale;
        self.changes.notify();
    }

    /// Tracked mutable access to the scale.
    ///
    /// The returned guard fires the notifier once when dropped, if `x` or `y`
    /// differs from the value it started with.
    ///
    /// ```rust
    /// use arbor_geometry::Transform;
    ///
    /// let mut t = Transform::default();
    /// t.scale_mut().x += 0.5;
    /// assert_eq!(t.scale().x, 1.5);
    /// assert_eq!(t.take_changes(), 1);
    /// ```
    pub fn scale_mut(&mut self) -> TrackedVector2<'_> {
        TrackedVector2 {
            original: self.scale,
            value: &mut self.scale,
            changes: &mut self.changes,
        }
    }

    /// Local rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Set the local rotation in degrees.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
        self.changes.notify();
    }

    /// Box width.
    pub fn width(&self) -> f64 {
        self.size.x
    }

    /// Set the box width.
    pub fn set_width(&mut self, width: f64) {
        self.size.x = width;
        self.changes.notify();
    }

    /// Box height.
    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Set the box height.
    pub fn set_height(&mut self, height: f64) {
        self.size.y = height;
        self.changes.notify();
    }

    /// Box size as `(width, height)`.
    pub fn size(&self) -> Vector2 {
        self.size
    }

    /// Set width and height together; notifies once.
    pub fn set_size(&mut self, size: Vector2) {
        self.size = size;
        self.changes.notify();
    }

    /// The notifier fired by layout-affecting setters.
    pub fn changes(&self) -> &Notifier {
        &self.changes
    }

    /// Drain pending change notifications, returning how many fired.
    pub fn take_changes(&mut self) -> u32 {
        self.changes.take()
    }
}

/// Guard returned by [`Transform::scale_mut`].
///
/// Dereferences to the scale vector and re-fires the transform's notifier on
/// drop when the vector was modified.
#[derive(Debug)]
pub struct TrackedVector2<'a> {
    original: Vector2,
    value: &'a mut Vector2,
    changes: &'a mut Notifier,
}

impl Deref for TrackedVector2<'_> {
    type Target = Vector2;

    fn deref(&self) -> &Vector2 {
        self.value
    }
}

impl DerefMut for TrackedVector2<'_> {
    fn deref_mut(&mut self) -> &mut Vector2 {
        self.value
    }
}

impl Drop for TrackedVector2<'_> {
    fn drop(&mut self) {
        if *self.value != self.original {
            self.changes.notify();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_setters_notify_exactly_once() {
        let mut t = Transform::default();
        t.set_scale(Vector2::splat(2.0));
        assert_eq!(t.take_changes(), 1);
        t.set_rotation(45.0);
        assert_eq!(t.take_changes(), 1);
        t.set_width(10.0);
        assert_eq!(t.take_changes(), 1);
        t.set_height(20.0);
        assert_eq!(t.take_changes(), 1);
        t.set_size(Vector2::new(30.0, 40.0));
        assert_eq!(t.take_changes(), 1, "combined size must notify once");
        assert_eq!(t.size(), Vector2::new(30.0, 40.0));
        assert_eq!((t.width(), t.height()), (30.0, 40.0));
    }

    #[test]
    fn position_does_not_notify() {
        let mut t = Transform::default();
        t.set_position(Vector2::new(5.0, 5.0));
        t.position_mut().x += 1.0;
        assert_eq!(t.position(), Vector2::new(6.0, 5.0));
        assert!(!t.changes().is_pending(), "position is layout independent");
    }

    #[test]
    fn tracked_scale_notifies_only_on_change() {
        let mut t = Transform::default();
        {
            let mut s = t.scale_mut();
            s.x += 0.25;
            s.y += 0.5;
        }
        assert_eq!(t.take_changes(), 1, "one guard, one notification");
        assert_eq!(t.scale(), Vector2::new(1.25, 1.5));

        let untouched = t.scale_mut();
        drop(untouched);
        assert_eq!(t.take_changes(), 0);
    }
}
