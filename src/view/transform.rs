use eframe::egui::{Pos2, Rect, Vec2, pos2};

pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 3.0;
/// Scale factor applied per wheel notch.
pub const ZOOM_STEP: f32 = 1.1;

/// Pan plus uniform scale: `screen = world * scale + (x, y)`.
///
/// Screen coordinates are relative to the top-left corner of the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    /// Unit scale with the world origin in the middle of the viewport.
    pub fn centered(viewport: Vec2) -> Self {
        Self {
            x: viewport.x * 0.5,
            y: viewport.y * 0.5,
            scale: 1.0,
        }
    }

    /// Largest clamped scale that shows `world` inside the viewport with
    /// `padding` pixels to spare on every side, centered.
    pub fn fit(world: Rect, viewport: Vec2, padding: f32) -> Self {
        if !world.is_finite() || world.width() <= 0.0 || world.height() <= 0.0 {
            let mut transform = Self::centered(viewport);
            if world.is_finite() {
                let center = world.center();
                transform.x -= center.x;
                transform.y -= center.y;
            }
            return transform;
        }

        let usable = (viewport - Vec2::splat(padding * 2.0)).max(Vec2::splat(1.0));
        let scale = (usable.x / world.width())
            .min(usable.y / world.height())
            .clamp(MIN_SCALE, MAX_SCALE);
        let center = world.center();
        Self {
            x: (viewport.x * 0.5) - (center.x * scale),
            y: (viewport.y * 0.5) - (center.y * scale),
            scale,
        }
    }

    pub fn reset(&mut self, viewport: Vec2) {
        *self = Self::centered(viewport);
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        pos2((screen.x - self.x) / self.scale, (screen.y - self.y) / self.scale)
    }

    pub fn world_to_screen(&self, world: Pos2) -> Pos2 {
        pos2((world.x * self.scale) + self.x, (world.y * self.scale) + self.y)
    }

    /// Adds a raw screen-space delta; the scale does not apply.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Multiplies the scale by `factor`, clamped, keeping the world point
    /// under `cursor` on the same pixel. Returns whether anything changed.
    pub fn zoom_at(&mut self, cursor: Pos2, factor: f32) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }

        let old_scale = self.scale;
        let new_scale = (old_scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (new_scale - old_scale).abs() <= f32::EPSILON {
            return false;
        }

        let ratio = (new_scale / old_scale) - 1.0;
        self.x -= (cursor.x - self.x) * ratio;
        self.y -= (cursor.y - self.y) * ratio;
        self.scale = new_scale;
        true
    }

    /// One wheel notch: in for positive `direction`, out for negative.
    pub fn zoom_step(&mut self, cursor: Pos2, direction: f32) -> bool {
        if direction > 0.0 {
            self.zoom_at(cursor, ZOOM_STEP)
        } else if direction < 0.0 {
            self.zoom_at(cursor, 1.0 / ZOOM_STEP)
        } else {
            false
        }
    }

    /// World-space rectangle covered by a viewport of the given size.
    pub fn visible_world_rect(&self, viewport: Vec2) -> Rect {
        Rect::from_min_max(
            self.screen_to_world(Pos2::ZERO),
            self.screen_to_world(viewport.to_pos2()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    fn close(a: Pos2, b: Pos2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn screen_world_round_trip() {
        let transforms = [
            ViewTransform::default(),
            ViewTransform { x: 400.0, y: 300.0, scale: 0.2 },
            ViewTransform { x: -120.5, y: 88.25, scale: 2.75 },
        ];
        let points = [pos2(0.0, 0.0), pos2(-1_500.0, 730.0), pos2(12.5, -3.25)];

        for transform in transforms {
            for point in points {
                let back = transform.screen_to_world(transform.world_to_screen(point));
                assert!(close(back, point), "{transform:?} {point:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn zoom_keeps_the_cursor_point_fixed() {
        let mut transform = ViewTransform { x: 310.0, y: 190.0, scale: 1.3 };
        let cursor = pos2(520.0, 80.0);
        let world = transform.screen_to_world(cursor);

        assert!(transform.zoom_step(cursor, 1.0));
        assert!((transform.scale - 1.3 * ZOOM_STEP).abs() < 1e-5);
        assert!(close(transform.world_to_screen(world), cursor));

        assert!(transform.zoom_step(cursor, -1.0));
        assert!(close(transform.world_to_screen(world), cursor));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut transform = ViewTransform::default();
        for _ in 0..100 {
            transform.zoom_step(pos2(50.0, 50.0), 1.0);
        }
        assert_eq!(transform.scale, MAX_SCALE);
        assert!(!transform.zoom_step(pos2(50.0, 50.0), 1.0));

        for _ in 0..100 {
            transform.zoom_step(pos2(50.0, 50.0), -1.0);
        }
        assert_eq!(transform.scale, MIN_SCALE);
    }

    #[test]
    fn pan_uses_raw_screen_delta() {
        let mut transform = ViewTransform { x: 10.0, y: 20.0, scale: 2.5 };
        transform.pan_by(vec2(5.0, -7.0));
        assert_eq!(transform, ViewTransform { x: 15.0, y: 13.0, scale: 2.5 });
    }

    #[test]
    fn fit_centers_the_world_rect() {
        let world = Rect::from_min_max(pos2(-100.0, -50.0), pos2(300.0, 150.0));
        let transform = ViewTransform::fit(world, vec2(880.0, 480.0), 40.0);
        assert!((transform.scale - 2.0).abs() < 1e-5);
        assert!(close(transform.world_to_screen(world.center()), pos2(440.0, 240.0)));
    }

    #[test]
    fn fit_of_a_single_point_keeps_unit_scale() {
        let world = Rect::from_min_max(pos2(10.0, 10.0), pos2(10.0, 10.0));
        let transform = ViewTransform::fit(world, vec2(200.0, 100.0), 20.0);
        assert_eq!(transform.scale, 1.0);
        assert!(close(transform.world_to_screen(pos2(10.0, 10.0)), pos2(100.0, 50.0)));
    }

    #[test]
    fn visible_world_rect_spans_the_viewport() {
        let transform = ViewTransform { x: 100.0, y: 50.0, scale: 2.0 };
        let visible = transform.visible_world_rect(vec2(400.0, 300.0));
        assert!(close(visible.min, pos2(-50.0, -25.0)));
        assert!(close(visible.max, pos2(150.0, 125.0)));
    }

    #[test]
    fn reset_centers_the_origin() {
        let mut transform = ViewTransform { x: -4.0, y: 9.0, scale: 2.0 };
        transform.reset(vec2(800.0, 600.0));
        assert!(close(transform.world_to_screen(Pos2::ZERO), pos2(400.0, 300.0)));
        assert_eq!(transform.scale, 1.0);
    }
}
