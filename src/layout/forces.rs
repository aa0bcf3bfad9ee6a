use std::f32::consts::TAU;

use eframe::egui::{Pos2, Vec2, vec2};

pub(super) const MIN_DISTANCE: f32 = 1.0;

// Antisymmetric in the pair so coincident nodes separate.
fn fallback_direction(index: usize, other_index: usize) -> Vec2 {
    let (low, high) = if index < other_index {
        (index, other_index)
    } else {
        (other_index, index)
    };
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214 + 0.11) * TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if index < other_index {
        direction
    } else {
        -direction
    }
}

pub(super) fn repulsion_between(
    point: Pos2,
    other: Pos2,
    index: usize,
    other_index: usize,
    strength: f32,
) -> Vec2 {
    let delta = point - other;
    let distance = delta.length();
    let direction = if distance > f32::EPSILON {
        delta / distance
    } else {
        fallback_direction(index, other_index)
    };

    let clamped = distance.max(MIN_DISTANCE);
    direction * (strength / (clamped * clamped))
}

pub(super) fn far_repulsion(point: Pos2, center_of_mass: Pos2, mass: f32, strength: f32) -> Vec2 {
    let delta = point - center_of_mass;
    let distance = delta.length();
    if distance <= f32::EPSILON {
        return Vec2::ZERO;
    }

    let clamped = distance.max(MIN_DISTANCE);
    (delta / distance) * (strength * mass / (clamped * clamped))
}

pub(super) fn spring_force(
    from: Pos2,
    to: Pos2,
    stiffness: f32,
    rest_length: f32,
) -> Option<Vec2> {
    let delta = to - from;
    let distance = delta.length();
    if distance < MIN_DISTANCE {
        return None;
    }

    Some((delta / distance) * ((distance - rest_length) * stiffness))
}

pub(super) fn center_force(point: Pos2, center: Pos2, strength: f32) -> Vec2 {
    (center - point) * strength
}
