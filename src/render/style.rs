use eframe::egui::Color32;

use crate::campaign::NodeKind;

pub const LABEL_MAX_CHARS: usize = 24;

/// World-space radius; grows with the square root of the degree.
pub fn node_radius(connection_degree: usize) -> f32 {
    (8.0 + (connection_degree as f32).sqrt() * 3.0).min(28.0)
}

pub fn kind_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Character => Color32::from_rgb(96, 165, 250),
        NodeKind::Faction => Color32::from_rgb(192, 132, 252),
        NodeKind::Location => Color32::from_rgb(52, 211, 153),
        NodeKind::Quest => Color32::from_rgb(251, 191, 36),
        NodeKind::Note => Color32::from_rgb(148, 163, 184),
    }
}

fn normalized_strength(strength: Option<f32>) -> f32 {
    strength
        .filter(|value| value.is_finite())
        .unwrap_or(1.0)
        .clamp(0.5, 5.0)
}

/// Line width in world units.
pub fn edge_width(strength: Option<f32>) -> f32 {
    0.8 + (normalized_strength(strength) * 0.6)
}

pub fn edge_opacity(strength: Option<f32>) -> f32 {
    (0.25 + (normalized_strength(strength) * 0.12)).min(0.85)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_grows_then_caps() {
        assert_eq!(node_radius(0), 8.0);
        assert!(node_radius(4) > node_radius(1));
        assert_eq!(node_radius(10_000), 28.0);
    }

    #[test]
    fn strength_only_thickens_lines() {
        assert!(edge_width(Some(4.0)) > edge_width(None));
        assert!(edge_opacity(Some(4.0)) > edge_opacity(Some(0.5)));
        assert_eq!(edge_width(Some(f32::NAN)), edge_width(None));
    }

    #[test]
    fn hex_formats_rgb() {
        assert_eq!(hex(Color32::from_rgb(255, 0, 16)), "#ff0010");
    }
}
