use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, vec2};

use crate::layout::QuadtreeCell;
use crate::util::truncate_label;

use super::style::{
    LABEL_MAX_CHARS, blend_color, dim_color, edge_opacity, edge_width, kind_color, node_radius,
};
use super::{Emphasis, GraphRenderer, RenderFrame, node_emphasis};

const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

pub struct RasterRenderer<'p> {
    painter: &'p Painter,
    rect: Rect,
    quadtree_cells: Option<&'p [QuadtreeCell]>,
}

impl<'p> RasterRenderer<'p> {
    pub fn new(painter: &'p Painter, rect: Rect) -> Self {
        Self {
            painter,
            rect,
            quadtree_cells: None,
        }
    }

    pub fn with_quadtree_overlay(mut self, cells: &'p [QuadtreeCell]) -> Self {
        self.quadtree_cells = Some(cells);
        self
    }

    fn to_screen(&self, frame: &RenderFrame<'_>, world: Pos2) -> Pos2 {
        self.rect.min + frame.transform.world_to_screen(world).to_vec2()
    }

    fn draw_background(&self, frame: &RenderFrame<'_>) {
        let painter = self.painter;
        let rect = self.rect;
        painter.rect_filled(rect, 0.0, BACKGROUND);

        let scale = frame.transform.scale;
        let step = (56.0 * scale.clamp(0.6, 1.8)).max(20.0);
        let origin = self.to_screen(frame, Pos2::ZERO);
        let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

        let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
        while x < rect.right() {
            painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
            x += step;
        }

        let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
        while y < rect.bottom() {
            painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
            y += step;
        }
    }

    fn draw_quadtree(&self, frame: &RenderFrame<'_>, cells: &[QuadtreeCell]) {
        let visible = frame.transform.visible_world_rect(self.rect.size());
        for cell in cells.iter().filter(|cell| visible.intersects(cell.rect)) {
            let corners = [
                cell.rect.left_top(),
                cell.rect.right_top(),
                cell.rect.right_bottom(),
                cell.rect.left_bottom(),
            ]
            .map(|corner| self.to_screen(frame, corner));

            let alpha = if cell.is_leaf { 110 } else { 55 };
            let line_width = (1.4 - (cell.depth as f32 * 0.09)).clamp(0.45, 1.4);
            let stroke = Stroke::new(
                line_width,
                Color32::from_rgba_unmultiplied(106, 198, 255, alpha),
            );

            for side in 0..4 {
                self.painter
                    .line_segment([corners[side], corners[(side + 1) % 4]], stroke);
            }
        }
    }
}

fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

impl GraphRenderer for RasterRenderer<'_> {
    fn render(&mut self, frame: &RenderFrame<'_>) {
        self.draw_background(frame);
        if let Some(cells) = self.quadtree_cells {
            self.draw_quadtree(frame, cells);
        }

        let snapshot = frame.snapshot;
        let scale = frame.transform.scale;
        let focus = frame.focus();

        for edge in &snapshot.edges {
            let Some((from, to)) = snapshot.endpoints(edge) else {
                continue;
            };
            let start = self.to_screen(frame, from.pos());
            let end = self.to_screen(frame, to.pos());
            if !edge_visible(self.rect, start, end, 2.0) {
                continue;
            }

            let touches_focus = focus
                .as_ref()
                .is_some_and(|related| related.contains(&edge.from) && related.contains(&edge.to));
            let mut opacity = edge_opacity(edge.strength);
            if focus.is_some() {
                opacity = if touches_focus { 0.9 } else { opacity * 0.35 };
            }
            let color = Color32::from_rgba_unmultiplied(200, 210, 222, (opacity * 255.0) as u8);
            let width = (edge_width(edge.strength) * scale).clamp(0.5, 6.0);
            self.painter.line_segment([start, end], Stroke::new(width, color));
        }

        for (index, node) in snapshot.nodes.iter().enumerate() {
            let position = self.to_screen(frame, node.pos());
            let radius = node_radius(node.connection_degree) * scale;
            if !circle_visible(self.rect, position, radius) {
                continue;
            }

            let base = kind_color(node.kind);
            let emphasis = node_emphasis(frame, index, focus.as_ref());
            let fill = match emphasis {
                Emphasis::Hovered => HOVER_COLOR,
                Emphasis::Selected => SELECTED_COLOR,
                Emphasis::Related => blend_color(base, HOVER_COLOR, 0.35),
                Emphasis::Matched => blend_color(base, MATCH_COLOR, 0.68),
                Emphasis::Dimmed => dim_color(base, 0.45),
                Emphasis::Normal => base,
            };

            self.painter.circle_filled(position, radius, fill);
            let stroke_width = match emphasis {
                Emphasis::Selected | Emphasis::Hovered => 2.2,
                Emphasis::Matched => 1.55,
                _ => 1.0,
            };
            self.painter.circle_stroke(
                position,
                radius,
                Stroke::new(stroke_width, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );

            let show_label = emphasis != Emphasis::Dimmed
                && (scale > 0.6 || emphasis != Emphasis::Normal);
            if show_label {
                self.painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    truncate_label(&node.name, LABEL_MAX_CHARS),
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn culling_keeps_circles_touching_the_canvas() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(circle_visible(rect, pos2(105.0, 50.0), 6.0));
        assert!(!circle_visible(rect, pos2(120.0, 50.0), 6.0));
    }

    #[test]
    fn culling_drops_edges_entirely_off_canvas() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(edge_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0), 0.0));
        assert!(!edge_visible(rect, pos2(-50.0, -10.0), pos2(-5.0, -40.0), 1.0));
    }
}
