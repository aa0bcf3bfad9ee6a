use std::fmt::Write as _;

use crate::util::truncate_label;

use super::style::{
    LABEL_MAX_CHARS, blend_color, dim_color, edge_opacity, edge_width, hex, kind_color,
    node_radius,
};
use super::{Emphasis, GraphRenderer, RenderFrame, node_emphasis};

const BACKGROUND: &str = "#13171d";
const EDGE_COLOR: &str = "#c8d2de";
const LABEL_COLOR: &str = "#eeeeee";

/// Retained backend: every `render` call replaces the stored document.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    width: f32,
    height: f32,
    document: String,
}

impl SvgRenderer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            document: String::new(),
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn into_document(self) -> String {
        self.document
    }
}

impl GraphRenderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) {
        let snapshot = frame.snapshot;
        let transform = frame.transform;
        let focus = frame.focus();
        let out = &mut self.document;
        out.clear();

        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );
        let _ = write!(
            out,
            r#"<rect width="100%" height="100%" fill="{BACKGROUND}"/>"#
        );
        let _ = write!(
            out,
            r#"<g transform="translate({} {}) scale({})">"#,
            transform.x, transform.y, transform.scale
        );

        out.push_str(r#"<g class="edges">"#);
        for edge in &snapshot.edges {
            let Some((from, to)) = snapshot.endpoints(edge) else {
                continue;
            };
            let mut opacity = edge_opacity(edge.strength);
            if let Some(related) = focus.as_ref() {
                let touches = related.contains(&edge.from) && related.contains(&edge.to);
                opacity = if touches { 0.9 } else { opacity * 0.35 };
            }
            out.push_str(r#"<line data-from=""#);
            escape_xml_into(out, &from.id);
            out.push_str(r#"" data-to=""#);
            escape_xml_into(out, &to.id);
            let _ = write!(
                out,
                r#"" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{EDGE_COLOR}" stroke-width="{:.2}" stroke-opacity="{:.2}"/>"#,
                from.x,
                from.y,
                to.x,
                to.y,
                edge_width(edge.strength),
                opacity,
            );
        }
        out.push_str("</g>");

        out.push_str(r#"<g class="nodes">"#);
        for (index, node) in snapshot.nodes.iter().enumerate() {
            let base = kind_color(node.kind);
            let emphasis = node_emphasis(frame, index, focus.as_ref());
            let fill = match emphasis {
                Emphasis::Related | Emphasis::Hovered | Emphasis::Selected => {
                    blend_color(base, eframe::egui::Color32::WHITE, 0.3)
                }
                Emphasis::Dimmed => dim_color(base, 0.45),
                Emphasis::Matched | Emphasis::Normal => base,
            };
            let radius = node_radius(node.connection_degree);

            let _ = write!(
                out,
                r##"<g class="node {kind}"><circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{fill}" stroke="#0f0f0f"/>"##,
                node.x,
                node.y,
                radius,
                kind = node.kind.label().to_ascii_lowercase(),
                fill = hex(fill),
            );
            let _ = write!(
                out,
                r#"<text x="{:.2}" y="{:.2}" dominant-baseline="middle" font-size="12" fill="{LABEL_COLOR}">"#,
                node.x + radius + 5.0,
                node.y,
            );
            escape_xml_into(out, &truncate_label(&node.name, LABEL_MAX_CHARS));
            out.push_str("</text></g>");
        }
        out.push_str("</g></g></svg>");
    }
}

fn escape_xml_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::campaign::NodeKind;
    use crate::layout::{EdgeView, GraphSnapshot, NodeView};
    use crate::view::ViewTransform;

    fn snapshot() -> GraphSnapshot {
        let node = |id: &str, name: &str, x: f32| NodeView {
            id: Arc::from(id),
            kind: NodeKind::Character,
            name: Arc::from(name),
            x,
            y: 0.0,
            connection_degree: 1,
        };
        GraphSnapshot {
            nodes: vec![node("a", "Ser <Brand> & Co", -60.0), node("b", "Brigid", 60.0)],
            edges: vec![EdgeView {
                from: 0,
                to: 1,
                strength: Some(2.0),
            }],
            revision: 3,
            moving: false,
        }
    }

    #[test]
    fn document_has_one_shape_per_element() {
        let snapshot = snapshot();
        let transform = ViewTransform {
            x: 200.0,
            y: 150.0,
            scale: 1.5,
        };
        let mut renderer = SvgRenderer::new(400.0, 300.0);
        renderer.render(&RenderFrame::new(&snapshot, &transform));

        let doc = renderer.document();
        assert!(doc.starts_with("<svg"));
        assert!(doc.ends_with("</svg>"));
        assert!(doc.contains(r#"translate(200 150) scale(1.5)"#));
        assert_eq!(doc.matches("<circle").count(), 2);
        assert_eq!(doc.matches("<line").count(), 1);
        assert!(doc.contains(r#"<line data-from="a" data-to="b" x1="-60.00""#));
    }

    #[test]
    fn labels_are_escaped() {
        let snapshot = snapshot();
        let transform = ViewTransform::default();
        let mut renderer = SvgRenderer::new(100.0, 100.0);
        renderer.render(&RenderFrame::new(&snapshot, &transform));

        let doc = renderer.into_document();
        assert!(doc.contains("Ser &lt;Brand&gt; &amp; Co"));
        assert!(!doc.contains("<Brand>"));
    }

    #[test]
    fn rendering_twice_replaces_the_document() {
        let snapshot = snapshot();
        let transform = ViewTransform::default();
        let mut renderer = SvgRenderer::new(100.0, 100.0);
        renderer.render(&RenderFrame::new(&snapshot, &transform));
        let first = renderer.document().to_owned();
        renderer.render(&RenderFrame::new(&snapshot, &transform));
        assert_eq!(renderer.document(), first);
    }
}
