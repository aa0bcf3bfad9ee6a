//! Presentation backends. Both consume the same `(snapshot, transform,
//! hover)` triple and never mutate it.

use std::collections::HashSet;

use crate::layout::GraphSnapshot;
use crate::view::ViewTransform;

mod raster;
mod style;
mod svg;

pub use raster::RasterRenderer;
pub use style::{LABEL_MAX_CHARS, edge_opacity, edge_width, kind_color, node_radius};
pub use svg::SvgRenderer;

pub struct RenderFrame<'a> {
    pub snapshot: &'a GraphSnapshot,
    pub transform: &'a ViewTransform,
    pub hover: Option<&'a str>,
    pub selected: Option<&'a str>,
    /// Search matches, by node slot.
    pub highlighted: Option<&'a HashSet<usize>>,
}

impl<'a> RenderFrame<'a> {
    pub fn new(snapshot: &'a GraphSnapshot, transform: &'a ViewTransform) -> Self {
        Self {
            snapshot,
            transform,
            hover: None,
            selected: None,
            highlighted: None,
        }
    }

    fn focus(&self) -> Option<HashSet<usize>> {
        let id = self.hover.or(self.selected)?;
        let index = self.snapshot.index_of(id)?;
        Some(self.snapshot.neighborhood(index))
    }
}

pub trait GraphRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Emphasis {
    Hovered,
    Selected,
    Related,
    Matched,
    Dimmed,
    Normal,
}

fn node_emphasis(
    frame: &RenderFrame<'_>,
    index: usize,
    focus: Option<&HashSet<usize>>,
) -> Emphasis {
    let node = &frame.snapshot.nodes[index];
    if frame.hover == Some(&*node.id) {
        return Emphasis::Hovered;
    }
    if frame.selected == Some(&*node.id) {
        return Emphasis::Selected;
    }
    if focus.is_some_and(|related| related.contains(&index)) {
        return Emphasis::Related;
    }
    if frame
        .highlighted
        .is_some_and(|matches| matches.contains(&index))
    {
        return Emphasis::Matched;
    }

    let searching = frame.highlighted.is_some_and(|matches| !matches.is_empty());
    if focus.is_some() || searching {
        Emphasis::Dimmed
    } else {
        Emphasis::Normal
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::campaign::NodeKind;
    use crate::layout::{EdgeView, NodeView};

    fn node(id: &str) -> NodeView {
        NodeView {
            id: Arc::from(id),
            kind: NodeKind::Quest,
            name: Arc::from(id),
            x: 0.0,
            y: 0.0,
            connection_degree: 1,
        }
    }

    #[test]
    fn hover_highlights_neighbors_and_dims_the_rest() {
        let snapshot = GraphSnapshot {
            nodes: vec![node("a"), node("b"), node("c")],
            edges: vec![EdgeView {
                from: 0,
                to: 1,
                strength: None,
            }],
            revision: 1,
            moving: false,
        };
        let transform = ViewTransform::default();
        let mut frame = RenderFrame::new(&snapshot, &transform);
        frame.hover = Some("a");
        let focus = frame.focus();

        assert_eq!(node_emphasis(&frame, 0, focus.as_ref()), Emphasis::Hovered);
        assert_eq!(node_emphasis(&frame, 1, focus.as_ref()), Emphasis::Related);
        assert_eq!(node_emphasis(&frame, 2, focus.as_ref()), Emphasis::Dimmed);
    }

    #[test]
    fn plain_frame_is_normal() {
        let snapshot = GraphSnapshot {
            nodes: vec![node("a")],
            ..GraphSnapshot::default()
        };
        let transform = ViewTransform::default();
        let frame = RenderFrame::new(&snapshot, &transform);
        assert_eq!(node_emphasis(&frame, 0, None), Emphasis::Normal);
    }
}
