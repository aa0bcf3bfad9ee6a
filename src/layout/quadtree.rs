use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

const QUADTREE_LEAF_CAPACITY: usize = 8;
const QUADTREE_MAX_DEPTH: usize = 10;

/// One indexed position; `id` is the node's slot in the simulation buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadPoint {
    pub x: f32,
    pub y: f32,
    pub id: usize,
}

impl QuadPoint {
    pub fn new(x: f32, y: f32, id: usize) -> Self {
        Self { x, y, id }
    }

    pub fn pos(self) -> Pos2 {
        pos2(self.x, self.y)
    }
}

/// Cell outline exported for the debug overlay.
#[derive(Clone, Copy, Debug)]
pub struct QuadtreeCell {
    pub rect: Rect,
    pub depth: usize,
    pub is_leaf: bool,
}

struct QuadNode {
    bounds: Rect,
    depth: usize,
    mass: f32,
    mass_sum: Vec2,
    points: Vec<QuadPoint>,
    children: Option<Box<[QuadNode; 4]>>,
}

/// Bucket quadtree over a fixed rectangle.
///
/// Leaves split once they hold more than eight points, except at depth ten,
/// where they keep growing instead. Coincident points therefore cost a deeper
/// bucket, never unbounded recursion. There is no removal: the simulation
/// throws the tree away and rebuilds it every step.
pub struct Quadtree {
    root: QuadNode,
    len: usize,
}

fn quadrant_for(bounds: Rect, point: Pos2) -> usize {
    let center = bounds.center();
    let right = point.x >= center.x;
    let lower = point.y >= center.y;
    match (right, lower) {
        (false, false) => 0,
        (true, false) => 1,
        (false, true) => 2,
        (true, true) => 3,
    }
}

fn child_rect(bounds: Rect, quadrant: usize) -> Rect {
    let center = bounds.center();
    match quadrant {
        0 => Rect::from_min_max(bounds.min, center),
        1 => Rect::from_min_max(pos2(center.x, bounds.min.y), pos2(bounds.max.x, center.y)),
        2 => Rect::from_min_max(pos2(bounds.min.x, center.y), pos2(center.x, bounds.max.y)),
        _ => Rect::from_min_max(center, bounds.max),
    }
}

fn distance_sq_to_rect(bounds: Rect, point: Pos2) -> f32 {
    let dx = (bounds.min.x - point.x).max(0.0).max(point.x - bounds.max.x);
    let dy = (bounds.min.y - point.y).max(0.0).max(point.y - bounds.max.y);
    (dx * dx) + (dy * dy)
}

impl QuadNode {
    fn new(bounds: Rect, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            mass: 0.0,
            mass_sum: Vec2::ZERO,
            points: Vec::new(),
            children: None,
        }
    }

    fn center_of_mass(&self) -> Pos2 {
        if self.mass > 0.0 {
            (self.mass_sum / self.mass).to_pos2()
        } else {
            self.bounds.center()
        }
    }

    fn insert(&mut self, point: QuadPoint) {
        self.mass += 1.0;
        self.mass_sum += vec2(point.x, point.y);

        if let Some(children) = self.children.as_mut() {
            children[quadrant_for(self.bounds, point.pos())].insert(point);
            return;
        }

        self.points.push(point);
        if self.points.len() > QUADTREE_LEAF_CAPACITY && self.depth < QUADTREE_MAX_DEPTH {
            self.subdivide();
        }
    }

    fn subdivide(&mut self) {
        let bounds = self.bounds;
        let depth = self.depth + 1;
        let mut children: Box<[QuadNode; 4]> =
            Box::new(std::array::from_fn(|quadrant| {
                QuadNode::new(child_rect(bounds, quadrant), depth)
            }));

        for point in self.points.drain(..) {
            children[quadrant_for(bounds, point.pos())].insert(point);
        }
        self.children = Some(children);
    }

    fn query(&self, center: Pos2, radius_sq: f32, out: &mut Vec<QuadPoint>) {
        if self.mass <= 0.0 || distance_sq_to_rect(self.bounds, center) > radius_sq {
            return;
        }

        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.query(center, radius_sq, out);
            }
            return;
        }

        out.extend(
            self.points
                .iter()
                .filter(|point| (point.pos() - center).length_sq() <= radius_sq),
        );
    }

    fn far_masses(
        &self,
        point: Pos2,
        cutoff_sq: f32,
        theta: f32,
        visit: &mut impl FnMut(Pos2, f32),
    ) {
        if self.mass <= 0.0 {
            return;
        }

        let beyond_cutoff = distance_sq_to_rect(self.bounds, point) > cutoff_sq;

        let Some(children) = self.children.as_ref() else {
            for other in &self.points {
                if beyond_cutoff || (other.pos() - point).length_sq() > cutoff_sq {
                    visit(other.pos(), 1.0);
                }
            }
            return;
        };

        if beyond_cutoff {
            let center_of_mass = self.center_of_mass();
            let distance = (center_of_mass - point).length().max(f32::EPSILON);
            let side = self.bounds.width().max(self.bounds.height());
            if side / distance < theta {
                visit(center_of_mass, self.mass);
                return;
            }
        }

        for child in children.iter() {
            child.far_masses(point, cutoff_sq, theta, visit);
        }
    }

    fn collect_cells(&self, cells: &mut Vec<QuadtreeCell>) {
        cells.push(QuadtreeCell {
            rect: self.bounds,
            depth: self.depth,
            is_leaf: self.children.is_none(),
        });

        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.collect_cells(cells);
            }
        }
    }
}

impl Quadtree {
    pub fn new(bounds: Rect) -> Self {
        Self {
            root: QuadNode::new(bounds, 0),
            len: 0,
        }
    }

    pub fn from_points(points: &[QuadPoint]) -> Option<Self> {
        let mut min = pos2(f32::INFINITY, f32::INFINITY);
        let mut max = pos2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            if !point.x.is_finite() || !point.y.is_finite() {
                continue;
            }
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        if !min.x.is_finite() || !max.x.is_finite() {
            return None;
        }

        let span = (max.x - min.x).max(max.y - min.y).max(1.0);
        let half_extent = (span * 0.5) + 1.0;
        let bounds = Rect::from_center_size(
            min + ((max - min) * 0.5),
            vec2(half_extent * 2.0, half_extent * 2.0),
        );

        let mut tree = Self::new(bounds);
        for point in points {
            tree.insert(*point);
        }
        Some(tree)
    }

    /// Adds a point. Returns `false` when it lies outside the tree bounds.
    pub fn insert(&mut self, point: QuadPoint) -> bool {
        if !self.root.bounds.contains(point.pos()) {
            return false;
        }
        self.root.insert(point);
        self.len += 1;
        true
    }

    pub fn query_circle(&self, center: Pos2, radius: f32) -> Vec<QuadPoint> {
        let mut out = Vec::new();
        self.query_circle_into(center, radius, &mut out);
        out
    }

    /// Same as [`Quadtree::query_circle`], appending into a reusable buffer.
    pub fn query_circle_into(&self, center: Pos2, radius: f32, out: &mut Vec<QuadPoint>) {
        if radius < 0.0 || !radius.is_finite() {
            return;
        }
        self.root.query(center, radius * radius, out);
    }

    /// Visits the mass lying strictly outside `cutoff` of `point`, grouping
    /// far cells into their center of mass when `side / distance < theta`.
    pub fn for_each_far_mass(
        &self,
        point: Pos2,
        cutoff: f32,
        theta: f32,
        mut visit: impl FnMut(Pos2, f32),
    ) {
        self.root
            .far_masses(point, cutoff * cutoff, theta, &mut visit);
    }

    pub fn cells(&self) -> Vec<QuadtreeCell> {
        let mut cells = Vec::new();
        self.root.collect_cells(&mut cells);
        cells
    }

    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::stable_pair;

    fn scattered(count: usize) -> Vec<QuadPoint> {
        (0..count)
            .map(|index| {
                let (x, y) = stable_pair(&format!("point-{index}"), 7);
                QuadPoint::new(x * 500.0, y * 500.0, index)
            })
            .collect()
    }

    #[test]
    fn query_matches_linear_scan() {
        let points = scattered(400);
        let tree = Quadtree::from_points(&points).expect("finite points");
        assert_eq!(tree.len(), points.len());

        for (center, radius) in [(pos2(0.0, 0.0), 120.0), (pos2(-300.0, 250.0), 90.0)] {
            let mut found = tree
                .query_circle(center, radius)
                .into_iter()
                .map(|point| point.id)
                .collect::<Vec<_>>();
            found.sort_unstable();

            let expected = points
                .iter()
                .filter(|point| (point.pos() - center).length() <= radius)
                .map(|point| point.id)
                .collect::<Vec<_>>();
            assert_eq!(found, expected);
        }
    }

    #[test]
    fn coincident_points_stop_at_max_depth() {
        let mut tree = Quadtree::new(Rect::from_min_max(pos2(-10.0, -10.0), pos2(10.0, 10.0)));
        for id in 0..5_000 {
            assert!(tree.insert(QuadPoint::new(1.5, 1.5, id)));
        }

        assert_eq!(tree.query_circle(pos2(1.5, 1.5), 0.0).len(), 5_000);
        let deepest = tree.cells().iter().map(|cell| cell.depth).max().unwrap_or(0);
        assert!(deepest <= QUADTREE_MAX_DEPTH);
    }

    #[test]
    fn rejects_points_outside_bounds() {
        let mut tree = Quadtree::new(Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 10.0)));
        assert!(tree.insert(QuadPoint::new(10.0, 10.0, 0)));
        assert!(!tree.insert(QuadPoint::new(10.5, 2.0, 1)));
        assert!(!tree.insert(QuadPoint::new(f32::NAN, 2.0, 2)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn far_masses_cover_everything_outside_cutoff() {
        let points = scattered(300);
        let tree = Quadtree::from_points(&points).expect("finite points");
        let probe = pos2(20.0, -40.0);
        let cutoff = 150.0;

        let mut far_mass = 0.0;
        tree.for_each_far_mass(probe, cutoff, 0.72, |_, mass| far_mass += mass);

        let expected = points
            .iter()
            .filter(|point| (point.pos() - probe).length() > cutoff)
            .count();
        assert!((far_mass - expected as f32).abs() < 0.5);
    }

    #[test]
    fn empty_input_has_no_tree() {
        assert!(Quadtree::from_points(&[]).is_none());
    }
}
