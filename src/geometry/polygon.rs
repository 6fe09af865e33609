use egui::Pos2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a polygon vertex and its drag handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexId(Uuid);

impl VertexId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for VertexId {
    fn default() -> Self {
        Self::new()
    }
}

/// A point placed by the user, in surface-local pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub id: VertexId,
    pub pos: Pos2,
}

impl Vertex {
    pub fn new(pos: Pos2) -> Self {
        Self {
            id: VertexId::new(),
            pos,
        }
    }
}

/// Integer coordinate pair as submitted to `/record_roi`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiPoint {
    pub x: i32,
    pub y: i32,
}

impl From<Pos2> for RoiPoint {
    fn from(pos: Pos2) -> Self {
        Self {
            x: pos.x.round() as i32,
            y: pos.y.round() as i32,
        }
    }
}

/// A closed polygon ROI. Vertex order is the order the user placed them in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    vertices: Vec<Vertex>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn points(&self) -> Vec<Pos2> {
        self.vertices.iter().map(|v| v.pos).collect()
    }

    /// Move a single vertex. Returns false when no vertex has `id`.
    pub fn move_vertex(&mut self, id: VertexId, pos: Pos2) -> bool {
        match self.vertices.iter_mut().find(|v| v.id == id) {
            Some(vertex) => {
                vertex.pos = pos;
                true
            }
            None => false,
        }
    }

    /// Flatten to rounded `{x, y}` pairs in vertex order
    pub fn to_roi_points(&self) -> Vec<RoiPoint> {
        self.vertices.iter().map(|v| RoiPoint::from(v.pos)).collect()
    }

    /// Twice the signed area (shoelace). Positive for clockwise winding on a y-down surface.
    pub fn signed_area2(&self) -> f32 {
        let n = self.vertices.len();
        (0..n)
            .map(|i| {
                let a = self.vertices[i].pos;
                let b = self.vertices[(i + 1) % n].pos;
                a.x * b.y - b.x * a.y
            })
            .sum()
    }

    /// True when the polygon has at least three vertices and no two
    /// non-adjacent edges touch.
    pub fn is_simple(&self) -> bool {
        let n = self.vertices.len();
        if n < 3 || self.signed_area2() == 0.0 {
            return false;
        }
        for i in 0..n {
            let a1 = self.vertices[i].pos;
            let a2 = self.vertices[(i + 1) % n].pos;
            for j in (i + 1)..n {
                // Adjacent edges share an endpoint by construction
                if j == i + 1 || (i == 0 && j == n - 1) {
                    continue;
                }
                let b1 = self.vertices[j].pos;
                let b2 = self.vertices[(j + 1) % n].pos;
                if segments_intersect(a1, a2, b1, b2) {
                    return false;
                }
            }
        }
        true
    }
}

fn cross(a: Pos2, b: Pos2, c: Pos2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(p: Pos2, a: Pos2, b: Pos2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed-segment intersection test, including collinear overlap
pub(crate) fn segments_intersect(p1: Pos2, p2: Pos2, q1: Pos2, q2: Pos2) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(p1, q1, q2))
        || (d2 == 0.0 && on_segment(p2, q1, q2))
        || (d3 == 0.0 && on_segment(q1, p1, p2))
        || (d4 == 0.0 && on_segment(q2, p1, p2))
}
