use egui::{Pos2, Vec2};

use super::polygon::{Vertex, VertexId};

/// Radius of the circle drawn at each polygon vertex
pub const HANDLE_RADIUS: f32 = 6.0;

/// Extra slack around a handle that still counts as a hit
pub const HANDLE_HIT_SLOP: f32 = 2.0;

/// Find the handle under `pos`, if any.
///
/// When handles overlap the closest one wins; ties go to the vertex placed first.
pub fn hit_test_handles(pos: Pos2, vertices: &[Vertex]) -> Option<VertexId> {
    let reach = HANDLE_RADIUS + HANDLE_HIT_SLOP;
    vertices
        .iter()
        .map(|v| (v.id, pos.distance(v.pos)))
        .filter(|(_, distance)| *distance <= reach)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Keep a surface-local position inside a surface of `size`
pub fn clamp_to_surface(pos: Pos2, size: Vec2) -> Pos2 {
    Pos2::new(pos.x.clamp(0.0, size.x), pos.y.clamp(0.0, size.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_radius() {
        let vertices = vec![Vertex::new(Pos2::new(10.0, 10.0)), Vertex::new(Pos2::new(100.0, 10.0))];
        assert_eq!(hit_test_handles(Pos2::new(12.0, 13.0), &vertices), Some(vertices[0].id));
        assert_eq!(hit_test_handles(Pos2::new(100.0, 10.0), &vertices), Some(vertices[1].id));
        assert_eq!(hit_test_handles(Pos2::new(50.0, 50.0), &vertices), None);
    }

    #[test]
    fn test_closest_handle_wins() {
        let vertices = vec![Vertex::new(Pos2::new(0.0, 0.0)), Vertex::new(Pos2::new(6.0, 0.0))];
        assert_eq!(hit_test_handles(Pos2::new(5.0, 0.0), &vertices), Some(vertices[1].id));
    }

    #[test]
    fn test_clamp() {
        let size = Vec2::new(800.0, 450.0);
        assert_eq!(clamp_to_surface(Pos2::new(-5.0, 500.0), size), Pos2::new(0.0, 450.0));
        assert_eq!(clamp_to_surface(Pos2::new(20.0, 30.0), size), Pos2::new(20.0, 30.0));
    }
}
