use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

/// Axis-aligned ROI in surface pixels, as exchanged with `/update_roi/{camera_id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RectRoi {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RectRoi {
    /// Build an ROI from two diagonal points.
    ///
    /// The points may be given in any order; the result always has its
    /// origin at the top-left corner and non-negative extents.
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn top_left(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn bottom_right(&self) -> (i32, i32) {
        (self.x + self.width, self.y + self.height)
    }

    /// Screen-space rectangle for painting, given the surface origin
    pub fn to_screen(&self, origin: Pos2) -> Rect {
        Rect::from_min_size(
            origin + egui::vec2(self.x as f32, self.y as f32),
            egui::vec2(self.width as f32, self.height as f32),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_reversed_drag() {
        let roi = RectRoi::from_corners(50, 60, 20, 10);
        assert_eq!(roi, RectRoi { x: 20, y: 10, width: 30, height: 50 });
        assert_eq!(roi.top_left(), (20, 10));
        assert_eq!(roi.bottom_right(), (50, 60));
    }

    #[test]
    fn test_corner_order_does_not_matter() {
        let pairs = [
            ((0, 0), (10, 20)),
            ((10, 20), (0, 0)),
            ((10, 0), (0, 20)),
            ((0, 20), (10, 0)),
        ];
        for ((x1, y1), (x2, y2)) in pairs {
            let roi = RectRoi::from_corners(x1, y1, x2, y2);
            assert_eq!(roi.top_left(), (x1.min(x2), y1.min(y2)));
            assert_eq!(roi.bottom_right(), (x1.max(x2), y1.max(y2)));
            assert!(roi.width >= 0 && roi.height >= 0);
        }
    }

    #[test]
    fn test_degenerate_click_is_empty() {
        let roi = RectRoi::from_corners(7, 7, 7, 7);
        assert_eq!(roi.width, 0);
        assert_eq!(roi.height, 0);
    }

    #[test]
    fn test_to_screen_offsets_by_origin() {
        let roi = RectRoi { x: 5, y: 10, width: 20, height: 30 };
        let rect = roi.to_screen(Pos2::new(100.0, 200.0));
        assert_eq!(rect.min, Pos2::new(105.0, 210.0));
        assert_eq!(rect.max, Pos2::new(125.0, 240.0));
    }
}
