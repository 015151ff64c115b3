//! Shape tessellation
//!
//! Rounded-rect corners are quarter-circle arcs. Segment counts up to 7 come
//! from precomputed unit-circle tables; larger counts fall back to sin/cos.
//! Polylines stroke as per-segment quads with mitered joints, switching to a
//! bevel when the miter would exceed the sharpness threshold.
//!
//! All emitters funnel through [`DrawList::add_vertex`]/[`add_index`] so
//! tessellated shapes batch with everything else.
//!
//! [`add_index`]: DrawList::add_index

use flick_core::{Color, CornerRadius, Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::batch::{DrawList, Vertex};

// Quarter-circle unit points, (cos, sin) at k * 90° / segments.
const ARC_1: [[f32; 2]; 2] = [[1.0, 0.0], [0.0, 1.0]];
const ARC_2: [[f32; 2]; 3] = [[1.0, 0.0], [0.70710678, 0.70710678], [0.0, 1.0]];
const ARC_3: [[f32; 2]; 4] = [
    [1.0, 0.0],
    [0.86602540, 0.5],
    [0.5, 0.86602540],
    [0.0, 1.0],
];
const ARC_4: [[f32; 2]; 5] = [
    [1.0, 0.0],
    [0.92387953, 0.38268343],
    [0.70710678, 0.70710678],
    [0.38268343, 0.92387953],
    [0.0, 1.0],
];
const ARC_5: [[f32; 2]; 6] = [
    [1.0, 0.0],
    [0.95105652, 0.30901699],
    [0.80901699, 0.58778525],
    [0.58778525, 0.80901699],
    [0.30901699, 0.95105652],
    [0.0, 1.0],
];
const ARC_6: [[f32; 2]; 7] = [
    [1.0, 0.0],
    [0.96592583, 0.25881905],
    [0.86602540, 0.5],
    [0.70710678, 0.70710678],
    [0.5, 0.86602540],
    [0.25881905, 0.96592583],
    [0.0, 1.0],
];
const ARC_7: [[f32; 2]; 8] = [
    [1.0, 0.0],
    [0.97492791, 0.22252093],
    [0.90096887, 0.43388374],
    [0.78183148, 0.62348980],
    [0.62348980, 0.78183148],
    [0.43388374, 0.90096887],
    [0.22252093, 0.97492791],
    [0.0, 1.0],
];

/// Segments used for a quarter arc of the given radius
pub fn arc_segment_count(radius: f32) -> usize {
    ((radius / 3.0).ceil() as usize).clamp(1, 24)
}

/// Unit points of a quarter arc: table lookup through 7 segments, computed
/// trigonometry beyond
pub fn quarter_arc(segments: usize) -> SmallVec<[[f32; 2]; 25]> {
    let table: &[[f32; 2]] = match segments {
        0 | 1 => &ARC_1,
        2 => &ARC_2,
        3 => &ARC_3,
        4 => &ARC_4,
        5 => &ARC_5,
        6 => &ARC_6,
        7 => &ARC_7,
        _ => {
            let mut points = SmallVec::new();
            for k in 0..=segments {
                let angle = std::f32::consts::FRAC_PI_2 * k as f32 / segments as f32;
                points.push([angle.cos(), angle.sin()]);
            }
            return points;
        }
    };
    table.iter().copied().collect()
}

/// Outline of a rounded rect, clockwise from the top of the left edge.
/// Radii are clamped to half the smaller rect dimension.
pub fn rounded_rect_outline(rect: Rect, radius: CornerRadius) -> SmallVec<[Point; 32]> {
    let limit = rect.width().min(rect.height()) / 2.0;
    let clamp = |r: f32| r.clamp(0.0, limit);
    let (tl, tr, br, bl) = (
        clamp(radius.top_left),
        clamp(radius.top_right),
        clamp(radius.bottom_right),
        clamp(radius.bottom_left),
    );
    let (x, y, max_x, max_y) = (rect.x(), rect.y(), rect.max_x(), rect.max_y());

    let mut outline = SmallVec::new();
    let mut corner = |center: Point, r: f32, map: fn(f32, f32) -> (f32, f32)| {
        if r <= 0.0 {
            outline.push(center);
            return;
        }
        for [u, v] in quarter_arc(arc_segment_count(r)) {
            let (dx, dy) = map(u, v);
            outline.push(Point::new(center.x + dx * r, center.y + dy * r));
        }
    };

    corner(Point::new(x + tl, y + tl), tl, |u, v| (-u, -v));
    corner(Point::new(max_x - tr, y + tr), tr, |u, v| (v, -u));
    corner(Point::new(max_x - br, max_y - br), br, |u, v| (u, v));
    corner(Point::new(x + bl, max_y - bl), bl, |u, v| (-v, u));
    outline
}

impl DrawList {
    /// Emit a solid rounded rect, falling back to a plain quad when every
    /// radius is zero
    pub fn fill_rounded_rect(
        &mut self,
        rect: Rect,
        radius: CornerRadius,
        color: Color,
        clip: Option<Rect>,
    ) {
        if radius.is_zero() {
            self.fill_rect(rect, color, clip);
            return;
        }
        if let Some(clip) = clip {
            if rect.intersect(&clip).is_empty() {
                return;
            }
        }
        self.set_texture(None);
        let outline = rounded_rect_outline(rect, radius);
        let center = Vertex::new(rect.center(), [0.0, 0.0], color);
        // Per-triangle clipping only when the scissor actually cuts the rect
        let needs_clip = clip.is_some_and(|clip| rect.intersect(&clip) != rect);
        if !needs_clip {
            let base = self.add_vertex(center);
            for p in &outline {
                self.add_vertex(Vertex::new(*p, [0.0, 0.0], color));
            }
            let n = outline.len() as u32;
            for i in 0..n {
                self.add_triangle(base, base + 1 + i, base + 1 + (i + 1) % n);
            }
            return;
        }
        for i in 0..outline.len() {
            let a = Vertex::new(outline[i], [0.0, 0.0], color);
            let b = Vertex::new(outline[(i + 1) % outline.len()], [0.0, 0.0], color);
            self.push_triangle_clipped([center, a, b], clip);
        }
    }

    /// Stroke an open polyline with the given width.
    ///
    /// `miter_threshold` is the largest allowed ratio of miter length to
    /// half-width; sharper joints bevel instead.
    pub fn stroke_polyline(
        &mut self,
        points: &[Point],
        width: f32,
        color: Color,
        miter_threshold: f32,
        clip: Option<Rect>,
    ) {
        if width <= 0.0 {
            return;
        }
        // Drop zero-length segments so joint math has defined directions
        let mut path: SmallVec<[Point; 16]> = SmallVec::new();
        for &p in points {
            if path.last() != Some(&p) {
                path.push(p);
            }
        }
        if path.len() < 2 {
            return;
        }
        self.set_texture(None);

        let hw = width / 2.0;
        let segments = path.len() - 1;
        let dir = |i: usize| (path[i + 1] - path[i]).normalized();
        let normal = |i: usize| dir(i).perp();

        // Offset pair on each side of a joint, per adjoining segment
        let mut starts: SmallVec<[(Point, Point); 16]> = SmallVec::new();
        let mut ends: SmallVec<[(Point, Point); 16]> = SmallVec::new();
        let offset = |p: Point, n: Vec2| (p + n * hw, p + n * -hw);
        starts.push(offset(path[0], normal(0)));
        for _ in 0..segments {
            ends.push((Point::ZERO, Point::ZERO));
        }
        ends[segments - 1] = offset(path[segments], normal(segments - 1));

        let mut bevels: SmallVec<[[Point; 3]; 8]> = SmallVec::new();
        for joint in 1..segments {
            let p = path[joint];
            let (n0, n1) = (normal(joint - 1), normal(joint));
            let miter = (n0 + n1).normalized();
            let dot = miter.dot(n1);
            let mitered = dot > 0.0 && (1.0 / dot) <= miter_threshold;
            if mitered {
                let m = miter * (hw / dot);
                ends[joint - 1] = (p + m, p + m * -1.0);
                starts.push(ends[joint - 1]);
            } else {
                ends[joint - 1] = offset(p, n0);
                starts.push(offset(p, n1));
                // Fill the outer wedge of the turn
                let cross = dir(joint - 1).x * dir(joint).y - dir(joint - 1).y * dir(joint).x;
                if cross.abs() > f32::EPSILON {
                    let s = -cross.signum();
                    bevels.push([p + n0 * (hw * s), p + n1 * (hw * s), p]);
                }
            }
        }

        for i in 0..segments {
            let (sl, sr) = starts[i];
            let (el, er) = ends[i];
            let v = |p: Point| Vertex::new(p, [0.0, 0.0], color);
            self.push_triangle_clipped([v(sl), v(el), v(er)], clip);
            self.push_triangle_clipped([v(sl), v(er), v(sr)], clip);
        }
        for [a, b, c] in bevels {
            let v = |p: Point| Vertex::new(p, [0.0, 0.0], color);
            self.push_triangle_clipped([v(a), v(b), v(c)], clip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_tables_are_unit_circle_points() {
        for segments in 1..=7 {
            let points = quarter_arc(segments);
            assert_eq!(points.len(), segments + 1);
            assert_eq!(points[0], [1.0, 0.0]);
            assert_eq!(points[segments], [0.0, 1.0]);
            for [u, v] in points {
                assert!((u * u + v * v - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_arc_fallback_beyond_table() {
        let points = quarter_arc(10);
        assert_eq!(points.len(), 11);
        assert!((points[5][0] - (std::f32::consts::FRAC_PI_4).cos()).abs() < 1e-6);
    }

    #[test]
    fn test_arc_segment_count_scales_with_radius() {
        assert_eq!(arc_segment_count(2.0), 1);
        assert_eq!(arc_segment_count(12.0), 4);
        assert!(arc_segment_count(30.0) > 7);
        assert_eq!(arc_segment_count(1000.0), 24);
    }

    #[test]
    fn test_outline_stays_inside_rect() {
        let rect = Rect::new(10.0, 10.0, 100.0, 60.0);
        let outline = rounded_rect_outline(rect, CornerRadius::all(8.0));
        assert!(outline.len() > 8);
        for p in outline {
            assert!(p.x >= rect.x() - 1e-4 && p.x <= rect.max_x() + 1e-4);
            assert!(p.y >= rect.y() - 1e-4 && p.y <= rect.max_y() + 1e-4);
        }
    }

    #[test]
    fn test_zero_radius_rounded_rect_is_a_quad() {
        let mut list = DrawList::new();
        list.fill_rounded_rect(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            CornerRadius::ZERO,
            Color::RED,
            None,
        );
        assert_eq!(list.vertices().len(), 4);
        assert_eq!(list.indices().len(), 6);
    }

    #[test]
    fn test_rounded_rect_clipped_against_scissor() {
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        let clip = Rect::new(0.0, 0.0, 20.0, 40.0);
        let mut list = DrawList::new();
        list.fill_rounded_rect(rect, CornerRadius::all(6.0), Color::RED, Some(clip));
        assert!(!list.indices().is_empty());
        for v in list.vertices() {
            assert!(v.point().x <= clip.max_x() + 1e-3);
        }
    }

    #[test]
    fn test_straight_polyline_is_one_quad() {
        let mut list = DrawList::new();
        list.stroke_polyline(
            &[Point::new(0.0, 10.0), Point::new(50.0, 10.0)],
            2.0,
            Color::RED,
            4.0,
            None,
        );
        assert_eq!(list.indices().len(), 6);
        for v in list.vertices() {
            assert!((v.point().y - 9.0).abs() < 1e-4 || (v.point().y - 11.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_right_angle_miters_within_threshold() {
        // 90° turn: miter length is √2 × half-width, allowed at threshold 4
        let mut list = DrawList::new();
        list.stroke_polyline(
            &[
                Point::new(0.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(20.0, 20.0),
            ],
            4.0,
            Color::RED,
            4.0,
            None,
        );
        let expected = 2.0 * std::f32::consts::SQRT_2;
        let has_miter_point = list.vertices().iter().any(|v| {
            let d = v.point() - Point::new(20.0, 0.0);
            (d.length() - expected).abs() < 1e-3
        });
        assert!(has_miter_point);
        // Mitered joints share corner points, so no bevel triangle appears
        assert_eq!(list.indices().len(), 12);
    }

    #[test]
    fn test_sharp_turn_bevels_beyond_threshold() {
        // Near-reversal: miter would be far longer than threshold allows
        let mut list = DrawList::new();
        list.stroke_polyline(
            &[
                Point::new(0.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(0.0, 2.0),
            ],
            2.0,
            Color::RED,
            4.0,
            None,
        );
        // Two segment quads plus one bevel triangle
        assert_eq!(list.indices().len(), 15);
    }
}
