//! Scissor clipping
//!
//! Axis-aligned sprites clip by direct rect-vs-rect intersection with the
//! UV rect adjusted proportionally. Triangles that straddle the scissor are
//! clipped against up to four half-planes (Sutherland–Hodgman), producing a
//! convex polygon of at most 7 vertices; vertices introduced by the clip are
//! re-colored (and re-UV'd) by barycentric interpolation over the original
//! triangle.

use flick_core::{Point, Rect};
use smallvec::SmallVec;

use crate::batch::Vertex;

/// Clip a sprite rect against the scissor, scaling its UV rect by the same
/// proportions. Returns `None` when nothing survives.
pub fn clip_sprite(rect: Rect, uv: Rect, clip: Rect) -> Option<(Rect, Rect)> {
    let clipped = rect.intersect(&clip);
    if clipped.is_empty() {
        return None;
    }
    if clipped == rect || rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Some((rect, uv));
    }
    let sx = uv.width() / rect.width();
    let sy = uv.height() / rect.height();
    let clipped_uv = Rect::new(
        uv.x() + (clipped.x() - rect.x()) * sx,
        uv.y() + (clipped.y() - rect.y()) * sy,
        clipped.width() * sx,
        clipped.height() * sy,
    );
    Some((clipped, clipped_uv))
}

/// One of the scissor's four boundary half-planes
#[derive(Clone, Copy)]
enum HalfPlane {
    MinX(f32),
    MaxX(f32),
    MinY(f32),
    MaxY(f32),
}

impl HalfPlane {
    fn inside(&self, p: Point) -> bool {
        match *self {
            HalfPlane::MinX(x) => p.x >= x,
            HalfPlane::MaxX(x) => p.x <= x,
            HalfPlane::MinY(y) => p.y >= y,
            HalfPlane::MaxY(y) => p.y <= y,
        }
    }

    /// Intersection of segment `a→b` with the plane boundary
    fn intersect(&self, a: Point, b: Point) -> Point {
        let t = match *self {
            HalfPlane::MinX(x) | HalfPlane::MaxX(x) => (x - a.x) / (b.x - a.x),
            HalfPlane::MinY(y) | HalfPlane::MaxY(y) => (y - a.y) / (b.y - a.y),
        };
        Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// Clip a triangle against the scissor rect's four half-planes.
///
/// The result is a convex polygon with at most 7 vertices (each plane can
/// add one vertex to the original three), empty when the triangle lies
/// fully outside. Every output vertex gets its color and UV from
/// barycentric interpolation of the input triangle, so clip-introduced
/// vertices shade identically to the unclipped geometry.
pub fn clip_triangle(tri: [Vertex; 3], clip: Rect) -> SmallVec<[Vertex; 8]> {
    let planes = [
        HalfPlane::MinX(clip.x()),
        HalfPlane::MaxX(clip.max_x()),
        HalfPlane::MinY(clip.y()),
        HalfPlane::MaxY(clip.max_y()),
    ];

    let mut polygon: SmallVec<[Point; 8]> = tri.iter().map(|v| v.point()).collect();
    let mut scratch: SmallVec<[Point; 8]> = SmallVec::new();
    for plane in planes {
        scratch.clear();
        for i in 0..polygon.len() {
            let current = polygon[i];
            let next = polygon[(i + 1) % polygon.len()];
            let current_in = plane.inside(current);
            let next_in = plane.inside(next);
            if current_in {
                scratch.push(current);
            }
            if current_in != next_in {
                scratch.push(plane.intersect(current, next));
            }
        }
        std::mem::swap(&mut polygon, &mut scratch);
        if polygon.is_empty() {
            return SmallVec::new();
        }
    }

    polygon
        .iter()
        .map(|&p| {
            let [u, v, w] = barycentric(p, tri[0].point(), tri[1].point(), tri[2].point());
            let lerp3 = |f: fn(&Vertex) -> [f32; 2]| {
                let (a, b, c) = (f(&tri[0]), f(&tri[1]), f(&tri[2]));
                [
                    a[0] * u + b[0] * v + c[0] * w,
                    a[1] * u + b[1] * v + c[1] * w,
                ]
            };
            let uv = lerp3(|vx| vx.uv);
            let color = {
                let (a, b, c) = (tri[0].color, tri[1].color, tri[2].color);
                [
                    a[0] * u + b[0] * v + c[0] * w,
                    a[1] * u + b[1] * v + c[1] * w,
                    a[2] * u + b[2] * v + c[2] * w,
                    a[3] * u + b[3] * v + c[3] * w,
                ]
            };
            Vertex {
                position: [p.x, p.y],
                uv,
                color,
            }
        })
        .collect()
}

/// Barycentric coordinates of `p` with respect to triangle `abc`
fn barycentric(p: Point, a: Point, b: Point, c: Point) -> [f32; 3] {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);
    let d20 = v2.dot(v0);
    let d21 = v2.dot(v1);
    let denom = d00 * d11 - d01 * d01;
    if denom.abs() <= f32::EPSILON {
        return [1.0, 0.0, 0.0];
    }
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    [1.0 - v - w, v, w]
}
