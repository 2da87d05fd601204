use std::f32::consts::TAU;

use crate::coords::Vec2;

use super::Vertex;

/// Number of vertices in a fan with `segments` rim segments: apex plus a
/// closed rim loop of `segments + 1` points.
#[inline]
pub const fn fan_vertex_count(segments: u32) -> usize {
    segments as usize + 2
}

/// Offset of a rim point from the centre at angle `theta`.
///
/// Only the y component is scaled by `aspect` (`width / height`), which
/// cancels the horizontal stretch of NDC on a non-square window.
#[inline]
pub fn rim_offset(radius: f32, theta: f32, aspect: f32) -> Vec2 {
    Vec2::new(radius * theta.cos(), radius * theta.sin() * aspect)
}

/// Tessellates a filled disc as a triangle fan.
///
/// Layout: `[center, rim_0, rim_1, ..., rim_{segments-1}, rim_0]`, where
/// `rim_i` sits at `theta_i = 2*pi*i/segments`. The closing sample is a copy
/// of `rim_0` rather than a recomputation at `2*pi`, so the loop closes exactly.
pub fn tessellate_fan(center: Vec2, radius: f32, segments: u32, aspect: f32) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(fan_vertex_count(segments));
    out.push(Vertex::from(center));

    for i in 0..segments {
        let theta = TAU * i as f32 / segments as f32;
        out.push(Vertex::from(center + rim_offset(radius, theta, aspect)));
    }

    let first_rim = out.get(1).copied().unwrap_or_else(|| Vertex::from(center));
    out.push(first_rim);
    out
}

/// Triangle-list indices equivalent to a fan over `fan_vertex_count(segments)`
/// vertices: `(0, i, i + 1)` for `i` in `1..=segments`.
pub fn fan_indices(segments: u32) -> Vec<u32> {
    (1..=segments).flat_map(|i| [0, i, i + 1]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= EPS
    }

    fn theta(i: u32, segments: u32) -> f32 {
        TAU * i as f32 / segments as f32
    }

    // ── vertex count / closure ───────────────────────────────────────────

    #[test]
    fn produces_segments_plus_two_vertices() {
        for segments in [3, 4, 7, 32, 100, 257] {
            let v = tessellate_fan(Vec2::new(0.1, -0.2), 0.1, segments, 1.0);
            assert_eq!(v.len(), segments as usize + 2, "segments = {segments}");
            assert_eq!(v.len(), fan_vertex_count(segments));
        }
    }

    #[test]
    fn first_vertex_is_center() {
        let centers = [(-1.0, -1.0), (0.0, 0.0), (0.5, 0.5), (1.0, -0.3)];
        for (x, y) in centers {
            let v = tessellate_fan(Vec2::new(x, y), 0.1, 16, 4.0 / 3.0);
            assert_eq!(v[0], Vertex::new(x, y));
        }
    }

    #[test]
    fn rim_loop_is_closed() {
        for segments in [3, 5, 100] {
            for aspect in [0.5, 1.0, 4.0 / 3.0, 2.0] {
                let v = tessellate_fan(Vec2::new(0.5, 0.5), 0.1, segments, aspect);
                assert_eq!(v[1], v[v.len() - 1]);
            }
        }
    }

    // ── aspect correction ────────────────────────────────────────────────

    #[test]
    fn rim_offsets_follow_formula() {
        let c = Vec2::new(0.25, -0.4);
        let (r, segments) = (0.1, 12);
        for aspect in [0.75, 1.0, 4.0 / 3.0, 2.0] {
            let v = tessellate_fan(c, r, segments, aspect);
            for i in 0..segments {
                let off = v[i as usize + 1].position() - c;
                let t = theta(i, segments);
                assert!(close(off.x, r * t.cos()), "x at i = {i}, aspect = {aspect}");
                assert!(close(off.y, r * t.sin() * aspect), "y at i = {i}, aspect = {aspect}");
            }
        }
    }

    #[test]
    fn square_aspect_gives_true_circle() {
        let c = Vec2::new(0.5, 0.5);
        let v = tessellate_fan(c, 0.1, 100, 1.0);
        for p in &v[1..] {
            assert!(close((p.position() - c).length(), 0.1));
        }
    }

    #[test]
    fn aspect_two_scales_y_offsets_by_two() {
        let c = Vec2::new(0.0, 0.0);
        let unit = tessellate_fan(c, 0.1, 24, 1.0);
        let wide = tessellate_fan(c, 0.1, 24, 2.0);
        for (a, b) in unit.iter().zip(&wide).skip(1) {
            assert!(close(a.pos[0], b.pos[0]));
            assert!(close(a.pos[1] * 2.0, b.pos[1]));
        }
    }

    // ── indices ──────────────────────────────────────────────────────────

    #[test]
    fn indices_form_fan_triangles() {
        assert_eq!(fan_indices(3), vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
    }

    #[test]
    fn indices_stay_within_vertex_range() {
        let segments = 100;
        let idx = fan_indices(segments);
        assert_eq!(idx.len(), 3 * segments as usize);
        let max = *idx.iter().max().unwrap() as usize;
        assert_eq!(max, fan_vertex_count(segments) - 1);
    }
}
