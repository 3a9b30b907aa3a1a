//! Contour triangulation into flat flag meshes.

use glam::Vec3;
use kurbo::{Point, Vec2};

use crate::viewport::mesh::{push_vert, MeshData};

const EPS: f64 = 1e-12;

/// Triangulate a simple polygon with ear clipping.
///
/// Returns index triples into `points`, counter-clockwise. Consecutive
/// duplicate points and a repeated closing point are skipped. If no ear can
/// be found (self-intersecting input) the remainder is fan triangulated.
pub fn triangulate(points: &[Point]) -> Vec<[usize; 3]> {
    let mut ring = cleaned_ring(points);
    if ring.len() < 3 {
        return Vec::new();
    }
    let area = signed_area(points, &ring);
    if area.abs() <= EPS {
        return Vec::new();
    }
    if area < 0.0 {
        ring.reverse();
    }

    let mut tris = Vec::with_capacity(ring.len() - 2);
    let mut i = 0;
    let mut misses = 0;

    while ring.len() > 3 {
        let len = ring.len();
        let prev = ring[(i + len - 1) % len];
        let cur = ring[i];
        let next = ring[(i + 1) % len];

        if is_ear(points, &ring, prev, cur, next) {
            tris.push([prev, cur, next]);
            ring.remove(i);
            if i >= ring.len() {
                i = 0;
            }
            misses = 0;
        } else {
            i = (i + 1) % len;
            misses += 1;
            if misses >= len {
                tracing::debug!("Contour has no ear left, fan filling {len} points");
                for k in 1..len - 1 {
                    tris.push([ring[0], ring[k], ring[k + 1]]);
                }
                return tris;
            }
        }
    }

    tris.push([ring[0], ring[1], ring[2]]);
    tris
}

/// Flat mesh in the z = 0 plane covering every contour, normals facing +z
pub fn contour_mesh(contours: &[Vec<Point>], color: [f32; 3]) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for contour in contours {
        let tris = triangulate(contour);
        if tris.is_empty() {
            continue;
        }
        let base = (vertices.len() / 9) as u32;
        for p in contour {
            push_vert(&mut vertices, p.x as f32, p.y as f32, 0.0, Vec3::Z, color);
        }
        for [a, b, c] in tris {
            indices.extend_from_slice(&[base + a as u32, base + b as u32, base + c as u32]);
        }
    }

    MeshData { vertices, indices }
}

fn cleaned_ring(points: &[Point]) -> Vec<usize> {
    let mut ring: Vec<usize> = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        if let Some(&last) = ring.last() {
            if points[last] == *p {
                continue;
            }
        }
        ring.push(i);
    }
    while ring.len() > 1 && points[ring[0]] == points[ring[ring.len() - 1]] {
        ring.pop();
    }
    ring
}

fn signed_area(points: &[Point], ring: &[usize]) -> f64 {
    let n = ring.len();
    let mut sum = 0.0;
    for k in 0..n {
        let a = points[ring[k]].to_vec2();
        let b = points[ring[(k + 1) % n]].to_vec2();
        sum += a.cross(b);
    }
    sum * 0.5
}

fn turn(a: Point, b: Point, c: Point) -> f64 {
    let ab: Vec2 = b - a;
    let bc: Vec2 = c - b;
    ab.cross(bc)
}

fn is_ear(points: &[Point], ring: &[usize], prev: usize, cur: usize, next: usize) -> bool {
    let (a, b, c) = (points[prev], points[cur], points[next]);
    if turn(a, b, c) <= EPS {
        return false;
    }
    ring.iter()
        .filter(|&&k| k != prev && k != cur && k != next)
        .map(|&k| points[k])
        .filter(|p| *p != a && *p != b && *p != c)
        .all(|p| !inside_triangle(p, a, b, c))
}

fn inside_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let d1 = (b - a).cross(p - a);
    let d2 = (c - b).cross(p - b);
    let d3 = (a - c).cross(p - c);
    d1 >= -EPS && d2 >= -EPS && d3 >= -EPS
}
