//! Partial-cylinder surface built by bending a flat grid onto an arc.

use cgmath::{InnerSpace, Vector3, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Upper bound on `(horizontal + 1) * (vertical + 1)`. Keeps every index in
/// `u32` and every buffer length in a 32-bit `usize`.
pub const MAX_VERTICES: u64 = 1 << 22;

/// Parameters of the curved surface. Angles are in radians, measured from +z
/// towards +x.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurvedSurface {
    pub radius: f64,
    pub height: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub horizontal_segments: u32,
    pub vertical_segments: u32,
}

impl Default for CurvedSurface {
    fn default() -> Self {
        Self {
            radius: 1000.0,
            height: 1000.0,
            start_angle: std::f64::consts::PI * 0.75,
            end_angle: std::f64::consts::PI * 1.25,
            horizontal_segments: 100,
            vertical_segments: 10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl Aabb {
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }
}

/// Triangle mesh produced by [`CurvedSurface::build`]. Vertices are row-major,
/// `columns` per row, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct CurvedMesh {
    columns: usize,
    rows: usize,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
    face_normals: Vec<[f32; 3]>,
    bounds: Aabb,
}

impl CurvedSurface {
    /// Vertices in the grid, or `None` when the product overflows `u64`.
    pub fn vertex_count(&self) -> Option<u64> {
        (self.horizontal_segments as u64 + 1).checked_mul(self.vertical_segments as u64 + 1)
    }

    pub fn validate(&self) -> Result<()> {
        let too_large = self.vertex_count().map_or(true, |n| n > MAX_VERTICES);
        if self.horizontal_segments == 0 || self.vertical_segments == 0 || too_large {
            return Err(DashboardError::InvalidSegments {
                horizontal: self.horizontal_segments,
                vertical: self.vertical_segments,
            });
        }
        for (name, value) in [("radius", self.radius), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DashboardError::InvalidDimension { name, value });
            }
        }
        let span = self.end_angle - self.start_angle;
        if !span.is_finite() || span == 0.0 {
            return Err(DashboardError::EmptyArc {
                start: self.start_angle,
                end: self.end_angle,
            });
        }
        Ok(())
    }

    /// Angle of every vertex in grid column `column`.
    pub fn column_angle(&self, column: u32) -> f64 {
        let t = column as f64 / self.horizontal_segments as f64;
        self.start_angle + t * (self.end_angle - self.start_angle)
    }

    pub fn build(&self) -> Result<CurvedMesh> {
        self.validate()?;

        let h = self.horizontal_segments as usize;
        let v = self.vertical_segments as usize;
        let columns = h + 1;
        let rows = v + 1;

        // Flat grid: a plane as wide as the full circumference.
        let width = self.radius * 2.0 * std::f64::consts::PI;
        let seg_w = width / h as f64;
        let seg_h = self.height / v as f64;

        let mut points = Vec::with_capacity(columns * rows);
        let mut uvs = Vec::with_capacity(columns * rows);
        for i in 0..rows {
            let y = self.height / 2.0 - i as f64 * seg_h;
            for j in 0..columns {
                let x = j as f64 * seg_w - width / 2.0;
                points.push(Vector3::new(x, y, 0.0));
                uvs.push([j as f32 / h as f32, 1.0 - i as f32 / v as f32]);
            }
        }

        // Bend each column onto the arc, keeping y.
        for (index, p) in points.iter_mut().enumerate() {
            let angle = self.column_angle((index % columns) as u32);
            p.z = self.radius * angle.cos();
            p.x = self.radius * angle.sin();
        }

        let mut indices = Vec::with_capacity(h * v * 6);
        for i in 0..v {
            for j in 0..h {
                let a = (j + columns * i) as u32;
                let b = (j + columns * (i + 1)) as u32;
                let c = (j + 1 + columns * (i + 1)) as u32;
                let d = (j + 1 + columns * i) as u32;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        let faces: Vec<Vector3<f64>> = indices
            .chunks_exact(3)
            .map(|tri| {
                let (pa, pb, pc) = (
                    points[tri[0] as usize],
                    points[tri[1] as usize],
                    points[tri[2] as usize],
                );
                normalize_or_zero((pc - pb).cross(pa - pb))
            })
            .collect();

        let mut sums = vec![Vector3::zero(); points.len()];
        for (tri, n) in indices.chunks_exact(3).zip(&faces) {
            for &vi in tri {
                sums[vi as usize] += *n;
            }
        }

        let mut min = Vector3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Vector3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &points {
            min = Vector3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Vector3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }

        Ok(CurvedMesh {
            columns,
            rows,
            positions: points.iter().map(|p| to_f32(*p)).collect(),
            normals: sums.into_iter().map(|n| to_f32(normalize_or_zero(n))).collect(),
            uvs,
            indices,
            face_normals: faces.into_iter().map(to_f32).collect(),
            bounds: Aabb { min, max },
        })
    }
}

fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    let len = v.magnitude();
    if len > f64::EPSILON {
        v / len
    } else {
        Vector3::zero()
    }
}

fn to_f32(v: Vector3<f64>) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}

impl CurvedMesh {
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn face_normals(&self) -> &[[f32; 3]] {
        &self.face_normals
    }

    /// Local-space bounds, computed in f64 before the f32 conversion.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}
