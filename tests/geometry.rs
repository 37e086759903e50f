#![cfg(not(target_arch = "wasm32"))]

use std::f64::consts::PI;

use curved_hud::geometry::{CurvedSurface, MAX_VERTICES};
use curved_hud::DashboardError;

fn surface(h: u32, v: u32) -> CurvedSurface {
    CurvedSurface {
        radius: 1000.0,
        height: 1000.0,
        start_angle: PI * 0.75,
        end_angle: PI * 1.25,
        horizontal_segments: h,
        vertical_segments: v,
    }
}

#[test]
fn vertex_count_matches_grid() {
    for (h, v) in [(1, 1), (3, 2), (100, 10), (7, 1)] {
        let mesh = surface(h, v).build().unwrap();
        assert_eq!(mesh.vertex_count(), ((h + 1) * (v + 1)) as usize);
        assert_eq!(mesh.triangle_count(), (2 * h * v) as usize);
        assert_eq!(mesh.normals().len(), mesh.vertex_count());
        assert_eq!(mesh.uvs().len(), mesh.vertex_count());
    }
}

#[test]
fn vertices_lie_on_the_cylinder() {
    let s = surface(100, 10);
    let mesh = s.build().unwrap();
    for p in mesh.positions() {
        let (x, z) = (p[0] as f64, p[2] as f64);
        let r2 = x * x + z * z;
        assert!((r2.sqrt() - s.radius).abs() < 1e-3, "r = {}", r2.sqrt());
    }
}

#[test]
fn columns_are_linearly_spaced_in_angle() {
    let s = surface(8, 2);
    let mesh = s.build().unwrap();
    let columns = mesh.columns();
    let step = (s.end_angle - s.start_angle) / 8.0;

    for (index, p) in mesh.positions().iter().enumerate() {
        let j = index % columns;
        let expected = s.start_angle + j as f64 * step;
        let (sin, cos) = expected.sin_cos();
        assert!((p[0] as f64 - s.radius * sin).abs() < 1e-3);
        assert!((p[2] as f64 - s.radius * cos).abs() < 1e-3);
        assert!((s.column_angle(j as u32) - expected).abs() < 1e-12);
    }
}

#[test]
fn vertical_coordinate_is_untouched() {
    let s = surface(4, 4);
    let mesh = s.build().unwrap();
    let columns = mesh.columns();
    for (index, p) in mesh.positions().iter().enumerate() {
        let row = (index / columns) as f64;
        let expected = s.height / 2.0 - row * s.height / 4.0;
        assert!((p[1] as f64 - expected).abs() < 1e-4);
    }
}

#[test]
fn normals_are_unit_and_radial() {
    let mesh = surface(40, 4).build().unwrap();
    for (p, n) in mesh.positions().iter().zip(mesh.normals()) {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-4);
        assert!(n[1].abs() < 1e-4);
        // Parallel to the radius through the vertex, either orientation.
        let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
        let dot = (n[0] * p[0] + n[2] * p[2]) / r;
        assert!((dot.abs() - 1.0).abs() < 1e-3, "dot = {dot}");
    }
    for n in mesh.face_normals() {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-4);
    }
}

#[test]
fn bounds_of_default_surface() {
    let mesh = CurvedSurface::default().build().unwrap();
    let size = mesh.bounds().size();
    // sin spans +-sin(pi/4) across the arc.
    assert!((size.x - 2.0 * 1000.0 * (PI / 4.0).sin()).abs() < 1e-6);
    assert!((size.y - 1000.0).abs() < 1e-9);
}

#[test]
fn build_is_deterministic() {
    let s = surface(30, 5);
    assert_eq!(s.build().unwrap(), s.build().unwrap());
}

#[test]
fn zero_segments_are_rejected() {
    for (h, v) in [(0, 1), (1, 0), (0, 0)] {
        match surface(h, v).build() {
            Err(DashboardError::InvalidSegments { horizontal, vertical }) => {
                assert_eq!((horizontal, vertical), (h, v));
            }
            other => panic!("expected InvalidSegments, got {other:?}"),
        }
    }
}

#[test]
fn degenerate_dimensions_are_rejected() {
    let mut s = surface(4, 4);
    s.radius = 0.0;
    assert!(matches!(s.build(), Err(DashboardError::InvalidDimension { name: "radius", .. })));

    let mut s = surface(4, 4);
    s.height = f64::NAN;
    assert!(matches!(s.build(), Err(DashboardError::InvalidDimension { name: "height", .. })));

    let mut s = surface(4, 4);
    s.end_angle = s.start_angle;
    assert!(matches!(s.build(), Err(DashboardError::EmptyArc { .. })));
}

#[test]
fn oversized_grids_are_rejected_before_allocating() {
    for (h, v) in [(200_000, 30_000), (u32::MAX, u32::MAX), (u32::MAX, 1)] {
        let s = surface(h, v);
        assert!(matches!(
            s.build(),
            Err(DashboardError::InvalidSegments { horizontal, vertical }) if (horizontal, vertical) == (h, v)
        ));
    }
    assert_eq!(surface(u32::MAX, u32::MAX).vertex_count(), None);

    // 2048 x 2048 vertices is exactly the limit.
    assert_eq!(surface(2047, 2047).vertex_count(), Some(MAX_VERTICES));
    surface(2047, 2047).validate().unwrap();
    assert!(surface(2048, 2047).validate().is_err());
}
