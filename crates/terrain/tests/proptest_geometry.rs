//! Property-based checks for the geometry kernels.
//!
//! These verify structural invariants across random inputs rather than
//! golden values: the triangulator must stay total and in-range on any
//! point cloud, and collection must match its predicate exactly.

use glam::Vec3;
use proptest::prelude::*;
use terrain::{CollisionField, Landscape, Triangulator};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn triangulator_never_panics_and_indexes_in_range(
        raw in prop::collection::vec(-1000.0f64..1000.0, 0..120)
    ) {
        let pts = &raw[..raw.len() & !1];
        let n = (pts.len() / 2) as u32;
        let mut t = Triangulator::new();
        let tris = t.triangulate(pts);
        prop_assert_eq!(tris.len() % 3, 0);
        for &i in tris {
            prop_assert!(i < n);
        }
    }

    #[test]
    fn triangulator_handles_clustered_duplicates(
        seed_pts in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 3..20),
        repeat in 1usize..4
    ) {
        let mut pts = Vec::new();
        for _ in 0..repeat {
            for &(x, z) in &seed_pts {
                pts.push(x);
                pts.push(z);
            }
        }
        let mut t = Triangulator::new();
        let tris = t.triangulate(&pts);
        for &i in tris {
            prop_assert!((i as usize) < pts.len() / 2);
        }
    }

    #[test]
    fn collect_is_exactly_the_cutoff_predicate(
        cam in (-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0),
        detail in 0.01f32..10.0
    ) {
        let mut scape = Landscape::new(-100.0, -100.0, 100.0, 100.0, 0.0, 50.0).unwrap();
        let w = 16usize;
        let mask = vec![0u8; w * w];
        let mut heights = vec![0u16; w * w];
        for (i, hv) in heights.iter_mut().enumerate() {
            *hv = ((i * 2654435761) % 65536) as u16;
        }
        scape
            .set_height_map(&mask, heights, w, w, 1, 1, 1.0, 0.0, vec![0u8; w * w])
            .unwrap();
        let camera = Vec3::new(cam.0, cam.1, cam.2);
        let mut out = Vec::new();
        scape.collect(&mut out, camera, detail);
        for (i, e) in scape.elements().iter().enumerate() {
            let inside = e.distance_sq(camera) < e.cutoff_sq * detail;
            prop_assert_eq!(out.contains(&(i as u32)), inside);
        }
    }

    #[test]
    fn field_normals_are_unit_or_zero(
        discs in prop::collection::vec((0.5f64..9.5, 0.5f64..9.5, 0.1f64..2.0), 0..6),
        probe in (0.0f64..10.0, 0.0f64..10.0)
    ) {
        let mut field = CollisionField::new(0.0, 0.0, 10.0, 10.0, 64, 64).unwrap();
        for (x, z, r) in discs {
            field.stamp_disc(x, z, r);
        }
        let n = field.gradient_normal(probe.0, probe.1);
        let len = n.length();
        prop_assert!(len == 0.0 || (len - 1.0).abs() < 1e-4, "normal length {}", len);
    }

    #[test]
    fn raycast_hit_is_outside_the_solid(
        z in 0.5f64..9.5
    ) {
        let mut field = CollisionField::new(0.0, 0.0, 10.0, 10.0, 128, 128).unwrap();
        field.stamp_disc(5.0, 5.0, 1.5);
        let from = glam::Vec2::new(0.0, z as f32);
        let to = glam::Vec2::new(10.0, z as f32);
        if let Some(hit) = field.raycast_line(from, to) {
            prop_assert!(!field.is_solid(hit.pos.x as f64, hit.pos.y as f64));
        }
    }
}
