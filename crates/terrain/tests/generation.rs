//! Element generation: determinism, collection, heightmap behavior.

use glam::Vec3;
use terrain::{ElementKind, Landscape, TerrainError};

const W: usize = 32;

fn base_scape() -> Landscape {
    Landscape::new(0.0, 0.0, 32.0, 32.0, 0.0, 10.0).unwrap()
}

/// A gentle slope with a soil id gradient.
fn with_height_map(scape: &mut Landscape) {
    let mask = vec![0u8; W * W];
    let mut heights = vec![0u16; W * W];
    let mut soil = vec![0u8; W * W];
    for z in 0..W {
        for x in 0..W {
            heights[x + z * W] = (x * 200) as u16;
            soil[x + z * W] = (z / 8) as u8;
        }
    }
    scape
        .set_height_map(&mask, heights, W, W, 1, 1, 1.0, 1.0, soil)
        .unwrap();
}

fn vegetation_layer() -> (Vec<u8>, Vec<u8>) {
    let mask = vec![0u8; W * W];
    let mut map = vec![0u8; W * W];
    for z in 8..24 {
        for x in 8..24 {
            map[x + z * W] = 1;
        }
    }
    (mask, map)
}

#[test]
fn invalid_bounds_are_rejected() {
    assert!(matches!(
        Landscape::new(5.0, 0.0, 5.0, 10.0, 0.0, 1.0),
        Err(TerrainError::InvalidBounds { axis: "x", .. })
    ));
    assert!(matches!(
        Landscape::new(0.0, 9.0, 5.0, 9.0, 0.0, 1.0),
        Err(TerrainError::InvalidBounds { axis: "z", .. })
    ));
}

#[test]
fn mismatched_rasters_are_rejected() {
    let mut scape = base_scape();
    let err = scape.set_height_map(&vec![0u8; 10], vec![0u16; W * W], W, W, 1, 1, 1.0, 1.0, vec![0u8; W * W]);
    assert!(matches!(err, Err(TerrainError::DimensionMismatch { .. })));
}

#[test]
fn all_elements_stay_inside_bounds() {
    let mut scape = base_scape();
    with_height_map(&mut scape);
    let (mask, map) = vegetation_layer();
    scape.set_trees(&mask, &map, W, W, 2).unwrap();
    scape.set_grass(&mask, &map, W, W, 2).unwrap();
    scape.set_flowers(&mask, &map, W, W, 2).unwrap();
    assert!(!scape.elements().is_empty());
    for e in scape.elements() {
        assert!(e.x >= scape.min_x() && e.x <= scape.max_x());
        assert!(e.z >= scape.min_z() && e.z <= scape.max_z());
        assert!(e.cutoff_sq >= 0.0);
    }
}

#[test]
fn vegetation_generation_is_deterministic() {
    let build = || {
        let mut scape = base_scape();
        with_height_map(&mut scape);
        let (mask, map) = vegetation_layer();
        scape.set_trees(&mask, &map, W, W, 3).unwrap();
        scape.set_grass(&mask, &map, W, W, 2).unwrap();
        scape.set_flowers(&mask, &map, W, W, 5).unwrap();
        scape
    };
    let a = build();
    let b = build();
    assert_eq!(a.elements().len(), b.elements().len());
    for (ea, eb) in a.elements().iter().zip(b.elements()) {
        assert_eq!(ea, eb);
    }
}

#[test]
fn repeating_a_generator_appends_an_identical_run() {
    let mut scape = base_scape();
    with_height_map(&mut scape);
    let ground = scape.elements().len();
    let (mask, map) = vegetation_layer();
    scape.set_trees(&mask, &map, W, W, 3).unwrap();
    let first = scape.elements()[ground..].to_vec();
    scape.set_trees(&mask, &map, W, W, 3).unwrap();
    let second = scape.elements()[ground + first.len()..].to_vec();
    assert_eq!(first, second);
}

#[test]
fn mask_suppresses_vegetation() {
    let mut scape = base_scape();
    with_height_map(&mut scape);
    let ground = scape.elements().len();
    let (_, map) = vegetation_layer();
    let mask = vec![1u8; W * W];
    scape.set_trees(&mask, &map, W, W, 1).unwrap();
    assert_eq!(scape.elements().len(), ground);
}

#[test]
fn grass_avoids_steep_ground() {
    let mut scape = Landscape::new(0.0, 0.0, 32.0, 32.0, 0.0, 1000.0).unwrap();
    // A cliff: left half at 0, right half at full height.
    let mask = vec![0u8; W * W];
    let mut heights = vec![0u16; W * W];
    for z in 0..W {
        for x in W / 2..W {
            heights[x + z * W] = u16::MAX;
        }
    }
    scape
        .set_height_map(&mask, heights, W, W, 1, 1, 1.0, 1.0, vec![0u8; W * W])
        .unwrap();
    scape.remove_kind(ElementKind::Height);
    let map = vec![1u8; W * W];
    scape.set_grass(&mask, &map, W, W, 1).unwrap();
    // Blades exist on the flats but never at the cliff line.
    assert!(!scape.elements().is_empty());
    for e in scape.elements() {
        assert!(
            !(14.0..=18.0).contains(&e.x),
            "grass blade on the cliff at x = {}",
            e.x
        );
    }
}

#[test]
fn collect_matches_the_cutoff_predicate_exactly() {
    let mut scape = base_scape();
    with_height_map(&mut scape);
    let (mask, map) = vegetation_layer();
    scape.set_trees(&mask, &map, W, W, 2).unwrap();

    let camera = Vec3::new(16.0, 2.0, 16.0);
    for detail in [0.25f32, 1.0, 4.0] {
        let mut out = Vec::new();
        scape.collect(&mut out, camera, detail);
        let mut expect = Vec::new();
        for (i, e) in scape.elements().iter().enumerate() {
            if e.distance_sq(camera) < e.cutoff_sq * detail {
                expect.push(i as u32);
            }
        }
        assert_eq!(out, expect, "detail {detail}");
    }
}

#[test]
fn remove_kind_is_idempotent() {
    let mut scape = base_scape();
    with_height_map(&mut scape);
    let (mask, map) = vegetation_layer();
    scape.set_trees(&mask, &map, W, W, 2).unwrap();
    let total = scape.elements().len();
    let trees = scape
        .elements()
        .iter()
        .filter(|e| e.kind() == ElementKind::Tree)
        .count();
    assert!(trees > 0);
    scape.remove_kind(ElementKind::Tree);
    assert_eq!(scape.elements().len(), total - trees);
    scape.remove_kind(ElementKind::Tree);
    assert_eq!(scape.elements().len(), total - trees);
}

#[test]
fn height_is_bilinear_between_cells() {
    let mut scape = Landscape::new(0.0, 0.0, 1.0, 1.0, 0.0, 100.0).unwrap();
    let mask = vec![0u8; 4];
    let heights = vec![0u16, 65535, 65535, 0];
    scape
        .set_height_map(&mask, heights, 2, 2, 1, 1, 1.0, 0.0, vec![0u8; 4])
        .unwrap();
    // Halfway between the four cells the two diagonals average out.
    let h = scape.height(0.25, 0.25);
    assert!((h - 50.0).abs() < 0.01, "height {h}");
    // On a cell origin the lookup reproduces the raw value.
    assert!((scape.height(0.5, 0.0) - 100.0).abs() < 0.01);
    assert!((scape.height(0.0, 0.0) - 0.0).abs() < 0.01);
}

#[test]
fn height_outside_bounds_replicates_the_border() {
    let mut scape = base_scape();
    with_height_map(&mut scape);
    let inside = scape.height(31.99, 16.0);
    assert!((scape.height(500.0, 16.0) - inside).abs() < 0.5);
    let corner = scape.height(0.0, 0.0);
    assert!((scape.height(-500.0, -500.0) - corner).abs() < 0.5);
}

#[test]
fn height_box_flattens_a_spike() {
    let mut scape = base_scape();
    let mask = vec![0u8; W * W];
    let mut heights = vec![0u16; W * W];
    heights[16 + 16 * W] = u16::MAX;
    scape
        .set_height_map(&mask, heights, W, W, 1, 1, 1.0, 0.0, vec![0u8; W * W])
        .unwrap();
    let x = 16.0 + 0.01;
    let spike = scape.height(x, x);
    let filtered = scape.height_box(x, x, 2);
    assert!(filtered < spike * 0.5);
}

#[test]
fn put_height_round_trips_through_lookup() {
    let mut scape = base_scape();
    with_height_map(&mut scape);
    scape.put_height(10.0, 10.0, 7.5);
    let h = scape.height(10.0, 10.0);
    assert!((h - 7.5).abs() < 0.01, "height {h}");
}

#[test]
fn objects_come_from_red_channel_dots() {
    let mut scape = base_scape();
    with_height_map(&mut scape);
    let mut rgba = vec![0u32; W * W];
    rgba[5 + 5 * W] = 2 * 4 + 2; // type 2
    rgba[20 + 9 * W] = (7 * 4 + 2) | ((3 * 4) << 8); // type 7, rotation 3
    scape.set_objects(&rgba, W, W).unwrap();
    let objects: Vec<_> = scape
        .elements()
        .iter()
        .filter(|e| e.kind() == ElementKind::Object)
        .collect();
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].v0, 2);
    assert_eq!(objects[1].v0, 7);
    assert_eq!(objects[1].v1, 3);
}

#[test]
fn landmark_objects_carry_longer_cutoffs() {
    let mut scape = base_scape();
    with_height_map(&mut scape);
    let mut rgba = vec![0u32; W * W];
    rgba[1 + 1 * W] = 1 * 4 + 2; // plain type 1
    rgba[2 + 1 * W] = 4 * 4 + 2; // landmark type 4
    scape.set_objects(&rgba, W, W).unwrap();
    let objects: Vec<_> = scape
        .elements()
        .iter()
        .filter(|e| e.kind() == ElementKind::Object)
        .collect();
    assert!((objects[1].cutoff_sq / objects[0].cutoff_sq - 9.0).abs() < 1e-3);
}

#[test]
fn stones_raise_the_heightmap_and_ring_the_region() {
    let mut scape = base_scape();
    let mask = vec![0u8; W * W];
    scape
        .set_height_map(&mask, vec![6553u16; W * W], W, W, 1, 1, 1.0, 1000.0, vec![0u8; W * W])
        .unwrap();
    let flat = scape.height(16.0, 16.0);
    let mut stones = vec![0u8; W * W];
    for z in 12..20 {
        for x in 12..20 {
            stones[x + z * W] = 255;
        }
    }
    scape.set_stones(&stones, W, W, 128, 64).unwrap();
    assert!(scape.height(16.0, 16.0) > flat, "stone region must rise");
    let stone_count = scape
        .elements()
        .iter()
        .filter(|e| e.kind() == ElementKind::Stone)
        .count();
    assert!(stone_count > 0);
    // Cleanup pads arrive as blank ground samples ringing the region; the
    // flat interior seeded no ground samples of its own, so any Height
    // element near the stones is a pad.
    let pads = scape
        .elements()
        .iter()
        .filter(|e| {
            e.kind() == ElementKind::Height
                && (10.0..22.0).contains(&e.x)
                && (10.0..22.0).contains(&e.z)
        })
        .count();
    assert!(pads > 0);
}

#[test]
fn water_outline_sits_on_the_boundary() {
    let mut scape = base_scape();
    let mask = vec![0u8; W * W];
    scape
        .set_height_map(&mask, vec![0u16; W * W], W, W, 1, 1, 1.0, 1000.0, vec![0u8; W * W])
        .unwrap();
    let mut water = vec![0u8; W * W];
    for z in 10..22 {
        for x in 10..22 {
            water[x + z * W] = 200;
        }
    }
    scape.set_water(&water, W, W, 128, 64).unwrap();
    let outline: Vec<_> = scape
        .elements()
        .iter()
        .filter(|e| e.kind() == ElementKind::Water)
        .collect();
    assert!(!outline.is_empty());
    for e in &outline {
        // The lake interior spans world 10..22; outline vertices hug its rim.
        let on_x_rim = (e.x - 10.0).abs() < 1.5 || (e.x - 21.0).abs() < 1.5;
        let on_z_rim = (e.z - 10.0).abs() < 1.5 || (e.z - 21.0).abs() < 1.5;
        assert!(on_x_rim || on_z_rim, "interior water vertex at ({}, {})", e.x, e.z);
    }
}

#[test]
fn roads_carve_the_heightmap_and_decorate_the_verge() {
    let mut scape = base_scape();
    let mask = vec![0u8; W * W];
    scape
        .set_height_map(&mask, vec![32768u16; W * W], W, W, 1, 1, 1.0, 1000.0, vec![0u8; W * W])
        .unwrap();
    let flat = scape.height(16.0, 16.0);
    let mut road = vec![0u8; W * W];
    for z in 0..W {
        for x in 14..18 {
            road[x + z * W] = if x == 15 || x == 16 { 255 } else { 140 };
        }
    }
    scape.set_roads(&road, W, W, 128, 200, 64).unwrap();
    assert!(scape.height(16.0, 16.0) < flat, "road bed must sink");
    let roads = scape
        .elements()
        .iter()
        .filter(|e| e.kind() == ElementKind::Road)
        .count();
    assert!(roads > 0);
    // The inner band carries ripple shading in v0; the outer band is bare.
    let shaded = scape
        .elements()
        .iter()
        .filter(|e| e.kind() == ElementKind::Road && e.v0 > 0)
        .count();
    assert!(shaded > 0, "inner road band missing");
}
