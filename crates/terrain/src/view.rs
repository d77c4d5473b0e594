//! The per-camera view of a landscape: collected elements, depth ordering,
//! and the triangulated ground.
//!
//! `update` runs once per camera move. Collected elements are sorted
//! farthest-first; the ground kinds feed the triangulator, and the output
//! triangles are then ordered by their first vertex index. Because vertices
//! were appended back-to-front, that index order approximates painter order
//! and consumers can draw the list front of a z-buffer-less pass.
//!
//! The view owns all its buffers and reuses them across frames; updating
//! with a smaller scene never releases capacity.

use std::cmp::Ordering;

use glam::Vec3;

use crate::landscape::Landscape;
use crate::triangulate::Triangulator;

/// Three indices into the view's parallel vertex arrays.
pub type ViewTriangle = [u32; 3];

#[derive(Default)]
pub struct DelaunayView {
    collected: Vec<u32>,
    points: Vec<f64>,
    kinds: Vec<u8>,
    vertices: Vec<Vec3>,
    params: Vec<Vec3>,
    triangles: Vec<ViewTriangle>,
    triangulator: Triangulator,
}

impl DelaunayView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the view for a camera position. `detail_scale` multiplies
    /// every element's pop-in distance; 1.0 is the intended detail level.
    pub fn update(&mut self, scape: &Landscape, camera: Vec3, detail_scale: f32) {
        scape.collect(&mut self.collected, camera, detail_scale);

        let elements = scape.elements();
        self.collected.sort_unstable_by(|&a, &b| {
            let da = elements[a as usize].distance_sq(camera);
            let db = elements[b as usize].distance_sq(camera);
            // Farthest first; ties keep master-list order so the result is
            // deterministic.
            db.partial_cmp(&da)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.cmp(&b))
        });

        self.points.clear();
        self.kinds.clear();
        self.vertices.clear();
        self.params.clear();
        self.triangles.clear();
        for &i in &self.collected {
            let e = &elements[i as usize];
            if !e.kind().is_ground() {
                continue;
            }
            self.points.push(e.x as f64);
            self.points.push(e.z as f64);
            self.kinds.push(e.kind);
            self.vertices.push(e.position());
            self.params.push(Vec3::new(
                e.v0 as f32 / 255.0,
                e.v1 as f32 / 255.0,
                e.v2 as f32 / 255.0,
            ));
        }

        let tris = self.triangulator.triangulate(&self.points);
        for c in tris.chunks_exact(3) {
            self.triangles.push([c[0], c[1], c[2]]);
        }
        self.triangles.sort_by_key(|t| t[0]);
    }

    /// Indices of every collected element, farthest from the camera first,
    /// into the landscape's master list.
    pub fn collected(&self) -> &[u32] {
        &self.collected
    }

    /// Ground triangles, ordered by first vertex index (approximately
    /// back-to-front).
    pub fn triangles(&self) -> &[ViewTriangle] {
        &self.triangles
    }

    /// World positions of the ground vertices, parallel to `kinds` and
    /// `params`.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// `ElementKind` ordinals of the ground vertices.
    pub fn kinds(&self) -> &[u8] {
        &self.kinds
    }

    /// Normalized `v0, v1, v2` of the ground vertices.
    pub fn params(&self) -> &[Vec3] {
        &self.params
    }
}
