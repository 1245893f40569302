//! Area-weighted buoyancy sample points taken from hull geometry.

use crate::error::GeometryError;
use glam::Vec3;

/// Sum of weights below which normalization is skipped.
const NORMALIZE_EPSILON: f32 = 1e-6;

/// Immutable hull mesh in hull-local space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HullGeometry {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
}

impl HullGeometry {
    /// Build geometry from a vertex list and a flat triangle index list.
    pub fn new(vertices: Vec<Vec3>, indices: &[u32]) -> Result<Self, GeometryError> {
        if indices.len() % 3 != 0 {
            return Err(GeometryError::IndexCountNotTriangles(indices.len()));
        }
        let triangles = indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .collect();
        Self::from_triangles(vertices, triangles)
    }

    /// Build geometry from vertex-index triples.
    pub fn from_triangles(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self, GeometryError> {
        if let Some(i) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(GeometryError::NonFiniteVertex(i));
        }
        for &index in triangles.iter().flatten() {
            if index as usize >= vertices.len() {
                return Err(GeometryError::IndexOutOfRange {
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }
        Ok(Self { vertices, triangles })
    }

    /// Closed axis-aligned box centred on the origin, two triangles per face.
    ///
    /// Face diagonals are mirrored through the vertical axis, so opposite corners get
    /// equal area weights and a level box sampled at stride 1 carries no trim moment.
    pub fn cuboid(half_extents: Vec3) -> Self {
        let h = half_extents;
        let vertices = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        let triangles = vec![
            // bottom
            [0, 1, 2],
            [0, 2, 3],
            // top
            [4, 6, 5],
            [4, 7, 6],
            // -z
            [0, 5, 1],
            [0, 4, 5],
            // +z
            [3, 2, 7],
            [2, 6, 7],
            // -x
            [0, 3, 7],
            [0, 7, 4],
            // +x
            [1, 5, 2],
            [2, 5, 6],
        ];
        Self { vertices, triangles }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }

    /// Total surface area of all triangles.
    pub fn surface_area(&self) -> f32 {
        self.triangles.iter().map(|tri| self.triangle_area(tri)).sum()
    }

    fn triangle_area(&self, tri: &[u32; 3]) -> f32 {
        let a = self.vertices[tri[0] as usize];
        let b = self.vertices[tri[1] as usize];
        let c = self.vertices[tri[2] as usize];
        (b - a).cross(c - a).length() * 0.5
    }

    /// Per-vertex area: each triangle hands a third of its area to each corner.
    pub fn vertex_areas(&self) -> Vec<f32> {
        let mut areas = vec![0.0f32; self.vertices.len()];
        for tri in &self.triangles {
            let share = self.triangle_area(tri) / 3.0;
            for &i in tri {
                areas[i as usize] += share;
            }
        }
        areas
    }
}

/// A buoyancy sample on the hull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatSample {
    /// Index of the source vertex in the hull geometry.
    pub vertex_index: usize,
    /// Position in hull-local space.
    pub local_position: Vec3,
    /// Normalized area weight. Weights of one hull sum to 1.
    pub weight: f32,
}

/// Pick every `stride`-th vertex with positive area and normalize their weights.
///
/// A stride of 0 is treated as 1. Empty geometry produces no samples.
pub fn build_samples(geometry: &HullGeometry, stride: usize) -> Vec<FloatSample> {
    if geometry.is_empty() {
        return Vec::new();
    }

    let areas = geometry.vertex_areas();
    let mut samples: Vec<FloatSample> = areas
        .iter()
        .enumerate()
        .step_by(stride.max(1))
        .filter(|(_, w)| **w > 0.0)
        .map(|(i, &w)| FloatSample {
            vertex_index: i,
            local_position: geometry.vertices[i],
            weight: w,
        })
        .collect();

    let sum: f32 = samples.iter().map(|s| s.weight).sum();
    if sum > NORMALIZE_EPSILON {
        for s in &mut samples {
            s.weight /= sum;
        }
    }
    samples
}

/// Sample set for one hull, rebuilt wholesale when geometry or stride changes.
#[derive(Debug, Clone, Default)]
pub struct HullSamples {
    samples: Vec<FloatSample>,
    stride: usize,
}

impl HullSamples {
    pub fn build(geometry: &HullGeometry, stride: usize) -> Self {
        Self {
            samples: build_samples(geometry, stride),
            stride: stride.max(1),
        }
    }

    /// Replace the sample set for a new stride.
    pub fn rebuild(&mut self, geometry: &HullGeometry, stride: usize) {
        *self = Self::build(geometry, stride);
    }

    pub fn samples(&self) -> &[FloatSample] {
        &self.samples
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sum of sample weights (1 for any hull with non-negligible area).
    pub fn total_weight(&self) -> f32 {
        self.samples.iter().map(|s| s.weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn random_mesh(rng: &mut rand::rngs::StdRng) -> HullGeometry {
        let vertex_count = rng.gen_range(3..40);
        let vertices: Vec<Vec3> = (0..vertex_count)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-3.0..3.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-6.0..6.0),
                )
            })
            .collect();
        let mut triangles = Vec::new();
        // Vertex 0 is always referenced, so stride sampling never comes up empty.
        triangles.push([0, 1, 2]);
        for _ in 0..rng.gen_range(1..60) {
            triangles.push([
                rng.gen_range(0..vertex_count as u32),
                rng.gen_range(0..vertex_count as u32),
                rng.gen_range(0..vertex_count as u32),
            ]);
        }
        HullGeometry::from_triangles(vertices, triangles).unwrap()
    }

    #[test]
    fn weights_sum_to_one_for_random_meshes() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mesh = random_mesh(&mut rng);
            if mesh.surface_area() <= 1e-3 {
                continue;
            }
            let stride = rng.gen_range(1..5);
            let samples = build_samples(&mesh, stride);
            if samples.is_empty() {
                continue;
            }
            let sum: f32 = samples.iter().map(|s| s.weight).sum();
            assert!((sum - 1.0).abs() < 1e-4, "sum was {}", sum);
            assert!(samples.iter().all(|s| s.weight >= 0.0));
        }
    }

    #[test]
    fn triangle_area_split_in_thirds() {
        let mesh = HullGeometry::new(
            vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 3.0)],
            &[0, 1, 2],
        )
        .unwrap();
        let areas = mesh.vertex_areas();
        for a in areas {
            assert!((a - 1.0).abs() < 1e-6);
        }
        let samples = build_samples(&mesh, 1);
        assert_eq!(samples.len(), 3);
        for s in samples {
            assert!((s.weight - 1.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn stride_selects_by_index_order() {
        let mesh = HullGeometry::cuboid(Vec3::new(1.0, 0.5, 2.0));
        let samples = build_samples(&mesh, 3);
        let indices: Vec<usize> = samples.iter().map(|s| s.vertex_index).collect();
        assert_eq!(indices, vec![0, 3, 6]);
        let sum: f32 = samples.iter().map(|s| s.weight).sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn cuboid_bottom_weights_balance() {
        let h = Vec3::new(1.5, 0.25, 0.75);
        let samples = build_samples(&HullGeometry::cuboid(h), 1);
        assert_eq!(samples.len(), 8);
        let bottom: Vec<&FloatSample> = samples.iter().filter(|s| s.local_position.y < 0.0).collect();
        assert_eq!(bottom.len(), 4);
        // A level hull resting on its bottom corners must feel no pitch or roll moment.
        let moment: Vec3 = bottom.iter().map(|s| s.local_position * s.weight).sum();
        assert!(moment.x.abs() < 1e-6 && moment.z.abs() < 1e-6, "moment {:?}", moment);
        // Opposite corners carry equal weight.
        let w = |x: f32, z: f32| {
            bottom
                .iter()
                .find(|s| s.local_position.x.signum() == x && s.local_position.z.signum() == z)
                .map(|s| s.weight)
                .unwrap()
        };
        assert!((w(-1.0, -1.0) - w(1.0, 1.0)).abs() < 1e-6);
        assert!((w(1.0, -1.0) - w(-1.0, 1.0)).abs() < 1e-6);
    }

    #[test]
    fn unreferenced_vertices_are_skipped() {
        let mesh = HullGeometry::new(
            vec![
                Vec3::ZERO,
                Vec3::new(9.0, 9.0, 9.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            &[0, 2, 3],
        )
        .unwrap();
        let samples = build_samples(&mesh, 1);
        assert!(samples.iter().all(|s| s.vertex_index != 1));
        assert_eq!(samples.len(), 3);
    }

    #[test]
    fn rebuild_is_deterministic() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(99);
        let mesh = random_mesh(&mut rng);
        let first = build_samples(&mesh, 2);
        let second = build_samples(&mesh, 2);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.vertex_index, b.vertex_index);
            assert_eq!(a.weight.to_bits(), b.weight.to_bits());
        }

        let mut set = HullSamples::build(&mesh, 2);
        set.rebuild(&mesh, 2);
        assert_eq!(set.samples(), first.as_slice());
    }

    #[test]
    fn empty_geometry_yields_no_samples() {
        let no_triangles = HullGeometry::new(vec![Vec3::ZERO, Vec3::X, Vec3::Z], &[]).unwrap();
        assert!(build_samples(&no_triangles, 1).is_empty());
        assert!(build_samples(&HullGeometry::default(), 1).is_empty());
    }

    #[test]
    fn negligible_area_is_left_unnormalized() {
        let mesh = HullGeometry::new(
            vec![Vec3::ZERO, Vec3::new(1e-4, 0.0, 0.0), Vec3::new(0.0, 0.0, 1e-4)],
            &[0, 1, 2],
        )
        .unwrap();
        let samples = build_samples(&mesh, 1);
        assert_eq!(samples.len(), 3);
        let sum: f32 = samples.iter().map(|s| s.weight).sum();
        assert!(sum < 1e-6);
    }

    #[test]
    fn zero_area_mesh_has_no_samples() {
        let mesh = HullGeometry::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::X * 2.0],
            &[0, 1, 2],
        )
        .unwrap();
        assert!(build_samples(&mesh, 1).is_empty());
    }

    #[test]
    fn invalid_indices_are_rejected() {
        assert_eq!(
            HullGeometry::new(vec![Vec3::ZERO], &[0, 0]),
            Err(GeometryError::IndexCountNotTriangles(2))
        );
        assert_eq!(
            HullGeometry::new(vec![Vec3::ZERO, Vec3::X], &[0, 1, 5]),
            Err(GeometryError::IndexOutOfRange { index: 5, vertex_count: 2 })
        );
        assert_eq!(
            HullGeometry::new(vec![Vec3::new(f32::NAN, 0.0, 0.0)], &[]),
            Err(GeometryError::NonFiniteVertex(0))
        );
    }
}
