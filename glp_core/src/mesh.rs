//! Procedural meshes.
//!
//! Generates indexed triangle lists for the shapes the renderer is fed:
//! positions, per-vertex normals and `u16` indices. Triangles wind
//! counter-clockwise when seen from outside.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MeshError};
use crate::math::{Mat4, Vec3};
use crate::transform::normal_matrix;

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex positions of each triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// Square-based pyramid with its apex above the middle of the base.
    pub fn pyramid() -> Self {
        let positions = vec![
            Vec3::new(0.0, 1.0, -0.5),
            Vec3::new(-0.5, 0.0, -1.0),
            Vec3::new(-0.5, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.5, 0.0, -1.0),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 1, 3, 2, 1, 3, 1, 4];
        let mut mesh = Self {
            normals: vec![Vec3::ZERO; positions.len()],
            positions,
            indices,
        };
        mesh.smooth_normals();
        mesh
    }

    /// Unit cube centred on the origin, four vertices per face so every face
    /// keeps a flat normal.
    pub fn cube() -> Self {
        // (normal, u, v) with u x v == normal.
        let faces = [
            (Vec3::X, -Vec3::Z, Vec3::Y),
            (-Vec3::X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, -Vec3::Z),
            (-Vec3::Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (-Vec3::Z, -Vec3::X, Vec3::Y),
        ];
        let mut mesh = Self::default();
        for (n, u, v) in faces {
            let base = mesh.positions.len() as u16;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                mesh.positions.push((n + u * su + v * sv) * 0.5);
                mesh.normals.push(n);
            }
            mesh.push_quad(base, base + 1, base + 2, base + 3);
        }
        mesh
    }

    /// Closed cylinder of radius 1 around the Y axis, from `y = -0.5` to
    /// `y = 0.5`.
    pub fn cylinder(slices: u32) -> Result<Self, MeshError> {
        require_segments(slices, 3)?;
        let ring = slices as usize + 1;
        require_capacity(4 * ring + 2)?;

        let mut mesh = Self::default();
        for j in 0..ring {
            let dir = ring_direction(j, slices);
            mesh.push_vertex(Vec3::new(dir.x, -0.5, dir.z), dir);
            mesh.push_vertex(Vec3::new(dir.x, 0.5, dir.z), dir);
        }
        for j in 0..slices as u16 {
            let bottom = 2 * j;
            mesh.push_quad(bottom, bottom + 2, bottom + 3, bottom + 1);
        }

        mesh.push_cap(slices, 0.5, Vec3::Y);
        mesh.push_cap(slices, -0.5, -Vec3::Y);
        Ok(mesh)
    }

    /// Cone of radius 1 and height 1, base on `y = 0`, apex at `y = 1`.
    pub fn cone(slices: u32) -> Result<Self, MeshError> {
        require_segments(slices, 3)?;
        let ring = slices as usize + 1;
        require_capacity(2 * ring + slices as usize + 1)?;

        let mut mesh = Self::default();
        let slant = |dir: Vec3| Vec3::new(dir.x, 1.0, dir.z) * std::f32::consts::FRAC_1_SQRT_2;
        for j in 0..ring {
            let dir = ring_direction(j, slices);
            mesh.push_vertex(Vec3::new(dir.x, 0.0, dir.z), slant(dir));
        }
        for j in 0..slices {
            let mid = ring_direction_at((j as f32 + 0.5) / slices as f32);
            let apex = mesh.push_vertex(Vec3::new(0.0, 1.0, 0.0), slant(mid));
            let j = j as u16;
            mesh.indices.extend_from_slice(&[j, j + 1, apex]);
        }

        mesh.push_cap(slices, 0.0, -Vec3::Y);
        Ok(mesh)
    }

    /// Unit sphere tessellated into `stacks` latitude bands and `slices`
    /// longitude segments.
    pub fn uv_sphere(stacks: u32, slices: u32) -> Result<Self, MeshError> {
        require_segments(stacks, 2)?;
        require_segments(slices, 3)?;
        let columns = slices as usize + 1;
        require_capacity((stacks as usize + 1) * columns)?;

        let mut mesh = Self::default();
        for i in 0..=stacks {
            let phi = PI * i as f32 / stacks as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            for j in 0..columns {
                let dir = ring_direction(j, slices);
                let p = Vec3::new(sin_phi * dir.x, cos_phi, sin_phi * dir.z);
                mesh.push_vertex(p, p);
            }
        }
        let columns = columns as u16;
        for i in 0..stacks as u16 {
            for j in 0..slices as u16 {
                let a = i * columns + j;
                let b = a + columns;
                mesh.push_quad(a, b, b + 1, a + 1);
            }
        }
        Ok(mesh)
    }

    /// Replaces the normals with area-weighted averages of the adjacent face
    /// normals.
    pub fn smooth_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| self.positions[i as usize]);
            let face = (b - a).cross(c - a);
            for &i in tri {
                acc[i as usize] = acc[i as usize] + face;
            }
        }
        self.normals = acc
            .into_iter()
            .map(|n| n.normalized().unwrap_or(Vec3::ZERO))
            .collect();
    }

    /// Copy of the mesh with positions moved by `m` and normals by its
    /// normal matrix.
    pub fn transformed(&self, m: &Mat4) -> Result<Self, MathError> {
        let nm = normal_matrix(m)?;
        let normals = self
            .normals
            .iter()
            .map(|n| nm.transform_vector(*n).normalized().unwrap_or(Vec3::ZERO))
            .collect();
        Ok(Self {
            positions: self.positions.iter().map(|p| m.transform_point(*p)).collect(),
            normals,
            indices: self.indices.clone(),
        })
    }

    /// Flattened `xyz` positions, the layout vertex buffers are uploaded in.
    pub fn position_buffer(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| p.to_array()).collect()
    }

    pub fn normal_buffer(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| n.to_array()).collect()
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u16 {
        self.positions.push(position);
        self.normals.push(normal);
        (self.positions.len() - 1) as u16
    }

    fn push_quad(&mut self, a: u16, b: u16, c: u16, d: u16) {
        self.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }

    /// Disc at height `y` facing `normal` (+Y or -Y).
    fn push_cap(&mut self, slices: u32, y: f32, normal: Vec3) {
        let center = self.push_vertex(Vec3::new(0.0, y, 0.0), normal);
        let first = center + 1;
        for j in 0..=slices as usize {
            let dir = ring_direction(j, slices);
            self.push_vertex(Vec3::new(dir.x, y, dir.z), normal);
        }
        for j in 0..slices as u16 {
            let (a, b) = (first + j, first + j + 1);
            if normal.y > 0.0 {
                self.indices.extend_from_slice(&[center, a, b]);
            } else {
                self.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }
}

fn ring_direction(j: usize, slices: u32) -> Vec3 {
    ring_direction_at(j as f32 / slices as f32)
}

/// Unit direction in the XZ plane; 0 points at +Z, a quarter turn at +X.
fn ring_direction_at(fraction: f32) -> Vec3 {
    let (s, c) = (TAU * fraction).sin_cos();
    Vec3::new(s, 0.0, c)
}

fn require_segments(requested: u32, minimum: u32) -> Result<(), MeshError> {
    if requested < minimum {
        return Err(MeshError::TooFewSegments { requested, minimum });
    }
    Ok(())
}

fn require_capacity(vertices: usize) -> Result<(), MeshError> {
    if vertices > u16::MAX as usize + 1 {
        return Err(MeshError::IndexOverflow { vertices });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{rotate_y, scale, translate};

    fn assert_outward(mesh: &Mesh, center: Vec3) {
        for [a, b, c] in mesh.triangles() {
            let face = (b - a).cross(c - a);
            if face.length() < 1e-6 {
                continue;
            }
            let centroid = (a + b + c) * (1.0 / 3.0);
            assert!(face.dot(centroid - center) > 0.0, "inward face {a:?} {b:?} {c:?}");
        }
    }

    fn assert_valid(mesh: &Mesh) {
        assert_eq!(mesh.positions.len(), mesh.normals.len());
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn cube_has_six_flat_faces() {
        let cube = Mesh::cube();
        assert_valid(&cube);
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_outward(&cube, Vec3::ZERO);
        assert!(cube
            .positions
            .iter()
            .all(|p| p.x.abs() == 0.5 && p.y.abs() == 0.5 && p.z.abs() == 0.5));
    }

    #[test]
    fn pyramid_faces_point_outward() {
        let pyramid = Mesh::pyramid();
        assert_valid(&pyramid);
        assert_eq!(pyramid.triangle_count(), 6);
        assert_outward(&pyramid, Vec3::new(0.0, 0.25, -0.5));
        assert!(pyramid.normals[0].approx_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn cylinder_cone_and_sphere_wind_outward() {
        let cylinder = Mesh::cylinder(8).unwrap();
        assert_valid(&cylinder);
        assert_eq!(cylinder.triangle_count(), 8 * 2 + 8 * 2);
        assert_outward(&cylinder, Vec3::ZERO);

        let cone = Mesh::cone(16).unwrap();
        assert_valid(&cone);
        assert_eq!(cone.triangle_count(), 16 * 2);
        assert_outward(&cone, Vec3::new(0.0, 0.25, 0.0));

        let sphere = Mesh::uv_sphere(8, 12).unwrap();
        assert_valid(&sphere);
        assert_outward(&sphere, Vec3::ZERO);
        assert!(sphere
            .positions
            .iter()
            .all(|p| (p.length() - 1.0).abs() < 1e-5));
    }

    #[test]
    fn too_few_segments_are_rejected() {
        assert_eq!(
            Mesh::cylinder(2),
            Err(MeshError::TooFewSegments {
                requested: 2,
                minimum: 3
            })
        );
        assert!(Mesh::uv_sphere(1, 8).is_err());
        assert!(matches!(
            Mesh::uv_sphere(400, 400),
            Err(MeshError::IndexOverflow { .. })
        ));
    }

    #[test]
    fn smooth_normals_of_sphere_point_radially() {
        let mut sphere = Mesh::uv_sphere(16, 24).unwrap();
        let expected = sphere.normals.clone();
        sphere.smooth_normals();
        // Seam and pole vertices only see part of their fan.
        let close = sphere
            .normals
            .iter()
            .zip(&expected)
            .filter(|(a, b)| a.approx_eq(**b, 0.05))
            .count();
        assert!(close * 10 > sphere.vertex_count() * 7);
    }

    #[test]
    fn transformed_mesh_keeps_normals_unit_and_perpendicular() {
        let m = translate(1.0, 2.0, 3.0) * rotate_y(30.0) * scale(2.0, 1.0, 1.0);
        let cube = Mesh::cube().transformed(&m).unwrap();
        assert_outward(&cube, Vec3::new(1.0, 2.0, 3.0));
        for n in &cube.normals {
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
        assert!(Mesh::cube().transformed(&scale(1.0, 0.0, 1.0)).is_err());
    }

    #[test]
    fn buffers_are_flattened_xyz() {
        let cube = Mesh::cube();
        let buf = cube.position_buffer();
        assert_eq!(buf.len(), cube.vertex_count() * 3);
        assert_eq!(&buf[0..3], &cube.positions[0].to_array());
        assert_eq!(cube.normal_buffer().len(), buf.len());
    }
}
