use crate::{BlinnPhongShader, MeshGeometry, RenderingObject};
use glam::Vec3;
use std::collections::HashMap;
use std::sync::Arc;

/// Procedural meshes.
pub struct PrimitiveCreator;

impl PrimitiveCreator {
    /// Icosahedron subdivided `subdivisions` times and projected onto a sphere.
    ///
    /// Produces `20 * 4^n` triangles and `10 * 4^n + 2` vertices; normals are
    /// the unit directions from the centre.
    pub fn create_icosphere(
        shader: &BlinnPhongShader,
        radius: f32,
        subdivisions: u32,
    ) -> RenderingObject {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let mut directions: Vec<Vec3> = [
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ]
        .iter()
        .map(|v| v.normalize())
        .collect();

        #[rustfmt::skip]
        let mut indices: Vec<u32> = vec![
            0, 11, 5,  0, 5, 1,  0, 1, 7,  0, 7, 10,  0, 10, 11,
            1, 5, 9,  5, 11, 4,  11, 10, 2,  10, 7, 6,  7, 1, 8,
            3, 9, 4,  3, 4, 2,  3, 2, 6,  3, 6, 8,  3, 8, 9,
            4, 9, 5,  2, 4, 11,  6, 2, 10,  8, 6, 7,  9, 8, 1,
        ];

        for _ in 0..subdivisions {
            indices = subdivide(&mut directions, &indices);
        }

        let positions = directions.iter().map(|d| *d * radius).collect();
        let geometry = MeshGeometry::new(
            format!("icosphere_r{radius}_s{subdivisions}"),
            positions,
            directions,
            indices,
        );
        RenderingObject::new(Arc::new(geometry), *shader)
    }
}

/// Split every triangle into four, sharing edge midpoints between neighbours.
fn subdivide(directions: &mut Vec<Vec3>, indices: &[u32]) -> Vec<u32> {
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    let mut out = Vec::with_capacity(indices.len() * 4);

    for tri in indices.chunks_exact(3) {
        let (v1, v2, v3) = (tri[0], tri[1], tri[2]);
        let a = midpoint(&mut midpoints, directions, v1, v2);
        let b = midpoint(&mut midpoints, directions, v2, v3);
        let c = midpoint(&mut midpoints, directions, v3, v1);
        out.extend_from_slice(&[v1, a, c, v2, b, a, v3, c, b, a, b, c]);
    }
    out
}

fn midpoint(
    cache: &mut HashMap<(u32, u32), u32>,
    directions: &mut Vec<Vec3>,
    a: u32,
    b: u32,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    *cache.entry(key).or_insert_with(|| {
        let mid = (directions[a as usize] + directions[b as usize]).normalize();
        directions.push(mid);
        (directions.len() - 1) as u32
    })
}
