use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, TAU};

use super::Mesh;
use super::classify::ShapeKind;

const RADIAL_SEGMENTS: usize = 32;
const TORUS_MAJOR_SEGMENTS: usize = 32;
const TORUS_MINOR_SEGMENTS: usize = 16;
const CAPSULE_STACKS: usize = 8;
const CAPSULE_SEGMENTS: usize = 24;

// Axis-aligned box centered at the origin
pub fn cuboid(extents: [f32; 3]) -> Mesh {
    let [x, y, z] = [extents[0] / 2.0, extents[1] / 2.0, extents[2] / 2.0];
    let vertices = vec![
        [-x, -y, -z],
        [x, -y, -z],
        [x, y, -z],
        [-x, y, -z],
        [-x, -y, z],
        [x, -y, z],
        [x, y, z],
        [-x, y, z],
    ];
    let faces = vec![
        [0, 1, 2],
        [0, 2, 3],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [1, 2, 6],
        [1, 6, 5],
        [2, 3, 7],
        [2, 7, 6],
        [3, 0, 4],
        [3, 4, 7],
    ];
    Mesh::new(vertices, faces)
}

// Subdivided icosahedron projected onto a sphere
pub fn icosphere(subdivisions: u32, radius: f32) -> Mesh {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let mut vertices: Vec<[f32; 3]> = vec![
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];
    for v in &mut vertices {
        *v = project_to_sphere(*v, radius);
    }
    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut next = Vec::with_capacity(faces.len() * 4);
        for face in &faces {
            let ab = midpoint(&mut vertices, &mut midpoints, face[0], face[1], radius);
            let bc = midpoint(&mut vertices, &mut midpoints, face[1], face[2], radius);
            let ca = midpoint(&mut vertices, &mut midpoints, face[2], face[0], radius);
            next.push([face[0], ab, ca]);
            next.push([face[1], bc, ab]);
            next.push([face[2], ca, bc]);
            next.push([ab, bc, ca]);
        }
        faces = next;
    }

    Mesh::new(vertices, faces)
}

fn midpoint(
    vertices: &mut Vec<[f32; 3]>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
    radius: f32,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&idx) = cache.get(&key) {
        return idx;
    }
    let va = vertices[a as usize];
    let vb = vertices[b as usize];
    let mid = project_to_sphere(
        [
            (va[0] + vb[0]) / 2.0,
            (va[1] + vb[1]) / 2.0,
            (va[2] + vb[2]) / 2.0,
        ],
        radius,
    );
    let idx = vertices.len() as u32;
    vertices.push(mid);
    cache.insert(key, idx);
    idx
}

fn project_to_sphere(v: [f32; 3], radius: f32) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt().max(1e-12);
    [v[0] / len * radius, v[1] / len * radius, v[2] / len * radius]
}

// Capped cylinder along Z, centered at the origin
pub fn cylinder(radius: f32, height: f32) -> Mesh {
    let half = height / 2.0;
    let seg = RADIAL_SEGMENTS as u32;
    let mut vertices = Vec::with_capacity(RADIAL_SEGMENTS * 2 + 2);
    for i in 0..seg {
        let a = TAU * i as f32 / seg as f32;
        vertices.push([radius * a.cos(), radius * a.sin(), -half]);
    }
    for i in 0..seg {
        let a = TAU * i as f32 / seg as f32;
        vertices.push([radius * a.cos(), radius * a.sin(), half]);
    }
    let bottom_center = vertices.len() as u32;
    vertices.push([0.0, 0.0, -half]);
    let top_center = vertices.len() as u32;
    vertices.push([0.0, 0.0, half]);

    let mut faces = Vec::with_capacity(RADIAL_SEGMENTS * 4);
    for i in 0..seg {
        let j = (i + 1) % seg;
        // side quad
        faces.push([i, j, seg + j]);
        faces.push([i, seg + j, seg + i]);
        // caps
        faces.push([bottom_center, j, i]);
        faces.push([top_center, seg + i, seg + j]);
    }
    Mesh::new(vertices, faces)
}

// Cone along Z, base at -height/2, apex at +height/2
pub fn cone(radius: f32, height: f32) -> Mesh {
    let half = height / 2.0;
    let seg = RADIAL_SEGMENTS as u32;
    let mut vertices = Vec::with_capacity(RADIAL_SEGMENTS + 2);
    for i in 0..seg {
        let a = TAU * i as f32 / seg as f32;
        vertices.push([radius * a.cos(), radius * a.sin(), -half]);
    }
    let base_center = vertices.len() as u32;
    vertices.push([0.0, 0.0, -half]);
    let apex = vertices.len() as u32;
    vertices.push([0.0, 0.0, half]);

    let mut faces = Vec::with_capacity(RADIAL_SEGMENTS * 2);
    for i in 0..seg {
        let j = (i + 1) % seg;
        faces.push([apex, i, j]);
        faces.push([base_center, j, i]);
    }
    Mesh::new(vertices, faces)
}

// Torus in the XY plane around Z
pub fn torus(major_radius: f32, minor_radius: f32) -> Mesh {
    let maj = TORUS_MAJOR_SEGMENTS as u32;
    let min = TORUS_MINOR_SEGMENTS as u32;
    let mut vertices = Vec::with_capacity((maj * min) as usize);
    for i in 0..maj {
        let u = TAU * i as f32 / maj as f32;
        for j in 0..min {
            let v = TAU * j as f32 / min as f32;
            let ring = major_radius + minor_radius * v.cos();
            vertices.push([ring * u.cos(), ring * u.sin(), minor_radius * v.sin()]);
        }
    }
    let mut faces = Vec::with_capacity((maj * min * 2) as usize);
    for i in 0..maj {
        let ni = (i + 1) % maj;
        for j in 0..min {
            let nj = (j + 1) % min;
            let a = i * min + j;
            let b = ni * min + j;
            let c = ni * min + nj;
            let d = i * min + nj;
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }
    Mesh::new(vertices, faces)
}

// Capsule along Z: a cylinder of the given height with hemispherical ends
pub fn capsule(radius: f32, height: f32) -> Mesh {
    let half = height / 2.0;
    let seg = CAPSULE_SEGMENTS as u32;
    let stacks = CAPSULE_STACKS as u32;

    let mut vertices = Vec::new();
    vertices.push([0.0, 0.0, -half - radius]);
    // bottom hemisphere rings, equator ring lands exactly at -half
    for i in 1..=stacks {
        let phi = -FRAC_PI_2 + FRAC_PI_2 * i as f32 / stacks as f32;
        push_ring(&mut vertices, radius * phi.cos(), -half + radius * phi.sin(), seg);
    }
    // top hemisphere rings, starting from the equator at +half
    for i in 0..stacks {
        let phi = FRAC_PI_2 * i as f32 / stacks as f32;
        push_ring(&mut vertices, radius * phi.cos(), half + radius * phi.sin(), seg);
    }
    let apex = vertices.len() as u32;
    vertices.push([0.0, 0.0, half + radius]);

    let ring_count = stacks * 2;
    let ring_start = |r: u32| 1 + r * seg;

    let mut faces = Vec::new();
    // bottom fan
    for i in 0..seg {
        let j = (i + 1) % seg;
        faces.push([0, ring_start(0) + j, ring_start(0) + i]);
    }
    // bands between consecutive rings (the -half to +half band is the side wall)
    for r in 0..ring_count - 1 {
        let lo = ring_start(r);
        let hi = ring_start(r + 1);
        for i in 0..seg {
            let j = (i + 1) % seg;
            faces.push([lo + i, lo + j, hi + j]);
            faces.push([lo + i, hi + j, hi + i]);
        }
    }
    // top fan
    let last = ring_start(ring_count - 1);
    for i in 0..seg {
        let j = (i + 1) % seg;
        faces.push([apex, last + i, last + j]);
    }
    Mesh::new(vertices, faces)
}

fn push_ring(vertices: &mut Vec<[f32; 3]>, radius: f32, z: f32, seg: u32) {
    for i in 0..seg {
        let a = TAU * i as f32 / seg as f32;
        vertices.push([radius * a.cos(), radius * a.sin(), z]);
    }
}

// Boxy humanoid: body, head, cylinder arms and legs
pub fn robot() -> Mesh {
    let body = cuboid([1.5, 1.0, 2.0]);

    let mut head = cuboid([1.0, 0.8, 0.8]);
    head.translate([0.0, 0.0, 1.4]);

    let mut left_arm = cylinder(0.2, 1.5);
    left_arm.rotate_y(FRAC_PI_2);
    left_arm.translate([-1.0, 0.0, 0.5]);

    let mut right_arm = cylinder(0.2, 1.5);
    right_arm.rotate_y(FRAC_PI_2);
    right_arm.translate([1.0, 0.0, 0.5]);

    let mut left_leg = cylinder(0.25, 1.5);
    left_leg.translate([-0.4, 0.0, -1.75]);

    let mut right_leg = cylinder(0.25, 1.5);
    right_leg.translate([0.4, 0.0, -1.75]);

    Mesh::concat(vec![body, head, left_arm, right_arm, left_leg, right_leg])
}

// Body, cabin and four wheels
pub fn car() -> Mesh {
    let mut body = cuboid([4.0, 2.0, 1.0]);
    body.translate([0.0, 0.0, 0.5]);

    let mut cabin = cuboid([2.0, 1.8, 1.0]);
    cabin.translate([0.0, 0.0, 1.5]);

    let mut parts = vec![body, cabin];
    for pos in [
        [-1.2, -1.0, 0.0],
        [-1.2, 1.0, 0.0],
        [1.2, -1.0, 0.0],
        [1.2, 1.0, 0.0],
    ] {
        let mut wheel = cylinder(0.4, 0.3);
        wheel.rotate_x(FRAC_PI_2);
        wheel.translate(pos);
        parts.push(wheel);
    }
    Mesh::concat(parts)
}

// Teardrop body with a hanging loop and a center gem
pub fn pendant() -> Mesh {
    let mut body = icosphere(3, 1.0);
    body.scale([1.0, 1.0, 1.5]);

    let mut loop_ring = torus(0.3, 0.1);
    loop_ring.translate([0.0, 0.0, 1.5]);

    let gem = icosphere(2, 0.3);

    Mesh::concat(vec![body, loop_ring, gem])
}

// Capsule body with a sphere head and a cone tail
pub fn creature() -> Mesh {
    let body = capsule(0.5, 2.0);

    let mut head = icosphere(2, 0.6);
    head.translate([0.0, 0.0, 1.5]);

    let mut tail = cone(0.3, 1.5);
    tail.translate([0.0, 0.0, -1.5]);

    Mesh::concat(vec![body, head, tail])
}

pub fn shape_mesh(kind: ShapeKind) -> Mesh {
    match kind {
        ShapeKind::Robot => robot(),
        ShapeKind::Car => car(),
        ShapeKind::Pendant => pendant(),
        ShapeKind::Creature => creature(),
        ShapeKind::Cube => cuboid([2.0, 2.0, 2.0]),
        ShapeKind::Sphere => icosphere(3, 1.0),
        ShapeKind::Cylinder => cylinder(0.5, 2.0),
        ShapeKind::Cone => cone(1.0, 2.0),
        ShapeKind::Torus => torus(1.0, 0.3),
        ShapeKind::Default => icosphere(2, 1.0),
    }
}

// The guaranteed-valid shape substituted when a completion is rejected:
// a two-box car silhouette
pub fn fallback_shape() -> Mesh {
    let base = cuboid([4.0, 2.0, 1.0]);
    let mut top = cuboid([2.0, 1.8, 1.0]);
    top.translate([0.0, 0.0, 1.0]);
    let mut out = base;
    out.append(top);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::classify::ShapeKind;

    fn assert_valid(mesh: &Mesh) {
        assert!(!mesh.is_empty());
        let n = mesh.vertices.len() as u32;
        for f in &mesh.faces {
            assert!(f[0] < n && f[1] < n && f[2] < n, "face {f:?} out of range");
            assert!(f[0] != f[1] && f[1] != f[2] && f[0] != f[2]);
        }
    }

    #[test]
    fn every_shape_kind_builds_a_valid_mesh() {
        for kind in [
            ShapeKind::Robot,
            ShapeKind::Car,
            ShapeKind::Pendant,
            ShapeKind::Creature,
            ShapeKind::Cube,
            ShapeKind::Sphere,
            ShapeKind::Cylinder,
            ShapeKind::Cone,
            ShapeKind::Torus,
            ShapeKind::Default,
        ] {
            assert_valid(&shape_mesh(kind));
        }
    }

    #[test]
    fn cuboid_has_eight_vertices_twelve_faces() {
        let mesh = cuboid([2.0, 2.0, 2.0]);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.faces.len(), 12);
        let extents = mesh.extents();
        assert_eq!(extents, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn icosphere_subdivision_quadruples_faces() {
        assert_eq!(icosphere(0, 1.0).faces.len(), 20);
        assert_eq!(icosphere(1, 1.0).faces.len(), 80);
        assert_eq!(icosphere(2, 1.0).faces.len(), 320);
    }

    #[test]
    fn icosphere_vertices_lie_on_the_sphere() {
        let mesh = icosphere(2, 1.5);
        for v in &mesh.vertices {
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((len - 1.5).abs() < 1e-4);
        }
    }

    #[test]
    fn primitives_are_deterministic() {
        assert_eq!(robot(), robot());
        assert_eq!(car(), car());
        assert_eq!(pendant(), pendant());
        assert_eq!(creature(), creature());
    }

    #[test]
    fn fallback_is_always_acceptable() {
        let mesh = fallback_shape();
        assert!(mesh.faces.len() >= 6);
        assert!(!mesh.vertices.is_empty());
        assert_valid(&mesh);
    }

    #[test]
    fn torus_extents_match_radii() {
        let mesh = torus(1.0, 0.3);
        let extents = mesh.extents();
        assert!((extents[0] - 2.6).abs() < 1e-3);
        assert!((extents[2] - 0.6).abs() < 1e-3);
    }
}
