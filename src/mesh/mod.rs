pub mod classify;
pub mod glb;
pub mod primitives;
pub mod repair;

pub type Rgba = [u8; 4];

pub const DEFAULT_COLOR: Rgba = [100, 150, 255, 255];

/// Triangle mesh with a uniform vertex color.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
    pub color: Rgba,
}

impl Mesh {
    pub fn new(vertices: Vec<[f32; 3]>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            faces,
            color: DEFAULT_COLOR,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    pub fn translate(&mut self, offset: [f32; 3]) {
        for v in &mut self.vertices {
            v[0] += offset[0];
            v[1] += offset[1];
            v[2] += offset[2];
        }
    }

    pub fn rotate_x(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        for v in &mut self.vertices {
            let (y, z) = (v[1], v[2]);
            v[1] = y * cos - z * sin;
            v[2] = y * sin + z * cos;
        }
    }

    pub fn rotate_y(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        for v in &mut self.vertices {
            let (x, z) = (v[0], v[2]);
            v[0] = x * cos + z * sin;
            v[2] = -x * sin + z * cos;
        }
    }

    pub fn scale(&mut self, factors: [f32; 3]) {
        for v in &mut self.vertices {
            v[0] *= factors[0];
            v[1] *= factors[1];
            v[2] *= factors[2];
        }
    }

    pub fn scale_uniform(&mut self, factor: f32) {
        self.scale([factor, factor, factor]);
    }

    // Append another mesh, shifting its face indices past our vertices.
    // Coincident vertices are not welded.
    pub fn append(&mut self, other: Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.faces
            .extend(other.faces.into_iter().map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]));
    }

    pub fn concat(parts: Vec<Mesh>) -> Mesh {
        let mut out = Mesh::new(Vec::new(), Vec::new());
        for part in parts {
            out.append(part);
        }
        out
    }

    // Mean of all vertex positions
    pub fn centroid(&self) -> [f32; 3] {
        if self.vertices.is_empty() {
            return [0.0; 3];
        }
        let mut sum = [0.0f32; 3];
        for v in &self.vertices {
            sum[0] += v[0];
            sum[1] += v[1];
            sum[2] += v[2];
        }
        let inv = 1.0 / self.vertices.len() as f32;
        [sum[0] * inv, sum[1] * inv, sum[2] * inv]
    }

    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for v in &self.vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        (min, max)
    }

    pub fn extents(&self) -> [f32; 3] {
        if self.vertices.is_empty() {
            return [0.0; 3];
        }
        let (min, max) = self.bounds();
        [max[0] - min[0], max[1] - min[1], max[2] - min[2]]
    }

    // Recenter at the centroid and rescale so the largest extent equals
    // `target`. The divisor is clamped to 1 so a degenerate extent cannot
    // blow the mesh up.
    pub fn normalize(&mut self, target: f32) {
        let centroid = self.centroid();
        self.translate([-centroid[0], -centroid[1], -centroid[2]]);
        let extents = self.extents();
        let largest = extents[0].max(extents[1]).max(extents[2]);
        self.scale_uniform(target / largest.max(1.0));
    }

    pub fn remove_degenerate_faces(&mut self) {
        let vertices = &self.vertices;
        self.faces.retain(|f| {
            if f[0] == f[1] || f[1] == f[2] || f[0] == f[2] {
                return false;
            }
            triangle_area(
                vertices[f[0] as usize],
                vertices[f[1] as usize],
                vertices[f[2] as usize],
            ) > 1e-10
        });
    }

    // Drop vertices no surviving face references and remap the indices
    pub fn prune_unreferenced(&mut self) {
        let mut remap = vec![u32::MAX; self.vertices.len()];
        let mut kept = Vec::new();
        for f in &self.faces {
            for &i in f {
                if remap[i as usize] == u32::MAX {
                    remap[i as usize] = kept.len() as u32;
                    kept.push(self.vertices[i as usize]);
                }
            }
        }
        for f in &mut self.faces {
            for i in f.iter_mut() {
                *i = remap[*i as usize];
            }
        }
        self.vertices = kept;
    }
}

fn triangle_area(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> f32 {
    let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let cross = [
        ab[1] * ac[2] - ab[2] * ac[1],
        ab[2] * ac[0] - ab[0] * ac[2],
        ab[0] * ac[1] - ab[1] * ac[0],
    ];
    0.5 * (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt()
}
