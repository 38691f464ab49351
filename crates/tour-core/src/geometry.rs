use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

/// Unit UV sphere laid out for equirectangular textures.
///
/// `u` follows longitude and `v` runs from the north pole (0) to the south
/// pole (1). The renderer scales it per mesh and draws it without culling,
/// so the same geometry serves as panorama sphere and marker.
pub fn uv_sphere(width_segments: u32, height_segments: u32) -> (Vec<Vertex>, Vec<u32>) {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let theta = v * PI;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let phi = u * TAU;
            vertices.push(Vertex {
                pos: [
                    -phi.cos() * theta.sin(),
                    theta.cos(),
                    phi.sin() * theta.sin(),
                ],
                uv: [u, v],
            });
        }
    }

    let row = ws + 1;
    let mut indices = Vec::with_capacity((ws * hs * 6) as usize);
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // the pole rows collapse to points; skip their degenerate halves
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    (vertices, indices)
}
