use tour_core::{uv_sphere, PANORAMA_HEIGHT_SEGMENTS, PANORAMA_WIDTH_SEGMENTS};

#[test]
fn sphere_counts() {
    let (ws, hs) = (PANORAMA_WIDTH_SEGMENTS, PANORAMA_HEIGHT_SEGMENTS);
    let (verts, idx) = uv_sphere(ws, hs);
    assert_eq!(verts.len() as u32, (ws + 1) * (hs + 1));
    assert_eq!(idx.len() as u32, ws * (2 * hs - 2) * 3);
    assert!(idx.iter().all(|i| (*i as usize) < verts.len()));
}

#[test]
fn vertices_lie_on_unit_sphere() {
    let (verts, _) = uv_sphere(12, 8);
    for v in &verts {
        let [x, y, z] = v.pos;
        assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-5);
        assert!((0.0..=1.0).contains(&v.uv[0]));
        assert!((0.0..=1.0).contains(&v.uv[1]));
    }
    // north pole first, south pole last
    assert!((verts[0].pos[1] - 1.0).abs() < 1e-6);
    assert!((verts[verts.len() - 1].pos[1] + 1.0).abs() < 1e-6);
}

#[test]
fn degenerate_segment_counts_are_raised() {
    let (verts, idx) = uv_sphere(0, 0);
    assert_eq!(verts.len(), 4 * 3);
    assert_eq!(idx.len(), 3 * 2 * 3);
}

#[test]
fn vertex_is_tightly_packed() {
    assert_eq!(std::mem::size_of::<tour_core::Vertex>(), 20);
}
