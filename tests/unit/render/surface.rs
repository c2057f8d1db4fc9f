use super::*;

#[test]
fn backing_store_scales_by_device_pixel_ratio() {
    let g = SurfaceGeometry::new(Size::new(800.0, 600.0), 2.0).unwrap();
    assert_eq!(g.backing_size(), (1600, 1200));
    assert_eq!(g.css_size(), Size::new(800.0, 600.0));
    assert_eq!(g.device_pixel_ratio(), 2.0);
}

#[test]
fn fractional_ratio_rounds_backing_pixels() {
    let g = SurfaceGeometry::new(Size::new(101.0, 33.0), 1.5).unwrap();
    assert_eq!(g.backing_size(), (152, 50));
}

#[test]
fn invalid_ratio_falls_back_to_one() {
    for dpr in [0.0, -2.0, f64::NAN, f64::INFINITY] {
        let g = SurfaceGeometry::new(Size::new(10.0, 20.0), dpr).unwrap();
        assert_eq!(g.device_pixel_ratio(), 1.0);
        assert_eq!(g.backing_size(), (10, 20));
    }
}

#[test]
fn empty_or_oversized_layouts_are_rejected() {
    assert!(SurfaceGeometry::new(Size::new(0.0, 10.0), 1.0).is_err());
    assert!(SurfaceGeometry::new(Size::new(10.0, f64::NAN), 1.0).is_err());
    assert!(SurfaceGeometry::new(Size::new(40_000.0, 10.0), 2.0).is_err());
}

#[test]
fn surface_clear_and_snapshot() {
    let g = SurfaceGeometry::new(Size::new(3.0, 2.0), 1.0).unwrap();
    let mut s = CanvasSurface::new(g).unwrap();
    s.clear([1, 2, 3, 255]);
    let snap = s.snapshot();
    assert_eq!((snap.width, snap.height), (3, 2));
    assert!(snap.premultiplied);
    assert_eq!(snap.data.len(), 3 * 2 * 4);
    assert!(snap.data.chunks_exact(4).all(|px| px == [1, 2, 3, 255]));
}
