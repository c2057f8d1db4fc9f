use super::*;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> FrameImage {
    let data: Vec<u8> = std::iter::repeat_n(rgba, (width * height) as usize)
        .flatten()
        .collect();
    FrameImage::from_premul_rgba8(width, height, &data).unwrap()
}

fn all_pixels(frame: &FrameRGBA, rgba: [u8; 4]) -> bool {
    frame.data.chunks_exact(4).all(|px| px == rgba)
}

// Sampling may round by a unit; coverage gaps would show up as the clear color.
fn all_pixels_near(frame: &FrameRGBA, rgba: [u8; 4]) -> bool {
    frame.data.chunks_exact(4).all(|px| {
        px.iter()
            .zip(rgba)
            .all(|(&a, b)| (i16::from(a) - i16::from(b)).abs() <= 2)
    })
}

#[test]
fn draw_before_configure_is_a_no_op() {
    let mut r = CanvasRenderer::new(RenderSettings::default());
    assert!(!r.draw_frame(FrameIndex(0), &solid(2, 2, [255, 0, 0, 255])));
    assert!(r.snapshot().is_none());
    assert_eq!(r.state(), RenderState::default());
}

#[test]
fn configure_uses_device_pixels_and_clears() {
    let mut r = CanvasRenderer::new(RenderSettings {
        clear_rgba: [10, 20, 30, 255],
    });
    assert!(r.configure_surface(Size::new(8.0, 4.0), 2.0));
    let snap = r.snapshot().unwrap();
    assert_eq!((snap.width, snap.height), (16, 8));
    assert!(all_pixels(&snap, [10, 20, 30, 255]));
    assert_eq!(r.state().backing_size, Some((16, 8)));
    assert_eq!(r.geometry().unwrap().css_size(), Size::new(8.0, 4.0));
}

#[test]
fn cover_draw_fills_the_whole_surface() {
    let mut r = CanvasRenderer::new(RenderSettings::default());
    assert!(r.configure_surface(Size::new(8.0, 6.0), 1.0));

    // Wider than the canvas, then taller: both must leave no background visible.
    for image in [solid(16, 9, [200, 0, 0, 255]), solid(9, 16, [200, 0, 0, 255])] {
        assert!(r.draw_frame(FrameIndex(3), &image));
        assert!(all_pixels_near(&r.snapshot().unwrap(), [200, 0, 0, 255]));
    }
    assert_eq!(r.state().last_drawn, Some(FrameIndex(3)));
}

#[test]
fn drawing_is_idempotent() {
    let mut data = Vec::new();
    for y in 0..6u32 {
        for x in 0..10u32 {
            data.extend_from_slice(&[(x * 25) as u8, (y * 40) as u8, 128, 255]);
        }
    }
    let image = FrameImage::from_premul_rgba8(10, 6, &data).unwrap();

    let mut r = CanvasRenderer::new(RenderSettings::default());
    assert!(r.configure_surface(Size::new(7.0, 5.0), 2.0));
    r.draw_frame(FrameIndex(0), &image);
    let first = r.snapshot().unwrap();
    r.draw_frame(FrameIndex(0), &image);
    let second = r.snapshot().unwrap();
    assert_eq!(first, second);
}

#[test]
fn resize_redraws_last_frame_at_new_size() {
    let mut r = CanvasRenderer::new(RenderSettings::default());
    assert!(r.configure_surface(Size::new(4.0, 4.0), 1.0));
    let image = solid(3, 2, [0, 90, 0, 255]);
    r.draw_frame(FrameIndex(7), &image);

    assert!(r.resize(Size::new(6.0, 3.0), 2.0));
    let snap = r.snapshot().unwrap();
    assert_eq!((snap.width, snap.height), (12, 6));
    assert!(all_pixels_near(&snap, [0, 90, 0, 255]));
    assert_eq!(r.state().last_drawn, Some(FrameIndex(7)));
}

#[test]
fn unavailable_surface_degrades_to_no_draws() {
    let mut r = CanvasRenderer::new(RenderSettings::default());
    assert!(!r.configure_surface(Size::new(0.0, 100.0), 1.0));
    assert!(!r.is_configured());
    assert!(!r.draw_frame(FrameIndex(0), &solid(1, 1, [1, 1, 1, 255])));
    assert!(!r.resize(Size::new(70_000.0, 10.0), 1.0));
    assert!(r.snapshot().is_none());
}
