use super::*;
use crate::{
    assets::decode::FrameImage,
    foundation::core::Size,
    render::renderer::RenderSettings,
    sequence::config::SequenceConfig,
    store::frame_store::LoadOutcome,
};

fn solid(shade: u8) -> FrameImage {
    let data: Vec<u8> = std::iter::repeat_n([shade, shade, shade, 255], 4)
        .flatten()
        .collect();
    FrameImage::from_premul_rgba8(2, 2, &data).unwrap()
}

fn store_with(total: u32, loaded: &[u32]) -> FrameStore {
    let mut store = FrameStore::new(&SequenceConfig::new(total, "frames"));
    for &i in loaded {
        assert!(store.settle(FrameIndex(i), LoadOutcome::Loaded(solid(i as u8))));
    }
    store
}

fn renderer() -> CanvasRenderer {
    let mut r = CanvasRenderer::new(RenderSettings::default());
    assert!(r.configure_surface(Size::new(4.0, 4.0), 1.0));
    r
}

#[test]
fn uninitialized_controller_ignores_progress() {
    let store = store_with(10, &[0, 1, 2]);
    let mut r = renderer();
    let mut c = ScrollFrameController::new(10);
    assert_eq!(c.on_progress(0.2, &store, &mut r), FrameUpdate::Ignored);
    assert_eq!(r.state().last_drawn, None);

    assert!(c.activate());
    assert!(!c.activate());
    assert_eq!(c.state(), ControllerState::Active);
}

#[test]
fn draws_only_when_index_changes() {
    let store = store_with(10, &(0..10).collect::<Vec<_>>());
    let mut r = renderer();
    let mut c = ScrollFrameController::new(10);
    c.activate();

    assert_eq!(
        c.on_progress(0.31, &store, &mut r),
        FrameUpdate::Drawn {
            requested: FrameIndex(3),
            shown: FrameIndex(3)
        }
    );
    // Sub-band jitter maps to the same index.
    assert_eq!(c.on_progress(0.35, &store, &mut r), FrameUpdate::Unchanged);
    assert_eq!(c.on_progress(0.399, &store, &mut r), FrameUpdate::Unchanged);
    assert!(matches!(
        c.on_progress(0.4, &store, &mut r),
        FrameUpdate::Drawn { requested: FrameIndex(4), .. }
    ));
    assert_eq!(c.last_rendered(), Some(FrameIndex(4)));
}

#[test]
fn clamps_progress_to_valid_indices() {
    let store = store_with(10, &[0, 9]);
    let mut r = renderer();
    let mut c = ScrollFrameController::new(10);
    c.activate();

    assert!(matches!(
        c.on_progress(-4.0, &store, &mut r),
        FrameUpdate::Drawn { requested: FrameIndex(0), .. }
    ));
    assert!(matches!(
        c.on_progress(7.0, &store, &mut r),
        FrameUpdate::Drawn { requested: FrameIndex(9), .. }
    ));
    assert_eq!(c.on_progress(1.0, &store, &mut r), FrameUpdate::Unchanged);
}

#[test]
fn falls_back_to_earlier_frame_then_upgrades() {
    let mut store = store_with(10, &[0, 2]);
    let mut r = renderer();
    let mut c = ScrollFrameController::new(10);
    c.activate();

    assert_eq!(
        c.on_progress(0.55, &store, &mut r),
        FrameUpdate::Drawn {
            requested: FrameIndex(5),
            shown: FrameIndex(2)
        }
    );
    assert_eq!(r.state().last_drawn, Some(FrameIndex(2)));
    assert_eq!(c.on_progress(0.56, &store, &mut r), FrameUpdate::Unchanged);

    store.settle(FrameIndex(5), LoadOutcome::Loaded(solid(5)));
    assert_eq!(
        c.on_progress(0.56, &store, &mut r),
        FrameUpdate::Drawn {
            requested: FrameIndex(5),
            shown: FrameIndex(5)
        }
    );
    assert_eq!(c.last_shown(), Some(FrameIndex(5)));
}

#[test]
fn never_substitutes_a_later_frame() {
    let store = store_with(10, &[7]);
    let mut r = renderer();
    let mut c = ScrollFrameController::new(10);
    c.activate();

    assert_eq!(
        c.on_progress(0.3, &store, &mut r),
        FrameUpdate::Skipped {
            requested: FrameIndex(3)
        }
    );
    assert_eq!(r.state().last_drawn, None);
    assert_eq!(c.last_rendered(), None);
}

#[test]
fn missing_surface_skips_without_recording() {
    let store = store_with(4, &[0]);
    let mut r = CanvasRenderer::new(RenderSettings::default());
    let mut c = ScrollFrameController::new(4);
    c.activate();

    assert!(matches!(
        c.on_progress(0.0, &store, &mut r),
        FrameUpdate::Skipped { .. }
    ));
    assert!(r.configure_surface(Size::new(2.0, 2.0), 1.0));
    assert!(matches!(
        c.on_progress(0.0, &store, &mut r),
        FrameUpdate::Drawn { .. }
    ));

    c.invalidate();
    assert!(matches!(
        c.on_progress(0.0, &store, &mut r),
        FrameUpdate::Drawn { .. }
    ));
}
