//! Property tests for undo history and resize clamping.

use proptest::prelude::*;
use report_core::interaction::resize_geometry;
use report_core::{
    BuilderConfig, ComponentType, Geometry, History, ReportBuilder, ResizeHandle, SizeLimits,
};

const LIMITS: SizeLimits = SizeLimits {
    min_width: 200.0,
    min_height: 150.0,
};

#[derive(Debug, Clone)]
enum Step {
    Save,
    Undo,
    Redo,
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => Just(Step::Save),
        1 => Just(Step::Undo),
        1 => Just(Step::Redo),
    ]
}

fn arb_handle() -> impl Strategy<Value = ResizeHandle> {
    prop::sample::select(ResizeHandle::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_saves_bound_length_and_cursor(n in 1usize..200) {
        let mut history = History::new(50);
        for i in 0..n {
            history.save_state(i);
        }
        prop_assert!(history.len() <= 50);
        prop_assert_eq!(history.index(), Some(n.min(50) - 1));
        prop_assert_eq!(history.current().map(|e| e.snapshot), Some(n - 1));
    }

    #[test]
    fn prop_cursor_stays_in_bounds(steps in prop::collection::vec(arb_step(), 1..120)) {
        let mut history = History::new(10);
        history.save_state(0usize);
        let mut next = 1usize;
        for step in steps {
            match step {
                Step::Save => {
                    history.save_state(next);
                    next += 1;
                    prop_assert!(!history.can_redo(), "save must discard the redo tail");
                }
                Step::Undo => {
                    history.undo();
                }
                Step::Redo => {
                    history.redo();
                }
            }
            let index = history.index().expect("never empty after first save");
            prop_assert!(index < history.len());
            prop_assert!(history.len() <= 10);
        }
    }

    #[test]
    fn prop_undo_then_redo_restores_snapshot(saves in 2usize..30) {
        let mut history = History::new(50);
        for i in 0..saves {
            history.save_state(i);
        }
        let before = history.current().map(|e| e.snapshot);
        prop_assert!(history.undo().is_some());
        prop_assert_eq!(history.redo().copied(), before);
    }

    #[test]
    fn prop_resize_respects_minimums_and_anchors(
        handle in arb_handle(),
        left in -500.0f32..500.0,
        top in -500.0f32..500.0,
        width in 200.0f32..800.0,
        height in 150.0f32..600.0,
        dx in -1000.0f32..1000.0,
        dy in -1000.0f32..1000.0,
    ) {
        let origin = Geometry { left, top, width, height };
        let next = resize_geometry(origin, handle, dx, dy, LIMITS);
        prop_assert!(next.width >= 200.0);
        prop_assert!(next.height >= 150.0);

        let (right, bottom) = (left + width, top + height);
        let tolerance = 1e-2;
        match handle {
            ResizeHandle::Nw => {
                prop_assert!((next.left + next.width - right).abs() < tolerance);
                prop_assert!((next.top + next.height - bottom).abs() < tolerance);
            }
            ResizeHandle::Ne => {
                prop_assert!((next.left - left).abs() < tolerance);
                prop_assert!((next.top + next.height - bottom).abs() < tolerance);
            }
            ResizeHandle::Sw => {
                prop_assert!((next.left + next.width - right).abs() < tolerance);
                prop_assert!((next.top - top).abs() < tolerance);
            }
            ResizeHandle::Se => {
                prop_assert!((next.left - left).abs() < tolerance);
                prop_assert!((next.top - top).abs() < tolerance);
            }
        }
    }

    #[test]
    fn prop_dropped_ids_exceed_existing(drops in 1usize..20, undos in 0usize..5) {
        let mut builder = ReportBuilder::new(BuilderConfig::default());
        for i in 0..drops {
            #[allow(clippy::cast_precision_loss)]
            let x = i as f32 * 10.0;
            builder.drop_component(ComponentType::Metric, "Revenue", x, 0.0).expect("drop");
        }
        for _ in 0..undos {
            builder.undo();
        }
        let max_before = builder.canvas().max_id();
        let count_before = builder.canvas().element_count();
        let id = builder.drop_component(ComponentType::Chart, "Table", 0.0, 0.0).expect("drop");
        prop_assert_eq!(builder.canvas().element_count(), count_before + 1);
        if let Some(max) = max_before {
            prop_assert!(id > max);
        }
    }
}

#[test]
fn test_save_after_undo_truncates() {
    let mut history = History::new(50);
    for i in 0..5 {
        history.save_state(i);
    }
    history.undo();
    history.undo();
    history.save_state(99);
    assert_eq!(history.len(), 4);
    assert_eq!(history.index(), Some(3));
    assert!(!history.can_redo());
}
