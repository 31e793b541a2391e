//! Property-based tests for window-relative layout.
//!
//! Layout is recomputed on every resize, so it must be a pure function of
//! the window size and must never place a widget outside the window.

use carebook::tui::layout::{form_layout, menu_layout, overlay_layout, WindowSize};
use proptest::prelude::*;
use ratatui::layout::Rect;

fn inside(rect: Rect, window: WindowSize) -> bool {
    u32::from(rect.x) + u32::from(rect.width) <= u32::from(window.width)
        && u32::from(rect.y) + u32::from(rect.height) <= u32::from(window.height)
}

fn window() -> impl Strategy<Value = WindowSize> {
    (0u16..400, 0u16..200).prop_map(|(w, h)| WindowSize::new(w, h))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn form_layout_is_idempotent(first in window(), second in window(), fields in 0usize..8) {
        let original = form_layout(first, fields, 6);
        let _ = form_layout(second, fields, 6);
        prop_assert_eq!(form_layout(first, fields, 6), original);
    }

    #[test]
    fn form_layout_stays_inside(size in window(), fields in 0usize..8, buttons in 0usize..8) {
        let layout = form_layout(size, fields, buttons);
        prop_assert_eq!(layout.fields.len(), fields);
        prop_assert_eq!(layout.buttons.len(), buttons);
        for rect in layout.fields.iter().chain(&layout.buttons) {
            prop_assert!(inside(*rect, size), "{:?} outside {}", rect, size);
        }
        prop_assert!(inside(layout.table, size));
        prop_assert!(inside(layout.dialog, size));
    }

    #[test]
    fn menu_layout_is_idempotent(first in window(), second in window(), buttons in 0usize..10) {
        let original = menu_layout(first, buttons);
        let _ = menu_layout(second, buttons);
        let again = menu_layout(first, buttons);
        prop_assert_eq!(&again, &original);
        for rect in &again.buttons {
            prop_assert!(inside(*rect, first));
        }
    }

    #[test]
    fn overlay_layout_stays_inside(size in window()) {
        let layout = overlay_layout(size);
        prop_assert_eq!(overlay_layout(size), layout);
        for rect in [layout.session, layout.style, layout.logout, layout.status] {
            prop_assert!(inside(rect, size));
        }
    }
}
