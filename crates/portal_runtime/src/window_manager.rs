//! Stacking, placement, and identity helpers shared by the desktop reducer.

use rand::distr::{Alphanumeric, SampleString};

use crate::model::{DesktopState, WindowKind};

/// Base coordinate for cascade placement of spawned windows.
pub const CASCADE_BASE: i32 = 50;
/// Per-window cascade offset step.
pub const CASCADE_STEP: i32 = 20;
/// Cascade offsets wrap after this many pixels.
pub const CASCADE_RANGE: i32 = 200;

const ID_SUFFIX_LEN: usize = 5;

/// Raises `id` to the top of the stack by assigning it the next counter
/// value. Returns `false` when no such window exists.
///
/// Every call increments the counter, including repeated focus of the
/// window already on top; the counter is never decremented or reused.
pub fn focus_window(state: &mut DesktopState, id: &str) -> bool {
    let Some(window) = state.windows.iter_mut().find(|w| w.id == id) else {
        return false;
    };
    state.z_counter += 1;
    window.z_index = state.z_counter;
    true
}

/// Top-left position for the `count`-th spawned window. Successive spawns
/// offset diagonally so new windows do not stack exactly.
pub fn cascade_position(count: usize) -> (i32, i32) {
    let offset = (count as i32 * CASCADE_STEP) % CASCADE_RANGE;
    (CASCADE_BASE + offset, CASCADE_BASE + offset)
}

/// Mints a fresh window id of the form `{kind}-{unix_ms}-{suffix}`.
///
/// Collisions are practically impossible; the registry check keeps the
/// uniqueness invariant structural rather than probabilistic.
pub fn mint_window_id(state: &DesktopState, kind: WindowKind) -> String {
    loop {
        let suffix = Alphanumeric
            .sample_string(&mut rand::rng(), ID_SUFFIX_LEN)
            .to_lowercase();
        let id = format!(
            "{}-{}-{}",
            kind.as_str(),
            portal_host::next_monotonic_timestamp_ms(),
            suffix
        );
        if state.window(&id).is_none() {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_offsets_wrap_within_range() {
        assert_eq!(cascade_position(0), (CASCADE_BASE, CASCADE_BASE));
        assert_eq!(cascade_position(3), (CASCADE_BASE + 60, CASCADE_BASE + 60));
        // 10 * 20 = 200 wraps back to the base.
        assert_eq!(cascade_position(10), (CASCADE_BASE, CASCADE_BASE));
        assert_eq!(cascade_position(13), (CASCADE_BASE + 60, CASCADE_BASE + 60));
    }

    #[test]
    fn minted_ids_are_prefixed_and_unique() {
        let state = DesktopState::default();
        let first = mint_window_id(&state, WindowKind::Notepad);
        let second = mint_window_id(&state, WindowKind::Notepad);
        assert!(first.starts_with("notepad-"));
        assert!(second.starts_with("notepad-"));
        assert_ne!(first, second);
    }

    #[test]
    fn focus_increments_counter_and_assigns_it() {
        let mut state = DesktopState::default();
        let before = state.z_counter;

        assert!(focus_window(&mut state, "chat"));
        assert_eq!(state.z_counter, before + 1);
        assert_eq!(state.window("chat").unwrap().z_index, before + 1);

        // Refocusing the same window still burns a counter value.
        assert!(focus_window(&mut state, "chat"));
        assert_eq!(state.window("chat").unwrap().z_index, before + 2);

        assert!(!focus_window(&mut state, "missing"));
        assert_eq!(state.z_counter, before + 2);
    }
}
