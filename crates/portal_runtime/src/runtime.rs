//! Headless runtime driver owning desktop state, interaction state, and the
//! durable store.
//!
//! The embedding shell renders from [`PortalRuntime::state`] and forwards
//! user input as [`DesktopAction`] values. The driver applies each action,
//! executes the write-through persistence effect inline, and hands the
//! remaining shell-facing effects (pointer listeners, external urls) back to
//! the caller.

use portal_host::LocalStore;

use crate::{
    model::{DesktopState, InteractionState},
    persistence,
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
};

/// Window-manager driver bound to a durable store.
pub struct PortalRuntime<S> {
    state: DesktopState,
    interaction: InteractionState,
    store: S,
}

impl<S: LocalStore> PortalRuntime<S> {
    /// Boots a runtime over `store`: seeds the default window set, then
    /// reconciles any persisted snapshot into it. Absent or corrupt stored
    /// state leaves the defaults untouched.
    pub async fn boot(store: S) -> Self {
        let mut runtime = Self {
            state: DesktopState::default(),
            interaction: InteractionState::default(),
            store,
        };
        if let Some(snapshot) = persistence::load_windows_snapshot(&runtime.store).await {
            reduce_desktop(
                &mut runtime.state,
                &mut runtime.interaction,
                DesktopAction::HydrateSnapshot { snapshot },
            );
        }
        runtime
    }

    /// Read access to the desktop state for rendering.
    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    /// Read access to the ephemeral pointer-interaction state.
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Applies `action` and executes its persistence effect.
    ///
    /// Persistence failures are logged and swallowed; the in-memory state
    /// stays authoritative. All emitted effects are returned, including the
    /// ones already executed here.
    pub async fn dispatch(&mut self, action: DesktopAction) -> Vec<RuntimeEffect> {
        let effects = reduce_desktop(&mut self.state, &mut self.interaction, action);
        for effect in &effects {
            if matches!(effect, RuntimeEffect::PersistWindows) {
                if let Err(err) = persistence::persist_windows(&self.store, &self.state).await {
                    log::warn!("window state write-through failed: {err}");
                }
            }
        }
        effects
    }
}
