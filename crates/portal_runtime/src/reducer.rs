//! Reducer actions, side-effect intents, and transition logic for the
//! portal desktop window manager.

use serde_json::Value;

use crate::{
    model::{
        AppKind, DesktopState, DragSession, Extent, InteractionState, PointerPosition,
        WindowKind, WindowRecord, WindowsSnapshot,
    },
    persistence, window_manager,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Spawn a fresh scratch window (notepad or paint).
    SpawnApp {
        /// Scratch-window kind to spawn.
        kind: AppKind,
        /// Initial content payload handed to the hosted editor.
        content: Value,
        /// Title override; defaults per kind when `None`.
        title: Option<String>,
    },
    /// Open a new embedded-page window hosting `url`.
    OpenWebPage {
        /// Title-bar text for the new window.
        title: String,
        /// Page to embed.
        url: String,
    },
    /// Restore the window with `id`, or spawn a fresh scratch instance when
    /// `id` is a scratch shorthand ("notepad", "paint") with no live record.
    OpenWindow {
        /// Window id or scratch shorthand.
        id: String,
    },
    /// Close a window: scratch/page windows are destroyed, singleton panels
    /// are hidden.
    CloseWindow {
        /// Window to close.
        id: String,
    },
    /// Collapse an open window to its taskbar entry.
    MinimizeWindow {
        /// Window to minimize.
        id: String,
    },
    /// Taskbar-click behavior: restore if minimized, minimize if already on
    /// top, raise otherwise.
    ToggleMinimize {
        /// Window associated with the taskbar entry.
        id: String,
    },
    /// Raise a window to the top of the stack.
    FocusWindow {
        /// Window to focus.
        id: String,
    },
    /// Replace a window's title.
    RenameWindow {
        /// Window to rename.
        id: String,
        /// New title-bar text.
        title: String,
    },
    /// Replace a window's extent.
    ResizeWindow {
        /// Window to resize.
        id: String,
        /// New width.
        width: Extent,
        /// New height.
        height: Extent,
    },
    /// Point an embedded-page window at a new url. Ignored for other kinds.
    NavigatePage {
        /// Embedded-page window to navigate.
        id: String,
        /// New url; not validated.
        url: String,
    },
    /// Replace the opaque content payload owned by a window's hosted editor.
    SetWindowContent {
        /// Window whose content should be replaced.
        id: String,
        /// New content payload.
        content: Value,
    },
    /// Hand an embedded page's url to the shell for opening outside the
    /// portal.
    PopOutPage {
        /// Embedded-page window to pop out.
        id: String,
    },
    /// Begin dragging a window by its title bar.
    BeginDrag {
        /// Window being dragged.
        id: String,
        /// Pointer position at drag start.
        pointer: PointerPosition,
        /// Whether the pointer went down on the window's control buttons;
        /// such presses never start a drag.
        over_controls: bool,
    },
    /// Update the in-progress drag. Positions move in memory only.
    UpdateDrag {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active drag, detach pointer listeners, and persist.
    EndDrag,
    /// Reconcile a persisted snapshot into the seeded default window set.
    HydrateSnapshot {
        /// Snapshot loaded from the durable store.
        snapshot: WindowsSnapshot,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the embedding
/// shell (or the [`crate::runtime::PortalRuntime`] driver) to execute.
pub enum RuntimeEffect {
    /// Persist the full window registry to the durable store.
    PersistWindows,
    /// Attach the process-wide pointer-move/pointer-release listeners.
    ///
    /// Emitted exactly on the Idle→Dragging edge, so a shell that attaches
    /// on this effect and detaches on [`Self::DetachPointerListeners`] can
    /// never leak duplicate listeners.
    AttachPointerListeners,
    /// Detach the process-wide pointer listeners.
    DetachPointerListeners,
    /// Open a url outside the portal (pop-out of an embedded page).
    OpenExternalUrl(String),
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting
/// side effects.
///
/// This function is the authoritative transition engine for window
/// management. It is infallible: actions referencing an absent window
/// degrade to silent no-ops, and every mutating action ends by emitting
/// [`RuntimeEffect::PersistWindows`].
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::SpawnApp {
            kind,
            content,
            title,
        } => {
            let id = window_manager::mint_window_id(state, kind.kind());
            let (x, y) = window_manager::cascade_position(state.windows.len());
            let (width, height) = kind.spawn_extent();
            state.windows.push(WindowRecord {
                id: id.clone(),
                kind: kind.kind(),
                title: title.unwrap_or_else(|| kind.default_title().to_string()),
                url: None,
                icon: kind.kind().icon().to_string(),
                is_open: true,
                is_minimized: false,
                x,
                y,
                width,
                height,
                z_index: 0,
                content,
            });
            window_manager::focus_window(state, &id);
            effects.push(RuntimeEffect::PersistWindows);
        }
        DesktopAction::OpenWebPage { title, url } => {
            let id = window_manager::mint_window_id(state, WindowKind::WebPage);
            let (x, y) = window_manager::cascade_position(state.windows.len());
            state.windows.push(WindowRecord {
                id: id.clone(),
                kind: WindowKind::WebPage,
                title,
                url: Some(url),
                icon: WindowKind::WebPage.icon().to_string(),
                is_open: true,
                is_minimized: false,
                x,
                y,
                width: Extent::Px(800),
                height: Extent::Px(600),
                z_index: 0,
                content: Value::Null,
            });
            window_manager::focus_window(state, &id);
            effects.push(RuntimeEffect::PersistWindows);
        }
        DesktopAction::OpenWindow { id } => {
            if state.window(&id).is_some() {
                if let Some(window) = state.window_mut(&id) {
                    window.is_open = true;
                    window.is_minimized = false;
                }
                window_manager::focus_window(state, &id);
                effects.push(RuntimeEffect::PersistWindows);
            } else if let Some(kind) = AppKind::from_shorthand(&id) {
                return reduce_desktop(
                    state,
                    interaction,
                    DesktopAction::SpawnApp {
                        kind,
                        content: Value::Null,
                        title: None,
                    },
                );
            }
        }
        DesktopAction::CloseWindow { id } => {
            if let Some(index) = state.windows.iter().position(|w| w.id == id) {
                if state.windows[index].kind.is_dynamic() {
                    state.windows.remove(index);
                } else {
                    state.windows[index].is_open = false;
                }
                effects.push(RuntimeEffect::PersistWindows);
            }
        }
        DesktopAction::MinimizeWindow { id } => {
            // Minimizing a closed window is a guarded no-op.
            if let Some(window) = state.window_mut(&id) {
                if window.is_open {
                    window.is_minimized = true;
                    effects.push(RuntimeEffect::PersistWindows);
                }
            }
        }
        DesktopAction::ToggleMinimize { id } => {
            let Some((minimized, open, z_index)) = state
                .window(&id)
                .map(|w| (w.is_minimized, w.is_open, w.z_index))
            else {
                return effects;
            };
            if minimized {
                if let Some(window) = state.window_mut(&id) {
                    window.is_minimized = false;
                }
                window_manager::focus_window(state, &id);
            } else if !open {
                return effects;
            } else if z_index == state.z_counter {
                // Taskbar click on the window already on top minimizes it.
                if let Some(window) = state.window_mut(&id) {
                    window.is_minimized = true;
                }
            } else {
                // A background window is raised instead of hidden.
                window_manager::focus_window(state, &id);
            }
            effects.push(RuntimeEffect::PersistWindows);
        }
        DesktopAction::FocusWindow { id } => {
            if window_manager::focus_window(state, &id) {
                effects.push(RuntimeEffect::PersistWindows);
            }
        }
        DesktopAction::RenameWindow { id, title } => {
            if let Some(window) = state.window_mut(&id) {
                window.title = title;
                effects.push(RuntimeEffect::PersistWindows);
            }
        }
        DesktopAction::ResizeWindow { id, width, height } => {
            if let Some(window) = state.window_mut(&id) {
                window.width = width;
                window.height = height;
                effects.push(RuntimeEffect::PersistWindows);
            }
        }
        DesktopAction::NavigatePage { id, url } => {
            if let Some(window) = state.window_mut(&id) {
                if window.kind == WindowKind::WebPage {
                    window.url = Some(url);
                    effects.push(RuntimeEffect::PersistWindows);
                }
            }
        }
        DesktopAction::SetWindowContent { id, content } => {
            if let Some(window) = state.window_mut(&id) {
                window.content = content;
                effects.push(RuntimeEffect::PersistWindows);
            }
        }
        DesktopAction::PopOutPage { id } => {
            if let Some(window) = state.window(&id) {
                if window.kind == WindowKind::WebPage {
                    if let Some(url) = &window.url {
                        effects.push(RuntimeEffect::OpenExternalUrl(url.clone()));
                    }
                }
            }
        }
        DesktopAction::BeginDrag {
            id,
            pointer,
            over_controls,
        } => {
            // A press on window chrome controls never starts a drag, and a
            // new drag cannot start while one is live.
            if over_controls || interaction.dragging.is_some() {
                return effects;
            }
            let Some((x, y)) = state.window(&id).map(|w| (w.x, w.y)) else {
                return effects;
            };
            window_manager::focus_window(state, &id);
            interaction.dragging = Some(DragSession {
                window_id: id,
                grab_offset: PointerPosition {
                    x: pointer.x - x,
                    y: pointer.y - y,
                },
            });
            effects.push(RuntimeEffect::AttachPointerListeners);
            effects.push(RuntimeEffect::PersistWindows);
        }
        DesktopAction::UpdateDrag { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                if let Some(window) = state.window_mut(&session.window_id) {
                    window.x = pointer.x - session.grab_offset.x;
                    window.y = pointer.y - session.grab_offset.y;
                }
            }
        }
        DesktopAction::EndDrag => {
            if interaction.dragging.take().is_some() {
                effects.push(RuntimeEffect::DetachPointerListeners);
                effects.push(RuntimeEffect::PersistWindows);
            }
        }
        DesktopAction::HydrateSnapshot { snapshot } => {
            persistence::reconcile_snapshot(state, snapshot);
        }
    }
    effects
}
