pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime;
pub mod window_manager;
pub mod workspace;

pub use model::*;
pub use persistence::{
    load_windows_snapshot, persist_windows, reconcile_snapshot, PersistenceError,
    WINDOWS_STATE_KEY,
};
pub use reducer::{reduce_desktop, DesktopAction, RuntimeEffect};
pub use runtime::PortalRuntime;
