use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema version stamped into persisted window snapshots.
pub const WINDOWS_SNAPSHOT_SCHEMA_VERSION: u32 = 1;
/// Stacking floor assigned to seeded windows and used to reseed the z-counter.
pub const Z_INDEX_FLOOR: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowKind {
    LiveStream,
    TrendBoard,
    Headlines,
    Suggestion,
    Chat,
    Sponsor,
    WebPage,
    Notepad,
    Paint,
}

impl WindowKind {
    /// Dynamic kinds are created at runtime and destroyed on close; singleton
    /// kinds are seeded once and only ever hidden.
    pub const fn is_dynamic(self) -> bool {
        matches!(self, Self::WebPage | Self::Notepad | Self::Paint)
    }

    pub const fn is_singleton(self) -> bool {
        !self.is_dynamic()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LiveStream => "live-stream",
            Self::TrendBoard => "trend-board",
            Self::Headlines => "headlines",
            Self::Suggestion => "suggestion",
            Self::Chat => "chat",
            Self::Sponsor => "sponsor",
            Self::WebPage => "web-page",
            Self::Notepad => "notepad",
            Self::Paint => "paint",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::LiveStream => "📺",
            Self::TrendBoard => "🔥",
            Self::Headlines => "📰",
            Self::Suggestion => "💡",
            Self::Chat => "🐱",
            Self::Sponsor => "💰",
            Self::WebPage => "🌐",
            Self::Notepad => "📝",
            Self::Paint => "🎨",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppKind {
    Notepad,
    Paint,
}

impl AppKind {
    pub const fn kind(self) -> WindowKind {
        match self {
            Self::Notepad => WindowKind::Notepad,
            Self::Paint => WindowKind::Paint,
        }
    }

    pub const fn default_title(self) -> &'static str {
        match self {
            Self::Notepad => "Untitled - Notepad",
            Self::Paint => "untitled - Paint",
        }
    }

    pub const fn spawn_extent(self) -> (Extent, Extent) {
        match self {
            Self::Notepad => (Extent::Px(400), Extent::Px(300)),
            Self::Paint => (Extent::Px(600), Extent::Px(450)),
        }
    }

    /// Resolves taskbar/launcher shorthand ids ("notepad", "paint") used by
    /// the restore-or-spawn open path.
    pub fn from_shorthand(id: &str) -> Option<Self> {
        match id {
            "notepad" => Some(Self::Notepad),
            "paint" => Some(Self::Paint),
            _ => None,
        }
    }
}

/// Window dimension: fixed pixels, or intrinsic sizing driven by content.
///
/// Serialized as a bare integer or the string `"auto"` to match the
/// persisted window-state format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extent {
    Auto,
    #[serde(untagged)]
    Px(i32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: String,
    pub kind: WindowKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: String,
    pub is_open: bool,
    pub is_minimized: bool,
    pub x: i32,
    pub y: i32,
    pub width: Extent,
    pub height: Extent,
    pub z_index: u64,
    /// Opaque payload owned by the hosted content, round-tripped verbatim.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub content: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: String,
    /// Pointer-to-window-origin offset captured at drag start.
    pub grab_offset: PointerPosition,
}

/// Ephemeral pointer-interaction state. Never persisted; at most one drag
/// session is live at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    /// Managed windows in insertion order; z-order is a derived sort on
    /// `z_index`, applied by the rendering shell.
    pub windows: Vec<WindowRecord>,
    /// Monotonic stacking counter; the most recently focused window holds
    /// this value. Incremented on every focus, never reused.
    pub z_counter: u64,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            windows: default_windows(),
            z_counter: Z_INDEX_FLOOR,
        }
    }
}

impl DesktopState {
    pub fn window(&self, id: &str) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn window_mut(&mut self, id: &str) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    /// Id of the open, non-minimized window currently on top of the stack.
    pub fn top_window_id(&self) -> Option<&str> {
        self.windows
            .iter()
            .filter(|w| w.is_open && !w.is_minimized)
            .max_by_key(|w| w.z_index)
            .map(|w| w.id.as_str())
    }

    pub fn snapshot(&self) -> WindowsSnapshot {
        WindowsSnapshot {
            schema_version: WINDOWS_SNAPSHOT_SCHEMA_VERSION,
            windows: self.windows.clone(),
        }
    }
}

/// Persisted form of the window registry. Every durable field of every
/// record is included; interaction state never is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowsSnapshot {
    pub schema_version: u32,
    pub windows: Vec<WindowRecord>,
}

fn seed_window(
    id: &str,
    kind: WindowKind,
    title: &str,
    is_open: bool,
    x: i32,
    y: i32,
    width: Extent,
    height: Extent,
) -> WindowRecord {
    WindowRecord {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        url: None,
        icon: kind.icon().to_string(),
        is_open,
        is_minimized: false,
        x,
        y,
        width,
        height,
        z_index: Z_INDEX_FLOOR,
        content: Value::Null,
    }
}

/// The hardcoded default window set seeded at boot: the six singleton
/// panels plus two starter scratch windows.
pub fn default_windows() -> Vec<WindowRecord> {
    use Extent::Px;
    let mut starter_notepad = seed_window(
        "notepad-default",
        WindowKind::Notepad,
        "Untitled - Notepad",
        true,
        50,
        50,
        Px(400),
        Px(300),
    );
    starter_notepad.content = Value::String(String::new());

    vec![
        seed_window(
            "live-stream",
            WindowKind::LiveStream,
            "Live Stream",
            true,
            340,
            20,
            Px(720),
            Px(450),
        ),
        seed_window(
            "trend-board",
            WindowKind::TrendBoard,
            "Trending",
            true,
            650,
            500,
            Px(400),
            Px(300),
        ),
        seed_window(
            "headlines",
            WindowKind::Headlines,
            "Today's Headlines",
            true,
            1080,
            450,
            Px(500),
            Px(400),
        ),
        seed_window(
            "suggestion",
            WindowKind::Suggestion,
            "Daily Suggestion",
            false,
            100,
            100,
            Px(500),
            Px(400),
        ),
        seed_window(
            "chat",
            WindowKind::Chat,
            "AI Assistant",
            false,
            150,
            150,
            Px(400),
            Px(500),
        ),
        seed_window(
            "sponsor",
            WindowKind::Sponsor,
            "Sponsor",
            false,
            200,
            200,
            Px(350),
            Extent::Auto,
        ),
        starter_notepad,
        seed_window(
            "paint-default",
            WindowKind::Paint,
            "untitled - Paint",
            true,
            100,
            100,
            Px(600),
            Px(450),
        ),
    ]
}
