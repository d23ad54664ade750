use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Surface,
    Border,

    GridLine,

    // Device frames
    BoxFrame,
    BoxFrameSelected,
    BoxTitleBar,
    BoxTitleText,
    BoxViewport,
    BoxViewportText,

    TextPrimary,
    TextSecondary,
    TextMuted,

    // Navigation bar
    ToolbarBackground,
    ToolbarText,
}
