use uuid::Uuid;

/// Notifications a mask canvas pushes to whoever hosts it
#[derive(Debug, Clone, PartialEq)]
pub enum MaskEvent {
    /// A source image was loaded and sized for display
    ImageLoaded {
        image_id: Uuid,
        width: u32,
        height: u32,
        display_width: u32,
        display_height: u32,
    },
    /// Sent when a gesture ends and when the canvas is cleared
    SelectionChanged { is_empty: bool },
    BrushSizeChanged { size: u32 },
    /// The source image was released
    ImageUnloaded { image_id: Uuid },
}
