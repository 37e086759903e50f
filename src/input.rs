//! Pointer input, coalesced to one pending value per frame.

/// Pointer position relative to the viewport centre, each axis in
/// `[-0.5, 0.5]` while the pointer is inside the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerOffset {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
    pub started_at_ms: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64, started_at_ms: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: clamp_pixel_ratio(device_pixel_ratio),
            started_at_ms,
        }
    }

    /// Output surface size in device pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).max(0.0) as u32,
            (self.height * self.pixel_ratio).max(0.0) as u32,
        )
    }
}

/// High-density screens render at 2x, everything else at 1x.
pub fn clamp_pixel_ratio(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio >= 2.0 {
        2.0
    } else {
        1.0
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct InputBridge {
    offset: PointerOffset,
    pending: bool,
}

impl InputBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw pointer position. Later events overwrite earlier ones
    /// until the next `take_pending`.
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64, viewport: &Viewport) {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return;
        }
        self.offset = PointerOffset {
            x: client_x / viewport.width - 0.5,
            y: client_y / viewport.height - 0.5,
        };
        self.pending = true;
    }

    pub fn offset(&self) -> PointerOffset {
        self.offset
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }

    pub fn take_pending(&mut self) -> Option<PointerOffset> {
        if std::mem::take(&mut self.pending) {
            Some(self.offset)
        } else {
            None
        }
    }
}
