//! Pointer -> canvas pixel mapping.
//!
//! The canvas is usually displayed at a CSS size different from its intrinsic
//! bitmap size, so pointer offsets must be scaled per axis before sampling.

/// On-screen (CSS) bounding rectangle of the canvas, in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Intrinsic bitmap size of the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

fn axis_scale(intrinsic: u32, display: f64) -> f64 {
    if display > 0.0 && display.is_finite() {
        intrinsic as f64 / display
    } else {
        0.0
    }
}

/// Map client coordinates into the canvas's intrinsic pixel space.
/// The result is not clamped: clicks outside the rectangle map outside the canvas.
pub fn map_to_canvas_pixel(client: (f64, f64), rect: CanvasRect, size: CanvasSize) -> (f64, f64) {
    let sx = axis_scale(size.width, rect.width);
    let sy = axis_scale(size.height, rect.height);
    ((client.0 - rect.left) * sx, (client.1 - rect.top) * sy)
}
