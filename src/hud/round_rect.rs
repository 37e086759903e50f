use serde::{Deserialize, Serialize};

use super::Painter;

pub const DEFAULT_CORNER_RADIUS: f64 = 5.0;

/// Corner radius as accepted at the call boundary: one value for all
/// corners, or an object where missing corners are square. Unknown corner
/// keys are an error.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum Radius {
    Uniform(f64),
    PerCorner {
        #[serde(default)]
        tl: Option<f64>,
        #[serde(default)]
        tr: Option<f64>,
        #[serde(default)]
        br: Option<f64>,
        #[serde(default)]
        bl: Option<f64>,
    },
}

impl Default for Radius {
    fn default() -> Self {
        Radius::Uniform(DEFAULT_CORNER_RADIUS)
    }
}

impl From<f64> for Radius {
    fn from(r: f64) -> Self {
        Radius::Uniform(r)
    }
}

impl From<Option<Radius>> for Radius {
    fn from(r: Option<Radius>) -> Self {
        r.unwrap_or_default()
    }
}

impl From<CornerRadii> for Radius {
    fn from(r: CornerRadii) -> Self {
        Radius::PerCorner {
            tl: Some(r.tl),
            tr: Some(r.tr),
            br: Some(r.br),
            bl: Some(r.bl),
        }
    }
}

/// Resolved radii, clockwise from top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CornerRadii {
    pub tl: f64,
    pub tr: f64,
    pub br: f64,
    pub bl: f64,
}

impl CornerRadii {
    /// Every corner finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.tl, self.tr, self.br, self.bl]
            .iter()
            .all(|r| r.is_finite() && *r >= 0.0)
    }
}

impl Radius {
    pub fn resolve(self) -> CornerRadii {
        match self {
            Radius::Uniform(r) => CornerRadii { tl: r, tr: r, br: r, bl: r },
            Radius::PerCorner { tl, tr, br, bl } => CornerRadii {
                tl: tl.unwrap_or(0.0),
                tr: tr.unwrap_or(0.0),
                br: br.unwrap_or(0.0),
                bl: bl.unwrap_or(0.0),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundRectStyle {
    pub fill: bool,
    pub stroke: bool,
}

impl Default for RoundRectStyle {
    fn default() -> Self {
        Self { fill: false, stroke: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn inset(&self, margin: f64) -> Self {
        Self::new(
            self.x + margin,
            self.y + margin,
            (self.width - 2.0 * margin).max(0.0),
            (self.height - 2.0 * margin).max(0.0),
        )
    }
}

/// Trace a rounded rectangle with the painter's current styles, then fill
/// and/or stroke it. Square corners emit no curve.
pub fn round_rect<P: Painter + ?Sized>(
    painter: &mut P,
    rect: Rect,
    radius: impl Into<Radius>,
    style: RoundRectStyle,
) {
    let r = radius.into().resolve();
    let Rect { x, y, width: w, height: h } = rect;

    painter.begin_path();
    painter.move_to(x + r.tl, y);
    painter.line_to(x + w - r.tr, y);
    if r.tr != 0.0 {
        painter.quadratic_curve_to(x + w, y, x + w, y + r.tr);
    }
    painter.line_to(x + w, y + h - r.br);
    if r.br != 0.0 {
        painter.quadratic_curve_to(x + w, y + h, x + w - r.br, y + h);
    }
    painter.line_to(x + r.bl, y + h);
    if r.bl != 0.0 {
        painter.quadratic_curve_to(x, y + h, x, y + h - r.bl);
    }
    painter.line_to(x, y + r.tl);
    if r.tl != 0.0 {
        painter.quadratic_curve_to(x, y, x + r.tl, y);
    }
    painter.close_path();

    if style.fill {
        painter.fill();
    }
    if style.stroke {
        painter.stroke();
    }
}
