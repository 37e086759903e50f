//! Heads-up display drawn on an off-screen 2D surface every frame and used as
//! the texture of the curved surface.

mod round_rect;

pub use round_rect::{round_rect, CornerRadii, Radius, Rect, RoundRectStyle, DEFAULT_CORNER_RADIUS};

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Top,
    Bottom,
}

impl TextBaseline {
    pub fn as_str(self) -> &'static str {
        match self {
            TextBaseline::Alphabetic => "alphabetic",
            TextBaseline::Top => "top",
            TextBaseline::Bottom => "bottom",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shadow {
    pub color: String,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Shadow {
    pub fn none() -> Self {
        Self {
            color: "rgba(0, 0, 0, 0)".to_string(),
            blur: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn glow(color: &str, blur: f64) -> Self {
        Self {
            color: color.to_string(),
            blur,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// The subset of the 2D canvas API the HUD draws with.
pub trait Painter {
    fn resize(&mut self, width: u32, height: u32);
    fn save(&mut self);
    fn restore(&mut self);
    fn clear_rect(&mut self, rect: Rect);
    fn fill_rect(&mut self, rect: Rect);
    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_shadow(&mut self, shadow: &Shadow);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HudStyle {
    /// Glowing text on black, no panels.
    #[default]
    Glow,
    /// Flat filled panels with metric readouts.
    Panels,
}

/// Where a panel's value comes from. All sources are functions of elapsed
/// time only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricSource {
    /// Elapsed seconds.
    Elapsed,
    Wave {
        period_ms: f64,
        min: f64,
        max: f64,
        #[serde(default)]
        phase: f64,
    },
    Ramp {
        period_ms: f64,
        min: f64,
        max: f64,
    },
}

impl MetricSource {
    pub fn sample(&self, elapsed_ms: f64) -> f64 {
        match *self {
            MetricSource::Elapsed => elapsed_ms / 1000.0,
            MetricSource::Wave { period_ms, min, max, phase } => {
                if period_ms <= 0.0 {
                    return min;
                }
                let turn = elapsed_ms / period_ms + phase;
                min + (max - min) * (0.5 + 0.5 * (turn * std::f64::consts::TAU).sin())
            }
            MetricSource::Ramp { period_ms, min, max } => {
                if period_ms <= 0.0 {
                    return min;
                }
                min + (max - min) * (elapsed_ms.rem_euclid(period_ms) / period_ms)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricPanel {
    pub label: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub decimals: usize,
    pub source: MetricSource,
}

impl MetricPanel {
    pub fn readout(&self, elapsed_ms: f64) -> String {
        format!("{:.*}{}", self.decimals, self.source.sample(elapsed_ms), self.unit)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    pub style: HudStyle,
    pub title: String,
    pub background: String,
    pub accent: String,
    pub panel_fill: String,
    pub border_margin: f64,
    /// Unset means the rounded-rectangle default of 5.
    pub border_radius: Option<Radius>,
    pub panel_radius: Option<Radius>,
    pub line_width: f64,
    pub font: String,
    pub title_font: String,
    pub label_font: String,
    pub value_font: String,
    pub glow_blur: f64,
    pub text_inset: f64,
    pub panels: Vec<MetricPanel>,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            style: HudStyle::Glow,
            title: String::new(),
            background: "black".to_string(),
            accent: "#8CF1F4".to_string(),
            panel_fill: "#0B2B30".to_string(),
            border_margin: 5.0,
            border_radius: Some(Radius::Uniform(10.0)),
            panel_radius: None,
            line_width: 1.0,
            font: "Normal 20px Helvetica".to_string(),
            title_font: "Bold 32px Helvetica".to_string(),
            label_font: "Normal 16px Helvetica".to_string(),
            value_font: "Bold 36px Helvetica".to_string(),
            glow_blur: 10.0,
            text_inset: 50.0,
            panels: Vec::new(),
        }
    }
}

/// Pixel size of the HUD surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudSize {
    pub width: u32,
    pub height: u32,
}

impl HudSize {
    /// Canvas dimensions truncate, as assigning a float to `canvas.width` does.
    pub fn from_extent(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0) as u32,
            height: height.max(1.0) as u32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudInput {
    pub elapsed_ms: f64,
    pub wall_clock_ms: f64,
}

/// `HH:MM:SS` in UTC.
pub fn format_clock(wall_clock_ms: f64) -> String {
    let secs = (wall_clock_ms / 1000.0).floor().max(0.0) as u64 % 86_400;
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

pub struct HudCompositor<P: Painter> {
    painter: P,
    size: HudSize,
    config: HudConfig,
    dirty: bool,
}

impl<P: Painter> HudCompositor<P> {
    pub fn new(mut painter: P, size: HudSize, config: HudConfig) -> Self {
        painter.resize(size.width, size.height);
        Self {
            painter,
            size,
            config,
            dirty: true,
        }
    }

    pub fn size(&self) -> HudSize {
        self.size
    }

    pub fn painter(&self) -> &P {
        &self.painter
    }

    pub fn painter_mut(&mut self) -> &mut P {
        &mut self.painter
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the texture needs uploading and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Redraw the whole surface. Every style attribute is set inside a
    /// save/restore pair, so no state carries over between frames.
    pub fn redraw(&mut self, input: &HudInput) -> Result<()> {
        let full = Rect::new(0.0, 0.0, self.size.width as f64, self.size.height as f64);
        let cfg = &self.config;
        let p = &mut self.painter;

        p.save();
        p.set_shadow(&Shadow::none());
        p.clear_rect(full);
        p.set_fill_style(&cfg.background);
        p.fill_rect(full);

        p.set_line_width(cfg.line_width);
        p.set_stroke_style(&cfg.accent);
        round_rect(p, full.inset(cfg.border_margin), cfg.border_radius, RoundRectStyle::default());

        let drawn = match cfg.style {
            HudStyle::Glow => draw_glow(p, cfg, full, input),
            HudStyle::Panels => draw_panels(p, cfg, full, input),
        };
        p.restore();
        drawn?;

        self.dirty = true;
        Ok(())
    }
}

fn draw_glow<P: Painter>(p: &mut P, cfg: &HudConfig, full: Rect, input: &HudInput) -> Result<()> {
    let inset = cfg.text_inset;
    let elapsed = format!("{}", input.elapsed_ms.max(0.0) as u64);

    p.set_shadow(&Shadow::glow(&cfg.accent, cfg.glow_blur));
    p.set_fill_style(&cfg.accent);
    p.set_font(&cfg.font);
    p.set_text_baseline(TextBaseline::Alphabetic);

    p.set_text_align(TextAlign::Left);
    p.fill_text(&elapsed, inset, inset)?;

    p.set_text_align(TextAlign::Right);
    p.fill_text(&format_clock(input.wall_clock_ms), full.width - inset, inset)?;
    p.fill_text(&elapsed, full.width - inset, full.height - inset)?;
    Ok(())
}

fn draw_panels<P: Painter>(p: &mut P, cfg: &HudConfig, full: Rect, input: &HudInput) -> Result<()> {
    let inset = cfg.text_inset;

    p.set_fill_style(&cfg.accent);
    p.set_text_baseline(TextBaseline::Top);

    p.set_font(&cfg.title_font);
    p.set_text_align(TextAlign::Center);
    p.fill_text(&cfg.title, full.width / 2.0, inset)?;

    p.set_font(&cfg.label_font);
    p.set_text_align(TextAlign::Left);
    p.fill_text(&format!("T+ {:.1}s", input.elapsed_ms.max(0.0) / 1000.0), inset, inset)?;
    p.set_text_align(TextAlign::Right);
    p.fill_text(&format_clock(input.wall_clock_ms), full.width - inset, inset)?;

    if cfg.panels.is_empty() {
        return Ok(());
    }

    // One row of equal panels across the lower half.
    let gap = inset / 2.0;
    let count = cfg.panels.len() as f64;
    let top = full.height * 0.5;
    let height = (full.height - inset - top).max(0.0);
    let width = ((full.width - 2.0 * inset - gap * (count - 1.0)) / count).max(0.0);
    let pad = 12.0;

    for (i, panel) in cfg.panels.iter().enumerate() {
        let rect = Rect::new(inset + i as f64 * (width + gap), top, width, height);

        p.set_fill_style(&cfg.panel_fill);
        p.set_stroke_style(&cfg.accent);
        round_rect(p, rect, cfg.panel_radius, RoundRectStyle { fill: true, stroke: true });

        p.set_fill_style(&cfg.accent);
        p.set_text_align(TextAlign::Left);
        p.set_text_baseline(TextBaseline::Top);
        p.set_font(&cfg.label_font);
        p.fill_text(&panel.label, rect.x + pad, rect.y + pad)?;

        p.set_text_baseline(TextBaseline::Bottom);
        p.set_font(&cfg.value_font);
        p.fill_text(&panel.readout(input.elapsed_ms), rect.x + pad, rect.y + rect.height - pad)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_wraps_at_midnight() {
        assert_eq!(format_clock(0.0), "00:00:00");
        assert_eq!(format_clock(((23 * 3600 + 59 * 60 + 59) * 1000) as f64 + 999.0), "23:59:59");
        assert_eq!(format_clock(86_400_000.0 + 61_000.0), "00:01:01");
    }

    #[test]
    fn wave_stays_in_range() {
        let src = MetricSource::Wave { period_ms: 1000.0, min: 10.0, max: 20.0, phase: 0.0 };
        for t in 0..50 {
            let v = src.sample(t as f64 * 37.0);
            assert!((10.0..=20.0).contains(&v), "{v}");
        }
        assert!((src.sample(250.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn ramp_wraps() {
        let src = MetricSource::Ramp { period_ms: 100.0, min: 0.0, max: 1.0 };
        assert!((src.sample(50.0) - 0.5).abs() < 1e-12);
        assert!((src.sample(150.0) - 0.5).abs() < 1e-12);
    }
}
