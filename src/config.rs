//! Dashboard configuration. The two shipped variants are presets of the same
//! structure; any field may be overridden from JSON.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::camera::CameraConfig;
use crate::error::{DashboardError, Result};
use crate::geometry::CurvedSurface;
use crate::hud::{HudConfig, HudStyle, MetricPanel, MetricSource, Radius};

/// Placement of the mesh in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshPlacement {
    pub offset_z: f64,
    /// Flip x so the texture reads correctly from inside the cylinder.
    pub mirror_x: bool,
}

impl Default for MeshPlacement {
    fn default() -> Self {
        Self {
            offset_z: 750.0,
            mirror_x: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub surface: CurvedSurface,
    pub placement: MeshPlacement,
    pub camera: CameraConfig,
    pub hud: HudConfig,
    /// Elapsed milliseconds per unit of the shader time uniform.
    pub time_scale: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::glow()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Glow,
    Panels,
}

impl FromStr for Preset {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "glow" => Ok(Preset::Glow),
            "panels" => Ok(Preset::Panels),
            other => Err(DashboardError::config(format!("unknown preset {other:?}"))),
        }
    }
}

impl Preset {
    pub fn config(self) -> DashboardConfig {
        match self {
            Preset::Glow => DashboardConfig::glow(),
            Preset::Panels => DashboardConfig::panels(),
        }
    }
}

impl DashboardConfig {
    /// Elapsed-time counters with a glow, on a wide shallow arc.
    pub fn glow() -> Self {
        Self {
            surface: CurvedSurface::default(),
            placement: MeshPlacement::default(),
            camera: CameraConfig::default(),
            hud: HudConfig::default(),
            time_scale: 100.0,
        }
    }

    /// Titled HUD with flat metric panels on a tighter arc.
    pub fn panels() -> Self {
        use std::f64::consts::PI;

        Self {
            surface: CurvedSurface {
                radius: 800.0,
                height: 700.0,
                start_angle: PI * 0.7,
                end_angle: PI * 1.3,
                horizontal_segments: 120,
                vertical_segments: 12,
            },
            placement: MeshPlacement {
                offset_z: 550.0,
                mirror_x: true,
            },
            camera: CameraConfig {
                distance: 800.0,
                far: 1400.0,
                ..CameraConfig::default()
            },
            hud: HudConfig {
                style: HudStyle::Panels,
                title: "TELEMETRY".to_string(),
                background: "#02090B".to_string(),
                border_radius: Some(Radius::Uniform(16.0)),
                panel_radius: Some(Radius::PerCorner {
                    tl: Some(12.0),
                    tr: None,
                    br: Some(12.0),
                    bl: None,
                }),
                line_width: 2.0,
                text_inset: 40.0,
                panels: vec![
                    MetricPanel {
                        label: "CORE TEMP".to_string(),
                        unit: "°C".to_string(),
                        decimals: 1,
                        source: MetricSource::Wave {
                            period_ms: 9000.0,
                            min: 61.0,
                            max: 74.0,
                            phase: 0.0,
                        },
                    },
                    MetricPanel {
                        label: "THROUGHPUT".to_string(),
                        unit: " Mb/s".to_string(),
                        decimals: 0,
                        source: MetricSource::Wave {
                            period_ms: 4000.0,
                            min: 220.0,
                            max: 940.0,
                            phase: 0.25,
                        },
                    },
                    MetricPanel {
                        label: "SYNC".to_string(),
                        unit: "%".to_string(),
                        decimals: 0,
                        source: MetricSource::Ramp {
                            period_ms: 12000.0,
                            min: 0.0,
                            max: 100.0,
                        },
                    },
                    MetricPanel {
                        label: "UPTIME".to_string(),
                        unit: "s".to_string(),
                        decimals: 0,
                        source: MetricSource::Elapsed,
                    },
                ],
                ..HudConfig::default()
            },
            time_scale: 100.0,
        }
    }

    /// Parse a JSON document; missing fields take the glow defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.surface.validate()?;

        let cam = &self.camera;
        for (name, value) in [
            ("camera.distance", cam.distance),
            ("camera.near", cam.near),
            ("camera.far", cam.far),
            ("time_scale", self.time_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DashboardError::InvalidDimension { name, value });
            }
        }
        if cam.far <= cam.near {
            return Err(DashboardError::config(format!(
                "camera.far ({}) must exceed camera.near ({})",
                cam.far, cam.near
            )));
        }
        if !cam.transition_secs.is_finite() || cam.transition_secs < 0.0 {
            return Err(DashboardError::config("camera.transition_secs must be >= 0"));
        }
        if !self.hud.border_margin.is_finite() || self.hud.border_margin < 0.0 {
            return Err(DashboardError::config("hud.border_margin must be >= 0"));
        }
        for (name, radius) in [
            ("hud.border_radius", self.hud.border_radius),
            ("hud.panel_radius", self.hud.panel_radius),
        ] {
            if let Some(radius) = radius {
                if !radius.resolve().is_valid() {
                    return Err(DashboardError::config(format!(
                        "{name} must be finite and >= 0, got {radius:?}"
                    )));
                }
            }
        }
        Ok(())
    }
}
