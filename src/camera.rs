use cgmath::{perspective, Deg, Matrix, Matrix4, Rad, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance from the origin along +z.
    pub distance: f64,
    pub near: f64,
    pub far: f64,
    /// Duration of a rotation transition, seconds.
    pub transition_secs: f64,
    /// Radians of rotation per unit of pointer offset.
    pub rotation_gain: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 1000.0,
            near: 1.0,
            far: 1500.0,
            transition_secs: 4.0,
            rotation_gain: 0.5,
        }
    }
}

/// Vertical field of view, in degrees, that exactly frames `viewport_height`
/// pixels at `distance`.
pub fn fov_degrees(viewport_height: f64, distance: f64) -> f64 {
    (2.0 * (viewport_height / 2.0 / distance).atan()).to_degrees()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub fov_degrees: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Projection {
    pub fn framing(width: f64, height: f64, config: &CameraConfig) -> Self {
        Self {
            fov_degrees: fov_degrees(height, config.distance),
            aspect: if height > 0.0 { width / height } else { 1.0 },
            near: config.near,
            far: config.far,
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        perspective(
            Deg(self.fov_degrees as f32),
            self.aspect as f32,
            self.near as f32,
            self.far as f32,
        )
    }
}

/// Euler rotation in radians, applied x then y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
}

/// Power4 ease-out: `1 - (1 - t)^5`.
pub fn ease_out_power4(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(5)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationTween {
    pub from: Rotation,
    pub to: Rotation,
    pub started_at_secs: f64,
    pub duration_secs: f64,
}

impl RotationTween {
    pub fn sample(&self, now_secs: f64) -> Rotation {
        let t = if self.duration_secs > 0.0 {
            (now_secs - self.started_at_secs) / self.duration_secs
        } else {
            1.0
        };
        let k = ease_out_power4(t);
        Rotation {
            x: self.from.x + (self.to.x - self.from.x) * k,
            y: self.from.y + (self.to.y - self.from.y) * k,
        }
    }

    pub fn is_finished(&self, now_secs: f64) -> bool {
        now_secs - self.started_at_secs >= self.duration_secs
    }
}

/// Camera with a fixed position and an eased rotation.
#[derive(Clone, Debug)]
pub struct CameraRig {
    config: CameraConfig,
    position: Vector3<f64>,
    rotation: Rotation,
    projection: Projection,
    tween: Option<RotationTween>,
}

impl CameraRig {
    pub fn new(config: CameraConfig, width: f64, height: f64) -> Self {
        Self {
            config,
            position: Vector3::new(0.0, 0.0, config.distance),
            rotation: Rotation::default(),
            projection: Projection::framing(width, height, &config),
            tween: None,
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn tween(&self) -> Option<&RotationTween> {
        self.tween.as_ref()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.projection = Projection::framing(width, height, &self.config);
    }

    /// Start a transition from the current rotation, replacing any running one.
    pub fn transition_to(&mut self, target: Rotation, now_secs: f64) {
        self.tween = Some(RotationTween {
            from: self.rotation,
            to: target,
            started_at_secs: now_secs,
            duration_secs: self.config.transition_secs,
        });
    }

    /// Rotation that looks towards a pointer offset.
    pub fn target_for(&self, offset_x: f64, offset_y: f64) -> Rotation {
        Rotation {
            x: -offset_y * self.config.rotation_gain,
            y: -offset_x * self.config.rotation_gain,
        }
    }

    pub fn advance(&mut self, now_secs: f64) {
        if let Some(tween) = self.tween {
            self.rotation = tween.sample(now_secs);
            if tween.is_finished(now_secs) {
                self.tween = None;
            }
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let rot = Matrix4::from_angle_x(Rad(self.rotation.x as f32))
            * Matrix4::from_angle_y(Rad(self.rotation.y as f32));
        let p = Vector3::new(self.position.x as f32, self.position.y as f32, self.position.z as f32);
        rot.transpose() * Matrix4::from_translation(-p)
    }
}
