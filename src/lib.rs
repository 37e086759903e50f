#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Curved HUD dashboard: a partial cylinder textured with a 2D HUD that is
//! redrawn every frame, viewed through a camera that eases towards the mouse.
//!
//! Everything outside [`wasm`] is plain Rust and runs on the host, which is
//! where the tests exercise it.

pub mod camera;
pub mod clock;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hud;
pub mod input;
pub mod scene;

pub use config::{DashboardConfig, Preset};
pub use error::{DashboardError, Result};
pub use scene::SceneController;

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;

/// Install the logger: browser console on wasm32, `env_logger` elsewhere.
pub fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if console_log::init_with_level(log::Level::Debug).is_err() {
                web_sys::console::warn_1(&"logger already initialised".into());
            }
        } else {
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or("info"),
            )
            .try_init();
        }
    }
}
