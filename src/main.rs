//! Host-side helper: `cargo run` builds the wasm package into `static/pkg`
//! and serves `static/` on localhost.

use std::process::{Command, ExitCode, Stdio};

const PORT: &str = "8000";

fn main() -> ExitCode {
    curved_hud::init_logging();

    log::info!("building wasm package …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(st) => {
            log::error!("wasm-pack failed ({st})");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            log::warn!("wasm-pack not found ({err}); serving whatever is in static/pkg");
        }
    }

    log::info!("serving http://127.0.0.1:{PORT}/ (Ctrl-C to stop)");
    match Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status()
    {
        Ok(st) if st.success() => ExitCode::SUCCESS,
        Ok(st) => {
            log::error!("http server exited with {st}");
            ExitCode::FAILURE
        }
        Err(err) => {
            log::error!("failed to start http server: {err}");
            ExitCode::FAILURE
        }
    }
}
