//! Host-side helper: `cargo run` builds the WASM package into `static/pkg`
//! and serves `static/` over a local HTTP server.

// Only meaningful on non-wasm targets.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    host::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::process::{Command, Stdio};
    use std::{env, thread, time::Duration};

    use log::{error, info, warn};

    const DEFAULT_PORT: u16 = 8000;

    fn init_logging() {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .try_init();
    }

    fn port() -> u16 {
        match env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("PORT={raw} is not a port number; using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        }
    }

    pub fn run() -> ! {
        init_logging();

        info!("Building WASM pkg …");
        match Command::new("wasm-pack")
            .args([
                "build",
                "--release",
                "--target",
                "web",
                "--out-dir",
                "static/pkg",
            ])
            .status()
        {
            Ok(st) if st.success() => {}
            Ok(_) => {
                error!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
                std::process::exit(1);
            }
            Err(_) => {
                warn!("wasm-pack not found in PATH. Skipping wasm build; the site may serve stale artifacts.");
            }
        }

        let port = port();
        info!("Launching local server at http://127.0.0.1:{port} …");
        let port_arg = port.to_string();
        let server = Command::new("python3")
            .args(["-m", "http.server", port_arg.as_str(), "--directory", "static"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(err) = server {
            error!("failed to start http server: {err}");
            std::process::exit(1);
        }

        // Keep process alive
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }
}
