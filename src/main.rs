//! Host-side helper: `cargo run` builds the WASM package into `static/pkg`
//! and serves `static/` on a local HTTP server.

#[cfg(not(target_arch = "wasm32"))]
mod dev_server {
    use std::process::{Command, Stdio};

    use anyhow::{bail, Context, Result};
    use clap::Parser;

    #[derive(Debug, Parser)]
    #[command(about = "Build and serve the portfolio page locally")]
    struct Cli {
        /// Port for the local HTTP server.
        #[arg(short, long, default_value_t = 8000)]
        port: u16,

        /// Serve whatever is already in static/pkg.
        #[arg(long)]
        skip_wasm: bool,

        /// Build an unoptimized wasm package.
        #[arg(long)]
        dev: bool,
    }

    fn build_wasm(dev: bool) -> Result<()> {
        let profile = if dev { "--dev" } else { "--release" };
        println!("Building WASM pkg ({profile}) …");
        let status = Command::new("wasm-pack")
            .args(["build", profile, "--target", "web", "--out-dir", "static/pkg"])
            .status()
            .context("wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/)")?;
        if !status.success() {
            bail!("wasm-pack finished with {status}");
        }
        Ok(())
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();

        if cli.skip_wasm {
            println!("Skipping wasm build; serving existing static/pkg");
        } else {
            build_wasm(cli.dev)?;
        }

        println!("Serving static/ at http://127.0.0.1:{} …", cli.port);
        let status = Command::new("python3")
            .args(["-m", "http.server", &cli.port.to_string(), "--directory", "static"])
            .stdout(Stdio::null())
            .status()
            .context("failed to start python3 http.server")?;
        if !status.success() {
            bail!("http server exited with {status}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    dev_server::run()
}

// The page itself is the cdylib; there is nothing to run in the browser.
#[cfg(target_arch = "wasm32")]
fn main() {}
