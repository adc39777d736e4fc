use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub struct ServerGuard {
    pub base_url: String,
    _state_dir: tempfile::TempDir,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Starts `sunbeam-server` on an ephemeral port, serving `extension_dir`.
#[allow(dead_code)]
pub fn spawn_server(extension_dir: &Path) -> Result<ServerGuard> {
    let state_dir = tempfile::tempdir().context("create server tempdir")?;
    let addr_file = state_dir.path().join("addr.txt");

    let child = Command::new(env!("CARGO_BIN_EXE_sunbeam-server"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().unwrap(),
            "--extension-dir",
            extension_dir.to_str().unwrap(),
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn sunbeam-server")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;

    Ok(ServerGuard {
        base_url,
        _state_dir: state_dir,
        child,
    })
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

/// Writes `<dir>/<name>/sunbeam.json` plus any extra files, returning the extension root.
#[allow(dead_code)]
pub fn write_extension(
    dir: &Path,
    name: &str,
    manifest: serde_json::Value,
    files: &[(&str, &str)],
) -> Result<std::path::PathBuf> {
    let root = dir.join(name);
    std::fs::create_dir_all(&root).with_context(|| format!("create {}", root.display()))?;
    std::fs::write(
        root.join(sunbeam::catalog::MANIFEST_FILE),
        serde_json::to_vec_pretty(&manifest).context("encode manifest")?,
    )
    .context("write manifest")?;
    for (file, contents) in files {
        std::fs::write(root.join(file), contents).with_context(|| format!("write {}", file))?;
    }
    Ok(root)
}
