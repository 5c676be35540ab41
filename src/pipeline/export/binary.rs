//! Helpers shared by the external-converter strategies: locating a binary
//! and running it with a bounded wait.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::ExportError;

/// Converters get this long before they are killed.
pub const CONVERTER_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// First existing path in `candidates`, then `name` on `PATH`.
pub fn locate(candidates: &[&str], name: &str) -> Option<PathBuf> {
    candidates
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .or_else(|| search_path(name))
}

fn search_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    let exe = if cfg!(target_os = "windows") {
        format!("{name}.exe")
    } else {
        name.to_string()
    };
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(&exe))
        .find(|p| p.is_file())
}

/// Run `binary` with `args`, discarding its console output.
/// Non-zero exit or exceeding `timeout` is an error; on timeout the child is killed.
pub fn run_converter(
    binary: &Path,
    args: &[&std::ffi::OsStr],
    timeout: Duration,
) -> Result<(), ExportError> {
    let display = binary.display().to_string();
    let mut child = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ExportError::BinaryNotFound(display.clone()),
            _ => ExportError::Io(e),
        })?;

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            if status.success() {
                return Ok(());
            }
            return Err(ExportError::ConverterFailed {
                binary: display,
                status: status.to_string(),
            });
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ExportError::ConverterTimeout {
                binary: display,
                secs: timeout.as_secs(),
            });
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Read a converter's output file and check it looks like a PDF.
pub fn read_pdf(path: &Path) -> Result<Vec<u8>, ExportError> {
    let bytes = std::fs::read(path)?;
    if bytes.is_empty() || !bytes.starts_with(b"%PDF") {
        return Err(ExportError::EmptyOutput);
    }
    Ok(bytes)
}
