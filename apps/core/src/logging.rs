use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "rover.log";
const MAX_LOG_BYTES: u64 = 1_000_000;
const MAX_ARCHIVES: usize = 5;

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();
static ARCHIVE_SEQ: AtomicU64 = AtomicU64::new(0);

pub fn logs_dir() -> PathBuf {
    crate::config::stable_app_data_dir().join("logs")
}

/// Routes `tracing` output to `<dir>/rover.log`. `RUST_LOG` overrides `level`.
/// Calling this again after a subscriber is installed is a no-op.
pub fn init(dir: &Path, level: &str) -> Result<PathBuf, io::Error> {
    let log = RotatingLog::open(dir)?;
    let log_path = log.path.clone();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok();

    install_panic_hook();
    if installed {
        tracing::info!(path = %log_path.display(), "logging initialized");
    }
    Ok(log_path)
}

/// Append-only log file that archives itself once it passes `MAX_LOG_BYTES`.
struct RotatingLog {
    dir: PathBuf,
    path: PathBuf,
    file: Option<File>,
    written: u64,
}

impl RotatingLog {
    fn open(dir: &Path) -> Result<Self, io::Error> {
        fs::create_dir_all(dir)?;
        let path = dir.join(LOG_FILE_NAME);
        rotate_if_needed(&path, dir)?;
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            dir: dir.to_path_buf(),
            path,
            file: Some(file),
            written,
        })
    }

    fn rotate(&mut self) -> Result<(), io::Error> {
        // Closed before the rename so it also works where open files are locked.
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        archive(&self.path, &self.dir)?;
        self.file = Some(open_append(&self.path)?);
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > MAX_LOG_BYTES {
            self.rotate()?;
        }
        if self.file.is_none() {
            self.file = Some(open_append(&self.path)?);
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file unavailable"))?;
        let n = file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn open_append(path: &Path) -> Result<File, io::Error> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn rotate_if_needed(log_path: &Path, log_dir: &Path) -> Result<(), io::Error> {
    let meta = match fs::metadata(log_path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };

    if meta.len() < MAX_LOG_BYTES {
        return Ok(());
    }
    archive(log_path, log_dir)
}

fn archive(log_path: &Path, log_dir: &Path) -> Result<(), io::Error> {
    fs::rename(log_path, log_dir.join(archive_name()))?;
    prune_old_archives(log_dir)
}

// Sorts oldest first; the sequence separates archives made in the same instant.
fn archive_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = ARCHIVE_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("rover-{nanos:020}-{seq:06}.log")
}

fn prune_old_archives(log_dir: &Path) -> Result<(), io::Error> {
    let mut archives = fs::read_dir(log_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("rover-") && n.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();

    archives.sort();
    let excess = archives.len().saturating_sub(MAX_ARCHIVES);
    for oldest in archives.drain(..excess) {
        let _ = fs::remove_file(oldest);
    }
    Ok(())
}

fn install_panic_hook() {
    let _ = PANIC_HOOK_INSTALLED.get_or_init(|| {
        let prior = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let location = panic_info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "unknown".to_string());
            let payload = panic_info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload unavailable".to_string());
            tracing::error!(%location, %payload, "panic");
            prior(panic_info);
        }));
    });
}
