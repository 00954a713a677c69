//! Console and rotating-file logging driven by the `logging` config section.
//!
//! Each non-`default` key names a subsystem (a target prefix such as
//! `exercise_tracker` or `tower_http`) with its own levels and file; the
//! `default` section covers every target no subsystem claims.

use std::{
    collections::HashMap,
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use parking_lot::Mutex;
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use crate::config::{LoggingConfig, Section};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_AGE_DAYS: u32 = 7;

// -------- level helpers --------

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// Returns true if target == prefix or target starts with "prefix::"
fn matches_crate_prefix(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

type UnclaimedFilter =
    FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static>>;

/// Passes records up to `max_level` whose target no subsystem section claims.
fn unclaimed_filter(claimed: Vec<String>, max_level: Level) -> UnclaimedFilter {
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        let target = meta.target();
        meta.level() <= &max_level && !claimed.iter().any(|c| matches_crate_prefix(target, c))
    }))
}

/// Levels for the listed subsystems; every other target is off.
fn subsystem_targets<'a>(
    sections: impl Iterator<Item = (&'a str, &'a str)>,
) -> Targets {
    sections
        .filter_map(|(name, level)| {
            parse_tracing_level(level).map(|l| (name.to_string(), LevelFilter::from_level(l)))
        })
        .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, level)| {
            t.with_target(name, level)
        })
}

// -------- rotating files --------

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

/// Writer for one record; `None` drops it.
struct MaybeFile(Option<RotatingFile>);

impl Write for MaybeFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Routes records to the file of the subsystem owning their target,
/// falling back to the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotatingFile>,
    by_subsystem: HashMap<String, RotatingFile>,
}

impl FileRouter {
    fn resolve_for(&self, target: &str) -> Option<RotatingFile> {
        self.by_subsystem
            .iter()
            .find(|(prefix, _)| matches_crate_prefix(target, prefix))
            .map(|(_, file)| file.clone())
            .or_else(|| self.default.clone())
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = MaybeFile;

    fn make_writer(&'a self) -> Self::Writer {
        MaybeFile(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        MaybeFile(self.resolve_for(meta.target()))
    }
}

/// Resolve a log file path against `base_dir` (home_dir).
/// Absolute paths are kept as-is; relative paths are joined with `base_dir`.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Keep `max_backups` rotated files when set, otherwise prune by age.
fn retention(section: &Section) -> FileLimit {
    match section.max_backups {
        Some(n) => FileLimit::MaxFiles(n),
        None => FileLimit::Age(chrono::Duration::days(i64::from(
            section.max_age_days.unwrap_or(DEFAULT_MAX_AGE_DAYS),
        ))),
    }
}

fn open_rotating_file(log_path: &Path, section: &Section) -> std::io::Result<RotatingFile> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(retention(section)),
        ContentLimit::BytesSurpassed(usize::try_from(max_bytes).unwrap_or(usize::MAX)),
        Compression::None,
        #[cfg(unix)]
        None, // file permissions (Unix only)
    );

    Ok(RotatingFile(Arc::new(Mutex::new(rot))))
}

/// A failing log file never stops the server; the error goes to stderr.
fn section_file(name: &str, section: &Section, base_dir: &Path) -> Option<RotatingFile> {
    if section.file.trim().is_empty() {
        return None;
    }
    let log_path = resolve_log_path(&section.file, base_dir);
    match open_rotating_file(&log_path, section) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!(
                "Failed to init log file for '{}': {} ({})",
                name,
                log_path.display(),
                e
            );
            None
        }
    }
}

// -------- public init --------

/// Initialize logging from a configuration.
/// - `cfg`: LoggingConfig containing the logging sections
/// - `base_dir`: base directory used to resolve relative log file paths (usually server.home_dir)
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` *before* installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let default_section = cfg.get(DEFAULT_SECTION);
    let subsystems: Vec<(&str, &Section)> = cfg
        .iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .map(|(name, section)| (name.as_str(), section))
        .collect();
    let claimed: Vec<String> = subsystems.iter().map(|(n, _)| n.to_string()).collect();

    let router = FileRouter {
        default: default_section.and_then(|s| section_file(DEFAULT_SECTION, s, base_dir)),
        by_subsystem: subsystems
            .iter()
            .filter_map(|(name, s)| section_file(name, s, base_dir).map(|f| (name.to_string(), f)))
            .collect(),
    };

    let ansi = std::io::stdout().is_terminal();

    let console_subsystems = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(subsystem_targets(
            subsystems.iter().map(|(n, s)| (*n, s.console_level.as_str())),
        ));

    let console_default = default_section
        .and_then(|s| parse_tracing_level(&s.console_level))
        .map(|level| {
            fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(unclaimed_filter(claimed.clone(), level))
        });

    let file_subsystems = (!router.by_subsystem.is_empty()).then(|| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(router.clone())
            .with_filter(subsystem_targets(
                subsystems
                    .iter()
                    .filter(|(n, _)| router.by_subsystem.contains_key(*n))
                    .map(|(n, s)| (*n, s.file_level.as_str())),
            ))
    });

    let file_default = router
        .default
        .as_ref()
        .and(default_section)
        .and_then(|s| parse_tracing_level(&s.file_level))
        .map(|level| {
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(router.clone())
                .with_filter(unclaimed_filter(claimed, level))
        });

    let _ = Registry::default()
        .with(console_subsystems)
        .with(console_default)
        .with(file_subsystems)
        .with(file_default)
        .try_init();
}

fn init_default_logging() {
    let _ = fmt()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

// =================== tests ===================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn section(file: &str) -> Section {
        Section {
            console_level: "info".into(),
            file: file.into(),
            file_level: "debug".into(),
            max_age_days: None,
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn test_logging_level_parsing() {
        assert_eq!(parse_tracing_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_tracing_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_tracing_level("Info"), Some(Level::INFO));
        assert_eq!(parse_tracing_level("warn"), Some(Level::WARN));
        assert_eq!(parse_tracing_level("ERROR"), Some(Level::ERROR));
        assert_eq!(parse_tracing_level("off"), None);
        assert_eq!(parse_tracing_level("none"), None);
        assert_eq!(parse_tracing_level("invalid"), Some(Level::INFO)); // defaults to INFO
    }

    #[test]
    fn test_crate_prefix_matching() {
        assert!(matches_crate_prefix("exercise_tracker", "exercise_tracker"));
        assert!(matches_crate_prefix(
            "exercise_tracker::domain::service",
            "exercise_tracker"
        ));
        assert!(!matches_crate_prefix("exercise_tracker_extra", "exercise_tracker"));
        assert!(!matches_crate_prefix("api_ingress", "exercise_tracker"));
    }

    #[test]
    fn test_file_paths_resolved_against_home_dir() {
        let tmp = tempdir().unwrap();
        let base_dir = tmp.path();

        let resolved = resolve_log_path("logs/test.log", base_dir);
        assert!(resolved.starts_with(base_dir));
        assert!(resolved.ends_with("logs/test.log"));

        let absolute = base_dir.join("abs.log");
        assert_eq!(
            resolve_log_path(&absolute.to_string_lossy(), Path::new("/elsewhere")),
            absolute
        );
    }

    #[test]
    fn test_open_rotating_file_creates_parent() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("nested/dir/app.log");

        let res = open_rotating_file(&p, &section("unused"));
        assert!(res.is_ok(), "writer should be created");
        assert!(p.parent().unwrap().exists(), "parent dir must be created");
    }

    #[test]
    fn test_empty_file_disables_section_file() {
        let tmp = tempdir().unwrap();
        assert!(section_file("default", &section("  "), tmp.path()).is_none());
    }

    #[test]
    fn test_router_sends_records_to_owning_subsystem() {
        let tmp = tempdir().unwrap();
        let default_file = section_file("default", &section("logs/all.log"), tmp.path());
        let tracker_file =
            section_file("exercise_tracker", &section("logs/tracker.log"), tmp.path()).unwrap();

        let router = FileRouter {
            default: default_file,
            by_subsystem: HashMap::from([("exercise_tracker".to_string(), tracker_file)]),
        };

        let mut w = MaybeFile(router.resolve_for("exercise_tracker::domain::service"));
        w.write_all(b"tracker line\n").unwrap();
        w.flush().unwrap();

        let mut w = MaybeFile(router.resolve_for("tower_http::trace"));
        w.write_all(b"http line\n").unwrap();
        w.flush().unwrap();

        let tracker = fs::read_to_string(tmp.path().join("logs/tracker.log")).unwrap();
        let all = fs::read_to_string(tmp.path().join("logs/all.log")).unwrap();
        assert!(tracker.contains("tracker line"));
        assert!(!tracker.contains("http line"));
        assert!(all.contains("http line"));
    }

    #[test]
    fn test_router_without_files_drops_records() {
        let router = FileRouter::default();
        let mut w = MaybeFile(router.resolve_for("anything"));
        assert_eq!(w.write(b"dropped").unwrap(), 7);
    }

    #[test]
    fn test_retention_prefers_backup_count() {
        assert!(matches!(retention(&section("x")), FileLimit::MaxFiles(2)));

        let by_age = Section {
            max_backups: None,
            max_age_days: Some(3),
            ..section("x")
        };
        assert!(matches!(retention(&by_age), FileLimit::Age(_)));
    }
}
