//! One-shot host diagnostics written through a configured logger.
//!
//! Every probe runs on its own; a failing probe logs one error line and the
//! report carries on with the next one.

use std::path::Path;

use sysinfo::{CpuRefreshKind, Disks, RefreshKind, System};
use thiserror::Error;

use crate::logger::Logger;

pub const BANNER_WIDTH: usize = 50;
pub const REPORT_TITLE: &str = "EriBot System Information";

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0} is not reported on this host")]
    Unavailable(&'static str),

    #[error("{0}")]
    Failed(String),
}

pub type ProbeFn = fn() -> Result<String, ProbeError>;

/// A named host query: `label` prefixes the success line, `subject` names it in the error line.
#[derive(Debug, Clone, Copy)]
pub struct Probe {
    pub label: &'static str,
    pub subject: &'static str,
    pub run: ProbeFn,
}

impl Probe {
    pub const fn new(label: &'static str, subject: &'static str, run: ProbeFn) -> Self {
        Self {
            label,
            subject,
            run,
        }
    }
}

/// Platform, compiler, CPU count, memory, and root disk, in report order.
pub fn default_probes() -> [Probe; 5] {
    [
        Probe::new("Platform", "platform info", platform),
        Probe::new("Rust", "Rust version", rust_version),
        Probe::new("CPU Count", "CPU count", cpu_count),
        Probe::new("Memory", "memory info", total_memory),
        Probe::new("Disk", "disk info", root_disk),
    ]
}

pub fn report_system_info(logger: &Logger) {
    report_with_probes(logger, &default_probes());
}

/// Write the banner and one line per probe. Returns how many probes failed.
pub fn report_with_probes(logger: &Logger, probes: &[Probe]) -> usize {
    let banner = "=".repeat(BANNER_WIDTH);
    logger.info(banner.as_str());
    logger.info(REPORT_TITLE);
    logger.info(banner.as_str());

    let mut failed = 0;
    for probe in probes {
        match (probe.run)() {
            Ok(value) => logger.info(format!("{}: {value}", probe.label)),
            Err(e) => {
                failed += 1;
                logger.error(format!("Error getting {}: {e}", probe.subject));
            }
        }
    }

    logger.info(banner);
    failed
}

fn platform() -> Result<String, ProbeError> {
    let os = System::long_os_version().ok_or(ProbeError::Unavailable("operating system"))?;
    let arch = std::env::consts::ARCH;
    Ok(match System::kernel_version() {
        Some(kernel) => format!("{os} (kernel {kernel}, {arch})"),
        None => format!("{os} ({arch})"),
    })
}

fn rust_version() -> Result<String, ProbeError> {
    let version = env!("ERIBOT_RUSTC_VERSION");
    if version.is_empty() {
        return Err(ProbeError::Unavailable("compiler version"));
    }
    Ok(version.trim_start_matches("rustc ").to_string())
}

/// Logical CPUs on the host, regardless of affinity masks or cgroup quotas.
fn cpu_count() -> Result<String, ProbeError> {
    let sys = System::new_with_specifics(RefreshKind::new().with_cpu(CpuRefreshKind::new()));
    match sys.cpus().len() {
        0 => Err(ProbeError::Unavailable("CPU count")),
        count => Ok(count.to_string()),
    }
}

fn total_memory() -> Result<String, ProbeError> {
    let mut sys = System::new();
    sys.refresh_memory();
    match sys.total_memory() {
        0 => Err(ProbeError::Unavailable("total memory")),
        bytes => Ok(format!("{:.1} GB", bytes as f64 / GIB)),
    }
}

fn root_disk() -> Result<String, ProbeError> {
    let disks = Disks::new_with_refreshed_list();
    let root = disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))
        .or_else(|| disks.list().first())
        .ok_or(ProbeError::Unavailable("root filesystem"))?;
    Ok(format!("{:.1} GB", root.total_space() as f64 / GIB))
}
