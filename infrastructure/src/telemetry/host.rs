//! Best-effort host telemetry from procfs, sysfs and vendor tools

use async_trait::async_trait;
use localmind_application::{FanReading, HostTelemetry, TelemetryProbe};
use localmind_domain::MemoryUsage;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);
const NO_GPU: &str = "Not detected";

/// Reads host facts for `/api/system`.
///
/// Every sensor is optional: a missing file or tool leaves its field empty.
#[derive(Debug, Clone)]
pub struct HostProbe {
    root: PathBuf,
    use_commands: bool,
}

impl Default for HostProbe {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            use_commands: true,
        }
    }
}

impl HostProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `proc/` and `sys/` below `root` instead of `/`
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Skip `nvidia-smi` / `osx-cpu-temp` lookups
    pub fn without_commands(mut self) -> Self {
        self.use_commands = false;
        self
    }

    async fn read(&self, relative: &str) -> Option<String> {
        tokio::fs::read_to_string(self.root.join(relative)).await.ok()
    }

    async fn cpu_temp(&self) -> Option<f32> {
        let zones = sorted_entries(&self.root.join("sys/class/thermal"), "thermal_zone").await;
        let mut fallback = None;
        for zone in zones {
            let Some(millis) = read_number(&zone.join("temp")).await else {
                continue;
            };
            let celsius = millis as f32 / 1000.0;
            let kind = tokio::fs::read_to_string(zone.join("type"))
                .await
                .unwrap_or_default();
            if is_cpu_zone(kind.trim()) {
                return Some(celsius);
            }
            fallback.get_or_insert(celsius);
        }
        fallback
    }

    async fn fans(&self) -> Vec<FanReading> {
        let mut fans = Vec::new();
        for hwmon in sorted_entries(&self.root.join("sys/class/hwmon"), "hwmon").await {
            let chip = tokio::fs::read_to_string(hwmon.join("name"))
                .await
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|_| "hwmon".to_string());
            for input in sorted_entries(&hwmon, "fan").await {
                let Some(file_name) = input.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let Some(index) = file_name
                    .strip_prefix("fan")
                    .and_then(|rest| rest.strip_suffix("_input"))
                else {
                    continue;
                };
                if let Some(rpm) = read_number(&input).await {
                    fans.push(FanReading {
                        name: format!("{chip} fan{index}"),
                        rpm: rpm.max(0) as u32,
                    });
                }
            }
        }
        fans
    }

    async fn nvidia(&self) -> Option<(String, Option<String>)> {
        let binary = which::which("nvidia-smi").ok()?;
        let output = run(
            Command::new(binary).args([
                "--query-gpu=name,memory.used,memory.total",
                "--format=csv,noheader,nounits",
            ]),
        )
        .await?;
        parse_nvidia_smi(&output)
    }

    async fn nvidia_memory(&self) -> Option<MemoryUsage> {
        let binary = which::which("nvidia-smi").ok()?;
        let output = run(
            Command::new(binary).args([
                "--query-gpu=memory.used,memory.total",
                "--format=csv,noheader,nounits",
            ]),
        )
        .await?;
        parse_nvidia_memory(&output)
    }

    async fn osx_cpu_temp(&self) -> Option<f32> {
        let binary = which::which("osx-cpu-temp").ok()?;
        let output = run(&mut Command::new(binary)).await?;
        parse_celsius(&output)
    }
}

#[async_trait]
impl TelemetryProbe for HostProbe {
    async fn snapshot(&self) -> HostTelemetry {
        let processor = self
            .read("proc/cpuinfo")
            .await
            .and_then(|text| parse_cpu_model(&text))
            .unwrap_or_else(|| std::env::consts::ARCH.to_string());
        let memory_gb = self
            .read("proc/meminfo")
            .await
            .and_then(|text| parse_mem_total_gb(&text))
            .unwrap_or(0.0);
        let cpu_cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        let mut cpu_temp = self.cpu_temp().await;
        let fans = self.fans().await;
        let (mut gpu, mut vram) = (NO_GPU.to_string(), None);

        if self.use_commands {
            if let Some((name, memory)) = self.nvidia().await {
                gpu = name;
                vram = memory;
            }
            if cpu_temp.is_none() {
                cpu_temp = self.osx_cpu_temp().await;
            }
        }

        debug!(%processor, cpu_temp = ?cpu_temp, fans = fans.len(), "Host telemetry collected");
        HostTelemetry {
            platform: std::env::consts::OS.to_string(),
            processor,
            cpu_cores,
            memory_gb,
            gpu,
            vram,
            thermal_available: cpu_temp.is_some() || !fans.is_empty(),
            cpu_temp,
            fans,
        }
    }

    async fn memory_usage(&self) -> Option<MemoryUsage> {
        if self.use_commands {
            if let Some(usage) = self.nvidia_memory().await {
                return Some(usage);
            }
        }
        self.read("proc/meminfo")
            .await
            .and_then(|text| parse_meminfo_usage(&text))
    }
}

/// Directory entries whose file name starts with `prefix`, sorted by name
async fn sorted_entries(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let mut entries = Vec::new();
    let Ok(mut reader) = tokio::fs::read_dir(dir).await else {
        return entries;
    };
    while let Ok(Some(entry)) = reader.next_entry().await {
        if entry.file_name().to_string_lossy().starts_with(prefix) {
            entries.push(entry.path());
        }
    }
    entries.sort();
    entries
}

async fn read_number(path: &Path) -> Option<i64> {
    tokio::fs::read_to_string(path).await.ok()?.trim().parse().ok()
}

async fn run(command: &mut Command) -> Option<String> {
    let output = tokio::time::timeout(COMMAND_TIMEOUT, command.kill_on_drop(true).output())
        .await
        .ok()?
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
}

fn is_cpu_zone(kind: &str) -> bool {
    let kind = kind.to_lowercase();
    ["x86_pkg_temp", "cpu", "soc", "k10temp", "coretemp"]
        .iter()
        .any(|needle| kind.contains(needle))
}

fn parse_cpu_model(cpuinfo: &str) -> Option<String> {
    cpuinfo.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        let key = key.trim();
        (key == "model name" || key == "Model" || key == "Hardware")
            .then(|| value.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

fn parse_mem_total_gb(meminfo: &str) -> Option<f64> {
    let kib = meminfo_kib(meminfo, "MemTotal")?;
    Some((kib / 1024.0 / 1024.0 * 10.0).round() / 10.0)
}

fn meminfo_kib(meminfo: &str, key: &str) -> Option<f64> {
    meminfo.lines().find_map(|line| {
        line.strip_prefix(key)?
            .strip_prefix(':')?
            .split_whitespace()
            .next()?
            .parse()
            .ok()
    })
}

/// System memory in use: `MemTotal - MemAvailable`
fn parse_meminfo_usage(meminfo: &str) -> Option<MemoryUsage> {
    let total = meminfo_kib(meminfo, "MemTotal")?;
    let available = meminfo_kib(meminfo, "MemAvailable")?;
    MemoryUsage::from_mib((total - available) / 1024.0, total / 1024.0)
}

/// `used, total` (MiB) of the first GPU
fn parse_nvidia_memory(output: &str) -> Option<MemoryUsage> {
    let line = output.lines().find(|l| !l.trim().is_empty())?;
    let (used, total) = line.split_once(',')?;
    MemoryUsage::from_mib(used.trim().parse().ok()?, total.trim().parse().ok()?)
}

/// `name, used, total` (MiB) of the first GPU
fn parse_nvidia_smi(output: &str) -> Option<(String, Option<String>)> {
    let line = output.lines().find(|l| !l.trim().is_empty())?;
    let mut fields = line.split(',').map(str::trim);
    let name = fields.next().filter(|n| !n.is_empty())?.to_string();
    let used = fields.next().and_then(|v| v.parse::<u64>().ok());
    let total = fields.next().and_then(|v| v.parse::<u64>().ok());
    let vram = match (used, total) {
        (Some(used), Some(total)) => Some(format!("{used} MB / {total} MB")),
        _ => None,
    };
    Some((name, vram))
}

fn parse_celsius(output: &str) -> Option<f32> {
    output
        .trim()
        .trim_end_matches("°C")
        .trim_end_matches('C')
        .trim()
        .parse()
        .ok()
}
