//! Host telemetry port

use async_trait::async_trait;
use localmind_domain::MemoryUsage;
use serde::Serialize;

/// One fan sensor reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanReading {
    pub name: String,
    pub rpm: u32,
}

/// Snapshot of the host running the inference runtime
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostTelemetry {
    pub platform: String,
    pub processor: String,
    pub cpu_cores: usize,
    pub memory_gb: f64,
    pub gpu: String,
    /// e.g. "5120 MB / 8192 MB"
    pub vram: Option<String>,
    /// Celsius
    pub cpu_temp: Option<f32>,
    pub fans: Vec<FanReading>,
    pub thermal_available: bool,
}

/// Best-effort host probe; missing sensors yield `None`, never an error
#[async_trait]
pub trait TelemetryProbe: Send + Sync {
    async fn snapshot(&self) -> HostTelemetry;

    /// GPU memory in use, falling back to system memory
    async fn memory_usage(&self) -> Option<MemoryUsage>;
}
