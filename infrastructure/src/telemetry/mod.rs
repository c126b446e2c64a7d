//! Host telemetry adapters

mod host;

pub use host::HostProbe;
