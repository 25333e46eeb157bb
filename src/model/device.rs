use crate::error::{EnhanceError, EnhanceResult};
use std::fmt;
use std::str::FromStr;

/// Compute device a model runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    /// Host CPU
    #[default]
    Cpu,
    /// CUDA accelerator by ordinal
    Cuda(usize),
}

impl Device {
    /// Fail if this device cannot run inference in the current build
    pub fn ensure_available(&self) -> EnhanceResult<()> {
        match self {
            Device::Cpu => Ok(()),
            Device::Cuda(ordinal) => Err(EnhanceError::DeviceError(format!(
                "cuda:{} requested but no GPU backend is compiled into this build",
                ordinal
            ))),
        }
    }
}

impl FromStr for Device {
    type Err = EnhanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "cuda" | "gpu" => Ok(Device::Cuda(0)),
            other => other
                .strip_prefix("cuda:")
                .and_then(|n| n.parse().ok())
                .map(Device::Cuda)
                .ok_or_else(|| EnhanceError::ConfigError(format!("unknown device '{}'", s))),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(n) => write!(f, "cuda:{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_devices() {
        assert_eq!("cpu".parse::<Device>().unwrap(), Device::Cpu);
        assert_eq!("CUDA".parse::<Device>().unwrap(), Device::Cuda(0));
        assert_eq!("cuda:2".parse::<Device>().unwrap(), Device::Cuda(2));
        assert!("tpu".parse::<Device>().is_err());
        assert!("cuda:x".parse::<Device>().is_err());
    }

    #[test]
    fn test_availability() {
        assert!(Device::Cpu.ensure_available().is_ok());
        assert!(matches!(
            Device::Cuda(0).ensure_available(),
            Err(EnhanceError::DeviceError(_))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        for device in [Device::Cpu, Device::Cuda(1)] {
            assert_eq!(device.to_string().parse::<Device>().unwrap(), device);
        }
    }
}
