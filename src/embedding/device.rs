use candle_core::Device;
use tracing::{debug, info, warn};

type DeviceProbe = (&'static str, fn() -> candle_core::Result<Device>);

/// GPU backends compiled into this build, in preference order.
fn compiled_accelerators() -> Vec<DeviceProbe> {
    #[allow(unused_mut)]
    let mut probes: Vec<DeviceProbe> = Vec::new();

    #[cfg(feature = "metal")]
    probes.push(("metal", || Device::new_metal(0)));

    #[cfg(feature = "cuda")]
    probes.push(("cuda", || Device::new_cuda(0)));

    probes
}

/// Selects the compute device for in-process models.
///
/// Tries each compiled accelerator in turn and falls back to CPU.
pub fn select_device() -> Device {
    let probes = compiled_accelerators();
    if probes.is_empty() {
        debug!("No GPU backend compiled, using CPU");
        return Device::Cpu;
    }

    let mut failures = Vec::with_capacity(probes.len());
    for (name, probe) in probes {
        match probe() {
            Ok(device) => {
                info!(device = name, "Using GPU acceleration");
                return device;
            }
            Err(e) => {
                warn!(device = name, error = %e, "GPU device unavailable");
                failures.push(format!("{name} failed: {e}"));
            }
        }
    }

    warn!(reason = %failures.join("; "), "Falling back to CPU device");
    Device::Cpu
}
