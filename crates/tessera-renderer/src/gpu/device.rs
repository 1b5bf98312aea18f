//! Device management for wgpu
//!
//! Handles wgpu instance, adapter, device, and queue initialization

use crate::error::BackendError;
use wgpu::{
    Adapter, AdapterInfo, Backends, Device, DeviceDescriptor, Features, Instance,
    InstanceDescriptor, Limits, PowerPreference, Queue, RequestAdapterOptions,
};

/// Manages wgpu device and queue
pub struct DeviceManager {
    adapter: Adapter,
    device: Device,
    queue: Queue,
}

impl DeviceManager {
    /// Create a new device manager
    ///
    /// # Arguments
    /// * `backends` - Graphics APIs the adapter may come from
    ///
    /// # Errors
    /// Returns `DeviceUnavailable` if no suitable adapter is found or device
    /// creation fails
    pub async fn new(backends: Backends) -> Result<Self, BackendError> {
        let instance = Instance::new(InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| {
                BackendError::DeviceUnavailable(format!("no adapter for {:?}", backends))
            })?;

        let info = adapter.get_info();
        tracing::info!(
            target: tessera_core::logging::targets::RENDERER,
            name = %info.name,
            backend = ?info.backend,
            "GPU adapter selected"
        );

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("Tessera Device"),
                    required_features: Features::empty(),
                    required_limits: Limits::downlevel_defaults(),
                },
                None,
            )
            .await
            .map_err(|e| BackendError::DeviceUnavailable(e.to_string()))?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    /// Blocking variant of [`DeviceManager::new`]
    pub fn new_blocking(backends: Backends) -> Result<Self, BackendError> {
        pollster::block_on(Self::new(backends))
    }

    /// Get reference to the device
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Get reference to the queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Get adapter information
    pub fn adapter_info(&self) -> AdapterInfo {
        self.adapter.get_info()
    }

    /// Largest texture edge the device accepts
    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires a GPU adapter
    fn test_device_creation() {
        let dm = DeviceManager::new_blocking(Backends::all()).expect("Failed to create device");
        assert!(dm.max_texture_dimension() >= 2048);
    }
}
