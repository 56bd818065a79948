use super::cache::ModelOptions;
use crate::error::{PipelineError, Result};
use candle_core::Device;
use std::str::FromStr;

pub mod builder;
pub use builder::{BasePipelineBuilder, StandardPipelineBuilder};

/// Where inference runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceRequest {
    /// Run on the CPU (default).
    #[default]
    Cpu,
    /// Run on the CUDA GPU with this ordinal.
    Cuda(usize),
}

impl DeviceRequest {
    /// Open the requested device.
    pub fn resolve(self) -> Result<Device> {
        match self {
            DeviceRequest::Cpu => Ok(Device::Cpu),
            DeviceRequest::Cuda(i) => Device::new_cuda(i).map_err(|e| {
                PipelineError::Device(format!(
                    "Failed to init CUDA device {i}: {e}. Try CPU as fallback."
                ))
            }),
        }
    }
}

impl FromStr for DeviceRequest {
    type Err = PipelineError;

    /// Accepts `cpu`, `cuda` (GPU 0) or `cuda:N`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "cpu" => Ok(DeviceRequest::Cpu),
            "cuda" | "gpu" => Ok(DeviceRequest::Cuda(0)),
            _ => s
                .strip_prefix("cuda:")
                .and_then(|i| i.parse().ok())
                .map(DeviceRequest::Cuda)
                .ok_or_else(|| {
                    PipelineError::Config(format!(
                        "Unknown device '{s}'. Expected 'cpu', 'cuda' or 'cuda:N'"
                    ))
                }),
        }
    }
}

macro_rules! impl_device_methods {
    (delegated: $builder:ident < $($gen:ident : $bound:path),* >) => {
        impl<$($gen: $bound),*> $builder<$($gen),*> {
            /// Use CPU for inference (default).
            pub fn cpu(mut self) -> Self {
                *self.0.device_request_mut() = crate::pipelines::utils::DeviceRequest::Cpu;
                self
            }

            /// Use a specific CUDA GPU for inference.
            pub fn cuda(mut self, index: usize) -> Self {
                *self.0.device_request_mut() = crate::pipelines::utils::DeviceRequest::Cuda(index);
                self
            }

            /// Use whichever device a parsed [`DeviceRequest`](crate::sentiment::DeviceRequest) names.
            pub fn device(mut self, request: crate::pipelines::utils::DeviceRequest) -> Self {
                *self.0.device_request_mut() = request;
                self
            }
        }
    };
}

pub(crate) use impl_device_methods;

pub fn build_cache_key<O: ModelOptions>(options: &O, device: &Device) -> String {
    format!("{}-{:?}", options.cache_key(), device.location())
}
