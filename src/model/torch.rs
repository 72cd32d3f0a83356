use std::path::Path;

use tch::{kind::Kind, CModule, Device, Tensor};

use super::Regressor;
use crate::error::{PricingError, Result};

/// TorchScript regressor, e.g. a tree ensemble compiled to tensor ops.
pub struct TorchRegressor {
    model: CModule,
    device: Device,
    in_dim: usize,
    source: String,
}

// CModule forward is read-only once loaded
unsafe impl Sync for TorchRegressor {}

fn torch_err(e: tch::TchError) -> PricingError {
    PricingError::Inference(e.to_string())
}

impl TorchRegressor {
    pub fn load(path: &Path, in_dim: usize) -> Result<Self> {
        let device = Device::Cpu;
        let model = CModule::load_on_device(path, device).map_err(|e| {
            PricingError::Artifact(format!("failed to load TorchScript {}: {e}", path.display()))
        })?;

        // Probe output shape with a dummy forward; expect one value per row
        let dummy = Tensor::zeros([1, in_dim as i64], (Kind::Float, device));
        let t = model.forward_ts(&[dummy]).map_err(torch_err)?;
        if t.numel() != 1 {
            return Err(PricingError::Artifact(format!(
                "unexpected model output size: {:?}",
                t.size()
            )));
        }

        Ok(Self {
            model,
            device,
            in_dim,
            source: path.display().to_string(),
        })
    }
}

impl Regressor for TorchRegressor {
    fn describe(&self) -> String {
        format!("torchscript[{}]", self.source)
    }

    fn n_features(&self) -> usize {
        self.in_dim
    }

    fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.in_dim {
            return Err(PricingError::Inference(format!(
                "feature length mismatch: got {}, expected {}",
                row.len(),
                self.in_dim
            )));
        }
        let x: Vec<f32> = row.iter().map(|v| *v as f32).collect();
        let input = Tensor::from_slice(&x)
            .reshape([1, self.in_dim as i64])
            .to_device(self.device);

        let t = tch::no_grad(|| self.model.forward_ts(&[input])).map_err(torch_err)?;
        Ok(t.reshape([-1]).double_value(&[0]))
    }
}
