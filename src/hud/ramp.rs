use crate::foundation::error::{ReelError, ReelResult};

/// Piecewise-linear mapping from scroll progress to an animated value.
///
/// Outside its input range the ramp holds the first/last output. Equal consecutive inputs form a
/// step: the later output wins from that input on.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ProgressRamp {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
}

impl ProgressRamp {
    pub fn new(inputs: Vec<f64>, outputs: Vec<f64>) -> ReelResult<Self> {
        if inputs.len() != outputs.len() {
            return Err(ReelError::validation(format!(
                "ramp has {} inputs but {} outputs",
                inputs.len(),
                outputs.len()
            )));
        }
        if inputs.len() < 2 {
            return Err(ReelError::validation("ramp needs at least two stops"));
        }
        if inputs.iter().chain(&outputs).any(|v| !v.is_finite()) {
            return Err(ReelError::validation("ramp stops must be finite"));
        }
        if inputs.windows(2).any(|w| w[1] < w[0]) {
            return Err(ReelError::validation("ramp inputs must be non-decreasing"));
        }
        Ok(Self { inputs, outputs })
    }

    /// Ramp from compile-time stops known to be well-formed.
    pub(crate) fn fixed(inputs: &[f64], outputs: &[f64]) -> Self {
        debug_assert!(Self::new(inputs.to_vec(), outputs.to_vec()).is_ok());
        Self {
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        }
    }

    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    /// Value at `progress`.
    pub fn sample(&self, progress: f64) -> f64 {
        let last = self.inputs.len() - 1;
        if progress.is_nan() || progress <= self.inputs[0] {
            // A leading step resolves to its later output when progress sits on it.
            let mut i = 0;
            while !progress.is_nan() && i < last && self.inputs[i + 1] <= progress {
                i += 1;
            }
            return self.outputs[i];
        }
        if progress >= self.inputs[last] {
            return self.outputs[last];
        }

        // First segment whose end lies beyond `progress`.
        let seg = self.inputs.partition_point(|&x| x <= progress);
        let (x0, x1) = (self.inputs[seg - 1], self.inputs[seg]);
        let (y0, y1) = (self.outputs[seg - 1], self.outputs[seg]);
        let t = (progress - x0) / (x1 - x0);
        y0 + (y1 - y0) * t
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hud/ramp.rs"]
mod tests;
