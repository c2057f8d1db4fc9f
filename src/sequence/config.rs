use std::{fs::File, io::BufReader, path::Path, time::Duration};

use anyhow::Context;

use crate::foundation::{
    core::FrameIndex,
    error::{ReelError, ReelResult},
};

/// Environment override for [`SequenceConfig::idle_delay`].
pub const IDLE_DELAY_ENV: &str = "SCROLLREEL_IDLE_DELAY_MS";

/// Immutable description of a pre-rendered frame sequence.
///
/// Frame `i` (zero-based) lives at `{base_path}/frame_{i + 1:04}.{extension}`. The naming is
/// load-bearing: asset pipelines feeding a sequence must produce exactly these names.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SequenceConfig {
    /// Total frame count `N` (must be > 0).
    pub total_frames: u32,
    /// Directory or URL prefix containing the frames, without trailing separator.
    pub base_path: String,
    /// File extension of every frame.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Number of frames loaded concurrently after the first frame.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Length of the scroll span driving the sequence, in viewport heights.
    #[serde(default = "default_scroll_length_vh")]
    pub scroll_length_vh: f64,
    /// One-based frame shown as a poster while nothing is loaded.
    #[serde(default = "default_poster_frame")]
    pub poster_frame: u32,
    /// Delay between background batches when the host offers no idle hook.
    #[serde(default = "default_idle_delay_ms")]
    pub idle_delay_ms: u64,
}

fn default_extension() -> String {
    "webp".to_string()
}

fn default_batch_size() -> u32 {
    5
}

fn default_scroll_length_vh() -> f64 {
    500.0
}

fn default_poster_frame() -> u32 {
    1
}

fn default_idle_delay_ms() -> u64 {
    16
}

impl SequenceConfig {
    /// Build a config with defaults for every optional field.
    pub fn new(total_frames: u32, base_path: impl Into<String>) -> Self {
        Self {
            total_frames,
            base_path: base_path.into(),
            extension: default_extension(),
            batch_size: default_batch_size(),
            scroll_length_vh: default_scroll_length_vh(),
            poster_frame: default_poster_frame(),
            idle_delay_ms: default_idle_delay_ms(),
        }
    }

    /// Read and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let f = File::open(path).with_context(|| format!("open sequence '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| ReelError::serde(format!("parse sequence JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ReelError::serde(format!("parse sequence JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the loader and mapper cannot honor.
    pub fn validate(&self) -> ReelResult<()> {
        if self.total_frames == 0 {
            return Err(ReelError::validation("total_frames must be > 0"));
        }
        if self.batch_size == 0 {
            return Err(ReelError::validation("batch_size must be > 0"));
        }
        if self.base_path.trim().is_empty() {
            return Err(ReelError::validation("base_path must be non-empty"));
        }
        if self.extension.trim().is_empty() || self.extension.contains('/') {
            return Err(ReelError::validation(
                "extension must be a non-empty file extension",
            ));
        }
        if !self.scroll_length_vh.is_finite() || self.scroll_length_vh <= 0.0 {
            return Err(ReelError::validation(
                "scroll_length_vh must be finite and > 0",
            ));
        }
        if self.poster_frame == 0 || self.poster_frame > self.total_frames {
            return Err(ReelError::validation(
                "poster_frame must be within 1..=total_frames",
            ));
        }
        Ok(())
    }

    /// Resource locator for a zero-based frame index.
    pub fn locator(&self, index: FrameIndex) -> String {
        let base = self.base_path.trim_end_matches('/');
        format!("{base}/frame_{:04}.{}", index.number(), self.extension)
    }

    /// Zero-based index of [`poster_frame`](Self::poster_frame).
    pub fn poster_index(&self) -> FrameIndex {
        FrameIndex(self.poster_frame.saturating_sub(1)).min(self.last_index())
    }

    /// Last valid frame index (`N - 1`).
    pub fn last_index(&self) -> FrameIndex {
        FrameIndex(self.total_frames.saturating_sub(1))
    }

    /// Delay between background batches, honoring [`IDLE_DELAY_ENV`].
    pub fn idle_delay(&self) -> Duration {
        let ms = std::env::var(IDLE_DELAY_ENV)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(self.idle_delay_ms);
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/config.rs"]
mod tests;
