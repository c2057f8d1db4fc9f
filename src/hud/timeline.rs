use crate::{
    foundation::error::{ReelError, ReelResult},
    hud::ramp::ProgressRamp,
};

/// Progress span over which a diagnostic fades in or out.
pub const DIAGNOSTIC_FADE: f64 = 0.02;
/// Horizontal distance a diagnostic slides in from, in CSS pixels.
pub const DIAGNOSTIC_SLIDE_PX: f64 = 30.0;

/// A short-lived overlay line shown during the transformation phase.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DiagnosticItem {
    /// Progress at which the item is fully visible.
    pub progress: f64,
    /// Progress span the item holds at full opacity.
    pub duration: f64,
    pub text: String,
}

/// Which edge a diagnostic is anchored to; items alternate starting on the left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum HudSide {
    Left,
    Right,
}

#[derive(Clone, Debug)]
struct DiagnosticTrack {
    text: String,
    side: HudSide,
    opacity: ProgressRamp,
    x: ProgressRamp,
}

/// Sampled overlay state for one progress value.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct HudFrame {
    pub progress: f64,
    pub hero_opacity: f64,
    pub arrival_opacity: f64,
    /// Vertical offset of the arrival block, in CSS pixels.
    pub arrival_y: f64,
    pub diagnostics: Vec<DiagnosticFrame>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DiagnosticFrame {
    pub text: String,
    pub side: HudSide,
    pub opacity: f64,
    /// Horizontal offset, in CSS pixels.
    pub x: f64,
}

impl HudFrame {
    /// Diagnostics with any visible opacity.
    pub fn visible_diagnostics(&self) -> impl Iterator<Item = &DiagnosticFrame> {
        self.diagnostics.iter().filter(|d| d.opacity > 0.0)
    }
}

/// Overlay phases driven by the same progress value as the frame sequence.
///
/// The overlay never talks to the canvas; both only observe progress.
#[derive(Clone, Debug)]
pub struct HudTimeline {
    hero_opacity: ProgressRamp,
    arrival_opacity: ProgressRamp,
    arrival_y: ProgressRamp,
    diagnostics: Vec<DiagnosticTrack>,
}

impl HudTimeline {
    /// Hero visible over the first quarter, arrival block from 70% on, no diagnostics.
    pub fn standard() -> Self {
        let ramp = ProgressRamp::fixed;
        Self {
            hero_opacity: ramp(&[0.0, 0.15, 0.25, 0.30], &[0.0, 1.0, 1.0, 0.0]),
            arrival_opacity: ramp(&[0.70, 0.75, 1.0], &[0.0, 1.0, 1.0]),
            arrival_y: ramp(&[0.70, 0.80], &[20.0, 0.0]),
            diagnostics: Vec::new(),
        }
    }

    /// Standard phases plus `items` in the transformation phase.
    pub fn with_diagnostics(items: &[DiagnosticItem]) -> ReelResult<Self> {
        let mut timeline = Self::standard();
        for (i, item) in items.iter().enumerate() {
            timeline.diagnostics.push(diagnostic_track(i, item)?);
        }
        Ok(timeline)
    }

    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn sample(&self, progress: f64) -> HudFrame {
        HudFrame {
            progress,
            hero_opacity: self.hero_opacity.sample(progress),
            arrival_opacity: self.arrival_opacity.sample(progress),
            arrival_y: self.arrival_y.sample(progress),
            diagnostics: self
                .diagnostics
                .iter()
                .map(|d| DiagnosticFrame {
                    text: d.text.clone(),
                    side: d.side,
                    opacity: d.opacity.sample(progress),
                    x: d.x.sample(progress),
                })
                .collect(),
        }
    }
}

fn diagnostic_track(index: usize, item: &DiagnosticItem) -> ReelResult<DiagnosticTrack> {
    if !item.duration.is_finite() || item.duration < 0.0 {
        return Err(ReelError::validation(format!(
            "diagnostic {index} has negative or invalid duration {}",
            item.duration
        )));
    }
    let start_fade = item.progress - DIAGNOSTIC_FADE;
    let end_fade = item.progress + item.duration;
    let side = if index % 2 == 0 {
        HudSide::Left
    } else {
        HudSide::Right
    };
    let from_x = match side {
        HudSide::Left => -DIAGNOSTIC_SLIDE_PX,
        HudSide::Right => DIAGNOSTIC_SLIDE_PX,
    };
    Ok(DiagnosticTrack {
        text: item.text.clone(),
        side,
        opacity: ProgressRamp::new(
            vec![start_fade, item.progress, end_fade, end_fade + DIAGNOSTIC_FADE],
            vec![0.0, 1.0, 1.0, 0.0],
        )?,
        x: ProgressRamp::new(vec![start_fade, item.progress], vec![from_x, 0.0])?,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/hud/timeline.rs"]
mod tests;
