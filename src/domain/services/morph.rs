use crate::domain::model::{LineSet, MatchedPair, Morph};
use crate::domain::services::balancer::{self, SplitStrategy};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// Pairs the two walls directly and the sticks through balancing.
pub fn plan_morph(source: &LineSet, reference: &LineSet, strategy: SplitStrategy) -> Result<Morph> {
    let sticks = balancer::match_sticks(&source.stick_lines, &reference.stick_lines, strategy)?;

    tracing::debug!(
        "Planned morph: {} source sticks and {} reference sticks into {} pairs",
        source.stick_lines.len(),
        reference.stick_lines.len(),
        sticks.len()
    );

    Ok(Morph {
        wall: MatchedPair::new(source.wall_line, reference.wall_line),
        sticks,
    })
}

/// 依畫布寬度換算線寬的比例與下限
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeDefaults {
    pub stick_width_ratio: f64,
    pub min_stick_width: f64,
    pub wall_width_ratio: f64,
    pub min_wall_width: f64,
}

impl Default for StrokeDefaults {
    fn default() -> Self {
        Self {
            stick_width_ratio: 10.0 / 1920.0,
            min_stick_width: 4.0,
            wall_width_ratio: 60.0 / 1920.0,
            min_wall_width: 6.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub wall_width: f64,
    pub stick_width: f64,
}

impl StrokeDefaults {
    pub fn for_canvas(&self, canvas_width: f64) -> StrokeStyle {
        StrokeStyle {
            wall_width: (self.wall_width_ratio * canvas_width).max(self.min_wall_width),
            stick_width: (self.stick_width_ratio * canvas_width).max(self.min_stick_width),
        }
    }
}
