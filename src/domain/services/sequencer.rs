//! Straight-line motion between matched segments.
//!
//! Every sequence holds `steps + 1` positions. Element 0 is the source and
//! element `steps` is the destination, both exact. Sequences are plain values,
//! so iterating one again starts over from the source.

use crate::domain::model::{MatchedPair, Morph, Point, Segment};
use crate::utils::error::{Result, StickbugError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_STEPS: usize = 120;
/// Keeps `steps + 1` and per-frame indexing well inside `usize`.
pub const MAX_STEPS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    /// 逐步累加 step，誤差會隨步數累積
    #[default]
    Additive,
    /// `source + step * i`
    ClosedForm,
}

impl FromStr for InterpolationMode {
    type Err = StickbugError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "additive" => Ok(InterpolationMode::Additive),
            "closed_form" | "closed-form" => Ok(InterpolationMode::ClosedForm),
            other => Err(StickbugError::InvalidConfigValueError {
                field: "interpolation_mode".to_string(),
                value: other.to_string(),
                reason: "Expected 'additive' or 'closed_form'".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSequence {
    source: Point,
    destination: Point,
    step: Point,
    steps: usize,
    mode: InterpolationMode,
}

impl PointSequence {
    pub fn new(
        source: Point,
        destination: Point,
        steps: usize,
        mode: InterpolationMode,
    ) -> Result<Self> {
        if steps == 0 || steps > MAX_STEPS {
            return Err(StickbugError::InvalidStepCount);
        }
        Ok(Self {
            source,
            destination,
            step: (destination - source) / steps as f64,
            steps,
            mode,
        })
    }

    pub fn len(&self) -> usize {
        self.steps + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn step(&self) -> Point {
        self.step
    }

    pub fn iter(&self) -> PointSequenceIter {
        PointSequenceIter {
            sequence: *self,
            index: 0,
            current: self.source,
        }
    }
}

impl<'a> IntoIterator for &'a PointSequence {
    type Item = Point;
    type IntoIter = PointSequenceIter;

    fn into_iter(self) -> PointSequenceIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct PointSequenceIter {
    sequence: PointSequence,
    index: usize,
    current: Point,
}

impl Iterator for PointSequenceIter {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let sequence = &self.sequence;
        if self.index > sequence.steps {
            return None;
        }

        let point = if self.index == sequence.steps {
            sequence.destination
        } else {
            match sequence.mode {
                InterpolationMode::Additive => self.current,
                InterpolationMode::ClosedForm => {
                    sequence.source + sequence.step * self.index as f64
                }
            }
        };

        self.current = self.current + sequence.step;
        self.index += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.sequence.steps + 1).saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PointSequenceIter {}

/// Both endpoints of a matched pair, moving independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSequence {
    pub start: PointSequence,
    pub end: PointSequence,
}

impl SegmentSequence {
    pub fn new(pair: &MatchedPair, steps: usize, mode: InterpolationMode) -> Result<Self> {
        Ok(Self {
            start: PointSequence::new(pair.source.start, pair.destination.start, steps, mode)?,
            end: PointSequence::new(pair.source.end, pair.destination.end, steps, mode)?,
        })
    }

    pub fn len(&self) -> usize {
        self.start.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> SegmentSequenceIter {
        SegmentSequenceIter {
            start: self.start.iter(),
            end: self.end.iter(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SegmentSequenceIter {
    start: PointSequenceIter,
    end: PointSequenceIter,
}

impl Iterator for SegmentSequenceIter {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let start = self.start.next()?;
        let end = self.end.next()?;
        Some(Segment::new(start, end))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.start.size_hint()
    }
}

impl ExactSizeIterator for SegmentSequenceIter {}

/// 單一影格中所有線段的位置
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: usize,
    pub wall: Segment,
    pub sticks: Vec<Segment>,
}

/// Animation of a whole morph: the wall plus every stick pair, frame by frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphAnimation {
    wall: SegmentSequence,
    sticks: Vec<SegmentSequence>,
    steps: usize,
}

impl MorphAnimation {
    pub fn new(morph: &Morph, steps: usize, mode: InterpolationMode) -> Result<Self> {
        let wall = SegmentSequence::new(&morph.wall, steps, mode)?;
        let sticks = morph
            .sticks
            .iter()
            .map(|pair| SegmentSequence::new(pair, steps, mode))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "Animating wall and {} sticks over {} steps ({:?})",
            sticks.len(),
            steps,
            mode
        );
        Ok(Self {
            wall,
            sticks,
            steps,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.steps + 1
    }

    pub fn frames(&self) -> Frames {
        Frames {
            index: 0,
            wall: self.wall.iter(),
            sticks: self.sticks.iter().map(SegmentSequence::iter).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Frames {
    index: usize,
    wall: SegmentSequenceIter,
    sticks: Vec<SegmentSequenceIter>,
}

impl Iterator for Frames {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let wall = self.wall.next()?;
        let sticks = self
            .sticks
            .iter_mut()
            .map(|stick| stick.next())
            .collect::<Option<Vec<_>>>()?;

        let frame = Frame {
            index: self.index,
            wall,
            sticks,
        };
        self.index += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.wall.size_hint()
    }
}

impl ExactSizeIterator for Frames {}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> MatchedPair {
        MatchedPair::new(
            Segment::new(Point::new(0.1, 0.7), Point::new(0.33, 0.9)),
            Segment::new(Point::new(0.8, 0.05), Point::new(0.61, 0.2)),
        )
    }

    #[test]
    fn test_endpoints_are_exact() {
        for mode in [InterpolationMode::Additive, InterpolationMode::ClosedForm] {
            for steps in [1, 3, 7, DEFAULT_STEPS] {
                let sequence =
                    PointSequence::new(Point::new(0.1, 0.7), Point::new(0.8, 0.05), steps, mode)
                        .unwrap();
                let points: Vec<Point> = sequence.iter().collect();

                assert_eq!(points.len(), steps + 1);
                assert_eq!(points[0], Point::new(0.1, 0.7));
                assert_eq!(points[steps], Point::new(0.8, 0.05));
            }
        }
    }

    #[test]
    fn test_additive_accumulates_step() {
        let sequence = PointSequence::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.5),
            4,
            InterpolationMode::Additive,
        )
        .unwrap();

        let points: Vec<Point> = sequence.iter().collect();
        assert_eq!(sequence.step(), Point::new(0.25, 0.125));
        assert_eq!(points[1], Point::new(0.25, 0.125));
        assert_eq!(points[2], Point::new(0.5, 0.25));
        assert_eq!(points[3], Point::new(0.75, 0.375));
    }

    #[test]
    fn test_sequence_is_restartable() {
        let sequence = SegmentSequence::new(&pair(), 10, InterpolationMode::Additive).unwrap();
        let first: Vec<Segment> = sequence.iter().collect();
        let second: Vec<Segment> = sequence.iter().collect();

        assert_eq!(first, second);
        assert_eq!(sequence.iter().len(), 11);
        assert_eq!(first[0], pair().source);
        assert_eq!(first[10], pair().destination);
    }

    #[test]
    fn test_zero_steps_rejected() {
        assert!(matches!(
            SegmentSequence::new(&pair(), 0, InterpolationMode::ClosedForm).unwrap_err(),
            StickbugError::InvalidStepCount
        ));
    }

    #[test]
    fn test_step_count_upper_bound() {
        let longest = PointSequence::new(
            Point::default(),
            Point::new(1.0, 1.0),
            MAX_STEPS,
            InterpolationMode::Additive,
        )
        .unwrap();
        assert_eq!(longest.len(), MAX_STEPS + 1);

        let morph = Morph {
            wall: pair(),
            sticks: vec![pair()],
        };
        assert!(matches!(
            MorphAnimation::new(&morph, usize::MAX, InterpolationMode::Additive).unwrap_err(),
            StickbugError::InvalidStepCount
        ));
    }

    #[test]
    fn test_morph_frames() {
        let morph = Morph {
            wall: pair(),
            sticks: vec![pair(), MatchedPair::new(pair().destination, pair().source)],
        };
        let animation = MorphAnimation::new(&morph, 4, InterpolationMode::Additive).unwrap();
        let frames: Vec<Frame> = animation.frames().collect();

        assert_eq!(animation.frame_count(), 5);
        assert_eq!(frames.len(), 5);
        assert_eq!(frames[0].index, 0);
        assert_eq!(frames[4].index, 4);
        assert_eq!(frames[0].wall, pair().source);
        assert_eq!(frames[4].sticks[1], pair().source);
        assert_eq!(frames[2].sticks.len(), 2);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(
            "closed-form".parse::<InterpolationMode>().unwrap(),
            InterpolationMode::ClosedForm
        );
        assert!("cubic".parse::<InterpolationMode>().is_err());
    }
}
