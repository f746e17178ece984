use crate::domain::model::{MatchedPair, Segment};
use crate::utils::error::{Result, StickbugError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// 決定平衡時要切哪一段
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Split whatever sits at the scan index, which advances by one per split.
    #[default]
    Positional,
    /// Always split the currently longest segment (first one on ties).
    LongestFirst,
}

impl FromStr for SplitStrategy {
    type Err = StickbugError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" => Ok(SplitStrategy::Positional),
            "longest_first" | "longest-first" => Ok(SplitStrategy::LongestFirst),
            other => Err(StickbugError::InvalidConfigValueError {
                field: "split_strategy".to_string(),
                value: other.to_string(),
                reason: "Expected 'positional' or 'longest_first'".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedSegment {
    pub rank: usize,
    pub segment: Segment,
}

fn split_at(segments: &mut Vec<Segment>, index: usize) {
    let parent = segments.remove(index);
    let (head, tail) = parent.split();
    segments.push(head);
    segments.push(tail);
}

fn longest_index(segments: &[Segment]) -> usize {
    let mut best = 0;
    for (index, segment) in segments.iter().enumerate().skip(1) {
        if segment.length() > segments[best].length() {
            best = index;
        }
    }
    best
}

/// 把較少的一組一直切到和目標數量相同
fn grow(segments: &mut Vec<Segment>, target: usize, strategy: SplitStrategy) {
    let mut scan_index = 0;
    while segments.len() < target {
        // 每次切割長度加一、索引也加一，所以索引永遠在範圍內
        let index = match strategy {
            SplitStrategy::Positional => scan_index,
            SplitStrategy::LongestFirst => longest_index(segments),
        };
        tracing::trace!(
            "Splitting segment #{} ({} -> {} segments)",
            index,
            segments.len(),
            segments.len() + 1
        );
        split_at(segments, index);
        scan_index += 1;
    }
}

/// Equalizes two collections by splitting segments of the smaller one.
///
/// Both results hold `max(n, m)` segments. Untouched segments keep their
/// relative order; children of a split are appended at the end.
pub fn balance(
    mut first: Vec<Segment>,
    mut second: Vec<Segment>,
    strategy: SplitStrategy,
) -> Result<(Vec<Segment>, Vec<Segment>)> {
    if first.is_empty() || second.is_empty() {
        return Err(StickbugError::EmptyInput {
            context: format!(
                "cannot balance collections of {} and {} segments",
                first.len(),
                second.len()
            ),
        });
    }

    let target = first.len().max(second.len());
    tracing::debug!(
        "Balancing {} vs {} segments with {:?} splitting",
        first.len(),
        second.len(),
        strategy
    );

    match first.len().cmp(&second.len()) {
        Ordering::Less => grow(&mut first, target, strategy),
        Ordering::Greater => grow(&mut second, target, strategy),
        Ordering::Equal => {}
    }

    Ok((first, second))
}

/// Orders segments by length, longest first; equal lengths keep input order.
pub fn rank(segments: &[Segment]) -> Vec<RankedSegment> {
    let mut order: Vec<usize> = (0..segments.len()).collect();
    order.sort_by(|&a, &b| {
        segments[b]
            .length()
            .total_cmp(&segments[a].length())
            .then(a.cmp(&b))
    });

    order
        .into_iter()
        .enumerate()
        .map(|(rank, index)| RankedSegment {
            rank,
            segment: segments[index],
        })
        .collect()
}

/// 依長度名次一對一配對
pub fn pair_by_rank(sources: &[Segment], destinations: &[Segment]) -> Result<Vec<MatchedPair>> {
    if sources.len() != destinations.len() {
        return Err(StickbugError::UnbalancedCollections {
            left: sources.len(),
            right: destinations.len(),
        });
    }

    Ok(rank(sources)
        .into_iter()
        .zip(rank(destinations))
        .map(|(source, destination)| MatchedPair::new(source.segment, destination.segment))
        .collect())
}

/// Balances two stick collections and pairs them by length rank.
///
/// Each collection is ranked first, so positional splitting starts at the
/// longest stick and walks down the ranking.
pub fn match_sticks(
    sources: &[Segment],
    destinations: &[Segment],
    strategy: SplitStrategy,
) -> Result<Vec<MatchedPair>> {
    let ordered = |segments: &[Segment]| -> Vec<Segment> {
        rank(segments).into_iter().map(|r| r.segment).collect()
    };

    let (sources, destinations) = balance(ordered(sources), ordered(destinations), strategy)?;
    pair_by_rank(&sources, &destinations)
}
