//! Per-kind selectivity accumulation and computation.
//!
//! The auxiliary observations each kind needs live inside its own variant,
//! so a filter sampler cannot accumulate join ratios and a join sampler
//! cannot accumulate window lengths.
//!
//! | kind          | `realSelectivity`                       | empty input      |
//! |---------------|-----------------------------------------|------------------|
//! | join-wrapping | mean of matched / (left * right)        | `0.0`            |
//! | filter        | outputs / inputs                        | `NaN` or `inf`   |
//! | windowing     | 1 / mean window length                  | `inf`            |
//! | other         | not computed                            |                  |
//!
//! The filter and windowing divisions are deliberately unguarded.

use crate::pipeline::NodeKind;

/// Selectivity state for one sampler.
#[derive(Debug, Clone, PartialEq)]
pub enum Selectivity {
    Filter,
    Windowing { lengths: Vec<u64> },
    JoinWrapping { ratios: Vec<f64> },
    Untracked,
}

impl Selectivity {
    pub fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Filter => Selectivity::Filter,
            NodeKind::Windowing => Selectivity::Windowing {
                lengths: Vec::new(),
            },
            NodeKind::JoinWrapping => Selectivity::JoinWrapping { ratios: Vec::new() },
            NodeKind::Other => Selectivity::Untracked,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Selectivity::Filter => NodeKind::Filter,
            Selectivity::Windowing { .. } => NodeKind::Windowing,
            Selectivity::JoinWrapping { .. } => NodeKind::JoinWrapping,
            Selectivity::Untracked => NodeKind::Other,
        }
    }

    /// Record one join: `matched / (left * right)`.
    ///
    /// Returns whether a ratio was appended. Joins with an empty side and
    /// samplers of any other kind record nothing.
    pub fn record_join(&mut self, left: u64, right: u64, matched: u64) -> bool {
        let Selectivity::JoinWrapping { ratios } = self else {
            return false;
        };
        if left == 0 || right == 0 {
            return false;
        }
        ratios.push(matched as f64 / (left as f64 * right as f64));
        true
    }

    /// Record the length of one materialized window.
    ///
    /// Returns whether the length was appended.
    pub fn record_window_length(&mut self, len: usize) -> bool {
        let Selectivity::Windowing { lengths } = self else {
            return false;
        };
        lengths.push(len as u64);
        true
    }

    pub fn join_selectivities(&self) -> &[f64] {
        match self {
            Selectivity::JoinWrapping { ratios } => ratios,
            _ => &[],
        }
    }

    pub fn window_lengths(&self) -> &[u64] {
        match self {
            Selectivity::Windowing { lengths } => lengths,
            _ => &[],
        }
    }

    /// Final selectivity from the accumulated state and the event counters.
    pub fn compute(&self, input_count: u64, output_count: u64) -> Option<f64> {
        match self {
            Selectivity::JoinWrapping { ratios } => {
                Some(mean(ratios.iter().copied()).unwrap_or(0.0))
            }
            Selectivity::Filter => Some(output_count as f64 / input_count as f64),
            Selectivity::Windowing { lengths } => {
                let avg = mean(lengths.iter().map(|&l| l as f64)).unwrap_or(0.0);
                Some(1.0 / avg)
            }
            Selectivity::Untracked => None,
        }
    }
}

/// Arithmetic mean, `None` for an empty sequence.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}
