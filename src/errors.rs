//! Clipping diagnostics

use std::fmt::Display;

/// Everything that can go wrong while evaluating a Boolean node.
///
/// None of these are ever returned across the public API: per the engine's
/// degrade-gracefully contract they are formatted into `log` lines at the
/// point of failure and the affected loop (or node) is left unclipped,
/// dropped, or passed through unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClipError {
    /// (UnsupportedOperator) Only DIFFERENCE is implemented
    UnsupportedOperator(&'static str),
    /// (UnsupportedOperand) Operand kind the dispatcher cannot route
    UnsupportedOperand { position: &'static str, kind: &'static str },
    /// (DegenerateProfile) Boundary profile tessellated to fewer than 3 points
    DegenerateProfile(usize),
    /// (SingularPlanePosition) The plane's position matrix has no inverse
    SingularPlanePosition,
    /// (OddCrossingCount) A chain crossed the boundary profile an odd number of times
    OddCrossingCount(usize),
    /// (RunawayMarch) Boundary march exceeded its iteration budget
    RunawayMarch { emitted: usize, budget: usize },
    /// (DegeneratePolygon) Near-zero-area polygon in the opening-generation path
    DegeneratePolygon(usize),
}

impl Display for ClipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipError::UnsupportedOperator(op) => {
                write!(f, "(UnsupportedOperator) Boolean operator {} is not supported, only DIFFERENCE", op)
            },
            ClipError::UnsupportedOperand { position, kind } => {
                write!(f, "(UnsupportedOperand) {} operand of kind {} cannot be processed", position, kind)
            },
            ClipError::DegenerateProfile(n) => {
                write!(f, "(DegenerateProfile) boundary profile has only {} point(s)", n)
            },
            ClipError::SingularPlanePosition => {
                write!(f, "(SingularPlanePosition) base plane position matrix is not invertible")
            },
            ClipError::OddCrossingCount(n) => {
                write!(f, "(OddCrossingCount) chain crosses the boundary profile {} times", n)
            },
            ClipError::RunawayMarch { emitted, budget } => {
                write!(f, "(RunawayMarch) boundary march emitted {} points, budget {}", emitted, budget)
            },
            ClipError::DegeneratePolygon(loop_index) => {
                write!(f, "(DegeneratePolygon) polygon {} has near-zero area", loop_index)
            },
        }
    }
}
