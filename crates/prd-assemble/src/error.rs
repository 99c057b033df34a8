//! Assembly errors

use prd_schema::ShapeViolation;

/// Assembly failures
///
/// A normalized document always has the right shape, so this only fires
/// for documents built by hand with [`Document::from_parts`](prd_schema::Document::from_parts).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    /// Document does not hold the twelve sections in order
    #[error("assembly impossible: {0}")]
    Impossible(#[from] ShapeViolation),
}
