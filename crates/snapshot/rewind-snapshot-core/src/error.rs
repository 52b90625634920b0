//! Hard failures: shape/identity mismatches between a snapshot and its target.
//! Everything recoverable is handled locally with a `log::warn!`.

use thiserror::Error;

use crate::snapshot::SnapshotKind;
use crate::target::ParamKind;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("animator parameter count mismatch: snapshot has {snapshot}, target has {target}")]
    ParameterCountMismatch { snapshot: usize, target: usize },

    #[error("animator parameter {index} kind mismatch: snapshot has {snapshot:?}, target has {target:?}")]
    ParameterKindMismatch {
        index: usize,
        snapshot: ParamKind,
        target: ParamKind,
    },

    #[error("animator layer count mismatch: snapshot has {snapshot}, target has {target}")]
    LayerCountMismatch { snapshot: usize, target: usize },

    #[error("cannot interpolate a {left:?} snapshot with a {right:?} snapshot")]
    SnapshotKindMismatch {
        left: SnapshotKind,
        right: SnapshotKind,
    },

    #[error("{snapshot:?} snapshot cannot drive a {target:?} target")]
    TargetKindMismatch {
        snapshot: SnapshotKind,
        target: SnapshotKind,
    },
}
