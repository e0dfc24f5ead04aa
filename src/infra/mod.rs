// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting state and persistence:
//
//   registry.rs   — the model the service predicts with, as an
//                   Absent → Training → Ready state machine over
//                   immutable, versioned snapshots
//
//   checkpoint.rs — saving and loading model weights with Burn's
//                   file recorder, plus the train config and the
//                   training summary as JSON
//
//   metrics.rs    — per-epoch metrics, the training summary and
//                   the metrics CSV logger
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Versioned model snapshots and lifecycle
pub mod registry;

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics and CSV logger
pub mod metrics;
