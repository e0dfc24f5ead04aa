// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model, training and inference code lives here.
//
//   model.rs      — 4 → 8 → 16 → 5 dense classifier
//                   (relu hidden layers, softmax output)
//   trainer.rs    — Adam training loop with a reported-only
//                   validation pass after every epoch
//   inferencer.rs — wraps a trained model, classifies one
//                   feature vector at a time
//
// Everything runs on Burn's NdArray CPU backend; training wraps
// it in Autodiff for gradients.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Backend used for inference and for the returned trained model
pub type InferBackend = burn::backend::NdArray;

/// Backend used during training (adds gradient tracking)
pub type TrainBackend = burn::backend::Autodiff<InferBackend>;

/// Dense weather classifier architecture
pub mod model;

/// Full training loop with validation metrics
pub mod trainer;

/// Inference engine — classifies a single day of weather
pub mod inferencer;
