// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: no tensor code, no HTTP, no
// printing. The CLI and the HTTP server both call into here.
//
//   train_use_case   — CSV → screening → split → train → (checkpoint)
//   predict_use_case — registry snapshot → inference → skybox

// The training workflow
pub mod train_use_case;

// The prediction workflow
pub mod predict_use_case;
