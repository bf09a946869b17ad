//! Render contract
//!
//! Drawing happens outside the crate. Each frame the orchestrator captures a
//! [`FrameSnapshot`] of plain data and applies the [`ScreenShake`] offset.

pub mod shake;
pub mod snapshot;

pub use shake::ScreenShake;
pub use snapshot::{FrameSnapshot, ShipDrawable};
