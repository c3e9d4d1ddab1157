/// 工具模块
/// Utility modules
pub mod mask;

pub use mask::{apply_mask, mask_frame, region_mask};
