// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use anyhow::Result;
use image::RgbImage;

use super::types::Detection;

/// 跟踪提取器统一接口 (检测 + 跟踪)
///
/// 输入已经过区域掩码的画面, 输出带有跟踪ID的检测结果。
///
/// ## 约定
/// - 只能看到掩码后的像素, 区域外的目标不应被报告
/// - 同一物理目标在连续调用中保持同一 `track_id`
/// - 遮挡后重新出现时如何复用ID由实现决定, 这里不做校验
/// - 同步调用, 无超时; 需要取消时由调用方停止送帧
pub trait TrackExtractor {
    fn extract(&mut self, frame: &RgbImage) -> Result<Vec<Detection>>;
}

/// 闭包直接作为提取器使用 (测试或接入外部模型)
impl<F> TrackExtractor for F
where
    F: FnMut(&RgbImage) -> Result<Vec<Detection>>,
{
    fn extract(&mut self, frame: &RgbImage) -> Result<Vec<Detection>> {
        self(frame)
    }
}
