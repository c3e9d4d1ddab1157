// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 视频分析解决方案 (Solutions)
///
/// 每个解决方案逐帧处理画面, 并返回统一的 `SolutionResults`
/// - TrackZone: 区域内目标跟踪与累计计数
///
/// 共享参数 (线宽、verbose、区域等) 通过 `SolutionConfig` 组合传入
pub mod annotator;
pub mod trackzone;

pub use annotator::{Colors, SolutionAnnotator};
pub use trackzone::TrackZone;

use image::RgbImage;

use crate::error::Result;

/// 解决方案统一接口
///
/// 调用方负责驱动视频流循环 (读帧 → process → 显示/保存 → 下一帧),
/// 同一实例同一时刻只处理一帧 (`&mut self` 保证)
pub trait FrameProcessor {
    /// 解决方案名称
    fn name(&self) -> &'static str;

    /// 处理一帧画面
    fn process(&mut self, frame: &RgbImage) -> Result<SolutionResults>;
}

/// 单帧处理结果
#[derive(Clone, Debug)]
pub struct SolutionResults {
    /// 标注后的画面
    pub plot_im: RgbImage,
    /// 区域内累计出现过的不同跟踪ID数量
    pub total_tracks: usize,
    /// 本帧区域内的目标数量
    pub frame_tracks: usize,
    /// 本帧处理耗时 (毫秒)
    pub process_ms: f64,
    /// 文字摘要, 仅 verbose 时存在
    pub summary: Option<String>,
}

impl SolutionResults {
    pub fn new(plot_im: RgbImage, total_tracks: usize, frame_tracks: usize) -> Self {
        Self {
            plot_im,
            total_tracks,
            frame_tracks,
            process_ms: 0.0,
            summary: None,
        }
    }

    pub fn with_process_ms(mut self, process_ms: f64) -> Self {
        self.process_ms = process_ms;
        self
    }

    /// 按 verbose 生成摘要并写入结果
    pub fn with_summary(mut self, verbose: bool) -> Self {
        self.summary = self.summarize(verbose);
        self
    }

    pub fn summarize(&self, verbose: bool) -> Option<String> {
        verbose.then(|| {
            format!(
                "🚀 Results 🚀: total_tracks={}, frame_tracks={}, process_ms={:.1}",
                self.total_tracks, self.frame_tracks, self.process_ms
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_gated_by_verbose() {
        let results = SolutionResults::new(RgbImage::new(4, 4), 3, 1).with_process_ms(2.5);
        assert_eq!(results.clone().with_summary(false).summary, None);
        assert_eq!(
            results.with_summary(true).summary.as_deref(),
            Some("🚀 Results 🚀: total_tracks=3, frame_tracks=1, process_ms=2.5")
        );
    }
}
