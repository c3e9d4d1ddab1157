// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
pub mod config; // 解决方案配置参数
pub mod detection; // 检测与跟踪接口
pub mod error; // 错误类型
pub mod region; // 跟踪区域
pub mod solutions; // 视频分析解决方案
pub mod utils; // 工具模块

pub use crate::config::{parse_region, SolutionConfig};
pub use crate::detection::{BBox, ClassNames, Detection, ReplayExtractor, TrackExtractor};
pub use crate::error::{Result, SolutionError};
pub use crate::region::{Region, DEFAULT_REGION};
pub use crate::solutions::{FrameProcessor, SolutionResults, TrackZone};

/// 生成时间字符串, 用于输出目录命名
pub fn gen_time_string(delimiter: &str) -> String {
    let t_now = chrono::Local::now();
    let fmt = format!(
        "%Y{}%m{}%d{}%H{}%M{}%S",
        delimiter, delimiter, delimiter, delimiter, delimiter
    );
    t_now.format(&fmt).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_time_string() {
        let s = gen_time_string("-");
        assert_eq!(s.split('-').count(), 6);
        assert!(s.chars().all(|c| c.is_ascii_digit() || c == '-'));
    }
}
