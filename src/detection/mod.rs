/// 检测与跟踪接口 (Detection & tracking interface)
///
/// 检测/跟踪模型本身由外部提供, 这里只定义数据结构与接入方式
/// - TrackExtractor: 掩码画面 → 带跟踪ID的检测结果
/// - ReplayExtractor: 回放预先导出的跟踪结果
/// - ClassNames:     类别索引 → 显示名称
pub mod extractor;
pub mod replay;
pub mod types;

pub use extractor::TrackExtractor;
pub use replay::{FrameTracks, ReplayExtractor};
pub use types::{BBox, ClassNames, Detection, COCO_NAMES};
