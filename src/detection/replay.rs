// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 回放提取器 (Replay extractor)
//!
//! 回放外部跟踪器预先导出的结果, 不需要神经网络即可驱动区域跟踪流水线。
//!
//! JSON 格式:
//! ```json
//! [
//!   { "frame": 0, "detections": [ { "bbox": [200, 200, 260, 260], "track_id": 7, "class_id": 0 } ] },
//!   { "frame": 1, "detections": [] }
//! ]
//! ```

use std::collections::BTreeMap;

use anyhow::Context;
use image::RgbImage;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::extractor::TrackExtractor;
use super::types::Detection;

/// 单帧的跟踪结果
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameTracks {
    pub frame: u64,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

pub struct ReplayExtractor {
    frames: BTreeMap<u64, Vec<Detection>>,
    cursor: u64,
    /// 丢弃在掩码画面中完全不可见的目标
    visibility_check: bool,
}

impl ReplayExtractor {
    pub fn new(frames: Vec<FrameTracks>) -> Self {
        let frames = frames
            .into_iter()
            .map(|f| (f.frame, f.detections))
            .collect();
        Self {
            frames,
            cursor: 0,
            visibility_check: true,
        }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let frames: Vec<FrameTracks> =
            serde_json::from_str(json).context("failed to parse replay tracks")?;
        Ok(Self::new(frames))
    }

    /// 从JSON文件加载
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read replay tracks from {}", path))?;
        Self::from_json(&json)
    }

    pub fn with_visibility_check(mut self, enabled: bool) -> Self {
        self.visibility_check = enabled;
        self
    }

    /// 下一次 `extract` 将回放的帧序号
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl TrackExtractor for ReplayExtractor {
    fn extract(&mut self, frame: &RgbImage) -> anyhow::Result<Vec<Detection>> {
        let index = self.cursor;
        self.cursor += 1;

        let Some(recorded) = self.frames.get(&index) else {
            if self.frames.keys().next_back().map_or(true, |&last| index > last) {
                warn!("replay data exhausted at frame {}", index);
            }
            return Ok(Vec::new());
        };

        let detections: Vec<Detection> = recorded
            .iter()
            .filter(|det| !self.visibility_check || is_visible(frame, det))
            .cloned()
            .collect();

        if detections.len() != recorded.len() {
            debug!(
                "frame {}: dropped {} masked-out detections",
                index,
                recorded.len() - detections.len()
            );
        }
        Ok(detections)
    }
}

/// 检测框内是否存在非零像素 (掩码外的像素全部为零)
fn is_visible(frame: &RgbImage, det: &Detection) -> bool {
    let Some((x0, y0, x1, y1)) = det.bbox.clip_to(frame.width(), frame.height()) else {
        return false;
    };
    (y0..y1).any(|y| (x0..x1).any(|x| frame.get_pixel(x, y).0 != [0, 0, 0]))
}
