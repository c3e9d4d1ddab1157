// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 区域跟踪数据结构定义
/// Data structures for zone tracking
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolutionError};

// ========== 数据结构 ==========

/// 检测框 (Detection bounding box), 像素坐标 x1y1x2y2
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// 获取中心点
    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// 裁剪到画面内的整数像素范围 `[x0, x1) x [y0, y1)`, 完全在画面外时返回 None
    pub fn clip_to(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x1.floor().max(0.0).min(width as f32) as u32;
        let y0 = self.y1.floor().max(0.0).min(height as f32) as u32;
        let x1 = self.x2.ceil().max(0.0).min(width as f32) as u32;
        let y1 = self.y2.ceil().max(0.0).min(height as f32) as u32;
        (x1 > x0 && y1 > y0).then_some((x0, y0, x1, y1))
    }
}

impl From<[f32; 4]> for BBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// 跟踪结果: 一个目标在一帧中的检测框 + 跟踪ID + 类别
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BBox,
    /// 外部跟踪器分配的ID, 同一目标跨帧保持不变
    pub track_id: u32,
    /// 类别索引 (ClassNames 中的下标)
    pub class_id: usize,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

impl Detection {
    pub fn new(bbox: BBox, track_id: u32, class_id: usize) -> Self {
        Self {
            bbox,
            track_id,
            class_id,
            confidence: default_confidence(),
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }
}

/// COCO 80 类名称
pub const COCO_NAMES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich", "orange",
    "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch", "potted plant",
    "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote", "keyboard", "cell phone",
    "microwave", "oven", "toaster", "sink", "refrigerator", "book", "clock", "vase", "scissors",
    "teddy bear", "hair drier", "toothbrush",
];

/// 类别名称表 (只读), 类别索引 → 显示名称
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassNames(Vec<String>);

impl ClassNames {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn coco() -> Self {
        Self(COCO_NAMES.iter().map(|s| s.to_string()).collect())
    }

    /// 从JSON数组文件加载, 例如 `["person", "car"]`
    pub fn load(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// 索引越界时返回 `UnknownClass`, 不猜测默认名称
    pub fn get(&self, class_id: usize) -> Result<&str> {
        self.0
            .get(class_id)
            .map(String::as_str)
            .ok_or(SolutionError::UnknownClass {
                class_id,
                num_classes: self.0.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        Self::coco()
    }
}
