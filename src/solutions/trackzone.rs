// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 区域跟踪 (TrackZone)
//!
//! 只跟踪多边形区域内的目标:
//! 1. 用区域掩码遮住画面, 检测器只能看到区域内的像素
//! 2. 提取带跟踪ID的检测结果
//! 3. 累计区域内出现过的不同跟踪ID
//! 4. 在原始画面上绘制区域轮廓与目标标签

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use ab_glyph::FontArc;
use image::RgbImage;
use log::{debug, info, warn};

use super::annotator::{load_font, Colors, SolutionAnnotator, WHITE};
use super::{FrameProcessor, SolutionResults};
use crate::config::SolutionConfig;
use crate::detection::{ClassNames, TrackExtractor};
use crate::error::{Result, SolutionError};
use crate::region::Region;
use crate::utils::mask::mask_frame;

pub struct TrackZone<E: TrackExtractor> {
    cfg: SolutionConfig,
    region: Region,
    extractor: E,
    names: ClassNames,
    font: Option<FontArc>,

    /// 区域内出现过的所有跟踪ID (只增不减, reset 时清空)
    track_ids: HashSet<u32>,
    /// 首帧尺寸, 后续帧必须一致
    frame_size: Option<(u32, u32)>,
    frames_processed: u64,
}

impl<E: TrackExtractor> TrackZone<E> {
    /// 校验配置并构建区域; 区域无效时直接失败
    pub fn new(cfg: SolutionConfig, extractor: E, names: ClassNames) -> Result<Self> {
        cfg.validate()?;
        let region = Region::build(cfg.region.as_deref())?;

        if let Some(dir) = &cfg.save_dir {
            std::fs::create_dir_all(dir)?;
        }
        let font = load_font(cfg.font.as_deref());

        info!(
            "TrackZone ready: {} region vertices, {} classes",
            region.len(),
            names.len()
        );

        Ok(Self {
            cfg,
            region,
            extractor,
            names,
            font,
            track_ids: HashSet::new(),
            frame_size: None,
            frames_processed: 0,
        })
    }

    /// 替换标签字体
    pub fn with_font(mut self, font: Option<FontArc>) -> Self {
        self.font = font;
        self
    }

    pub fn config(&self) -> &SolutionConfig {
        &self.cfg
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// 重新配置区域; 累计计数保留
    pub fn set_region(&mut self, points: Option<&[(i32, i32)]>) -> Result<()> {
        self.region = Region::build(points)?;
        self.cfg.region = points.map(<[(i32, i32)]>::to_vec);
        info!("TrackZone region replaced: {:?}", self.region.points());
        Ok(())
    }

    /// 清空累计状态
    pub fn reset(&mut self) {
        self.track_ids.clear();
        self.frame_size = None;
        self.frames_processed = 0;
    }

    pub fn total_tracks(&self) -> usize {
        self.track_ids.len()
    }

    /// 已出现的跟踪ID (升序)
    pub fn track_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.track_ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    pub fn extractor_mut(&mut self) -> &mut E {
        &mut self.extractor
    }

    /// 处理一帧: 掩码 → 提取 → 累计 → 绘制
    ///
    /// 出错时累计状态保持不变
    pub fn trackzone(&mut self, im0: &RgbImage) -> Result<SolutionResults> {
        let start = Instant::now();
        let (width, height) = im0.dimensions();

        if width == 0 || height == 0 {
            return Err(SolutionError::EmptyFrame { width, height });
        }
        if let Some(expected) = self.frame_size {
            if expected != (width, height) {
                return Err(SolutionError::FrameSizeMismatch {
                    expected,
                    actual: (width, height),
                });
            }
        }

        // 只从掩码后的画面中提取目标
        let masked = mask_frame(im0, &self.region)?;
        let detections = self
            .extractor
            .extract(&masked)
            .map_err(SolutionError::extractor)?;

        // 先解析所有标签, 类别越界时不更新任何状态
        let labels = detections
            .iter()
            .map(|det| -> Result<String> {
                Ok(format!("{}:{}", self.names.get(det.class_id)?, det.track_id))
            })
            .collect::<Result<Vec<String>>>()?;

        self.track_ids.extend(detections.iter().map(|det| det.track_id));
        self.frame_size = Some((width, height));
        let frame_index = self.frames_processed;
        self.frames_processed += 1;

        let mut plot_im = im0.clone();
        {
            let mut annotator =
                SolutionAnnotator::new(&mut plot_im, self.cfg.line_width, self.font.as_ref());
            let thickness = annotator.line_width() * 2;
            annotator.draw_region(self.region.points(), WHITE, thickness);
            for (det, label) in detections.iter().zip(&labels) {
                annotator.box_label(&det.bbox, label, Colors::get(det.track_id));
            }
        }

        self.display_output(&plot_im, frame_index);

        let results = SolutionResults::new(plot_im, self.track_ids.len(), detections.len())
            .with_process_ms(start.elapsed().as_secs_f64() * 1000.0)
            .with_summary(self.cfg.verbose);

        debug!(
            "frame {}: {} in zone, {} total",
            frame_index, results.frame_tracks, results.total_tracks
        );
        if let Some(summary) = &results.summary {
            info!("{}", summary);
        }
        Ok(results)
    }

    /// 保存标注画面 (失败只记录警告)
    fn display_output(&self, plot_im: &RgbImage, frame_index: u64) {
        let Some(dir) = &self.cfg.save_dir else {
            return;
        };
        let path = Path::new(dir).join(format!("frame_{:06}.jpg", frame_index));
        if let Err(e) = plot_im.save(&path) {
            warn!("failed to save {}: {}", path.display(), e);
        }
    }
}

impl<E: TrackExtractor> FrameProcessor for TrackZone<E> {
    fn name(&self) -> &'static str {
        "trackzone"
    }

    fn process(&mut self, frame: &RgbImage) -> Result<SolutionResults> {
        self.trackzone(frame)
    }
}
