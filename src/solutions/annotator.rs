// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 解决方案绘制器 (Solution annotator)
//!
//! 每次处理时基于当前画面创建, 处理结束即释放, 不跨帧保留。

use std::path::PathBuf;

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut,
    draw_polygon_mut, draw_text_mut, text_size,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use log::{info, warn};
use once_cell::sync::Lazy;

use crate::detection::BBox;

/// Ultralytics 调色板
const PALETTE_HEX: [&str; 20] = [
    "FF3838", "FF9D97", "FF701F", "FFB21D", "CFD231", "48F90A", "92CC17", "3DDB86", "1A9334",
    "00D4BB", "2C99A8", "00C2FF", "344593", "6473FF", "0018EC", "8438FF", "520085", "CB38FF",
    "FF95C8", "FF37C7",
];

static PALETTE: Lazy<Vec<Rgb<u8>>> =
    Lazy::new(|| PALETTE_HEX.iter().map(|h| hex_to_rgb(h)).collect());

fn hex_to_rgb(hex: &str) -> Rgb<u8> {
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    Rgb([channel(0), channel(2), channel(4)])
}

/// 颜色表: 同一ID始终得到同一颜色
pub struct Colors;

impl Colors {
    pub fn get(index: u32) -> Rgb<u8> {
        PALETTE[index as usize % PALETTE.len()]
    }

    pub fn len() -> usize {
        PALETTE.len()
    }
}

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// 自动线宽: max(round((w + h + 3) / 2 * 0.003), 2)
pub fn auto_line_width(width: u32, height: u32) -> u32 {
    let sum = (width + height + 3) as f32;
    ((sum / 2.0 * 0.003).round() as u32).max(2)
}

/// 自动字号: max(round((w + h) / 2 * 0.035), 12)
pub fn auto_font_size(width: u32, height: u32) -> f32 {
    ((width + height) as f32 / 2.0 * 0.035).round().max(12.0)
}

/// 加载标签字体
///
/// 优先使用配置路径, 否则尝试 `<config_dir>/Ultralytics/Arial.ttf`;
/// 找不到字体时只绘制标签底色, 不绘制文字
pub fn load_font(path: Option<&str>) -> Option<FontArc> {
    let candidate = match path {
        Some(p) => PathBuf::from(p),
        None => dirs::config_dir()?.join("Ultralytics").join("Arial.ttf"),
    };

    let bytes = match std::fs::read(&candidate) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("label font not found at {}: {}", candidate.display(), e);
            return None;
        }
    };
    match FontArc::try_from_vec(bytes) {
        Ok(font) => {
            info!("label font loaded from {}", candidate.display());
            Some(font)
        }
        Err(e) => {
            warn!("label font {} is invalid: {}", candidate.display(), e);
            None
        }
    }
}

/// 按背景亮度选择文字颜色
fn text_color(background: Rgb<u8>) -> Rgb<u8> {
    let [r, g, b] = background.0;
    let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    if luma > 160.0 {
        BLACK
    } else {
        WHITE
    }
}

pub struct SolutionAnnotator<'a> {
    im: &'a mut RgbImage,
    line_width: u32,
    font: Option<&'a FontArc>,
    font_size: f32,
}

impl<'a> SolutionAnnotator<'a> {
    /// `line_width` 为 None 时按画面尺寸自动计算
    pub fn new(im: &'a mut RgbImage, line_width: Option<u32>, font: Option<&'a FontArc>) -> Self {
        let (w, h) = im.dimensions();
        Self {
            line_width: line_width.unwrap_or_else(|| auto_line_width(w, h)).max(1),
            font_size: auto_font_size(w, h),
            im,
            font,
        }
    }

    pub fn line_width(&self) -> u32 {
        self.line_width
    }

    /// 绘制闭合区域轮廓
    pub fn draw_region(&mut self, points: &[(i32, i32)], color: Rgb<u8>, thickness: u32) {
        let n = points.len();
        if n < 2 {
            return;
        }
        for i in 0..n {
            self.draw_segment(points[i], points[(i + 1) % n], color, thickness);
        }
    }

    /// 绘制检测框与标签 (标签优先放在框上方)
    pub fn box_label(&mut self, bbox: &BBox, label: &str, color: Rgb<u8>) {
        // 坐标限制在画面外扩一圈的范围内, 之后的整数运算不会溢出
        let margin = self.line_width as i32 + 1;
        let (w, h) = (self.im.width() as i32, self.im.height() as i32);
        let clamp_x = |v: f32| (v.round() as i32).clamp(-margin, w + margin);
        let clamp_y = |v: f32| (v.round() as i32).clamp(-margin, h + margin);
        let (x1, y1) = (clamp_x(bbox.x1), clamp_y(bbox.y1));
        let (x2, y2) = (clamp_x(bbox.x2), clamp_y(bbox.y2));

        for i in 0..self.line_width as i32 {
            let (w, h) = (x2 - x1 - 2 * i, y2 - y1 - 2 * i);
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at(x1 + i, y1 + i).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(self.im, rect, color);
        }

        if label.is_empty() {
            return;
        }

        let scale = PxScale::from(self.font_size);
        let (tw, th) = match self.font {
            Some(font) => text_size(scale, font, label),
            // 无字体时按等宽字符估算
            None => (
                (label.chars().count() as f32 * self.font_size * 0.6).ceil() as u32,
                self.font_size.ceil() as u32,
            ),
        };
        let pad = self.line_width.max(2) as i32;
        let strip_h = th as i32 + 2 * pad;
        let strip_w = tw as i32 + 2 * pad;

        let outside = y1 - strip_h >= 0;
        let top = if outside { y1 - strip_h } else { y1 };
        let left = x1.clamp(0, (self.im.width() as i32 - strip_w).max(0));

        draw_filled_rect_mut(
            self.im,
            Rect::at(left, top).of_size(strip_w as u32, strip_h as u32),
            color,
        );
        if let Some(font) = self.font {
            draw_text_mut(
                self.im,
                text_color(color),
                left + pad,
                top + pad,
                scale,
                font,
                label,
            );
        }
    }

    fn draw_segment(&mut self, p0: (i32, i32), p1: (i32, i32), color: Rgb<u8>, thickness: u32) {
        if thickness <= 1 {
            draw_line_segment_mut(
                self.im,
                (p0.0 as f32, p0.1 as f32),
                (p1.0 as f32, p1.1 as f32),
                color,
            );
            return;
        }

        let (dx, dy) = ((p1.0 - p0.0) as f32, (p1.1 - p0.1) as f32);
        let len = (dx * dx + dy * dy).sqrt();
        if len < f32::EPSILON {
            return;
        }
        // 法向量, 长度为半线宽
        let half = thickness as f32 / 2.0;
        let (nx, ny) = (-dy / len * half, dx / len * half);
        let offset = |p: (i32, i32), s: f32| {
            Point::new(
                (p.0 as f32 + nx * s).round() as i32,
                (p.1 as f32 + ny * s).round() as i32,
            )
        };
        let quad = [
            offset(p0, 1.0),
            offset(p1, 1.0),
            offset(p1, -1.0),
            offset(p0, -1.0),
        ];
        draw_polygon_mut(self.im, &quad, color);

        // 圆形端点, 避免拐角处出现缺口
        let radius = (half.round() as i32).max(1);
        draw_filled_circle_mut(self.im, p0, radius, color);
        draw_filled_circle_mut(self.im, p1, radius, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_are_deterministic() {
        assert_eq!(Colors::len(), 20);
        assert_eq!(Colors::get(0), Rgb([0xFF, 0x38, 0x38]));
        assert_eq!(Colors::get(7), Colors::get(27));
        assert_ne!(Colors::get(7), Colors::get(8));
    }

    #[test]
    fn test_auto_sizes() {
        assert_eq!(auto_line_width(1280, 720), 3);
        assert_eq!(auto_line_width(64, 48), 2);
        assert_eq!(auto_font_size(1280, 720), 35.0);
        assert_eq!(auto_font_size(10, 10), 12.0);
    }

    #[test]
    fn test_text_color() {
        assert_eq!(text_color(WHITE), BLACK);
        assert_eq!(text_color(Rgb([0x34, 0x45, 0x93])), WHITE);
    }

    #[test]
    fn test_draw_region_outline() {
        let mut im = RgbImage::new(200, 200);
        let mut annotator = SolutionAnnotator::new(&mut im, Some(2), None);
        annotator.draw_region(&[(20, 20), (180, 20), (180, 180), (20, 180)], WHITE, 4);

        assert_eq!(*im.get_pixel(100, 20), WHITE);
        assert_eq!(*im.get_pixel(20, 100), WHITE);
        // 区域内部不被填充
        assert_eq!(*im.get_pixel(100, 100), BLACK);
        assert_eq!(*im.get_pixel(5, 5), BLACK);
    }

    #[test]
    fn test_box_label_without_font() {
        let mut im = RgbImage::new(300, 300);
        let color = Colors::get(7);
        let mut annotator = SolutionAnnotator::new(&mut im, Some(2), None);
        annotator.box_label(&BBox::new(100.0, 100.0, 160.0, 160.0), "person:7", color);

        // 边框
        assert_eq!(*im.get_pixel(100, 130), color);
        assert_eq!(*im.get_pixel(101, 130), color);
        assert_eq!(*im.get_pixel(130, 159), color);
        // 框内不填充
        assert_eq!(*im.get_pixel(130, 130), BLACK);
        // 标签底色在框上方
        assert_eq!(*im.get_pixel(104, 95), color);
    }

    #[test]
    fn test_box_label_at_border() {
        let mut im = RgbImage::new(50, 50);
        let mut annotator = SolutionAnnotator::new(&mut im, None, None);
        annotator.box_label(&BBox::new(-10.0, -10.0, 70.0, 70.0), "car:1", WHITE);
        annotator.box_label(&BBox::new(10.0, 10.0, 10.0, 10.0), "", WHITE);
    }

    #[test]
    fn test_box_label_huge_coordinates() {
        let mut im = RgbImage::new(100, 100);
        let color = Colors::get(3);
        let mut annotator = SolutionAnnotator::new(&mut im, Some(2), None);
        annotator.box_label(&BBox::new(-3e9, -3e9, 3e9, 3e9), "person:1", color);
        annotator.box_label(&BBox::new(f32::MIN, 20.0, 40.0, 60.0), "car:2", color);

        // 超大框的边框落在画面外, 内部不被填充
        assert_eq!(*im.get_pixel(50, 50), BLACK);
        // 左侧无限延伸的框只能看到右边框
        assert_eq!(*im.get_pixel(39, 40), color);
        assert_eq!(*im.get_pixel(20, 40), BLACK);
    }
}
