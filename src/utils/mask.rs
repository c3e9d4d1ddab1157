// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 区域掩码工具模块
/// 实现类似于 cv2::fillPoly + cv2::bitwise_and 的功能
use image::{GrayImage, ImageBuffer, Luma, Pixel};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use crate::error::{Result, SolutionError};
use crate::region::Region;

/// 掩码中"保留"像素的取值
pub const MASK_KEEP: u8 = 255;

/// 生成区域掩码: 区域内 255, 区域外 0
///
/// 超出画面的部分由掩码自身尺寸裁剪
pub fn region_mask(width: u32, height: u32, region: &Region) -> Result<GrayImage> {
    if width == 0 || height == 0 {
        return Err(SolutionError::EmptyFrame { width, height });
    }

    let mut mask = GrayImage::new(width, height);
    let poly: Vec<Point<i32>> = region
        .points()
        .iter()
        .map(|&(x, y)| Point::new(x, y))
        .collect();
    draw_polygon_mut(&mut mask, &poly, Luma([MASK_KEEP]));
    Ok(mask)
}

/// 按掩码保留像素, 其余通道全部置零 (不修改输入)
pub fn apply_mask<P>(
    frame: &ImageBuffer<P, Vec<u8>>,
    mask: &GrayImage,
) -> Result<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
{
    if frame.dimensions() != mask.dimensions() {
        return Err(SolutionError::FrameSizeMismatch {
            expected: mask.dimensions(),
            actual: frame.dimensions(),
        });
    }

    let mut masked = frame.clone();
    for (pixel, keep) in masked.pixels_mut().zip(mask.pixels()) {
        if keep[0] == 0 {
            pixel.channels_mut().iter_mut().for_each(|c| *c = 0);
        }
    }
    Ok(masked)
}

/// 掩码 + 按位与: 只有区域内的像素对检测器可见
pub fn mask_frame<P>(
    frame: &ImageBuffer<P, Vec<u8>>,
    region: &Region,
) -> Result<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = frame.dimensions();
    let mask = region_mask(width, height, region)?;
    apply_mask(frame, &mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_mask_values() {
        let region = Region::build(None).unwrap();
        let mask = region_mask(1280, 720, &region).unwrap();
        assert_eq!(mask.dimensions(), (1280, 720));
        assert!(mask.pixels().all(|p| p[0] == 0 || p[0] == MASK_KEEP));
        assert_eq!(mask.get_pixel(640, 360)[0], MASK_KEEP);
        assert_eq!(mask.get_pixel(10, 10)[0], 0);
    }

    #[test]
    fn test_solid_frame_outside_is_zero() {
        let region = Region::build(None).unwrap();
        let color = Rgb([12u8, 200, 77]);
        let frame = RgbImage::from_pixel(1280, 720, color);

        let masked = mask_frame(&frame, &region).unwrap();

        // 边界包含在区域内: [150, 1130] x [150, 570]
        for (x, y, p) in masked.enumerate_pixels() {
            if (150..=1130).contains(&x) && (150..=570).contains(&y) {
                assert_eq!(*p, color, "pixel ({x}, {y}) inside the region changed");
            } else {
                assert_eq!(*p, Rgb([0, 0, 0]), "pixel ({x}, {y}) outside the region kept");
            }
        }
        // 输入帧保持不变
        assert!(frame.pixels().all(|p| *p == color));
    }

    #[test]
    fn test_region_partly_outside_frame() {
        let region =
            Region::from_points(&[(-50, -50), (100, -50), (100, 100), (-50, 100)]).unwrap();
        let frame = RgbaImage::from_pixel(200, 200, Rgba([9, 9, 9, 255]));
        let masked = mask_frame(&frame, &region).unwrap();
        assert_eq!(*masked.get_pixel(0, 0), Rgba([9, 9, 9, 255]));
        assert_eq!(*masked.get_pixel(50, 50), Rgba([9, 9, 9, 255]));
        assert_eq!(*masked.get_pixel(150, 150), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_region_larger_than_frame() {
        let region =
            Region::from_points(&[(-10, -10), (500, -10), (500, 500), (-10, 500)]).unwrap();
        let frame = RgbImage::from_pixel(64, 48, Rgb([1, 2, 3]));
        let masked = mask_frame(&frame, &region).unwrap();
        assert_eq!(masked, frame);
    }

    #[test]
    fn test_region_outside_frame() {
        let region = Region::from_points(&[(300, 300), (400, 300), (400, 400)]).unwrap();
        let frame = RgbImage::from_pixel(64, 48, Rgb([1, 2, 3]));
        let masked = mask_frame(&frame, &region).unwrap();
        assert!(masked.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_empty_frame() {
        let region = Region::build(None).unwrap();
        let frame = RgbImage::new(0, 10);
        assert!(matches!(
            mask_frame(&frame, &region),
            Err(SolutionError::EmptyFrame { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_mask_size_mismatch() {
        let frame = RgbImage::new(10, 10);
        let mask = GrayImage::new(5, 5);
        assert!(apply_mask(&frame, &mask).is_err());
    }
}
