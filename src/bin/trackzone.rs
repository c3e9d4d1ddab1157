// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 区域跟踪 (TrackZone)
///
/// 读取图片序列 + 外部跟踪器导出的跟踪结果, 只统计区域内的目标,
/// 并保存标注后的画面。
///
/// 直接运行: cargo run --bin trackzone --release -- --source frames/ --tracks tracks.json
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use trackzone::{
    gen_time_string, parse_region, ClassNames, FrameProcessor, ReplayExtractor, SolutionConfig,
    TrackZone,
};

/// 区域跟踪参数
#[derive(Parser, Debug)]
#[command(author, version, about = "TrackZone - 区域内目标跟踪与计数", long_about = None)]
struct Args {
    /// 图片目录或单张图片
    #[arg(short, long)]
    source: String,

    /// 跟踪结果 JSON (逐帧的检测框 + 跟踪ID + 类别)
    #[arg(short, long)]
    tracks: String,

    /// 配置文件 (JSON), 命令行参数优先
    #[arg(short, long)]
    config: Option<String>,

    /// 区域顶点, 例如 "150,150 1130,150 1130,570 150,570"
    #[arg(short, long)]
    region: Option<String>,

    /// 线宽
    #[arg(long)]
    line_width: Option<u32>,

    /// 输出每帧摘要: --verbose true / --verbose false (默认取配置文件, 否则开启)
    #[arg(short, long)]
    verbose: Option<bool>,

    /// 标注画面保存目录 (默认 runs/trackzone/<时间>)
    #[arg(long)]
    save_dir: Option<String>,

    /// 类别名称 JSON 数组 (默认 COCO 80 类)
    #[arg(long)]
    names: Option<String>,

    /// 标签字体路径
    #[arg(long)]
    font: Option<String>,
}

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// 收集输入帧 (按文件名排序)
fn collect_frames(source: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(source);
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut frames: Vec<PathBuf> = std::fs::read_dir(path)
        .with_context(|| format!("cannot read source {}", source))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        })
        .collect();
    frames.sort();

    if frames.is_empty() {
        bail!("no images found in {}", source);
    }
    Ok(frames)
}

fn build_config(args: &Args) -> Result<SolutionConfig> {
    let mut cfg = match &args.config {
        Some(path) => SolutionConfig::load(path)?,
        None => SolutionConfig::default(),
    };

    if let Some(text) = &args.region {
        cfg.region = Some(parse_region(text)?);
    }
    if args.line_width.is_some() {
        cfg.line_width = args.line_width;
    }
    if let Some(verbose) = args.verbose {
        cfg.verbose = verbose;
    }
    if args.font.is_some() {
        cfg.font = args.font.clone();
    }
    cfg.save_dir = args
        .save_dir
        .clone()
        .or(cfg.save_dir)
        .or_else(|| Some(format!("runs/trackzone/{}", gen_time_string(""))));
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cfg = build_config(&args)?;
    let names = match &args.names {
        Some(path) => ClassNames::load(path)?,
        None => ClassNames::coco(),
    };
    let extractor = ReplayExtractor::load(&args.tracks)?;
    let frames = collect_frames(&args.source)?;

    info!("🚀 TrackZone 启动");
    info!("📹 输入: {} ({} 帧)", args.source, frames.len());
    info!("🎯 跟踪结果: {} ({} 帧有记录)", args.tracks, extractor.len());
    cfg.log_summary();

    let mut zone = TrackZone::new(cfg, extractor, names)?;
    info!("📐 区域: {:?}", zone.region().points());

    for path in &frames {
        let frame = image::open(path)
            .with_context(|| format!("cannot open frame {}", path.display()))?
            .to_rgb8();
        zone.process(&frame)
            .with_context(|| format!("{} failed on {}", zone.name(), path.display()))?;
    }

    info!(
        "✅ 完成: {} 帧, 区域内累计 {} 个目标",
        zone.frames_processed(),
        zone.total_tracks()
    );
    if let Some(dir) = &zone.config().save_dir {
        info!("💾 结果已保存到 {}", dir);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["trackzone", "--source", "frames", "--tracks", "tracks.json"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_verbose_flag_overrides_default() {
        assert!(build_config(&args(&[])).unwrap().verbose);
        assert!(!build_config(&args(&["--verbose", "false"])).unwrap().verbose);
        assert!(build_config(&args(&["-v", "true"])).unwrap().verbose);
    }

    #[test]
    fn test_cli_overrides() {
        let cfg = build_config(&args(&[
            "--region",
            "0,0 100,0 100,100",
            "--line-width",
            "5",
            "--save-dir",
            "out",
        ]))
        .unwrap();
        assert_eq!(cfg.region, Some(vec![(0, 0), (100, 0), (100, 100)]));
        assert_eq!(cfg.line_width, Some(5));
        assert_eq!(cfg.save_dir.as_deref(), Some("out"));
    }
}
