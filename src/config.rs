// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 解决方案配置 - 可通过JSON文件调整参数

use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{Result, SolutionError};

static POINT_RE: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"(-?\d+)\s*,\s*(-?\d+)"));
static SEPARATOR_RE: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[\s()\[\],;]*$"));

/// 所有解决方案共享的配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolutionConfig {
    /// 跟踪区域顶点, None 表示使用默认矩形
    pub region: Option<Vec<(i32, i32)>>,
    /// 线宽, None 表示按画面尺寸自动计算
    pub line_width: Option<u32>,
    /// 结果中是否附带文字摘要
    pub verbose: bool,
    /// 标注画面保存目录, None 表示不保存
    pub save_dir: Option<String>,
    /// 标签字体 (TTF/OTF) 路径
    pub font: Option<String>,
}

impl Default for SolutionConfig {
    fn default() -> Self {
        Self {
            region: None,
            line_width: Some(2),
            verbose: true,
            save_dir: None,
            font: None,
        }
    }
}

impl SolutionConfig {
    /// 从JSON文件加载配置
    pub fn load(path: &str) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        info!("config loaded from {}", path);
        Ok(config)
    }

    /// 加载配置; 文件不存在时创建默认配置
    pub fn load_or_default(path: &str) -> Result<Self> {
        if fs::metadata(path).is_ok() {
            return Self::load(path);
        }
        warn!("config {} not found, writing defaults", path);
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// 保存配置到JSON文件
    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("config saved to {}", path);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.line_width == Some(0) {
            return Err(SolutionError::InvalidConfig(
                "line_width must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// 打印当前配置
    pub fn log_summary(&self) {
        match &self.region {
            Some(points) => info!("  region: {:?}", points),
            None => info!("  region: default"),
        }
        match self.line_width {
            Some(lw) => info!("  line_width: {}", lw),
            None => info!("  line_width: auto"),
        }
        info!("  verbose: {}", self.verbose);
        if let Some(dir) = &self.save_dir {
            info!("  save_dir: {}", dir);
        }
    }
}

/// 解析区域文本
///
/// 支持 `"150,150 1130,150 1130,570 150,570"` 或 `"[(150, 150), (1130, 150), ...]"`
pub fn parse_region(text: &str) -> Result<Vec<(i32, i32)>> {
    let point_re = POINT_RE
        .as_ref()
        .map_err(|e| SolutionError::InvalidConfig(e.to_string()))?;
    let separator_re = SEPARATOR_RE
        .as_ref()
        .map_err(|e| SolutionError::InvalidConfig(e.to_string()))?;

    let invalid = || SolutionError::InvalidConfig(format!("cannot parse region {:?}", text));

    let rest = point_re.replace_all(text, "");
    if !separator_re.is_match(&rest) {
        return Err(invalid());
    }

    let points = point_re
        .captures_iter(text)
        .map(|cap| {
            let x = cap[1].parse::<i32>().map_err(|_| invalid())?;
            let y = cap[2].parse::<i32>().map_err(|_| invalid())?;
            Ok((x, y))
        })
        .collect::<Result<Vec<_>>>()?;

    if points.is_empty() {
        return Err(invalid());
    }
    Ok(points)
}
