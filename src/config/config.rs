// 编辑器配置
//
// 职责：缓冲区合并阈值、写入缓冲大小、可打开文件大小上限

use tracing::warn;

use crate::core::buffer::{DEFAULT_CHUNK_SIZE, DEFAULT_MERGE_THRESHOLD};

pub const ENV_MERGE_THRESHOLD: &str = "ZNOTE_MERGE_THRESHOLD";
pub const ENV_WRITE_BUFFER: &str = "ZNOTE_WRITE_BUFFER";
pub const ENV_MAX_FILE_SIZE: &str = "ZNOTE_MAX_FILE_SIZE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Piece数量超过该值时合并相邻Piece
    pub merge_threshold: usize,
    /// 保存时 BufWriter 的容量（字节）
    pub write_buffer_size: usize,
    /// 允许读入的最大文件大小（字节），None 表示不限
    pub max_file_size: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            merge_threshold: DEFAULT_MERGE_THRESHOLD,
            write_buffer_size: DEFAULT_CHUNK_SIZE,
            max_file_size: None,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，无法解析的值保留默认
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = parse_var::<usize>(&lookup, ENV_MERGE_THRESHOLD) {
            config.merge_threshold = value.max(1);
        }
        if let Some(value) = parse_var::<usize>(&lookup, ENV_WRITE_BUFFER) {
            config.write_buffer_size = value.max(1);
        }
        if let Some(value) = parse_var::<u64>(&lookup, ENV_MAX_FILE_SIZE) {
            config.max_file_size = Some(value);
        }

        config
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "忽略无法解析的配置项");
            None
        }
    }
}
