// 错误类型
//
// 职责：定义编辑器核心向调用方返回的全部错误，
//       所有错误均以值返回，不中止进程

use std::path::{Path, PathBuf};

use thiserror::Error;

/// 编辑器核心错误
#[derive(Debug, Error)]
pub enum EditorError {
    /// 读写文件失败（缺失、权限、编码、磁盘满等）
    #[error("无法访问 '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 搜索词为空
    #[error("请输入要搜索的文本")]
    EmptyQuery,
}

impl EditorError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        EditorError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// 底层 IO 错误类型（非 IO 错误返回 None）
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            EditorError::Io { source, .. } => Some(source.kind()),
            EditorError::EmptyQuery => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
