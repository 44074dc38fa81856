// 文件读写
//
// 职责：整文件读入（含大小上限与UTF-8校验），经临时文件原子地分块写出

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, trace};

/// 文件读写工具
#[derive(Debug, Clone, Copy)]
pub struct FileIO {
    max_file_size: Option<u64>,
    write_buffer_size: usize,
}

impl FileIO {
    pub fn new(max_file_size: Option<u64>, write_buffer_size: usize) -> Self {
        Self {
            max_file_size,
            write_buffer_size: write_buffer_size.max(1),
        }
    }

    /// 读入整个文件为UTF-8文本
    pub fn read_text(&self, path: &Path) -> io::Result<String> {
        if let Some(limit) = self.max_file_size {
            let size = fs::metadata(path)?.len();
            if size > limit {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("文件大小 {size} 字节超过上限 {limit} 字节"),
                ));
            }
        }

        let bytes = fs::read(path)?;
        let len = bytes.len();
        let text = String::from_utf8(bytes).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("不是有效的UTF-8文本（第 {} 字节）", e.utf8_error().valid_up_to()),
            )
        })?;

        debug!(path = %path.display(), bytes = len, "文件已读入");
        Ok(text)
    }

    /// 把文本块依次写入 path
    ///
    /// 先写入同目录下的临时文件并落盘，再改名覆盖目标；
    /// 任何一步失败时原文件保持不变。已有文件的权限会被保留。
    pub fn write_chunks<'a, I>(&self, path: &Path, chunks: I) -> io::Result<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;

        let mut written = 0;
        {
            let mut writer = BufWriter::with_capacity(self.write_buffer_size, temp.as_file_mut());
            for chunk in chunks {
                writer.write_all(chunk.as_bytes())?;
                written += chunk.len();
                trace!(bytes = chunk.len(), "写入块");
            }
            writer.flush()?;
        }

        if let Ok(metadata) = fs::metadata(path) {
            temp.as_file().set_permissions(metadata.permissions())?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;

        debug!(path = %path.display(), bytes = written, "文件已写出");
        Ok(written)
    }
}

impl Default for FileIO {
    fn default() -> Self {
        Self::new(None, crate::core::buffer::DEFAULT_CHUNK_SIZE)
    }
}
