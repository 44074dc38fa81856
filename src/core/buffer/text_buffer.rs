// 文本缓冲区
//
// 职责：文档内容的唯一来源，独立于任何界面。
//       管理选区与脏标记，读写文件，编辑后通知订阅者

use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::config::Config;
use crate::core::buffer::{remap_offset, BufferChange, ChangeListener, PieceTable, Selection};
use crate::error::{EditorError, Result};
use crate::io::FileIO;

/// 单文档文本缓冲区
///
/// 偏移均为字节偏移；调用方给出的偏移会被截断到 `[0, length]`
/// 并对齐到UTF-8字符边界。
pub struct TextBuffer {
    table: PieceTable,
    selection: Selection,
    cursor: usize,                      // 插入点，随编辑平移
    dirty: bool,
    path: Option<PathBuf>,

    file_io: FileIO,
    merge_threshold: usize,
    listeners: Vec<ChangeListener>,
}

// ========== 构造方法 ==========

impl TextBuffer {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            table: PieceTable::new().with_merge_threshold(config.merge_threshold),
            selection: Selection::default(),
            cursor: 0,
            dirty: false,
            path: None,
            file_io: FileIO::new(config.max_file_size, config.write_buffer_size),
            merge_threshold: config.merge_threshold,
            listeners: Vec::new(),
        }
    }

    /// 从文本创建（未关联文件，非脏）
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.table = PieceTable::from_text(text).with_merge_threshold(buffer.merge_threshold);
        buffer
    }
}

// ========== 查询 ==========

impl TextBuffer {
    /// 当前字节长度
    pub fn length(&self) -> usize {
        self.table.total_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn text(&self) -> String {
        self.table.get_all_text()
    }

    pub fn text_range(&self, range: Range<usize>) -> String {
        self.table.get_text_range(range)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_text(&self) -> String {
        self.table.get_text_range(self.selection.range())
    }

    /// 插入点（粘贴、插入文件和查找的起点）
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 内容是否与上次持久化的状态不同
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 最近一次成功打开或保存的路径
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn piece_table(&self) -> &PieceTable {
        &self.table
    }
}

// ========== 文件操作 ==========

impl TextBuffer {
    /// 用文件内容替换整个文档；失败时文档和脏标记保持不变
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self
            .file_io
            .read_text(path)
            .map_err(|e| EditorError::io(path, e))?;

        self.table = PieceTable::from_text(&text).with_merge_threshold(self.merge_threshold);
        self.selection = Selection::default();
        self.cursor = 0;
        self.dirty = false;
        self.path = Some(path.to_path_buf());

        debug!(path = %path.display(), bytes = self.length(), "文档已加载");
        self.notify(BufferChange::Reloaded { length: self.length() });
        Ok(())
    }

    /// 把当前内容写入 path；成功后清除脏标记并记录路径
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.file_io
            .write_chunks(path, self.table.iter_chunks_default())
            .map_err(|e| EditorError::io(path, e))?;

        self.dirty = false;
        self.path = Some(path.to_path_buf());

        debug!(path = %path.display(), bytes = self.length(), "文档已保存");
        self.notify(BufferChange::Saved);
        Ok(())
    }

    /// 在 at_offset 处插入文件内容，不替换已有内容
    pub fn insert_file(&mut self, path: impl AsRef<Path>, at_offset: usize) -> Result<()> {
        let path = path.as_ref();
        let text = self
            .file_io
            .read_text(path)
            .map_err(|e| EditorError::io(path, e))?;

        let at = self.table.floor_boundary(at_offset);
        self.apply_edit(at..at, &text);

        debug!(path = %path.display(), at, bytes = text.len(), "文件已插入");
        Ok(())
    }

    /// 新建空文档
    pub fn clear(&mut self) {
        self.table = PieceTable::new().with_merge_threshold(self.merge_threshold);
        self.selection = Selection::default();
        self.cursor = 0;
        self.dirty = false;
        self.path = None;

        self.notify(BufferChange::Reloaded { length: 0 });
    }
}

// ========== 选区与编辑 ==========

impl TextBuffer {
    /// 设置选区；越界截断，反向时交换
    pub fn select(&mut self, start: usize, end: usize) {
        let range = self.table.normalize_range(start..end);
        self.selection = Selection::new(range.start, range.end);
    }

    /// 移动插入点；越界截断并对齐字符边界
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = self.table.floor_boundary(offset);
    }

    /// 删除选区内容并返回被删除的文本；选区为空时不做任何事
    pub fn remove_selection(&mut self) -> String {
        if self.selection.is_empty() {
            return String::new();
        }
        self.apply_edit(self.selection.range(), "")
    }

    /// 删除 [start, end) 并在 start 处插入 replacement
    pub fn replace(&mut self, start: usize, end: usize, replacement: &str) {
        let range = self.table.normalize_range(start..end);
        self.apply_edit(range, replacement);
    }

    pub fn insert(&mut self, offset: usize, text: &str) {
        let at = self.table.floor_boundary(offset);
        self.apply_edit(at..at, text);
    }

    /// 从 from_offset 开始向后查找 needle，返回匹配的起始偏移
    ///
    /// 字面量、区分大小写，到文档末尾停止，不回绕。
    pub fn search_forward(&self, from_offset: usize, needle: &str) -> Option<usize> {
        self.table.find_forward(from_offset, needle)
    }

    /// 把所有 needle 替换为 replacement，返回每次替换发生时的偏移
    ///
    /// 结果等同于逐个替换并从 `p + len(replacement)` 继续查找：只匹配原文，
    /// 替换进来的文本不会被再次匹配。整个文档只扫描和重建一次。
    pub fn replace_all(&mut self, needle: &str, replacement: &str) -> Vec<usize> {
        let matches = self.table.find_all(needle);
        if matches.is_empty() {
            return matches;
        }

        self.table.replace_matches(&matches, needle.len(), replacement);
        self.dirty = true;

        // 第 k 个匹配替换时，前面 k 次替换已经改变了它的位置
        let mut edits = Vec::with_capacity(matches.len());
        for (k, original) in matches.into_iter().enumerate() {
            let offset = original - k * needle.len() + k * replacement.len();
            let old_end = offset + needle.len();

            self.selection = self.selection.remap_for_edit(offset, old_end, replacement.len());
            self.cursor = remap_offset(self.cursor, offset, old_end, replacement.len());
            self.notify(BufferChange::Edited {
                offset,
                deleted: needle.len(),
                inserted: replacement.len(),
            });
            edits.push(offset);
        }

        debug!(count = edits.len(), bytes = self.length(), "全部替换完成");
        edits
    }

    /// range 必须已规范化
    fn apply_edit(&mut self, range: Range<usize>, replacement: &str) -> String {
        let deleted = self.table.delete(range.clone());
        self.table.insert(range.start, replacement);

        self.selection = self
            .selection
            .remap_for_edit(range.start, range.end, replacement.len());
        self.cursor = remap_offset(self.cursor, range.start, range.end, replacement.len());
        self.dirty = true;

        trace!(
            offset = range.start,
            deleted = deleted.len(),
            inserted = replacement.len(),
            "缓冲区已编辑"
        );
        self.notify(BufferChange::Edited {
            offset: range.start,
            deleted: deleted.len(),
            inserted: replacement.len(),
        });

        deleted
    }
}

// ========== 变更通知 ==========

impl TextBuffer {
    /// 注册内容变化回调
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&BufferChange) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, change: BufferChange) {
        for listener in &mut self.listeners {
            listener(&change);
        }
    }
}

// ========== 默认实现 ==========

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("length", &self.length())
            .field("selection", &self.selection)
            .field("cursor", &self.cursor)
            .field("dirty", &self.dirty)
            .field("path", &self.path)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
