// 选区
//
// 职责：表示 [start, end) 字节范围，编辑后重新映射

use std::ops::Range;

/// 选区，start == end 时表示插入点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    pub fn caret(offset: usize) -> Self {
        Self { start: offset, end: offset }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// 把 [start, old_end) 替换为 new_len 字节后的选区
    pub fn remap_for_edit(self, start: usize, old_end: usize, new_len: usize) -> Self {
        Self::new(
            remap_offset(self.start, start, old_end, new_len),
            remap_offset(self.end, start, old_end, new_len),
        )
    }
}

/// 把 [start, old_end) 替换为 new_len 字节后，offset 对应的新位置
///
/// 编辑点之前不变，之后按长度差平移，落在被替换区间内的移到插入文本之后。
pub fn remap_offset(offset: usize, start: usize, old_end: usize, new_len: usize) -> usize {
    if offset <= start {
        offset
    } else if offset >= old_end {
        offset - (old_end - start) + new_len
    } else {
        start + new_len
    }
}
