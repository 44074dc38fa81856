// Piece Table 核心实现
//
// 职责：使用 Piece Table 数据结构管理文本内容，
//       支持原地插入、删除、区间读取和跨Piece的字面量搜索

use std::ops::Range;
use std::sync::Arc;

use crate::core::buffer::{
    chunk_iter::ChunkIter,
    utf8::Utf8Validator,
    DEFAULT_CHUNK_SIZE, DEFAULT_MERGE_THRESHOLD,
};

/// 两次合并之间至少经过的编辑次数
const MERGE_EDIT_INTERVAL: usize = 64;

/// Piece类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceType {
    Original,
    Add,
}

/// Piece描述符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub piece_type: PieceType,
    pub start: usize,    // 在相应缓冲区中的起始位置
    pub length: usize,   // 长度（字节）
}

impl Piece {
    pub fn original(range: Range<usize>) -> Self {
        Self {
            piece_type: PieceType::Original,
            start: range.start,
            length: range.end - range.start,
        }
    }

    pub fn add(range: Range<usize>) -> Self {
        Self {
            piece_type: PieceType::Add,
            start: range.start,
            length: range.end - range.start,
        }
    }

    fn split_at(self, offset: usize) -> (Piece, Piece) {
        (
            Piece { length: offset, ..self },
            Piece {
                start: self.start + offset,
                length: self.length - offset,
                ..self
            },
        )
    }
}

/// Piece Table核心实现
///
/// 所有Piece都不为空，且起止位置都落在UTF-8字符边界上。
#[derive(Debug, Clone)]
pub struct PieceTable {
    original: Arc<str>,                 // 原始内容（只读）
    additions: String,                  // 新增内容（只追加）

    pieces: Vec<Piece>,                 // Piece链
    piece_offsets: Vec<usize>,          // 累积偏移缓存

    total_bytes: usize,                 // 总字节数
    merge_threshold: usize,             // Piece数量合并阈值
    edit_count_since_last_merge: usize, // 上次合并后的编辑次数
}

// ========== 构造方法 ==========

impl PieceTable {
    /// 创建新的空PieceTable
    pub fn new() -> Self {
        Self {
            original: Arc::from(""),
            additions: String::new(),
            pieces: Vec::new(),
            piece_offsets: Vec::new(),
            total_bytes: 0,
            merge_threshold: DEFAULT_MERGE_THRESHOLD,
            edit_count_since_last_merge: 0,
        }
    }

    /// 从文本创建
    pub fn from_text(text: &str) -> Self {
        let mut table = Self::new();

        if !text.is_empty() {
            table.original = Arc::from(text);
            table.pieces = vec![Piece::original(0..text.len())];
            table.piece_offsets = vec![0];
            table.total_bytes = text.len();
        }

        table
    }

    pub fn with_merge_threshold(mut self, merge_threshold: usize) -> Self {
        self.merge_threshold = merge_threshold.max(1);
        self
    }
}

// ========== 基本查询 ==========

impl PieceTable {
    /// 获取总字节数
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// 获取总字符数（UTF-8安全）
    pub fn total_chars(&self) -> usize {
        self.iter_chunks_default().map(|chunk| chunk.chars().count()).sum()
    }

    /// 获取Piece数量
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.total_bytes == 0
    }

    /// 第 index 个Piece对应的文本
    pub(crate) fn piece_text(&self, index: usize) -> &str {
        let piece = &self.pieces[index];
        let range = piece.start..piece.start + piece.length;
        match piece.piece_type {
            PieceType::Original => &self.original[range],
            PieceType::Add => &self.additions[range],
        }
    }
}

// ========== 字符边界 ==========

impl PieceTable {
    /// 把偏移截断到长度并向前对齐到字符边界
    pub fn floor_boundary(&self, byte_offset: usize) -> usize {
        if byte_offset >= self.total_bytes {
            return self.total_bytes;
        }
        let (index, offset_in_piece) = self.find_piece_and_offset(byte_offset);
        let text = self.piece_text(index);
        self.piece_offsets[index] + Utf8Validator::floor_char_boundary(text, offset_in_piece)
    }

    /// 把偏移截断到长度并向后对齐到字符边界
    pub fn ceil_boundary(&self, byte_offset: usize) -> usize {
        if byte_offset >= self.total_bytes {
            return self.total_bytes;
        }
        let (index, offset_in_piece) = self.find_piece_and_offset(byte_offset);
        let text = self.piece_text(index);
        self.piece_offsets[index] + Utf8Validator::ceil_char_boundary(text, offset_in_piece)
    }

    /// 交换反向端点、截断到长度并对齐字符边界
    pub fn normalize_range(&self, range: Range<usize>) -> Range<usize> {
        let (start, end) = if range.end < range.start {
            (range.end, range.start)
        } else {
            (range.start, range.end)
        };
        self.floor_boundary(start)..self.floor_boundary(end)
    }
}

// ========== 编辑操作 ==========

impl PieceTable {
    /// 在字节偏移处插入文本，返回实际插入位置（已对齐字符边界）
    pub fn insert(&mut self, byte_offset: usize, text: &str) -> usize {
        let offset = self.floor_boundary(byte_offset);
        if text.is_empty() {
            return offset;
        }

        // 在additions缓冲区追加新文本
        let add_start = self.additions.len();
        self.additions.push_str(text);
        let new_piece = Piece::add(add_start..add_start + text.len());

        if self.pieces.is_empty() {
            self.pieces.push(new_piece);
        } else {
            let (piece_idx, offset_in_piece) = self.find_piece_and_offset(offset);
            let current_piece = self.pieces[piece_idx];

            if offset_in_piece == 0 {
                self.pieces.insert(piece_idx, new_piece);
            } else if offset_in_piece == current_piece.length {
                self.pieces.insert(piece_idx + 1, new_piece);
            } else {
                // 在Piece中间插入：分裂为三部分
                let (left, right) = current_piece.split_at(offset_in_piece);
                self.pieces
                    .splice(piece_idx..=piece_idx, [left, new_piece, right]);
            }
        }

        self.update_piece_offsets();
        self.merge_if_needed();

        offset
    }

    /// 删除字节范围，返回被删除的文本
    pub fn delete(&mut self, range: Range<usize>) -> String {
        let range = self.normalize_range(range);
        if range.is_empty() {
            return String::new();
        }

        let deleted_text = self.get_text_range(range.clone());

        let (start_piece, start_offset) = self.find_piece_and_offset(range.start);
        let (end_piece, end_offset) = self.find_piece_and_offset(range.end);

        let mut kept = Vec::with_capacity(2);

        // 开始Piece的前半部分
        if start_offset > 0 {
            kept.push(self.pieces[start_piece].split_at(start_offset).0);
        }

        // 结束Piece的后半部分
        let last = self.pieces[end_piece];
        if end_offset < last.length {
            kept.push(last.split_at(end_offset).1);
        }

        self.pieces.splice(start_piece..=end_piece, kept);

        self.update_piece_offsets();
        self.merge_if_needed();

        deleted_text
    }

    /// 把 matches 处长度为 needle_len 的每段文本替换为 replacement
    ///
    /// matches 必须递增且互不重叠（通常来自 `find_all`）。整张Piece表只重建一次，
    /// 所有替换共享additions中的同一段文本。
    pub fn replace_matches(&mut self, matches: &[usize], needle_len: usize, replacement: &str) {
        if matches.is_empty() {
            return;
        }

        let add_start = self.additions.len();
        self.additions.push_str(replacement);
        let replacement_piece = Piece::add(add_start..add_start + replacement.len());

        let mut rebuilt = Vec::with_capacity(self.pieces.len() + matches.len() * 2);
        let mut cursor = (0, 0);
        let mut copied_to = 0;

        for &offset in matches {
            Self::advance(&self.pieces, &mut cursor, offset - copied_to, Some(&mut rebuilt));
            if replacement_piece.length > 0 {
                rebuilt.push(replacement_piece);
            }
            Self::advance(&self.pieces, &mut cursor, needle_len, None);
            copied_to = offset + needle_len;
        }
        Self::advance(&self.pieces, &mut cursor, self.total_bytes - copied_to, Some(&mut rebuilt));

        self.pieces = rebuilt;
        self.update_piece_offsets();
        self.merge_if_needed();
    }

    /// 沿Piece链前进 len 字节，out 不为空时把经过的片段追加进去
    fn advance(
        pieces: &[Piece],
        cursor: &mut (usize, usize),
        mut len: usize,
        mut out: Option<&mut Vec<Piece>>,
    ) {
        while len > 0 {
            let (index, offset_in_piece) = *cursor;
            let piece = pieces[index];
            let available = piece.length - offset_in_piece;
            let take = available.min(len);

            if let Some(out) = out.as_deref_mut() {
                out.push(Piece {
                    start: piece.start + offset_in_piece,
                    length: take,
                    ..piece
                });
            }

            len -= take;
            *cursor = if take == available {
                (index + 1, 0)
            } else {
                (index, offset_in_piece + take)
            };
        }
    }
}

// ========== 文本获取 ==========

impl PieceTable {
    /// 获取指定范围的文本（核心API）
    pub fn get_text_range(&self, range: Range<usize>) -> String {
        let range = self.normalize_range(range);
        if range.is_empty() {
            return String::new();
        }

        let mut result = String::with_capacity(range.len());
        let (first, _) = self.find_piece_and_offset(range.start);

        for index in first..self.pieces.len() {
            let piece_start = self.piece_offsets[index];
            if piece_start >= range.end {
                break;
            }

            let text = self.piece_text(index);
            let local_start = range.start.saturating_sub(piece_start);
            let local_end = (range.end - piece_start).min(text.len());
            result.push_str(&text[local_start..local_end]);
        }

        result
    }

    /// 获取全部文本
    pub fn get_all_text(&self) -> String {
        let mut result = String::with_capacity(self.total_bytes);
        for index in 0..self.pieces.len() {
            result.push_str(self.piece_text(index));
        }
        result
    }

    /// 从字节偏移开始按块借用文本
    pub fn iter_chunks_from(&self, byte_offset: usize, chunk_size: usize) -> ChunkIter<'_> {
        let offset = self.ceil_boundary(byte_offset);
        if offset >= self.total_bytes {
            return ChunkIter::new(self, self.pieces.len(), 0, chunk_size);
        }
        let (piece_idx, offset_in_piece) = self.find_piece_and_offset(offset);
        ChunkIter::new(self, piece_idx, offset_in_piece, chunk_size)
    }

    /// 创建流式迭代器
    pub fn iter_chunks(&self, chunk_size: usize) -> ChunkIter<'_> {
        ChunkIter::new(self, 0, 0, chunk_size)
    }

    /// 使用默认块大小的流式迭代器
    pub fn iter_chunks_default(&self) -> ChunkIter<'_> {
        self.iter_chunks(DEFAULT_CHUNK_SIZE)
    }
}

// ========== 搜索 ==========

impl PieceTable {
    /// 从 from 开始向后查找 needle 第一次出现的位置（区分大小写，不回绕）
    pub fn find_forward(&self, from: usize, needle: &str) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }

        let from = self.ceil_boundary(from);
        if needle.len() > self.total_bytes - from {
            return None;
        }

        // 窗口保留上一块结尾的 needle.len() - 1 字节，以便匹配跨越块边界
        let keep = needle.len() - 1;
        let mut window = String::new();
        let mut window_start = from;

        for chunk in self.iter_chunks_from(from, DEFAULT_CHUNK_SIZE) {
            window.push_str(chunk);

            if let Some(pos) = window.find(needle) {
                return Some(window_start + pos);
            }

            let cut = Utf8Validator::tail_boundary(&window, keep);
            window.drain(..cut);
            window_start += cut;
        }

        None
    }

    /// 从头扫描一遍，返回 needle 所有互不重叠的出现位置
    pub fn find_all(&self, needle: &str) -> Vec<usize> {
        let mut matches = Vec::new();
        if needle.is_empty() {
            return matches;
        }

        let keep = needle.len() - 1;
        let mut window = String::new();
        let mut window_start = 0;
        let mut search_from = 0;

        for chunk in self.iter_chunks_default() {
            window.push_str(chunk);

            while let Some(pos) = window[search_from..].find(needle) {
                let at = search_from + pos;
                matches.push(window_start + at);
                search_from = at + needle.len();
            }

            // 上一个匹配之前的内容不会再参与匹配
            let cut = Utf8Validator::tail_boundary(&window, keep).max(search_from);
            window.drain(..cut);
            window_start += cut;
            search_from = 0;
        }

        matches
    }
}

// ========== Piece查找和索引 ==========

impl PieceTable {
    /// 查找字节偏移所在的Piece和在Piece内的偏移
    ///
    /// 偏移等于总长度时返回最后一个Piece及其长度。调用前表不能为空。
    fn find_piece_and_offset(&self, byte_offset: usize) -> (usize, usize) {
        if byte_offset >= self.total_bytes {
            let last = self.pieces.len().saturating_sub(1);
            return (last, self.pieces.get(last).map_or(0, |p| p.length));
        }

        // 使用累积偏移进行二分查找
        match self.piece_offsets.binary_search(&byte_offset) {
            Ok(i) => (i, 0),
            Err(i) => {
                let piece_idx = i - 1;
                (piece_idx, byte_offset - self.piece_offsets[piece_idx])
            }
        }
    }

    /// 更新累积偏移缓存
    fn update_piece_offsets(&mut self) {
        self.piece_offsets.clear();
        let mut offset = 0;

        for piece in &self.pieces {
            self.piece_offsets.push(offset);
            offset += piece.length;
        }

        self.total_bytes = offset;
    }
}

// ========== 合并策略 ==========

impl PieceTable {
    /// Piece数量超过阈值且距上次合并已有足够编辑时合并
    pub fn merge_if_needed(&mut self) {
        self.edit_count_since_last_merge += 1;
        if self.pieces.len() > self.merge_threshold
            && self.edit_count_since_last_merge >= MERGE_EDIT_INTERVAL
        {
            self.merge_all_adjacent();
            self.update_piece_offsets();
            self.edit_count_since_last_merge = 0;
        }
    }

    /// 合并所有相邻且在源缓冲区中连续的Piece
    fn merge_all_adjacent(&mut self) {
        if self.pieces.len() <= 1 {
            return;
        }

        let mut merged: Vec<Piece> = Vec::with_capacity(self.pieces.len());

        for current in self.pieces.drain(..) {
            match merged.last_mut() {
                Some(last) if Self::can_merge_pieces(last, &current) => {
                    last.length += current.length;
                }
                _ => merged.push(current),
            }
        }

        self.pieces = merged;
    }

    /// 检查两个Piece是否可以合并
    fn can_merge_pieces(a: &Piece, b: &Piece) -> bool {
        a.piece_type == b.piece_type && a.start + a.length == b.start
    }
}

// ========== 默认实现 ==========

impl Default for PieceTable {
    fn default() -> Self {
        Self::new()
    }
}

// ========== 测试 ==========
