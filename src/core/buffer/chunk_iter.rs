// 流式迭代器
//
// 职责：按块借用 PieceTable 内容，避免一次性拼接全部文本

use crate::core::buffer::{utf8::Utf8Validator, PieceTable};

/// PieceTable的流式迭代器
///
/// 每块不跨越Piece，长度不超过 chunk_size（多字节字符会被完整保留）。
pub struct ChunkIter<'a> {
    piece_table: &'a PieceTable,
    piece_idx: usize,
    offset_in_piece: usize,
    chunk_size: usize,
}

impl<'a> ChunkIter<'a> {
    pub(crate) fn new(
        piece_table: &'a PieceTable,
        piece_idx: usize,
        offset_in_piece: usize,
        chunk_size: usize,
    ) -> Self {
        Self {
            piece_table,
            piece_idx,
            offset_in_piece,
            chunk_size: chunk_size.max(1),
        }
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while self.piece_idx < self.piece_table.piece_count() {
            let piece_text = self.piece_table.piece_text(self.piece_idx);

            if self.offset_in_piece >= piece_text.len() {
                self.piece_idx += 1;
                self.offset_in_piece = 0;
                continue;
            }

            let rest = &piece_text[self.offset_in_piece..];
            let end = Utf8Validator::ceil_char_boundary(rest, self.chunk_size);
            self.offset_in_piece += end;

            return Some(&rest[..end]);
        }

        None
    }
}
