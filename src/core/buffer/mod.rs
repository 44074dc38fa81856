// Piece Table 缓冲区 - 文本缓冲区核心实现
//
// 职责：使用 Piece Table 数据结构管理文本内容，
//       提供选区、脏标记、文件读写、搜索和变更通知

mod piece_table;
mod utf8;
mod chunk_iter;
mod selection;
mod change;
mod text_buffer;

// 重新导出
pub use self::piece_table::{PieceTable, Piece, PieceType};
pub use self::utf8::Utf8Validator;
pub use self::chunk_iter::ChunkIter;
pub use self::selection::{remap_offset, Selection};
pub use self::change::{BufferChange, ChangeListener};
pub use self::text_buffer::TextBuffer;

/// 性能相关常量
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024; // 64KB，流式处理块大小
pub const DEFAULT_MERGE_THRESHOLD: usize = 1000; // Piece数量合并阈值
