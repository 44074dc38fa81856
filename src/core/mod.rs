// Editor Core - 编辑器核心
//
// 职责：管理 Piece Table 缓冲区、选区、脏标记，
//       接收 EditorAction，通过会话对象更新状态

pub mod buffer;
pub mod session;

pub use buffer::{PieceTable, Piece, PieceType, TextBuffer, Selection, BufferChange};
pub use session::{EditorSession, Outcome};
