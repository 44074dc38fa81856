// Search System - 搜索系统
//
// 职责：在文本缓冲区上驱动"查找下一个"与"全部替换"，
//       跨多次调用保持上次搜索词和光标位置

pub mod search;
pub mod result;

pub use search::{SearchController, SearchState};
pub use result::{FindResult, ReplaceResult};
