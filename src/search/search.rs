// 搜索控制器
//
// 职责：重复的向后查找与全部替换，
//       维护上次搜索词和光标（SearchState）

use tracing::debug;

use crate::core::buffer::{remap_offset, TextBuffer};
use crate::error::{EditorError, Result};
use crate::search::result::{FindResult, ReplaceResult};

/// 上次搜索词与光标偏移，存活于整个会话，只由 reset 清除
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub last_term: String,
    pub cursor: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SearchController {
    state: SearchState,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn last_term(&self) -> &str {
        &self.state.last_term
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.state.cursor = cursor;
    }

    pub fn reset(&mut self) {
        self.state = SearchState::default();
    }

    /// 从 cursor 开始查找 term；找到时选中匹配并把光标移到匹配之后
    ///
    /// 缓冲区的插入点随之移动。未找到时光标和选区都不变。不回绕到文档开头。
    pub fn find_next(
        &mut self,
        buffer: &mut TextBuffer,
        term: &str,
        cursor: usize,
    ) -> Result<FindResult> {
        if term.is_empty() {
            return Err(EditorError::EmptyQuery);
        }

        if self.state.last_term != term {
            self.state.last_term = term.to_string();
        }

        match buffer.search_forward(cursor, term) {
            Some(offset) => {
                let end = offset + term.len();
                buffer.select(offset, end);
                buffer.set_cursor(end);
                self.state.cursor = end;

                debug!(term, offset, "找到匹配");
                Ok(FindResult::Found { offset })
            }
            None => {
                debug!(term, cursor, "未找到匹配");
                Ok(FindResult::NotFound)
            }
        }
    }

    /// 用上次的搜索词和光标再查找一次
    pub fn find_again(&mut self, buffer: &mut TextBuffer) -> Result<FindResult> {
        let term = self.state.last_term.clone();
        let cursor = self.state.cursor;
        self.find_next(buffer, &term, cursor)
    }

    /// 从文档开头起替换所有 find_term
    ///
    /// 每次替换后从插入文本之后继续扫描，replace_term 中包含的
    /// find_term 不会被再次匹配。光标随每次替换平移。
    pub fn replace_all(
        &mut self,
        buffer: &mut TextBuffer,
        find_term: &str,
        replace_term: &str,
    ) -> Result<ReplaceResult> {
        if find_term.is_empty() {
            return Err(EditorError::EmptyQuery);
        }

        let edits = buffer.replace_all(find_term, replace_term);
        for &offset in &edits {
            let old_end = offset + find_term.len();
            let cursor = self.state.cursor;
            self.state.cursor = remap_offset(cursor, offset, old_end, replace_term.len());
        }

        let result = ReplaceResult { count: edits.len() };
        debug!(find_term, replace_term, count = result.count, "全部替换完成");
        Ok(result)
    }
}
