// 编辑会话
//
// 职责：持有唯一的文档缓冲区、搜索状态、剪贴板和插入点，
//       把 EditorAction 应用到这些状态上

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::action::EditorAction;
use crate::config::Config;
use crate::core::buffer::TextBuffer;
use crate::error::Result;
use crate::search::{FindResult, SearchController};

/// 动作执行结果，供界面层显示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Cleared,
    Opened { path: PathBuf, bytes: usize },
    Inserted { bytes: usize },
    Saved { path: PathBuf },
    /// 文档尚未关联文件，需要"另存为"
    NeedsPath,
    Selected { start: usize, end: usize },
    Cut { bytes: usize },
    Copied { bytes: usize },
    Pasted { bytes: usize },
    Deleted { bytes: usize },
    NothingSelected,
    ClipboardEmpty,
    Found { offset: usize },
    NotFound,
    Replaced { count: usize },
    NoMatches,
    Text(String),
    /// 存在未保存修改，需要用户确认（保存 / 放弃 / 取消）
    ConfirmDiscard,
    Quit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Cleared => write!(f, "已新建文档"),
            Outcome::Opened { path, bytes } => {
                write!(f, "已打开 '{}'（{bytes} 字节）", path.display())
            }
            Outcome::Inserted { bytes } => write!(f, "已插入 {bytes} 字节"),
            Outcome::Saved { path } => write!(f, "已保存到 '{}'", path.display()),
            Outcome::NeedsPath => write!(f, "文档没有文件名，请使用 saveas <path>"),
            Outcome::Selected { start, end } => write!(f, "已选中 [{start}, {end})"),
            Outcome::Cut { bytes } => write!(f, "已剪切 {bytes} 字节"),
            Outcome::Copied { bytes } => write!(f, "已复制 {bytes} 字节"),
            Outcome::Pasted { bytes } => write!(f, "已粘贴 {bytes} 字节"),
            Outcome::Deleted { bytes } => write!(f, "已删除 {bytes} 字节"),
            Outcome::NothingSelected => write!(f, "没有选中文本"),
            Outcome::ClipboardEmpty => write!(f, "剪贴板为空"),
            Outcome::Found { offset } => write!(f, "在偏移 {offset} 处找到"),
            Outcome::NotFound => write!(f, "未找到文本"),
            Outcome::Replaced { count } => write!(f, "已替换 {count} 处"),
            Outcome::NoMatches => write!(f, "没有找到匹配项"),
            Outcome::Text(text) => write!(f, "{text}"),
            Outcome::ConfirmDiscard => {
                write!(f, "文件未保存，使用 save 保存或在命令后加 ! 放弃修改")
            }
            Outcome::Quit => write!(f, "再见"),
        }
    }
}

/// 单文档编辑会话
#[derive(Debug)]
pub struct EditorSession {
    buffer: TextBuffer,
    search: SearchController,
    clipboard: String,
}

impl EditorSession {
    pub fn new(config: Config) -> Self {
        Self {
            buffer: TextBuffer::with_config(&config),
            search: SearchController::new(),
            clipboard: String::new(),
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// 插入点，由缓冲区随编辑维护
    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.buffer.set_cursor(cursor);
    }

    /// 是否需要"未保存"确认
    pub fn needs_save_prompt(&self) -> bool {
        self.buffer.is_dirty()
    }

    pub fn apply(&mut self, action: EditorAction) -> Result<Outcome> {
        match action {
            EditorAction::New { force } => {
                if !force && self.needs_save_prompt() {
                    return Ok(Outcome::ConfirmDiscard);
                }
                self.buffer.clear();
                self.reset_position();
                Ok(Outcome::Cleared)
            }
            EditorAction::Open { path, force } => {
                if !force && self.needs_save_prompt() {
                    return Ok(Outcome::ConfirmDiscard);
                }
                self.open(&path)
            }
            EditorAction::InsertFile(path) => {
                let before = self.buffer.length();
                let at = self.cursor();
                self.buffer
                    .insert_file(&path, at)
                    .inspect_err(|e| warn!(error = %e, "插入文件失败"))?;
                Ok(Outcome::Inserted { bytes: self.buffer.length() - before })
            }
            EditorAction::Save => match self.buffer.path().map(Path::to_path_buf) {
                Some(path) => self.save_to(path),
                None => Ok(Outcome::NeedsPath),
            },
            EditorAction::SaveAs(path) => self.save_to(path),
            EditorAction::Select { start, end } => {
                self.buffer.select(start, end);
                let selection = self.buffer.selection();
                self.buffer.set_cursor(selection.end);
                Ok(Outcome::Selected { start: selection.start, end: selection.end })
            }
            EditorAction::Cut => {
                if self.buffer.selection().is_empty() {
                    return Ok(Outcome::NothingSelected);
                }
                self.clipboard = self.buffer.remove_selection();
                self.set_cursor(self.buffer.selection().start);
                Ok(Outcome::Cut { bytes: self.clipboard.len() })
            }
            EditorAction::Copy => {
                if self.buffer.selection().is_empty() {
                    return Ok(Outcome::NothingSelected);
                }
                self.clipboard = self.buffer.selected_text();
                Ok(Outcome::Copied { bytes: self.clipboard.len() })
            }
            EditorAction::Paste => self.paste(),
            EditorAction::Delete => {
                let deleted = self.buffer.remove_selection();
                if deleted.is_empty() {
                    return Ok(Outcome::NothingSelected);
                }
                self.set_cursor(self.buffer.selection().start);
                Ok(Outcome::Deleted { bytes: deleted.len() })
            }
            EditorAction::Find(term) | EditorAction::ReplaceFindNext(term) => self.find(&term),
            EditorAction::FindAgain => {
                let term = self.search.last_term().to_string();
                self.find(&term)
            }
            EditorAction::ReplaceAll { find, replace } => {
                let result = self.search.replace_all(&mut self.buffer, &find, &replace)?;
                if result.is_empty() {
                    Ok(Outcome::NoMatches)
                } else {
                    Ok(Outcome::Replaced { count: result.count })
                }
            }
            EditorAction::Show => Ok(Outcome::Text(self.buffer.text())),
            EditorAction::Quit { force } => {
                if !force && self.needs_save_prompt() {
                    return Ok(Outcome::ConfirmDiscard);
                }
                info!("会话结束");
                Ok(Outcome::Quit)
            }
        }
    }

    fn open(&mut self, path: &Path) -> Result<Outcome> {
        self.buffer
            .load(path)
            .inspect_err(|e| warn!(error = %e, "打开文件失败"))?;
        self.reset_position();

        info!(path = %path.display(), "已打开文件");
        Ok(Outcome::Opened {
            path: path.to_path_buf(),
            bytes: self.buffer.length(),
        })
    }

    fn save_to(&mut self, path: PathBuf) -> Result<Outcome> {
        self.buffer
            .save(&path)
            .inspect_err(|e| warn!(error = %e, "保存文件失败"))?;

        info!(path = %path.display(), "已保存文件");
        Ok(Outcome::Saved { path })
    }

    fn paste(&mut self) -> Result<Outcome> {
        if self.clipboard.is_empty() {
            return Ok(Outcome::ClipboardEmpty);
        }

        let selection = self.buffer.selection();
        let at = if selection.is_empty() { self.cursor() } else { selection.start };
        let end = if selection.is_empty() { at } else { selection.end };
        self.buffer.replace(at, end, &self.clipboard);

        let after = at + self.clipboard.len();
        self.buffer.select(after, after);
        self.buffer.set_cursor(after);

        Ok(Outcome::Pasted { bytes: self.clipboard.len() })
    }

    fn find(&mut self, term: &str) -> Result<Outcome> {
        let cursor = self.cursor();
        match self.search.find_next(&mut self.buffer, term, cursor)? {
            FindResult::Found { offset } => Ok(Outcome::Found { offset }),
            FindResult::NotFound => Ok(Outcome::NotFound),
        }
    }

    /// 缓冲区在 clear/load 时已把插入点归零
    fn reset_position(&mut self) {
        self.search.reset();
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
