// Action System - 动作系统
//
// 职责：定义用户可触发的编辑命令（EditorAction），
//       并把一行文本命令解析为动作

use std::path::PathBuf;

use thiserror::Error;

/// 用户命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// 新建文档；force 为 false 且有未保存修改时要求确认
    New { force: bool },
    Open { path: PathBuf, force: bool },
    /// 在插入点插入文件内容
    InsertFile(PathBuf),
    Save,
    SaveAs(PathBuf),
    Select { start: usize, end: usize },
    Cut,
    Copy,
    Paste,
    Delete,
    Find(String),
    FindAgain,
    ReplaceAll { find: String, replace: String },
    /// 替换对话框中的"查找下一个"
    ReplaceFindNext(String),
    Show,
    Quit { force: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionParseError {
    #[error("未知命令: {0}")]
    UnknownCommand(String),

    #[error("命令 '{command}' 缺少参数: {expected}")]
    MissingArgument {
        command: String,
        expected: &'static str,
    },

    #[error("无效的偏移: {0}")]
    InvalidOffset(String),
}

impl EditorAction {
    /// 解析一行命令；空行返回 Ok(None)
    ///
    /// `replace` 的两个参数优先按制表符分隔，否则按第一个空格分隔。
    pub fn parse(line: &str) -> Result<Option<Self>, ActionParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }

        let line = line.trim_start();
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest),
            None => (line, ""),
        };

        let action = match command {
            "new" => EditorAction::New { force: false },
            "new!" => EditorAction::New { force: true },
            "open" | "open!" => EditorAction::Open {
                path: required(command, rest, "<path>")?.into(),
                force: command.ends_with('!'),
            },
            "insert" => EditorAction::InsertFile(required(command, rest, "<path>")?.into()),
            "save" => EditorAction::Save,
            "saveas" => EditorAction::SaveAs(required(command, rest, "<path>")?.into()),
            "select" => {
                let args = required(command, rest, "<start> <end>")?;
                let mut parts = args.split_whitespace();
                let start = offset(parts.next(), command)?;
                let end = offset(parts.next(), command)?;
                EditorAction::Select { start, end }
            }
            "cut" => EditorAction::Cut,
            "copy" => EditorAction::Copy,
            "paste" => EditorAction::Paste,
            "delete" => EditorAction::Delete,
            // 搜索词保留首尾空格，允许空串由核心报告 EmptyQuery
            "find" => EditorAction::Find(rest.to_string()),
            "next" => EditorAction::FindAgain,
            "findnext" => EditorAction::ReplaceFindNext(rest.to_string()),
            "replace" => {
                let (find, replace) = rest
                    .split_once('\t')
                    .or_else(|| rest.split_once(' '))
                    .unwrap_or((rest, ""));
                EditorAction::ReplaceAll {
                    find: find.to_string(),
                    replace: replace.to_string(),
                }
            }
            "print" => EditorAction::Show,
            "quit" => EditorAction::Quit { force: false },
            "quit!" => EditorAction::Quit { force: true },
            other => return Err(ActionParseError::UnknownCommand(other.to_string())),
        };

        Ok(Some(action))
    }
}

fn required<'a>(
    command: &str,
    rest: &'a str,
    expected: &'static str,
) -> Result<&'a str, ActionParseError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(ActionParseError::MissingArgument {
            command: command.to_string(),
            expected,
        });
    }
    Ok(rest)
}

fn offset(part: Option<&str>, command: &str) -> Result<usize, ActionParseError> {
    let part = part.ok_or_else(|| ActionParseError::MissingArgument {
        command: command.to_string(),
        expected: "<start> <end>",
    })?;
    part.parse()
        .map_err(|_| ActionParseError::InvalidOffset(part.to_string()))
}
