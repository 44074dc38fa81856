// znote - 轻量单文档文本编辑器核心
//
// Copyright (c) 2025 znote team
//
// Licensed under MIT License

pub mod action;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod search;

pub use crate::action::EditorAction;
pub use crate::config::Config;
pub use crate::core::{EditorSession, Outcome, TextBuffer};
pub use crate::error::{EditorError, Result};
pub use crate::search::{FindResult, ReplaceResult, SearchController};
