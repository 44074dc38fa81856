// 搜索结果

/// "查找下一个"的结果；未找到不是错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindResult {
    Found { offset: usize },
    NotFound,
}

/// "全部替换"的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceResult {
    /// 替换次数
    pub count: usize,
}

impl ReplaceResult {
    /// 没有任何匹配
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
