// 变更通知
//
// 职责：缓冲区内容或持久化状态变化时通知订阅者（界面刷新、未保存标记）

/// 内容变化事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferChange {
    /// 在 offset 处删除 deleted 字节并插入 inserted 字节
    Edited {
        offset: usize,
        deleted: usize,
        inserted: usize,
    },
    /// 整个文档被替换（打开文件、新建）
    Reloaded { length: usize },
    /// 内容已写入文件，脏标记已清除
    Saved,
}

/// 变更订阅者
pub type ChangeListener = Box<dyn FnMut(&BufferChange)>;
