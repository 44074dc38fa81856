// UTF-8边界安全工具
//
// 职责：确保调用方给出的字节偏移落在UTF-8字符边界上

/// UTF-8边界安全工具
#[derive(Debug, Clone, Copy)]
pub struct Utf8Validator;

impl Utf8Validator {
    /// 向前（向文本开头）对齐到字符边界，超出长度时截断到长度
    pub fn floor_char_boundary(text: &str, byte_offset: usize) -> usize {
        if byte_offset >= text.len() {
            return text.len();
        }

        let mut pos = byte_offset;
        while !text.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    /// 向后（向文本结尾）对齐到字符边界
    pub fn ceil_char_boundary(text: &str, byte_offset: usize) -> usize {
        if byte_offset >= text.len() {
            return text.len();
        }

        let mut pos = byte_offset;
        while !text.is_char_boundary(pos) {
            pos += 1;
        }
        pos
    }

    /// 去掉结尾可能被截断的多字节字符后的可安全保留长度
    pub fn tail_boundary(text: &str, keep: usize) -> usize {
        let cut = text.len().saturating_sub(keep);
        Self::floor_char_boundary(text, cut)
    }
}
