// IO System - IO系统
//
// 职责：提供统一的文件读写接口，
//       读入时校验UTF-8，写出时按块流式写入

pub mod file;

pub use file::FileIO;
