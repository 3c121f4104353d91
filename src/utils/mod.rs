// 中文说明：
// utils 模块聚合：统一导出文件 IO、日志、配置、通用助手、常量与错误工具，
// 便于在其他子系统中直接引用。
pub mod file_utils;
pub mod logger;
pub mod config;
pub mod helpers;
pub mod constants;
pub mod error;

pub use file_utils::*;
pub use logger::*;
pub use config::*;
pub use helpers::*;
pub use constants::*;
pub use error::*;
