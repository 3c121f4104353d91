// 中文说明：
// 终端前端：交互式菜单会话（代码片段 / 文件分析）。批量模式的输出由
// reporter::formatters 负责。
pub mod interactive;

pub use interactive::InteractiveSession;
