// 中文说明：
// Web 页面模板：上传表单与分析结果页。
pub mod html;

pub use html::{render_index, ResultView};
