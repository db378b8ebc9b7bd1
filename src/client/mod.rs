//! 客户端：API 调用、页面状态和终端渲染

pub mod api;
pub mod page;
pub mod render;
pub mod state;

pub use api::{ClientError, StarsClient};
pub use page::StarsPage;
pub use state::{FormField, PageEvent, PageState};
