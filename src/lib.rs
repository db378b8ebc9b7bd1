//! # Hollywood Stars
//!
//! 好莱坞明星目录的 CRUD 服务和客户端：
//! - `app`：路由、处理器、业务服务和存储抽象
//! - `core`：统一错误处理、响应结构、中间件
//! - `infrastructure`：配置、日志、内存存储和 PostgreSQL 存储
//! - `client`：HTTP 客户端、页面状态机和终端前端

pub mod app;
pub mod client;
pub mod core;
pub mod infrastructure;
pub mod server;

pub use crate::app::stars::model::{NewStar, Star, StarId, StarPatch};
pub use crate::core::error::CoreError;
pub use crate::infrastructure::config::Config;
