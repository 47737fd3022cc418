//! workspace-explorer - 低代码平台 IDE 的项目资源管理器内核
//!
//! 模块结构：
//! - models: 数据模型（ProjectTree, 工作区描述）
//! - kernel: 内核（Store, Action, Effect, 消息总线, 右键菜单, 服务端口与适配器）
//! - app: 应用层（Explorer）

pub mod app;
pub mod kernel;
pub mod models;

pub use app::Explorer;
