//! 应用层：把内核、消息总线、后端运行时与本地存储组装在一起

mod explorer;

pub use explorer::Explorer;
