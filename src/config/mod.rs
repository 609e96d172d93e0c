//! 配置管理
//!
//! 分层加载：`config.toml` → `config.{APP_ENV}.toml` → `PORTAL_*` 环境变量。

mod loader;
mod structs;

pub use structs::*;
