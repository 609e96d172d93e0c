//! 外部服务客户端
//!
//! 生成式 AI（报告起草）与视频会议房间管理。两者都以 trait 暴露，
//! 运行时通过 `app_data` 注入 `Arc<dyn ...>`。

pub mod ai;
pub mod video;

pub use ai::{GeminiClient, TextGenerator};
pub use video::{HmsVideoClient, VideoRoomProvider};
