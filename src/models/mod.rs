//! 数据模型定义
//!
//! `entities` 为业务实体，`requests`/`responses` 为 HTTP 层的输入输出结构。

pub mod assignments;
pub mod auth;
pub mod common;
pub mod documents;
pub mod plans;
pub mod reports;
pub mod stages;
pub mod users;
pub mod video;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// 0 为成功；1xxx 通用，2xxx 认证，3xxx 用户，4xxx 计划/阶段/任务，
/// 5xxx 报告，6xxx 文档，7xxx 外部服务。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    NotFound = 1001,
    MethodNotAllowed = 1002,
    InternalServerError = 1003,
    RateLimitExceeded = 1004,
    PayloadTooLarge = 1005,

    Unauthorized = 2000,
    AuthFailed = 2001,
    Forbidden = 2002,
    UserInactive = 2003,

    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserEmailInvalid = 3002,
    UserPasswordInvalid = 3003,
    UserCreationFailed = 3004,
    UserUpdateFailed = 3005,
    UserDeleteFailed = 3006,
    CanNotDeleteCurrentUser = 3007,

    PlanNotFound = 4000,
    PlanDateRangeInvalid = 4001,
    StageNotFound = 4100,
    StageDateRangeInvalid = 4101,
    StageOrderConflict = 4102,
    AssignmentNotFound = 4200,
    AssignmentStatusInvalid = 4201,
    AssignmentDueDateInvalid = 4202,

    ReportNotFound = 5000,
    ReportStatusInvalid = 5001,
    ReportAlreadyReviewed = 5002,

    DocumentNotFound = 6000,
    DocumentTypeNotAllowed = 6001,
    DocumentSizeExceeded = 6002,
    DocumentContentInvalid = 6003,
    DocumentUploadFailed = 6004,
    DocumentLinkInvalid = 6005,

    AiServiceFailed = 7000,
    VideoServiceFailed = 7001,
    ServiceNotConfigured = 7002,
}
