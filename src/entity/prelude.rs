//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::documents::{
    ActiveModel as DocumentActiveModel, Entity as Documents, Model as DocumentModel,
};
pub use super::enrollment_plans::{
    ActiveModel as PlanActiveModel, Entity as EnrollmentPlans, Model as PlanModel,
};
pub use super::reports::{ActiveModel as ReportActiveModel, Entity as Reports, Model as ReportModel};
pub use super::stages::{ActiveModel as StageActiveModel, Entity as Stages, Model as StageModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
