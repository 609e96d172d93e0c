//! 文档实体（文件字节存放在 blob 存储中）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    #[sea_orm(unique)]
    pub storage_key: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub uploaded_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UploadedBy",
        to = "super::users::Column::Id"
    )]
    Uploader,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uploader.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_document(self) -> crate::models::documents::entities::Document {
        crate::models::documents::entities::Document {
            id: self.id,
            file_name: self.file_name,
            file_type: self.file_type,
            file_size: self.file_size,
            storage_key: self.storage_key,
            description: self.description,
            uploaded_by: self.uploaded_by,
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
