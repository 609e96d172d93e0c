use super::SeaOrmStorage;
use crate::entity::documents::{ActiveModel, Column, Entity as Documents};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    documents::{
        entities::Document,
        requests::{DocumentListQuery, NewDocument},
        responses::DocumentListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_document_impl(&self, doc: NewDocument) -> Result<Document> {
        let model = ActiveModel {
            file_name: Set(doc.file_name),
            file_type: Set(doc.file_type),
            file_size: Set(doc.file_size),
            storage_key: Set(doc.storage_key),
            description: Set(doc.description),
            uploaded_by: Set(doc.uploaded_by),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to create document: {e}"))
        })?;

        Ok(result.into_document())
    }

    pub async fn get_document_by_id_impl(&self, id: i64) -> Result<Option<Document>> {
        let result = Documents::find_by_id(id).one(&self.db).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to query document: {e}"))
        })?;

        Ok(result.map(|m| m.into_document()))
    }

    pub async fn list_documents_with_pagination_impl(
        &self,
        query: DocumentListQuery,
    ) -> Result<DocumentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Documents::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = format!("%{}%", escape_like_pattern(search.trim()));
            select = select.filter(
                Condition::any()
                    .add(Column::FileName.like(LikeExpr::new(pattern.clone()).escape('\\')))
                    .add(Column::Description.like(LikeExpr::new(pattern).escape('\\'))),
            );
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            PortalError::database_operation(format!("Failed to count documents: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            PortalError::database_operation(format!("Failed to count document pages: {e}"))
        })?;
        let items = paginator.fetch_page(page - 1).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to list documents: {e}"))
        })?;

        Ok(DocumentListResponse {
            items: items.into_iter().map(|m| m.into_document()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn delete_document_impl(&self, id: i64) -> Result<bool> {
        let result = Documents::delete_by_id(id).exec(&self.db).await.map_err(|e| {
            PortalError::database_operation(format!("Failed to delete document: {e}"))
        })?;

        Ok(result.rows_affected > 0)
    }
}
