use super::SeaOrmStorage;
use crate::entity::contact_messages::{ActiveModel, Column, Entity as ContactMessages};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo, PaginationQuery,
    common::pagination::PaginatedResponse,
    contact::{entities::ContactMessage, requests::ContactRequest},
};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};

impl SeaOrmStorage {
    /// 保存联系留言
    pub async fn create_contact_message_impl(
        &self,
        user_id: Option<i64>,
        req: ContactRequest,
    ) -> Result<ContactMessage> {
        let model = ActiveModel {
            user_id: Set(user_id),
            name: Set(req.name),
            email: Set(req.email),
            subject: Set(req.subject),
            message: Set(req.message),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("保存留言失败: {e}")))?;

        Ok(result.into_contact_message())
    }

    /// 分页列出留言，最新在前
    pub async fn list_contact_messages_impl(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<ContactMessage>> {
        let (page, size) = query.normalized();

        let paginator = ContactMessages::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询留言总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询留言页数失败: {e}")))?;

        let messages = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询留言列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: messages
                .into_iter()
                .map(|m| m.into_contact_message())
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::PaginationQuery;
    use crate::models::contact::requests::ContactRequest;

    #[tokio::test]
    async fn test_store_and_list_messages() {
        let storage = memory_storage().await;
        for subject in ["Tarifs", "Horaires"] {
            storage
                .create_contact_message_impl(
                    None,
                    ContactRequest {
                        name: "Paul".to_string(),
                        email: "paul@example.com".to_string(),
                        subject: subject.to_string(),
                        message: "Bonjour".to_string(),
                    },
                )
                .await
                .unwrap();
        }

        let page = storage
            .list_contact_messages_impl(PaginationQuery { page: 1, size: 1 })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].subject, "Horaires");
        assert!(page.items[0].user_id.is_none());
    }
}
