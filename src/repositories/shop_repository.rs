use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;

use crate::db::DbPool;
use crate::entities::{payment, request};
use crate::errors::ServiceError;

use super::{
    NewPayment, NewRequest, PaymentFilter, RequestChanges, RequestFilter, RequestScope,
    ShopRepository,
};

/// sea-orm implementation of the persistent store boundary.
#[derive(Clone)]
pub struct SeaOrmShopRepository {
    db: Arc<DbPool>,
}

impl SeaOrmShopRepository {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ShopRepository for SeaOrmShopRepository {
    #[instrument(skip(self, item), fields(payment_id = %item.payment_id, product_id = item.product_id))]
    async fn insert_request(&self, item: NewRequest) -> Result<request::Model, ServiceError> {
        let model = request::ActiveModel {
            payment_id: Set(item.payment_id),
            price: Set(item.price),
            tax: Set(item.tax),
            track: Set(String::new()),
            status: Set(item.status),
            created_at: Set(Utc::now()),
            store_id: Set(item.store_id),
            product_id: Set(item.product_id),
            user_id: Set(item.user_id),
            ..Default::default()
        };

        model
            .insert(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, changes))]
    async fn update_request(
        &self,
        id: i32,
        changes: RequestChanges,
    ) -> Result<request::Model, ServiceError> {
        let existing = request::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("request {id} not found")))?;

        let mut active: request::ActiveModel = existing.into();
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        if let Some(track) = changes.track {
            active.track = Set(track);
        }

        active
            .update(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, filter))]
    async fn search_requests(
        &self,
        filter: RequestFilter,
    ) -> Result<Vec<request::Model>, ServiceError> {
        let mut query = request::Entity::find();

        query = match filter.scope {
            RequestScope::Store(id) => query.filter(request::Column::StoreId.eq(id)),
            RequestScope::User(id) => query.filter(request::Column::UserId.eq(id)),
        };
        if let Some(status) = filter.status {
            query = query.filter(request::Column::Status.eq(status));
        }
        if let Some(excluded) = filter.exclude_status {
            query = query.filter(request::Column::Status.ne(excluded));
        }
        if let Some(after) = filter.created_after {
            query = query.filter(request::Column::CreatedAt.gt(after));
        }
        if let Some(before) = filter.created_before {
            query = query.filter(request::Column::CreatedAt.lt(before));
        }

        query
            .order_by_asc(request::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    async fn requests_by_payment(
        &self,
        payment_id: &str,
    ) -> Result<Vec<request::Model>, ServiceError> {
        request::Entity::find()
            .filter(request::Column::PaymentId.eq(payment_id))
            .order_by_asc(request::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    async fn transition_requests_by_payment(
        &self,
        payment_id: &str,
        from: &str,
        to: &str,
    ) -> Result<u64, ServiceError> {
        let result = request::Entity::update_many()
            .col_expr(request::Column::Status, Expr::value(to))
            .filter(request::Column::PaymentId.eq(payment_id))
            .filter(request::Column::Status.eq(from))
            .exec(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(result.rows_affected)
    }

    #[instrument(skip(self, item), fields(store_id = item.store_id))]
    async fn insert_payment(&self, item: NewPayment) -> Result<payment::Model, ServiceError> {
        let model = payment::ActiveModel {
            total: Set(item.total),
            pix: Set(item.pix),
            status: Set(item.status),
            created_at: Set(Utc::now()),
            store_id: Set(item.store_id),
            product_id: Set(item.product_id),
            ..Default::default()
        };

        model
            .insert(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    async fn update_payment_status(
        &self,
        id: i32,
        status: String,
    ) -> Result<payment::Model, ServiceError> {
        let existing = payment::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("payment {id} not found")))?;

        let mut active: payment::ActiveModel = existing.into();
        active.status = Set(status);

        active
            .update(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    async fn payments_by_store(
        &self,
        store_id: i32,
    ) -> Result<Vec<payment::Model>, ServiceError> {
        payment::Entity::find()
            .filter(payment::Column::StoreId.eq(store_id))
            .order_by_asc(payment::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, filter))]
    async fn search_payments(
        &self,
        filter: PaymentFilter,
    ) -> Result<Vec<payment::Model>, ServiceError> {
        let mut query = payment::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(payment::Column::Status.eq(status));
        }
        if let Some(after) = filter.created_after {
            query = query.filter(payment::Column::CreatedAt.gt(after));
        }
        if let Some(before) = filter.created_before {
            query = query.filter(payment::Column::CreatedAt.lt(before));
        }

        query
            .order_by_asc(payment::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
