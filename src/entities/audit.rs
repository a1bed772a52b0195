//! Bookkeeping columns shared by every table.
//!
//! Each entity carries `created_at`, `updated_at`, `is_deleted` and
//! `deleted_at`. [`SoftDeleteEntity`] gives every entity the same default
//! view (live rows only) and archive view (soft-deleted rows), and
//! [`AuditFields`] is the value object the API exposes for them.

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuditFields {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl AuditFields {
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        }
    }
}

/// Implemented by entity models to expose their audit columns as one value.
pub trait Audited {
    fn audit(&self) -> AuditFields;
}

/// Implemented by active models so services can soft-delete uniformly.
pub trait SoftDeletable {
    fn mark_deleted(&mut self, at: DateTime<Utc>);
    fn touch(&mut self, at: DateTime<Utc>);
}

pub trait SoftDeleteEntity: EntityTrait {
    const IS_DELETED: Self::Column;

    /// Default repository view: rows that have not been soft-deleted.
    fn find_live() -> Select<Self> {
        Self::find().filter(Self::IS_DELETED.eq(false))
    }

    /// Archive view: soft-deleted rows only.
    fn find_archived() -> Select<Self> {
        Self::find().filter(Self::IS_DELETED.eq(true))
    }
}

/// Wires an entity module's `Model`, `ActiveModel` and `Entity` into the
/// audit traits. Expects the four audit columns to be present.
macro_rules! impl_audit {
    () => {
        impl $crate::entities::audit::Audited for Model {
            fn audit(&self) -> $crate::entities::audit::AuditFields {
                $crate::entities::audit::AuditFields {
                    created_at: self.created_at,
                    updated_at: self.updated_at,
                    is_deleted: self.is_deleted,
                    deleted_at: self.deleted_at,
                }
            }
        }

        impl $crate::entities::audit::SoftDeletable for ActiveModel {
            fn mark_deleted(&mut self, at: chrono::DateTime<chrono::Utc>) {
                self.is_deleted = sea_orm::Set(true);
                self.deleted_at = sea_orm::Set(Some(at));
                self.updated_at = sea_orm::Set(at);
            }

            fn touch(&mut self, at: chrono::DateTime<chrono::Utc>) {
                self.updated_at = sea_orm::Set(at);
            }
        }

        impl $crate::entities::audit::SoftDeleteEntity for Entity {
            const IS_DELETED: Column = Column::IsDeleted;
        }
    };
}

pub(crate) use impl_audit;
