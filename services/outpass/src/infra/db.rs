use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, sea_query::Expr,
};
use uuid::Uuid;

use outpass_domain::outpass::OutpassStatus;
use outpass_domain::user::UserRole;
use outpass_schema::{notifications, outpasses, users};

use crate::domain::repository::{NotificationRepository, OutpassRepository, UserRepository};
use crate::domain::types::{Notification, Outpass, User};
use crate::error::OutpassServiceError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, OutpassServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, OutpassServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, OutpassServiceError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find users by ids")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn create(&self, user: &User) -> Result<(), OutpassServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(i16::from(user.role.as_u8())),
            phone: Set(user.phone.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(OutpassServiceError::UserAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn set_phone_once(&self, id: Uuid, phone: &str) -> Result<bool, OutpassServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Phone, Expr::value(phone))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::Phone.is_null())
            .exec(&self.db)
            .await
            .context("set user phone")?;
        Ok(result.rows_affected == 1)
    }
}

fn user_from_model(model: users::Model) -> Result<User, OutpassServiceError> {
    let role = u8::try_from(model.role)
        .ok()
        .and_then(UserRole::from_u8)
        .with_context(|| format!("unknown role {} for user {}", model.role, model.id))?;
    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        role,
        phone: model.phone,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Outpass repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOutpassRepository {
    pub db: DatabaseConnection,
}

impl OutpassRepository for DbOutpassRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Outpass>, OutpassServiceError> {
        let model = outpasses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find outpass by id")?;
        model.map(outpass_from_model).transpose()
    }

    async fn has_pending(&self, student_id: Uuid) -> Result<bool, OutpassServiceError> {
        let count = outpasses::Entity::find()
            .filter(outpasses::Column::StudentId.eq(student_id))
            .filter(outpasses::Column::Status.eq(OutpassStatus::Pending.as_str()))
            .count(&self.db)
            .await
            .context("check pending outpass")?;
        Ok(count > 0)
    }

    async fn create(&self, outpass: &Outpass) -> Result<(), OutpassServiceError> {
        let result = outpasses::ActiveModel {
            id: Set(outpass.id),
            student_id: Set(outpass.student_id),
            reason: Set(outpass.reason.clone()),
            out_time: Set(outpass.out_time),
            in_time: Set(outpass.in_time),
            status: Set(outpass.status.as_str().to_owned()),
            staff_id: Set(outpass.staff_id),
            action_time: Set(outpass.action_time),
            reached: Set(outpass.reached),
            actual_in_time: Set(outpass.actual_in_time),
            delay_minutes: Set(outpass.delay_minutes),
            created_at: Set(outpass.created_at),
            updated_at: Set(outpass.updated_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            // uq_outpasses_student_id_pending
            Err(e) if is_unique_violation(&e) => Err(OutpassServiceError::DuplicatePending),
            Err(e) => Err(anyhow::Error::new(e).context("create outpass").into()),
        }
    }

    async fn list_by_status(
        &self,
        status: OutpassStatus,
    ) -> Result<Vec<Outpass>, OutpassServiceError> {
        let models = outpasses::Entity::find()
            .filter(outpasses::Column::Status.eq(status.as_str()))
            .order_by_desc(outpasses::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list outpasses by status")?;
        models.into_iter().map(outpass_from_model).collect()
    }

    async fn list_by_student(&self, student_id: Uuid) -> Result<Vec<Outpass>, OutpassServiceError> {
        let models = outpasses::Entity::find()
            .filter(outpasses::Column::StudentId.eq(student_id))
            .order_by_desc(outpasses::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list outpasses by student")?;
        models.into_iter().map(outpass_from_model).collect()
    }

    async fn list_reached(&self) -> Result<Vec<Outpass>, OutpassServiceError> {
        let models = outpasses::Entity::find()
            .filter(outpasses::Column::Reached.eq(true))
            .order_by_desc(outpasses::Column::ActualInTime)
            .all(&self.db)
            .await
            .context("list reached outpasses")?;
        models.into_iter().map(outpass_from_model).collect()
    }

    async fn count_by_status(&self, status: OutpassStatus) -> Result<u64, OutpassServiceError> {
        let count = outpasses::Entity::find()
            .filter(outpasses::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await
            .context("count outpasses by status")?;
        Ok(count)
    }

    async fn list_student_ids(&self) -> Result<Vec<Uuid>, OutpassServiceError> {
        let ids = outpasses::Entity::find()
            .select_only()
            .column(outpasses::Column::StudentId)
            .order_by_asc(outpasses::Column::CreatedAt)
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .context("list outpass student ids")?;
        Ok(ids)
    }

    async fn save_decision(&self, decided: &Outpass) -> Result<bool, OutpassServiceError> {
        let result = outpasses::Entity::update_many()
            .col_expr(outpasses::Column::Status, Expr::value(decided.status.as_str()))
            .col_expr(outpasses::Column::StaffId, Expr::value(decided.staff_id))
            .col_expr(outpasses::Column::ActionTime, Expr::value(decided.action_time))
            .col_expr(outpasses::Column::UpdatedAt, Expr::value(decided.updated_at))
            .filter(outpasses::Column::Id.eq(decided.id))
            .filter(outpasses::Column::Status.eq(OutpassStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("save outpass decision")?;
        Ok(result.rows_affected == 1)
    }

    async fn decide_all_pending(
        &self,
        status: OutpassStatus,
        staff_id: Uuid,
        action_time: DateTime<Utc>,
    ) -> Result<u64, OutpassServiceError> {
        let result = outpasses::Entity::update_many()
            .col_expr(outpasses::Column::Status, Expr::value(status.as_str()))
            .col_expr(outpasses::Column::StaffId, Expr::value(staff_id))
            .col_expr(outpasses::Column::ActionTime, Expr::value(action_time))
            .col_expr(outpasses::Column::UpdatedAt, Expr::value(action_time))
            .filter(outpasses::Column::Status.eq(OutpassStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("decide all pending outpasses")?;
        Ok(result.rows_affected)
    }

    async fn save_reached(&self, reached: &Outpass) -> Result<bool, OutpassServiceError> {
        let result = outpasses::Entity::update_many()
            .col_expr(outpasses::Column::Reached, Expr::value(true))
            .col_expr(
                outpasses::Column::ActualInTime,
                Expr::value(reached.actual_in_time),
            )
            .col_expr(
                outpasses::Column::DelayMinutes,
                Expr::value(reached.delay_minutes),
            )
            .col_expr(outpasses::Column::UpdatedAt, Expr::value(reached.updated_at))
            .filter(outpasses::Column::Id.eq(reached.id))
            .filter(outpasses::Column::Status.eq(OutpassStatus::Approved.as_str()))
            .filter(outpasses::Column::Reached.eq(false))
            .exec(&self.db)
            .await
            .context("save outpass return")?;
        Ok(result.rows_affected == 1)
    }

    async fn delete_pending(
        &self,
        id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, OutpassServiceError> {
        let result = outpasses::Entity::delete_many()
            .filter(outpasses::Column::Id.eq(id))
            .filter(outpasses::Column::StudentId.eq(student_id))
            .filter(outpasses::Column::Status.eq(OutpassStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("delete pending outpass")?;
        Ok(result.rows_affected == 1)
    }
}

fn outpass_from_model(model: outpasses::Model) -> Result<Outpass, OutpassServiceError> {
    let status = model
        .status
        .parse::<OutpassStatus>()
        .with_context(|| format!("outpass {}", model.id))?;
    Ok(Outpass {
        id: model.id,
        student_id: model.student_id,
        reason: model.reason,
        out_time: model.out_time,
        in_time: model.in_time,
        status,
        staff_id: model.staff_id,
        action_time: model.action_time,
        reached: model.reached,
        actual_in_time: model.actual_in_time,
        delay_minutes: model.delay_minutes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Notification repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbNotificationRepository {
    pub db: DatabaseConnection,
}

impl NotificationRepository for DbNotificationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, OutpassServiceError> {
        let model = notifications::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find notification by id")?;
        Ok(model.map(notification_from_model))
    }

    async fn create(&self, notification: &Notification) -> Result<(), OutpassServiceError> {
        notifications::ActiveModel {
            id: Set(notification.id),
            title: Set(notification.title.clone()),
            message: Set(notification.message.clone()),
            created_by: Set(notification.created_by),
            expires_at: Set(notification.expires_at),
            created_at: Set(notification.created_at),
        }
        .insert(&self.db)
        .await
        .context("create notification")?;
        Ok(())
    }

    async fn update(
        &self,
        notification: &Notification,
        now: DateTime<Utc>,
    ) -> Result<bool, OutpassServiceError> {
        let result = notifications::Entity::update_many()
            .col_expr(
                notifications::Column::Title,
                Expr::value(notification.title.clone()),
            )
            .col_expr(
                notifications::Column::Message,
                Expr::value(notification.message.clone()),
            )
            .filter(notifications::Column::Id.eq(notification.id))
            .filter(notifications::Column::ExpiresAt.gte(now))
            .exec(&self.db)
            .await
            .context("update notification")?;
        Ok(result.rows_affected == 1)
    }

    async fn list_by_creator(
        &self,
        created_by: Uuid,
    ) -> Result<Vec<Notification>, OutpassServiceError> {
        let models = notifications::Entity::find()
            .filter(notifications::Column::CreatedBy.eq(created_by))
            .order_by_desc(notifications::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list notifications by creator")?;
        Ok(models.into_iter().map(notification_from_model).collect())
    }

    async fn list_active(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Notification>, OutpassServiceError> {
        let models = notifications::Entity::find()
            .filter(notifications::Column::ExpiresAt.gt(now))
            .order_by_desc(notifications::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list active notifications")?;
        Ok(models.into_iter().map(notification_from_model).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, OutpassServiceError> {
        let result = notifications::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete notification")?;
        Ok(result.rows_affected > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, OutpassServiceError> {
        let result = notifications::Entity::delete_many()
            .filter(notifications::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .context("purge expired notifications")?;
        Ok(result.rows_affected)
    }
}

fn notification_from_model(model: notifications::Model) -> Notification {
    Notification {
        id: model.id,
        title: model.title,
        message: model.message,
        created_by: model.created_by,
        expires_at: model.expires_at,
        created_at: model.created_at,
    }
}
