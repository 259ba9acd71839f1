use sea_orm::entity::prelude::*;

/// A student's request to leave campus, with its review and return state.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "outpasses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    pub out_time: chrono::DateTime<chrono::Utc>,
    pub in_time: chrono::DateTime<chrono::Utc>,
    /// `pending` | `approved` | `rejected`.
    pub status: String,
    pub staff_id: Option<Uuid>,
    pub action_time: Option<chrono::DateTime<chrono::Utc>>,
    pub reached: bool,
    pub actual_in_time: Option<chrono::DateTime<chrono::Utc>>,
    pub delay_minutes: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StaffId",
        to = "super::users::Column::Id"
    )]
    Staff,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
