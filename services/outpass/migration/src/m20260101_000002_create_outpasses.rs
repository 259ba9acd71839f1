use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Outpasses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Outpasses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Outpasses::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Outpasses::Reason).text().not_null())
                    .col(
                        ColumnDef::new(Outpasses::OutTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Outpasses::InTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Outpasses::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Outpasses::StaffId).uuid().null())
                    .col(
                        ColumnDef::new(Outpasses::ActionTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Outpasses::Reached)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Outpasses::ActualInTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Outpasses::DelayMinutes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Outpasses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Outpasses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Outpasses::Table, Outpasses::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Outpasses::Table, Outpasses::StaffId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Outpasses::Table)
                    .col(Outpasses::StudentId)
                    .col((Outpasses::CreatedAt, IndexOrder::Desc))
                    .name("idx_outpasses_student_id_created_at")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Outpasses::Table)
                    .col(Outpasses::Status)
                    .col((Outpasses::CreatedAt, IndexOrder::Desc))
                    .name("idx_outpasses_status_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Outpasses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Outpasses {
    Table,
    Id,
    StudentId,
    Reason,
    OutTime,
    InTime,
    Status,
    StaffId,
    ActionTime,
    Reached,
    ActualInTime,
    DelayMinutes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
