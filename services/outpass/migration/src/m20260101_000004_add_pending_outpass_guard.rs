use sea_orm_migration::prelude::*;

/// At most one pending outpass per student, enforced by the database as well
/// as by the request usecase.
#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEX_NAME: &str = "uq_outpasses_student_id_pending";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {INDEX_NAME} \
                 ON outpasses (student_id) WHERE status = 'pending'"
            ))
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(INDEX_NAME).to_owned())
            .await
    }
}
