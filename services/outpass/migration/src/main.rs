use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(outpass_migration::Migrator).await;
}
