mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use maternal_guard::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
