mod cli;
mod infra;
mod routes;
mod score;
mod server;

use contractor_match::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
