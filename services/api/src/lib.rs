mod assistant;
mod cli;
mod infra;
mod routes;
mod server;

use lead_radar::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
