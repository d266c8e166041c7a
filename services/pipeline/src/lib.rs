mod cli;

use career_engine::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
