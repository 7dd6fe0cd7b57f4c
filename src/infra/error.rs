use thiserror::Error;

/// Infrastructure errors that can occur during startup.
///
/// SECURITY: Display messages are sanitized and safe for logs/console output.
/// Debug output includes the full #[source] error chain which may contain
/// secrets (e.g., connection strings) - use Display (%e) not Debug (?e) in logs.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Database connection failed. Check DATABASE_URL and ensure the database is running.")]
    DatabaseConnection(#[source] sqlx::Error),

    #[error("Schema setup failed")]
    Schema(#[source] sqlx::Error),

    #[error("HTTP client could not be built")]
    HttpClient(#[source] reqwest::Error),

    #[error("Log file {path} could not be created")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
