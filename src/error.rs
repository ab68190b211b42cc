use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }
}

// Every failure leaves the server as an HTTP status plus an {"error"} JSON
// body. IO details are logged here and not echoed back to the client.
impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let (status, message) = match &self {
            AppError::InvalidInput(msg) => (Status::BadRequest, msg.clone()),
            AppError::NotFound(what) => (Status::NotFound, format!("{} not found", what)),
            AppError::Io(e) => {
                log::error!("IO failure while handling {}: {}", req.uri(), e);
                (Status::InternalServerError, "Internal server error".to_string())
            }
        };

        let body = Json(serde_json::json!({ "error": message }));
        response::status::Custom(status, body).respond_to(req)
    }
}
