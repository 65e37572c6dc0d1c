use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use mongodb::bson;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use serde::Serialize;
use std::io;
use thiserror::Error;

/// MongoDB 唯一索引冲突错误码
const DUPLICATE_KEY: i32 = 11000;

/// 存储层错误，原样向调用方透出，不做重试
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("document codec error: {0}")]
    Codec(String),
}

impl From<MongoError> for StoreError {
    fn from(e: MongoError) -> Self {
        match e.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY => {
                StoreError::ConstraintViolation(we.message.clone())
            }
            ErrorKind::Command(ce) if ce.code == DUPLICATE_KEY => StoreError::ConstraintViolation(ce.message.clone()),
            ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => StoreError::Codec(e.to_string()),
            _ => StoreError::Unavailable(e.to_string()),
        }
    }
}

impl From<bson::ser::Error> for StoreError {
    fn from(e: bson::ser::Error) -> Self {
        StoreError::Codec(e.to_string())
    }
}

impl From<bson::de::Error> for StoreError {
    fn from(e: bson::de::Error) -> Self {
        StoreError::Codec(e.to_string())
    }
}

/// HTTP 错误响应结构
#[derive(Serialize)]
struct ErrorResponse {
    code: u16,
    message: String,
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    // ==== 常规业务错误 ====
    #[error("Resource not found")]
    NotFound,

    #[error("Bad request: {0}")]
    Validation(String),

    // ==== 系统错误 ====
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Internal server error")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            AppError::Store(StoreError::InvalidId(_)) => StatusCode::BAD_REQUEST,
            AppError::Store(_) | AppError::Io(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("{:?}", self);
            "Service error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(ErrorResponse { code: status.as_u16(), message })
    }
}
