//! Errors raised while polling the homework API.
//!
//! Display strings end up in chat notifications, so they are written for the
//! person reading the chat.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HomeworkError>;

#[derive(Error, Debug)]
pub enum HomeworkError {
    // API client errors
    #[error("Ошибка при запросе к API: {source}. Параметры запроса: {params}")]
    Transport {
        params: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Эндпоинт недоступен. Ответ API: {0}")]
    UnexpectedStatus(u16),

    #[error("Ошибка ответа из формата json: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    // Response shape errors
    #[error("Неверный тип данных: {0}")]
    TypeMismatch(&'static str),

    #[error("Отсутствует ключ {0} в ответе API")]
    MissingField(&'static str),

    #[error("Список домашних работ пуст")]
    EmptyResult,

    #[error("Неизвестный статус работы: {0}")]
    UnknownStatus(String),
}

/// A failed poll cycle, as reported to the chat.
#[derive(Error, Debug)]
#[error("Сбой в работе программы: {source}")]
pub struct CycleFailure {
    #[from]
    pub source: HomeworkError,
}
