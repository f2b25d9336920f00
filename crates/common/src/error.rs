use thiserror::Error;

/// Fatal conditions detected before the poll loop starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartupError {
    #[error("Переменная окружения {0} отсутствует")]
    MissingCredential(&'static str),

    #[error("Переменная окружения {key} имеет некорректное значение: {value:?}")]
    InvalidSetting { key: &'static str, value: String },
}

/// Failure to obtain a decodable payload from the homework API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Ошибка при обращении к API Практикум.Домашка. Причина: {0}")]
    Transport(String),

    #[error("Ошибка HTTP при обращении к API: код {0}")]
    Status(u16),

    #[error("Ошибка при преобразовании в JSON: {0}")]
    Decode(String),
}

/// The payload does not match the contract the bot relies on.
///
/// Every variant names the JSON kind that was actually observed so a server
/// contract change can be diagnosed from the chat message alone.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("В {context} ожидался словарь, получили {observed}")]
    NotAMapping {
        context: &'static str,
        observed: &'static str,
    },

    #[error("В {context} отсутствует ключ \"{key}\". Есть ключи: [{present}]")]
    MissingKey {
        context: &'static str,
        key: &'static str,
        /// Keys that were present, not their values: values vary between
        /// polls and can be arbitrarily large.
        present: String,
    },

    #[error("Значение ключа \"{key}\" ожидалось типа {expected}, получили {observed}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
        observed: &'static str,
    },

    #[error("\"status\" имеет неожиданное значение {0:?}")]
    UnknownStatus(String),
}

/// The messaging service did not accept a message.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Ошибка при отправке сообщения в Telegram. Причина: {0}")]
    Transport(String),

    #[error("Telegram отклонил сообщение: код {status}, ответ {body}")]
    Rejected { status: u16, body: String },
}

/// Everything a single poll cycle can fail with. All of it is recoverable.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}
