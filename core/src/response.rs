use crate::error::ErrorCode;
use crate::model::{Envelope, Message};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Ok,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    pub timestamp: String,
}

/// Mutable context threaded through one reasoning request.
///
/// Owns the TRAPI envelope plus the accumulated log. Recoverable problems are
/// recorded with [`Response::warning`]; [`Response::error`] flips the status and
/// callers stop processing once [`Response::is_ok`] turns false.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    pub envelope: Envelope,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<ErrorCode>,
    logs: Vec<LogEntry>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(message: Message) -> Self {
        Self {
            envelope: Envelope { message },
            ..Self::default()
        }
    }

    pub fn message(&self) -> &Message {
        &self.envelope.message
    }

    pub fn message_mut(&mut self) -> &mut Message {
        &mut self.envelope.message
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error_code
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.messages_at(LogLevel::Warning)
    }

    pub fn errors(&self) -> Vec<&str> {
        self.messages_at(LogLevel::Error)
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("{}", message);
        self.push(LogLevel::Debug, message, None);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.push(LogLevel::Info, message, None);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.push(LogLevel::Warning, message, None);
    }

    pub fn error(&mut self, message: impl Into<String>, code: ErrorCode) {
        let message = message.into();
        tracing::error!(%code, "{}", message);
        self.status = Status::Error;
        // The first error wins; later ones are only logged.
        if self.error_code.is_none() {
            self.error_code = Some(code);
        }
        self.push(LogLevel::Error, message, Some(code));
    }

    fn push(&mut self, level: LogLevel, message: String, code: Option<ErrorCode>) {
        self.logs.push(LogEntry {
            level,
            message,
            code,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }

    fn messages_at(&self, level: LogLevel) -> Vec<&str> {
        self.logs
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_keeps_status_ok() {
        let mut response = Response::new();
        response.warning("score missing");
        assert!(response.is_ok());
        assert_eq!(response.warnings(), vec!["score missing"]);
    }

    #[test]
    fn test_first_error_code_is_kept() {
        let mut response = Response::new();
        response.error("bad qedge", ErrorCode::FailedPrecondition);
        response.error("later failure", ErrorCode::Internal);

        assert_eq!(response.status(), Status::Error);
        assert_eq!(response.error_code(), Some(ErrorCode::FailedPrecondition));
        assert_eq!(response.errors().len(), 2);
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let response = Response::new();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "OK");
    }
}
