use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::error::{HomeworkError, Result};

const HOMEWORKS_KEY: &str = "homeworks";
const CURRENT_DATE_KEY: &str = "current_date";
const NAME_KEY: &str = "homework_name";
const STATUS_KEY: &str = "status";

/// Review status codes reported by the API.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(HomeworkStatus::Approved),
            "reviewing" => Some(HomeworkStatus::Reviewing),
            "rejected" => Some(HomeworkStatus::Rejected),
            _ => None,
        }
    }

    /// Human-readable verdict shown in the chat.
    pub fn verdict(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl std::fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HomeworkStatus::Approved => write!(f, "approved"),
            HomeworkStatus::Reviewing => write!(f, "reviewing"),
            HomeworkStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Validate the shape of an API answer and return its first homework record.
pub fn check_response(response: &Value) -> Result<&Value> {
    info!("Checking API response");

    let Some(map) = response.as_object() else {
        error!("API response is not a JSON object");
        return Err(HomeworkError::TypeMismatch("ответ API не является словарём"));
    };
    let Some(homeworks) = map.get(HOMEWORKS_KEY) else {
        error!("API response has no '{}' key", HOMEWORKS_KEY);
        return Err(HomeworkError::MissingField(HOMEWORKS_KEY));
    };
    if !map.contains_key(CURRENT_DATE_KEY) {
        error!("API response has no '{}' key", CURRENT_DATE_KEY);
        return Err(HomeworkError::MissingField(CURRENT_DATE_KEY));
    }
    let Some(homeworks) = homeworks.as_array() else {
        error!("'{}' in API response is not a list", HOMEWORKS_KEY);
        return Err(HomeworkError::TypeMismatch("homeworks не является списком"));
    };

    // Only the most recent record is reported; the rest are ignored.
    homeworks.first().ok_or_else(|| {
        error!("API response contains no homeworks");
        HomeworkError::EmptyResult
    })
}

/// The `current_date` cursor of a response, when it is an integer.
pub fn response_cursor(response: &Value) -> Option<i64> {
    response.get(CURRENT_DATE_KEY)?.as_i64()
}

/// Build the notification text for a homework record.
pub fn parse_status(homework: &Value) -> Result<String> {
    let Some(name) = homework.get(NAME_KEY) else {
        error!("Homework record has no '{}' key", NAME_KEY);
        return Err(HomeworkError::MissingField(NAME_KEY));
    };
    let Some(status) = homework.get(STATUS_KEY) else {
        error!("Homework record has no '{}' key", STATUS_KEY);
        return Err(HomeworkError::MissingField(STATUS_KEY));
    };

    let code = status.as_str().map(str::to_string).unwrap_or_else(|| status.to_string());
    let Some(status) = HomeworkStatus::from_code(&code) else {
        error!("Unknown homework status: {}", code);
        return Err(HomeworkError::UnknownStatus(code));
    };

    let name = name.as_str().map(str::to_string).unwrap_or_else(|| name.to_string());
    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_code_round_trips_display() {
        for status in [
            HomeworkStatus::Approved,
            HomeworkStatus::Reviewing,
            HomeworkStatus::Rejected,
        ] {
            assert_eq!(HomeworkStatus::from_code(&status.to_string()), Some(status));
        }
        assert_eq!(HomeworkStatus::from_code("APPROVED"), None);
        assert_eq!(HomeworkStatus::from_code(""), None);
    }

    #[test]
    fn test_check_response_rejects_non_objects() {
        for response in [json!([]), json!("homeworks"), json!(42), json!(null), json!(true)] {
            assert!(
                matches!(check_response(&response), Err(HomeworkError::TypeMismatch(_))),
                "accepted {}",
                response
            );
        }
    }

    #[test]
    fn test_check_response_missing_homeworks() {
        let response = json!({"current_date": 123});
        assert!(matches!(
            check_response(&response),
            Err(HomeworkError::MissingField("homeworks"))
        ));
    }

    #[test]
    fn test_check_response_missing_current_date() {
        let response = json!({"homeworks": [{"homework_name": "a", "status": "approved"}]});
        assert!(matches!(
            check_response(&response),
            Err(HomeworkError::MissingField("current_date"))
        ));
    }

    #[test]
    fn test_check_response_homeworks_not_list() {
        for homeworks in [json!({}), json!("x"), json!(1), json!(null)] {
            let response = json!({"homeworks": homeworks, "current_date": 1});
            assert!(matches!(
                check_response(&response),
                Err(HomeworkError::TypeMismatch(_))
            ));
        }
    }

    #[test]
    fn test_check_response_empty_list() {
        let response = json!({"homeworks": [], "current_date": 123});
        assert!(matches!(
            check_response(&response),
            Err(HomeworkError::EmptyResult)
        ));
    }

    #[test]
    fn test_check_response_returns_first_element() {
        let response = json!({
            "homeworks": [
                {"homework_name": "first", "status": "approved"},
                {"homework_name": "second", "status": "rejected"},
                {"homework_name": "third", "status": "reviewing"}
            ],
            "current_date": 123
        });
        let first = check_response(&response).unwrap();
        assert_eq!(first["homework_name"], "first");
    }

    #[test]
    fn test_response_cursor() {
        assert_eq!(response_cursor(&json!({"current_date": 1700000000})), Some(1700000000));
        assert_eq!(response_cursor(&json!({"current_date": "soon"})), None);
        assert_eq!(response_cursor(&json!({})), None);
    }

    #[test]
    fn test_parse_status_approved_message() {
        let homework = json!({"homework_name": "proj1", "status": "approved"});
        assert_eq!(
            parse_status(&homework).unwrap(),
            "Изменился статус проверки работы \"proj1\". Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn test_parse_status_contains_name_and_verdict() {
        for status in [
            HomeworkStatus::Approved,
            HomeworkStatus::Reviewing,
            HomeworkStatus::Rejected,
        ] {
            let homework = json!({"homework_name": "hw_api", "status": status.to_string()});
            let message = parse_status(&homework).unwrap();
            assert!(message.contains("\"hw_api\""));
            assert!(message.ends_with(status.verdict()));
        }
    }

    #[test]
    fn test_parse_status_missing_fields() {
        assert!(matches!(
            parse_status(&json!({"status": "approved"})),
            Err(HomeworkError::MissingField("homework_name"))
        ));
        assert!(matches!(
            parse_status(&json!({"homework_name": "x"})),
            Err(HomeworkError::MissingField("status"))
        ));
    }

    #[test]
    fn test_parse_status_unknown_status() {
        let homework = json!({"homework_name": "x", "status": "lost"});
        match parse_status(&homework) {
            Err(HomeworkError::UnknownStatus(code)) => assert_eq!(code, "lost"),
            other => panic!("unexpected result: {:?}", other),
        }
        let homework = json!({"homework_name": "x", "status": 7});
        assert!(matches!(
            parse_status(&homework),
            Err(HomeworkError::UnknownStatus(_))
        ));
    }
}
