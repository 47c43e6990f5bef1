use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role. Farmers sell, consumers buy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Consumer,
}

impl Role {
    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Consumer => "consumer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored or submitted role string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "farmer" => Ok(Role::Farmer),
            "consumer" => Ok(Role::Consumer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Login response.
///
/// `phone` and `Fullname` are optional: older backend builds omit them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub email: String,
    pub role: Role,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "Fullname", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    #[serde(rename = "Fullname")]
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role: Role,
}

/// Registration response. The backend only guarantees a status code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error body returned by the backend on non-2xx responses.
///
/// Routes disagree on the field name, so both are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    /// First non-blank message carried by the body.
    pub fn into_message(self) -> Option<String> {
        self.message
            .into_iter()
            .chain(self.error)
            .find(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_uses_backend_field_names() {
        let request = RegisterRequest {
            full_name: "Asha Patil".to_string(),
            email: "asha@example.com".to_string(),
            password: "secret".to_string(),
            phone: "9876543210".to_string(),
            role: Role::Farmer,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["Fullname"], "Asha Patil");
        assert_eq!(value["role"], "farmer");
        assert!(value.get("full_name").is_none());
    }

    #[test]
    fn test_login_response_optional_fields() {
        let full: LoginResponse = serde_json::from_str(
            r#"{"email":"a@b.com","role":"consumer","token":"t","phone":"1","Fullname":"A B"}"#,
        )
        .unwrap();
        assert_eq!(full.role, Role::Consumer);
        assert_eq!(full.full_name.as_deref(), Some("A B"));

        let minimal: LoginResponse =
            serde_json::from_str(r#"{"email":"a@b.com","role":"farmer","token":"t1"}"#).unwrap();
        assert!(minimal.phone.is_none());
        assert!(minimal.full_name.is_none());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("farmer".parse::<Role>(), Ok(Role::Farmer));
        assert_eq!("consumer".parse::<Role>(), Ok(Role::Consumer));
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(Role::Consumer.to_string(), "consumer");
    }

    #[test]
    fn test_error_response_prefers_message() {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"message":"Invalid credentials","error":"x"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid credentials"));

        let body: ErrorResponse = serde_json::from_str(r#"{"message":"  ","error":"x"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("x"));

        assert_eq!(ErrorResponse::default().into_message(), None);
    }
}
