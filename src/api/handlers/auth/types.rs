//! Request and response bodies for the auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Address is normalized (trimmed, lowercased) before storage.
    pub email: String,
    pub phone_number: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub password: String,
    /// Signup verification code previously delivered to the address.
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Email address or phone number.
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for subsequent authenticated calls.
    pub token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendCodeRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyCodeResponse {
    /// Single-use token accepted by the reset-password endpoint.
    pub reset_token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub reset_token: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LinkVerifyRequest {
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_request_full_name_defaults_to_none() {
        let body = r#"{
            "email": "a@b.co",
            "phone_number": "+15550001111",
            "password": "hunter22",
            "code": "123456"
        }"#;
        let req: SignupRequest = serde_json::from_str(body).unwrap();
        assert!(req.full_name.is_none());
        assert_eq!(req.email, "a@b.co");
    }

    #[test]
    fn login_response_serializes_token_field() {
        let json = serde_json::to_value(LoginResponse {
            token: "abc".into(),
        })
        .unwrap();
        assert_eq!(json["token"], "abc");
    }

    #[test]
    fn verify_code_response_round_trips() {
        let json = r#"{"reset_token":"t0k3n"}"#;
        let resp: VerifyCodeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.reset_token, "t0k3n");
    }
}
