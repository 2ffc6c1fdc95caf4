use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetRequest {
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VerifyTokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    #[serde(rename = "novaSenha")]
    pub new_password: Option<String>,
    #[serde(rename = "confirmaSenha")]
    pub confirm_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyTokenResponse {
    pub valido: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erro: Option<&'static str>,
}
