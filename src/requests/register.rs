use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub school_id: Option<String>,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !self.email.contains('@') {
            return Err("email must be a valid address".to_string());
        }
        if self.password.len() < 6 {
            return Err("password must be at least 6 characters".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
