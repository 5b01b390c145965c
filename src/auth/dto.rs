use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    forms::{email, non_negative, required_text},
};

/// Body of `POST /signup`. Fields stay optional so a missing one becomes a
/// readable validation message instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub weight: Option<String>,
    pub goal: Option<String>,
}

#[derive(Debug)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub weight: i64,
    pub goal: String,
}

impl SignupForm {
    pub fn validate(self) -> AppResult<Signup> {
        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            return Err(AppError::validation("password is required"));
        }
        Ok(Signup {
            name: required_text("name", self.name.as_deref())?,
            email: email("email", self.email.as_deref())?,
            password,
            weight: non_negative("weight", self.weight.as_deref())?,
            goal: required_text("goal", self.goal.as_deref())?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct Login {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(self) -> AppResult<Login> {
        let email = required_text("email", self.email.as_deref())?.to_lowercase();
        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            return Err(AppError::validation("password is required"));
        }
        Ok(Login { email, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> SignupForm {
        SignupForm {
            name: Some("Ann".into()),
            email: Some("Ann@X.com".into()),
            password: Some("p1".into()),
            weight: Some("60".into()),
            goal: Some("lose".into()),
        }
    }

    #[test]
    fn signup_converts_to_typed_values() {
        let s = ann().validate().unwrap();
        assert_eq!(s.name, "Ann");
        assert_eq!(s.email, "ann@x.com");
        assert_eq!(s.password, "p1");
        assert_eq!(s.weight, 60);
        assert_eq!(s.goal, "lose");
    }

    #[test]
    fn signup_rejects_missing_or_malformed_fields() {
        let err = SignupForm { goal: None, ..ann() }.validate().unwrap_err();
        assert!(err.to_string().contains("goal"));

        let err = SignupForm { weight: Some("sixty".into()), ..ann() }.validate().unwrap_err();
        assert!(err.to_string().contains("weight"));

        assert!(SignupForm { password: Some(String::new()), ..ann() }.validate().is_err());
        assert!(SignupForm::default().validate().is_err());
    }

    #[test]
    fn login_keeps_password_verbatim() {
        let l = LoginForm {
            email: Some(" ANN@x.com".into()),
            password: Some(" p1 ".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(l.email, "ann@x.com");
        assert_eq!(l.password, " p1 ");
    }
}
