use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub csrf_token: String,
    pub email: String,
    pub password: String,
}

impl LoginData {
    pub fn validate(&self) -> bool {
        let email = self.email.trim();
        if email.is_empty() || email.len() > 254 || !email.contains('@') {
            return false;
        }

        !self.password.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(email: &str, password: &str) -> LoginData {
        LoginData {
            csrf_token: "t".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn validate() {
        assert!(data("employee@test.tld", "employee").validate());
        assert!(!data("", "employee").validate());
        assert!(!data("employee", "employee").validate());
        assert!(!data("employee@test.tld", "").validate());
        assert!(!data(&format!("{}@a", "x".repeat(260)), "p").validate());
    }
}
