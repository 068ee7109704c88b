use serde::{Deserialize, Serialize};

/// Stored user row. Carries the password hash; never serialized to clients.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub userid: String,
    pub email: String,
    pub timezone: String,
    pub passhash: String,
}

/// Public fields of a user, as returned by signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub userid: String,
    pub email: String,
    pub timezone: String,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            userid: record.userid,
            email: record.email,
            timezone: record.timezone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_drops_password_hash() {
        let record = UserRecord {
            userid: "u1".to_string(),
            email: "a@b.com".to_string(),
            timezone: "UTC".to_string(),
            passhash: "$argon2id$secret".to_string(),
        };

        let json = serde_json::to_value(UserProfile::from(record)).unwrap();
        assert_eq!(json["userid"], "u1");
        assert_eq!(json["email"], "a@b.com");
        assert!(json.get("passhash").is_none());
    }
}
