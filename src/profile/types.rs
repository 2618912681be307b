//! Profile record types.

use serde::{Deserialize, Serialize};

/// Identifier of the single profile document.
pub const PROFILE_USER_ID: i64 = 1;

/// The persisted profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub userid: i64,
    pub name: String,
    pub email: String,
    pub interests: String,
}

/// User-supplied profile fields that survived sanitization.
///
/// `None` means the field was absent (or rejected) in the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
}

impl ProfileFields {
    /// True when no field survived sanitization.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.interests.is_none()
    }

    /// Build the full document written by an upsert; absent fields become `""`.
    pub fn into_profile(self) -> Profile {
        Profile {
            userid: PROFILE_USER_ID,
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            interests: self.interests.unwrap_or_default(),
        }
    }
}

/// Fixed acknowledgement returned by update-profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAck {
    pub success: bool,
    pub message: String,
}

impl UpdateAck {
    pub fn updated() -> Self {
        Self {
            success: true,
            message: "Profile updated successfully".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_default_to_empty_strings() {
        let fields = ProfileFields {
            name: Some("Ann".into()),
            ..Default::default()
        };
        let profile = fields.into_profile();
        assert_eq!(profile.userid, PROFILE_USER_ID);
        assert_eq!(profile.name, "Ann");
        assert_eq!(profile.email, "");
        assert_eq!(profile.interests, "");
    }

    #[test]
    fn profile_serializes_with_fixed_id() {
        let profile = ProfileFields::default().into_profile();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"userid": 1, "name": "", "email": "", "interests": ""})
        );
    }
}
