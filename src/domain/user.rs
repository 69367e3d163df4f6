use serde::{Deserialize, Serialize};

/// A shop user as the API returns it, either on login or populated inside an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }

    /// Best label for tables: name, then mobile, then the raw id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.mobile.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Reference from an order to its user. The API sends either the bare id or a
/// populated user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    Populated(User),
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            UserRef::Id(id) => id,
            UserRef::Populated(user) => &user.id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            UserRef::Id(id) => id,
            UserRef::Populated(user) => user.display_name(),
        }
    }
}

impl Default for UserRef {
    fn default() -> Self {
        UserRef::Id(String::new())
    }
}
