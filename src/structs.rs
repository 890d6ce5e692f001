use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::{deserialize_id, deserialize_optional_id};

pub const DEFAULT_COLOR_HEX: &str = "#000000";

/// A row of `users`. The password is stored verbatim.
#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    pub status: String,
}

/// What the users list returns unless legacy password exposure is enabled.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub login: String,
    pub full_name: String,
    pub role: String,
    pub status: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        UserSummary {
            id: user.id,
            login: user.login,
            full_name: user.full_name,
            role: user.role,
            status: user.status,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct Credentials {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    pub status: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserUpdate {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub login: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    pub status: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, FromRow)]
pub struct MaterialCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Color {
    pub id: i64,
    pub name: String,
    pub hex_code: String,
}

/// A material joined with its optional category and color.
#[derive(Debug, Clone, FromRow)]
pub struct MaterialRow {
    pub id: i64,
    pub name: String,
    pub category_name: Option<String>,
    pub color_name: Option<String>,
    pub color_hex: Option<String>,
    pub auto_deduct: bool,
    pub manual_deduct: bool,
    pub defect: bool,
    pub image_url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MaterialListing {
    pub id: i64,
    pub name: String,
    pub category_name: String,
    pub color_name: String,
    pub color_hex: String,
    pub auto_deduct: bool,
    pub manual_deduct: bool,
    pub defect: bool,
    pub image_url: Option<String>,
}

impl From<MaterialRow> for MaterialListing {
    fn from(row: MaterialRow) -> Self {
        MaterialListing {
            id: row.id,
            name: row.name,
            category_name: non_empty(row.category_name).unwrap_or_default(),
            color_name: non_empty(row.color_name).unwrap_or_default(),
            color_hex: non_empty(row.color_hex).unwrap_or_else(|| DEFAULT_COLOR_HEX.to_owned()),
            auto_deduct: row.auto_deduct,
            manual_deduct: row.manual_deduct,
            defect: row.defect,
            image_url: row.image_url,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Deserialize, Debug, Clone)]
pub struct NewMaterial {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub color_id: Option<i64>,
    #[serde(default)]
    pub auto_deduct: bool,
    #[serde(default)]
    pub manual_deduct: bool,
    #[serde(default)]
    pub defect: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct MaterialId {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: Option<&str>, color: Option<&str>, hex: Option<&str>) -> MaterialRow {
        MaterialRow {
            id: 1,
            name: "Cotton Fabric".into(),
            category_name: category.map(str::to_owned),
            color_name: color.map(str::to_owned),
            color_hex: hex.map(str::to_owned),
            auto_deduct: true,
            manual_deduct: false,
            defect: false,
            image_url: Some(String::new()),
        }
    }

    #[test]
    fn missing_references_get_display_defaults() {
        let listing = MaterialListing::from(row(None, None, None));
        assert_eq!(listing.category_name, "");
        assert_eq!(listing.color_name, "");
        assert_eq!(listing.color_hex, "#000000");

        let listing = MaterialListing::from(row(Some(""), Some(""), Some("")));
        assert_eq!(listing.color_hex, "#000000");
    }

    #[test]
    fn present_references_are_kept() {
        let listing = MaterialListing::from(row(Some("Fabrics"), Some("Red"), Some("#ff0000")));
        assert_eq!(listing.category_name, "Fabrics");
        assert_eq!(listing.color_name, "Red");
        assert_eq!(listing.color_hex, "#ff0000");
    }

    #[test]
    fn new_material_defaults_and_id_coercion() {
        let material: NewMaterial = serde_json::from_str(
            r#"{"name":"Cotton Fabric","category_id":"3","auto_deduct":true}"#,
        )
        .unwrap();
        assert_eq!(material.category_id, Some(3));
        assert_eq!(material.color_id, None);
        assert!(material.auto_deduct);
        assert!(!material.manual_deduct);
        assert!(!material.defect);
        assert_eq!(material.image_url, None);
    }

    #[test]
    fn new_material_requires_name() {
        let err = serde_json::from_str::<NewMaterial>(r#"{"category_id":1}"#).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn user_summary_drops_password() {
        let user = User {
            id: 4,
            login: "anna".into(),
            password: "secret".into(),
            full_name: "Anna K".into(),
            role: "admin".into(),
            status: "active".into(),
        };
        let summary = serde_json::to_value(UserSummary::from(user)).unwrap();
        assert!(summary.get("password").is_none());
        assert_eq!(summary["login"], "anna");
    }
}
