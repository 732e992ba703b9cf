//! Category wire type.

use chrono::{DateTime, Utc};
use commerce_core::CategoryId;
use serde::{Deserialize, Serialize};

use super::{default_true, wire_time};
use crate::models::{Category, Timestamps};

/// Wire form of a [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub slug: String,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&Category> for CategoryDto {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            slug: category.slug.clone(),
            parent_id: category.parent_id,
            is_active: category.is_active,
            created_at: category.timestamps.created_at,
            updated_at: category.timestamps.updated_at,
            deleted_at: category.timestamps.deleted_at,
        }
    }
}

impl From<CategoryDto> for Category {
    fn from(dto: CategoryDto) -> Self {
        Self {
            id: None,
            name: dto.name,
            description: dto.description,
            slug: dto.slug,
            parent_id: dto.parent_id,
            is_active: dto.is_active,
            timestamps: Timestamps::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_inbound() {
        let dto: CategoryDto = serde_json::from_str(r#"{"name":"Tea","slug":"tea"}"#).unwrap();
        assert!(dto.is_active);
        assert!(dto.parent_id.is_none());
        assert!(dto.description.is_empty());
    }

    #[test]
    fn test_round_trip_keeps_parent() {
        let mut category = Category::new("Green", "green");
        category.id = Some(CategoryId::new(2));
        category.parent_id = Some(CategoryId::new(1));
        category.is_active = false;

        let back = Category::from(CategoryDto::from(&category));
        assert_eq!(back.parent_id, Some(CategoryId::new(1)));
        assert!(!back.is_active);
        assert_eq!(back.id, None);
        assert_eq!(back.slug, "green");
    }

    #[test]
    fn test_deleted_at_only_written_when_set() {
        let mut category = Category::new("Black", "black");
        category.id = Some(CategoryId::new(4));

        let live = serde_json::to_value(CategoryDto::from(&category)).unwrap();
        assert!(live.get("deleted_at").is_none());

        category.timestamps.deleted_at = wire_time::parse("03/01/2024 09:30:00").ok();
        let deleted = serde_json::to_value(CategoryDto::from(&category)).unwrap();
        assert_eq!(deleted["deleted_at"], "03/01/2024 09:30:00");

        let inbound: CategoryDto = serde_json::from_value(deleted).unwrap();
        assert!(Category::from(inbound).timestamps.deleted_at.is_none());
    }
}
