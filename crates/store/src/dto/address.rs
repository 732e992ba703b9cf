//! Address wire type.

use chrono::{DateTime, Utc};
use commerce_core::{AddressId, UserId};
use serde::{Deserialize, Serialize};

use super::wire_time;
use crate::models::{Address, Timestamps};

/// Wire form of an [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&Address> for AddressDto {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id,
            user_id: address.user_id,
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
            is_default: address.is_default,
            created_at: address.timestamps.created_at,
            updated_at: address.timestamps.updated_at,
            deleted_at: address.timestamps.deleted_at,
        }
    }
}

impl From<AddressDto> for Address {
    fn from(dto: AddressDto) -> Self {
        Self {
            id: None,
            user_id: dto.user_id,
            street: dto.street,
            city: dto.city,
            state: dto.state,
            postal_code: dto.postal_code,
            country: dto.country,
            is_default: dto.is_default,
            timestamps: Timestamps::default(),
        }
    }
}
