// 位置事件实体
// 国家代码和到达/离开状态都在这里校验，数据库里只会出现合法值

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidLocation {
    #[error("countryCode must be exactly 2 letters, got {0:?}")]
    CountryCode(String),
    #[error("status must be one of 'arrived' or 'left', got {0:?}")]
    Status(String),
}

/// 到达 / 离开
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    Arrived,
    Left,
}

impl LocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationStatus::Arrived => "arrived",
            LocationStatus::Left => "left",
        }
    }
}

impl FromStr for LocationStatus {
    type Err = InvalidLocation;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "arrived" => Ok(LocationStatus::Arrived),
            "left" => Ok(LocationStatus::Left),
            other => Err(InvalidLocation::Status(other.to_string())),
        }
    }
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 两位字母国家代码，统一存为大写
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn parse(raw: &str) -> Result<Self, InvalidLocation> {
        if raw.len() == 2 && raw.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(raw.to_ascii_uppercase()))
        } else {
            Err(InvalidLocation::CountryCode(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CountryCode {
    type Error = InvalidLocation;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// user_locations 表的原始行
#[derive(Debug, FromRow)]
pub struct LocationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub country_code: String,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

/// 位置事件，只追加不修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub country_code: CountryCode,
    pub status: LocationStatus,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<LocationRow> for LocationEntity {
    type Error = InvalidLocation;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            country_code: CountryCode::parse(&row.country_code)?,
            status: row.status.parse()?,
            updated_at: row.updated_at,
        })
    }
}
