use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

/// A clinic offering shown on the public site. `is_active` hides a row from
/// visitors without deleting it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub img: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(t: &str) -> Result<(), errors::ModelError> {
    if t.trim().is_empty() {
        return Err(errors::ModelError::Validation("title required".into()));
    }
    if t.len() > 255 {
        return Err(errors::ModelError::Validation("title too long (<=255)".into()));
    }
    Ok(())
}

pub fn validate_description(d: &str) -> Result<(), errors::ModelError> {
    if d.trim().is_empty() {
        return Err(errors::ModelError::Validation("description required".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    title: &str,
    description: &str,
    img: Option<&str>,
    is_active: bool,
) -> Result<Model, errors::ModelError> {
    validate_title(title)?;
    validate_description(description)?;

    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title.to_string()),
        description: Set(description.to_string()),
        img: Set(img.map(|s| s.to_string())),
        is_active: Set(is_active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_title(db: &DatabaseConnection, title: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Title.eq(title))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
