use chrono::Utc;
use models::service::{self, Entity as ServiceEntity};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::ServiceError;

/// List services ordered by creation time, optionally filtered on the active
/// flag. The public page asks for `active = Some(true)`; the dashboard lists
/// everything.
pub async fn list_services(
    db: &DatabaseConnection,
    active: Option<bool>,
) -> Result<Vec<service::Model>, ServiceError> {
    let mut finder = ServiceEntity::find().order_by_asc(service::Column::CreatedAt);
    if let Some(flag) = active {
        finder = finder.filter(service::Column::IsActive.eq(flag));
    }
    let rows = finder.all(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

/// Create a service after validation. A missing active flag means visible.
pub async fn create_service(
    db: &DatabaseConnection,
    title: &str,
    description: &str,
    img: Option<&str>,
    is_active: Option<bool>,
) -> Result<service::Model, ServiceError> {
    // validations are in models::service
    let created = service::create(db, title, description, img, is_active.unwrap_or(true)).await?;
    Ok(created)
}

/// Get a service by id.
pub async fn get_service(db: &DatabaseConnection, id: Uuid) -> Result<Option<service::Model>, ServiceError> {
    let found = ServiceEntity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// Update a service with optional fields and validations.
pub async fn update_service(
    db: &DatabaseConnection,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    img: Option<&str>,
    is_active: Option<bool>,
) -> Result<service::Model, ServiceError> {
    let current = ServiceEntity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let Some(existing) = current else { return Err(ServiceError::not_found("service")); };
    let mut am: service::ActiveModel = existing.into();
    if let Some(t) = title { service::validate_title(t)?; am.title = Set(t.to_string()); }
    if let Some(d) = description { service::validate_description(d)?; am.description = Set(d.to_string()); }
    if let Some(i) = img { am.img = Set(Some(i.to_string())); }
    if let Some(b) = is_active { am.is_active = Set(b); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Delete a service; returns true if deleted.
pub async fn delete_service(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = ServiceEntity::delete_by_id(id).exec(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

/// Seed helper: create the service or refresh its mutable fields when a row
/// with the same title already exists.
pub async fn upsert_service_by_title(
    db: &DatabaseConnection,
    title: &str,
    description: &str,
    img: Option<&str>,
    is_active: bool,
) -> Result<service::Model, ServiceError> {
    match service::find_by_title(db, title).await? {
        Some(existing) => {
            let id = existing.id;
            let mut am: service::ActiveModel = existing.into();
            am.description = Set(description.to_string());
            am.img = Set(img.map(|s| s.to_string()));
            am.is_active = Set(is_active);
            am.updated_at = Set(Utc::now().into());
            let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
            tracing::debug!(%id, title, "refreshed existing service");
            Ok(updated)
        }
        None => create_service(db, title, description, img, Some(is_active)).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn service_crud_roundtrip() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let title = format!("svc_catalog_{}", Uuid::new_v4());
        let a = create_service(&db, &title, "Consultas generales", None, None).await?;
        // Omitted active flag defaults to visible
        assert!(a.is_active);

        let found = get_service(&db, a.id).await?.unwrap();
        assert_eq!(found.title, title);

        let updated = update_service(&db, a.id, None, Some("Consultas y urgencias"), Some("/img/services/u.webp"), Some(false)).await?;
        assert_eq!(updated.description, "Consultas y urgencias");
        assert_eq!(updated.img.as_deref(), Some("/img/services/u.webp"));
        assert!(!updated.is_active);

        let deleted = delete_service(&db, a.id).await?;
        assert!(deleted);
        assert!(get_service(&db, a.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn missing_id_is_not_found() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let ghost = Uuid::new_v4();
        assert!(get_service(&db, ghost).await?.is_none());

        let res = update_service(&db, ghost, Some("t"), None, None, None).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));

        let deleted = delete_service(&db, ghost).await?;
        assert!(!deleted);
        Ok(())
    }

    #[tokio::test]
    async fn active_filter_hides_inactive_rows() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let tag = Uuid::new_v4();
        let t1 = format!("svc_active_a_{tag}");
        let t2 = format!("svc_active_b_{tag}");
        let t3 = format!("svc_hidden_{tag}");
        let a = create_service(&db, &t1, "a", None, Some(true)).await?;
        let b = create_service(&db, &t2, "b", None, Some(true)).await?;
        let c = create_service(&db, &t3, "c", None, Some(false)).await?;

        let visible = list_services(&db, Some(true)).await?;
        let titles: Vec<&str> = visible.iter().map(|s| s.title.as_str()).collect();
        assert!(titles.contains(&t1.as_str()));
        assert!(titles.contains(&t2.as_str()));
        assert!(!titles.contains(&t3.as_str()));

        // Full listing keeps creation order
        let all = list_services(&db, None).await?;
        let pos = |id| all.iter().position(|s| s.id == id).unwrap();
        assert!(pos(a.id) < pos(b.id));
        assert!(pos(b.id) < pos(c.id));

        for id in [a.id, b.id, c.id] {
            delete_service(&db, id).await?;
        }
        Ok(())
    }

    #[tokio::test]
    async fn upsert_by_title_is_idempotent() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let title = format!("svc_upsert_{}", Uuid::new_v4());
        let first = upsert_service_by_title(&db, &title, "v1", None, true).await?;
        let second = upsert_service_by_title(&db, &title, "v2", Some("/img/services/s.webp"), false).await?;
        assert_eq!(first.id, second.id);
        assert_eq!(second.description, "v2");
        assert!(!second.is_active);

        delete_service(&db, first.id).await?;
        Ok(())
    }
}
