use std::{str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

use crate::{
    config::Config,
    errors::AppError,
    structs::{
        Color, MaterialCategory, MaterialListing, MaterialRow, NewMaterial, NewUser, User,
        UserUpdate,
    },
    AppState,
};

pub async fn connect(config: &Config) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    // Every connection to `sqlite::memory:` opens its own empty database.
    let pool_options = if config.database_url.starts_with("sqlite::memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };

    let db_pool = pool_options.connect_with(opts).await?;

    sqlx::migrate!().run(&db_pool).await?;
    log::info!("Database migrated successfully");
    Ok(db_pool)
}

/// Active user with this login, if any. The password is checked by the caller.
pub async fn find_active_user(state: &AppState, login: &str) -> Result<Option<User>, sqlx::Error> {
    let pool = state.db_pool.clone();
    sqlx::query_as::<_, User>(
        "SELECT id, login, password, full_name, role, status FROM users WHERE login = $1 AND status = 'active'",
    )
    .bind(login)
    .fetch_optional(&pool)
    .await
}

pub async fn get_all_users(state: &AppState) -> Result<Vec<User>, sqlx::Error> {
    let pool = state.db_pool.clone();
    let users = sqlx::query_as::<_, User>(
        "SELECT id, login, password, full_name, role, status FROM users ORDER BY id",
    )
    .fetch_all(&pool)
    .await?;
    log::debug!("Listed {} users", users.len());
    Ok(users)
}

pub async fn create_user(state: &AppState, user: &NewUser) -> Result<i64, sqlx::Error> {
    let pool = state.db_pool.clone();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (login, password, full_name, role, status) VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&user.login)
    .bind(&user.password)
    .bind(&user.full_name)
    .bind(&user.role)
    .bind(&user.status)
    .fetch_one(&pool)
    .await?;
    log::info!("User created: id={} login={}", id, user.login);
    Ok(id)
}

/// Full replace of every mutable column.
pub async fn update_user(state: &AppState, user: &UserUpdate) -> Result<(), AppError> {
    let pool = state.db_pool.clone();
    let result = sqlx::query(
        "UPDATE users SET login = $1, password = $2, full_name = $3, role = $4, status = $5 WHERE id = $6",
    )
    .bind(&user.login)
    .bind(&user.password)
    .bind(&user.full_name)
    .bind(&user.role)
    .bind(&user.status)
    .bind(user.id)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        log::warn!("Update for unknown user id={}", user.id);
        return Err(AppError::UserNotFound(user.id));
    }
    log::info!("User updated: id={}", user.id);
    Ok(())
}

pub async fn get_all_materials(state: &AppState) -> Result<Vec<MaterialListing>, sqlx::Error> {
    let pool = state.db_pool.clone();
    let rows = sqlx::query_as::<_, MaterialRow>(
        r#"
        SELECT m.id, m.name, mc.name AS category_name, c.name AS color_name,
               c.hex_code AS color_hex, m.auto_deduct, m.manual_deduct, m.defect, m.image_url
        FROM materials m
        LEFT JOIN material_categories mc ON m.category_id = mc.id
        LEFT JOIN colors c ON m.color_id = c.id
        ORDER BY m.id DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;
    Ok(rows.into_iter().map(MaterialListing::from).collect())
}

pub async fn get_all_categories(state: &AppState) -> Result<Vec<MaterialCategory>, sqlx::Error> {
    let pool = state.db_pool.clone();
    sqlx::query_as::<_, MaterialCategory>(
        "SELECT id, name FROM material_categories ORDER BY name",
    )
    .fetch_all(&pool)
    .await
}

pub async fn get_all_colors(state: &AppState) -> Result<Vec<Color>, sqlx::Error> {
    let pool = state.db_pool.clone();
    sqlx::query_as::<_, Color>("SELECT id, name, hex_code FROM colors ORDER BY name")
        .fetch_all(&pool)
        .await
}

pub async fn create_material(state: &AppState, material: &NewMaterial) -> Result<i64, sqlx::Error> {
    let pool = state.db_pool.clone();
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO materials (name, category_id, color_id, auto_deduct, manual_deduct, defect, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id
        "#,
    )
    .bind(&material.name)
    .bind(material.category_id)
    .bind(material.color_id)
    .bind(material.auto_deduct)
    .bind(material.manual_deduct)
    .bind(material.defect)
    .bind(material.image_url.as_deref().unwrap_or(""))
    .fetch_one(&pool)
    .await?;
    log::info!("Material created: id={} name={}", id, material.name);
    Ok(id)
}

/// Deleting an id that does not exist is not an error.
pub async fn delete_material(state: &AppState, id: i64) -> Result<(), sqlx::Error> {
    let pool = state.db_pool.clone();
    let result = sqlx::query("DELETE FROM materials WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;
    log::info!(
        "Material with id {} deleted ({} rows)",
        id,
        result.rows_affected()
    );
    Ok(())
}
