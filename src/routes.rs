use actix_web::{
    http::Method,
    web::{self, Bytes, Data},
    HttpRequest, HttpResponse, Resource,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    db,
    envelope::{self, AUTH_METHODS, READ_ONLY_METHODS, READ_WRITE_METHODS},
    errors::AppError,
    structs::{Credentials, MaterialId, NewMaterial, NewUser, UserSummary, UserUpdate},
    utils::{required_trimmed, verify_password},
    AppState,
};


/// Registers every endpoint. Each path maps to exactly one handler per method.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/auth")
            .route(web::post().to(auth_handler))
            .default_service(web::to(auth_fallback)),
    )
    .service(
        web::resource("/users-list")
            .route(web::get().to(users_list_handler))
            .default_service(web::to(read_only_fallback)),
    )
    .service(
        web::scope("/users")
            .service(endpoint("/list", Method::GET, users_list_handler))
            .service(endpoint("/create", Method::POST, create_user_handler))
            .service(endpoint("/update", Method::POST, update_user_handler))
            .default_service(web::to(read_write_fallback)),
    )
    .service(
        web::scope("/materials")
            .service(endpoint("/list", Method::GET, materials_list_handler))
            .service(endpoint("/categories", Method::GET, categories_handler))
            .service(endpoint("/colors", Method::GET, colors_handler))
            .service(endpoint("/create", Method::POST, create_material_handler))
            .service(endpoint("/delete", Method::POST, delete_material_handler))
            .default_service(web::to(read_write_fallback)),
    );
}

fn endpoint<F, Args>(path: &str, method: Method, handler: F) -> Resource
where
    F: actix_web::Handler<Args>,
    Args: actix_web::FromRequest + 'static,
    F::Output: actix_web::Responder + 'static,
{
    web::resource(path)
        .route(web::method(method).to(handler))
        .default_service(web::to(read_write_fallback))
}

/// Empty bodies parse as `{}`.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    let raw: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &body[..]
    };
    serde_json::from_slice(raw).map_err(|e| AppError::Payload(e.to_string()))
}

fn fallback(
    req: &HttpRequest,
    allowed_methods: &str,
    otherwise: AppError,
) -> Result<HttpResponse, AppError> {
    if req.method() == Method::OPTIONS {
        return Ok(envelope::preflight(allowed_methods));
    }
    log::debug!("No route for {} {}", req.method(), req.path());
    Err(otherwise)
}

async fn auth_fallback(req: HttpRequest) -> Result<HttpResponse, AppError> {
    fallback(&req, AUTH_METHODS, AppError::MethodNotAllowed)
}

async fn read_only_fallback(req: HttpRequest) -> Result<HttpResponse, AppError> {
    fallback(&req, READ_ONLY_METHODS, AppError::MethodNotAllowed)
}

async fn read_write_fallback(req: HttpRequest) -> Result<HttpResponse, AppError> {
    fallback(&req, READ_WRITE_METHODS, AppError::NotFound)
}

/// Paths outside every resource.
pub async fn not_found_handler() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound)
}

/// `POST /auth`
pub async fn auth_handler(state: Data<AppState>, body: Bytes) -> Result<HttpResponse, AppError> {
    let credentials: Credentials = parse_body(&body)?;

    let (Some(login), Some(password)) = (
        required_trimmed(credentials.login.as_deref()),
        required_trimmed(credentials.password.as_deref()),
    ) else {
        return Err(AppError::Validation("Login and password are required".into()));
    };

    match db::find_active_user(&state, login).await? {
        Some(user) if verify_password(password, &user.password) => {
            log::info!("User {} logged in", user.id);
            Ok(envelope::ok(&json!({ "user": UserSummary::from(user) })))
        }
        _ => {
            log::warn!("Failed login attempt for {:?}", login);
            Err(AppError::InvalidCredentials)
        }
    }
}

/// `GET /users/list` and `GET /users-list`
pub async fn users_list_handler(state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = db::get_all_users(&state).await?;

    if state.users_list_include_passwords {
        return Ok(envelope::ok(&json!({ "users": users })));
    }
    let users: Vec<UserSummary> = users.into_iter().map(UserSummary::from).collect();
    Ok(envelope::ok(&json!({ "users": users })))
}

/// `POST /users/create`
pub async fn create_user_handler(
    state: Data<AppState>,
    body: Bytes,
) -> Result<HttpResponse, AppError> {
    let user: NewUser = parse_body(&body)?;
    let id = db::create_user(&state, &user).await?;
    Ok(envelope::ok(&json!({ "success": true, "id": id })))
}

/// `POST /users/update`
pub async fn update_user_handler(
    state: Data<AppState>,
    body: Bytes,
) -> Result<HttpResponse, AppError> {
    let user: UserUpdate = parse_body(&body)?;
    db::update_user(&state, &user).await?;
    Ok(envelope::ok(&json!({ "success": true })))
}

/// `GET /materials/list`
pub async fn materials_list_handler(state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let materials = db::get_all_materials(&state).await?;
    Ok(envelope::ok(&json!({ "materials": materials })))
}

/// `GET /materials/categories`
pub async fn categories_handler(state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let categories = db::get_all_categories(&state).await?;
    Ok(envelope::ok(&json!({ "categories": categories })))
}

/// `GET /materials/colors`
pub async fn colors_handler(state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let colors = db::get_all_colors(&state).await?;
    Ok(envelope::ok(&json!({ "colors": colors })))
}

/// `POST /materials/create`
pub async fn create_material_handler(
    state: Data<AppState>,
    body: Bytes,
) -> Result<HttpResponse, AppError> {
    let material: NewMaterial = parse_body(&body)?;
    let id = db::create_material(&state, &material).await?;
    Ok(envelope::ok(&json!({ "success": true, "id": id })))
}

/// `POST /materials/delete`
pub async fn delete_material_handler(
    state: Data<AppState>,
    body: Bytes,
) -> Result<HttpResponse, AppError> {
    let MaterialId { id } = parse_body(&body)?;
    db::delete_material(&state, id).await?;
    Ok(envelope::ok(&json!({ "success": true })))
}
