use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::login,
        api::report::student_report,
    ),
    components(
        schemas(
            api::auth::LoginRequest,
            api::auth::LoginResponse,
        )
    ),
    tags(
        (name = "campus-office", description = "Campus Office CRM API")
    )
)]
pub struct ApiDoc;
