use actix_web::web::{get, resource};
use actix_web::{HttpResponse, Resource, Responder};

pub fn configure_routes() -> Resource {
    resource("/").route(get().to(process))
}

async fn process() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "message": "Hello, World!" }))
}
