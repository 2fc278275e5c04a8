use actix_web::{HttpResponse, Responder, get, web};

use crate::services::console::Console;

#[get("/api/v1/console")]
/// Return the current console form fields and search results as JSON.
pub async fn api_v1_console(console: web::Data<Console>) -> impl Responder {
    HttpResponse::Ok().json(console.snapshot())
}
