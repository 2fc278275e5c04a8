use actix_web::http::header;
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

pub mod api;
pub mod console;

/// Flash message as exposed to templates.
#[derive(Debug, Serialize)]
struct FlashView<'a> {
    /// CSS class suffix derived from the message level.
    class: &'static str,
    text: &'a str,
}

fn level_class(level: Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info | Level::Debug => "info",
    }
}

/// Template context carrying the flash slot.
///
/// The slot holds a single message, so only the most recent incoming one is
/// shown.
pub fn base_context(flash_messages: &IncomingFlashMessages) -> Context {
    let mut context = Context::new();
    let flash = flash_messages.iter().last().map(|message| FlashView {
        class: level_class(message.level()),
        text: message.content(),
    });
    context.insert("flash", &flash);
    context
}

/// Render `template` into an HTML response, logging template failures.
pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// `303 See Other` to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Register every console route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(console::show_console)
        .service(console::run_console_action)
        .service(api::api_v1_console);
}
