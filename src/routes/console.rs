use std::collections::HashMap;

use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::inventory::Condition;
use crate::forms::inventory::{FieldGroup, FormState};
use crate::gateway::InventoryGateway;
use crate::routes::{base_context, redirect, render_template};
use crate::services::console::{Console, run_action};
use crate::services::flash::{Flash, FlashLevel};
use crate::services::inventory::{Action, DispatchOptions};

const CONDITIONS: [Condition; 3] = [Condition::New, Condition::Used, Condition::OpenBox];

#[get("/")]
pub async fn show_console(
    console: web::Data<Console>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let snapshot = console.snapshot();

    let mut context = base_context(&flash_messages);
    context.insert("record_fields", &snapshot.form.fields(FieldGroup::Record));
    context.insert("lookup_fields", &snapshot.form.fields(FieldGroup::Lookup));
    context.insert("toggle_fields", &snapshot.form.fields(FieldGroup::Toggle));
    context.insert("conditions", &CONDITIONS);
    context.insert("results", &snapshot.results);
    render_template(&tera, "console/index.html", &context)
}

#[post("/console/{action}")]
pub async fn run_console_action(
    path: web::Path<String>,
    console: web::Data<Console>,
    gateway: web::Data<dyn InventoryGateway>,
    options: web::Data<DispatchOptions>,
    web::Form(fields): web::Form<HashMap<String, String>>,
) -> impl Responder {
    let name = path.into_inner();
    let Some(action) = Action::from_path(&name) else {
        log::warn!("Unknown console action '{name}'");
        return HttpResponse::NotFound().finish();
    };

    let submitted = FormState::from_submitted(&fields);
    let flash = run_action(
        console.get_ref(),
        gateway.get_ref(),
        action,
        submitted,
        options.get_ref(),
    )
    .await;

    match flash {
        Some(Flash {
            level: FlashLevel::Success,
            text,
        }) => FlashMessage::success(text).send(),
        Some(Flash {
            level: FlashLevel::Error,
            text,
        }) => FlashMessage::error(text).send(),
        None => {}
    }

    redirect("/")
}
