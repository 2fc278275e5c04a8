use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::inventory::{Category, InventoryRecord, RecordKey};
use crate::forms::inventory::{FieldGroup, FormState};
use crate::gateway::{InventoryReader, InventoryWriter};
use crate::services::flash::Flash;
use crate::services::results::{ResultTable, render_results};
use crate::services::{ServiceError, ServiceResult};

pub const SUCCESS_MESSAGE: &str = "Success";
pub const DELETED_MESSAGE: &str = "Inventory has been Deleted!";

/// Upper bound (exclusive) of client generated product ids.
const CLIENT_PRODUCT_ID_RANGE: i64 = 1000;

/// One button on the console page.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Create,
    Update,
    Retrieve,
    Delete,
    Clear,
    SearchAll,
    SearchRestock,
    SearchNew,
    SearchOpenBox,
    SearchUsed,
    EnableUpdate,
    DisableUpdate,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::Create,
        Action::Update,
        Action::Retrieve,
        Action::Delete,
        Action::Clear,
        Action::SearchAll,
        Action::SearchRestock,
        Action::SearchNew,
        Action::SearchOpenBox,
        Action::SearchUsed,
        Action::EnableUpdate,
        Action::DisableUpdate,
    ];

    /// Name used in the console's `/console/{action}` route.
    pub fn as_path(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Retrieve => "retrieve",
            Action::Delete => "delete",
            Action::Clear => "clear",
            Action::SearchAll => "search-all",
            Action::SearchRestock => "search-restock",
            Action::SearchNew => "search-new",
            Action::SearchOpenBox => "search-open-box",
            Action::SearchUsed => "search-used",
            Action::EnableUpdate => "enable-update",
            Action::DisableUpdate => "disable-update",
        }
    }

    pub fn from_path(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_path() == name)
    }
}

/// Who supplies the product id of a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductIdPolicy {
    /// Send the entered value; the server assigns one when it is missing.
    #[default]
    Server,
    /// Replace the entered value with a random id in `0..1000`.
    ClientRandom,
}

impl FromStr for ProductIdPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "server" => Ok(ProductIdPolicy::Server),
            "client-random" => Ok(ProductIdPolicy::ClientRandom),
            other => Err(format!("unknown product id policy `{other}`")),
        }
    }
}

impl fmt::Display for ProductIdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductIdPolicy::Server => f.write_str("server"),
            ProductIdPolicy::ClientRandom => f.write_str("client-random"),
        }
    }
}

/// Knobs applied when building create requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    pub product_ids: ProductIdPolicy,
    /// Send the current UTC time as `last_updated_on` on create.
    pub stamp_on_create: bool,
}

/// What a completed action does to the form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEffect {
    Keep,
    Fill(InventoryRecord),
    Clear,
}

/// Everything a completed action writes back to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub form: FormEffect,
    /// New content of the results area, for list actions that succeeded.
    pub results: Option<ResultTable>,
    /// `None` only for [`Action::Clear`].
    pub flash: Option<Flash>,
}

impl ActionOutcome {
    fn success(form: FormEffect, message: impl Into<String>) -> Self {
        Self {
            form,
            results: None,
            flash: Some(Flash::success(message)),
        }
    }

    fn failure(form: FormEffect, err: &ServiceError) -> Self {
        Self {
            form,
            results: None,
            flash: Some(Flash::error(err.flash_text())),
        }
    }
}

/// `POST /inventory` with the record group of the form.
pub async fn create_record<G>(
    gateway: &G,
    form: &FormState,
    options: &DispatchOptions,
) -> ServiceResult<InventoryRecord>
where
    G: InventoryWriter + ?Sized,
{
    let mut payload = form.read();

    if options.product_ids == ProductIdPolicy::ClientRandom {
        let product_id = rand::thread_rng().gen_range(0..CLIENT_PRODUCT_ID_RANGE);
        payload = payload.with_product_id(product_id);
    }

    if options.stamp_on_create {
        payload = payload.with_last_updated_on(Utc::now().to_rfc3339());
    }

    gateway.create(&payload).await.map_err(ServiceError::from)
}

/// `PUT /inventory/{product_id}/{condition}` addressed by the record group.
pub async fn update_record<G>(gateway: &G, form: &FormState) -> ServiceResult<InventoryRecord>
where
    G: InventoryWriter + ?Sized,
{
    let key = form.key(FieldGroup::Record);
    gateway
        .update(&key, &form.read())
        .await
        .map_err(ServiceError::from)
}

/// `GET /inventory/{product_id}/{condition}` addressed by the lookup group.
pub async fn retrieve_record<G>(gateway: &G, form: &FormState) -> ServiceResult<InventoryRecord>
where
    G: InventoryReader + ?Sized,
{
    let key = form.key(FieldGroup::Lookup);
    gateway.retrieve(&key).await.map_err(ServiceError::from)
}

/// `DELETE /inventory/{product_id}/{condition}` addressed by the lookup group.
pub async fn delete_record<G>(gateway: &G, form: &FormState) -> ServiceResult<RecordKey>
where
    G: InventoryWriter + ?Sized,
{
    let key = form.key(FieldGroup::Lookup);
    gateway.delete(&key).await.map_err(ServiceError::from)?;
    Ok(key)
}

/// Toggle the `can_update` flag of the record addressed by the toggle group.
pub async fn set_record_can_update<G>(
    gateway: &G,
    form: &FormState,
    allowed: bool,
) -> ServiceResult<RecordKey>
where
    G: InventoryWriter + ?Sized,
{
    let key = form.key(FieldGroup::Toggle);
    gateway
        .set_can_update(&key, allowed)
        .await
        .map_err(ServiceError::from)?;
    Ok(key)
}

/// `GET /inventory` or `GET /inventory/{category}`.
pub async fn list_records<G>(
    gateway: &G,
    category: Option<Category>,
) -> ServiceResult<Vec<InventoryRecord>>
where
    G: InventoryReader + ?Sized,
{
    gateway.list(category).await.map_err(ServiceError::from)
}

/// Run `action` against the resource with exactly one request and describe
/// how the page changes. Failures never escape: they become an error flash.
pub async fn dispatch<G>(
    gateway: &G,
    action: Action,
    form: &FormState,
    options: &DispatchOptions,
) -> ActionOutcome
where
    G: InventoryReader + InventoryWriter + ?Sized,
{
    log::info!("Dispatching console action {action:?}");

    match action {
        Action::Clear => ActionOutcome {
            form: FormEffect::Clear,
            results: None,
            flash: None,
        },
        Action::Create => match create_record(gateway, form, options).await {
            Ok(record) => ActionOutcome::success(FormEffect::Fill(record), SUCCESS_MESSAGE),
            Err(err) => failed(action, FormEffect::Keep, err),
        },
        Action::Update => match update_record(gateway, form).await {
            Ok(record) => ActionOutcome::success(FormEffect::Fill(record), SUCCESS_MESSAGE),
            Err(err) => failed(action, FormEffect::Keep, err),
        },
        Action::Retrieve => match retrieve_record(gateway, form).await {
            Ok(record) => ActionOutcome::success(FormEffect::Fill(record), SUCCESS_MESSAGE),
            Err(err) => failed(action, FormEffect::Clear, err),
        },
        Action::Delete => match delete_record(gateway, form).await {
            Ok(_) => ActionOutcome::success(FormEffect::Clear, DELETED_MESSAGE),
            Err(err) => failed(action, FormEffect::Keep, err),
        },
        Action::EnableUpdate => match set_record_can_update(gateway, form, true).await {
            Ok(key) => ActionOutcome::success(
                FormEffect::Clear,
                format!("Updates enabled for product {}", key.product_id),
            ),
            Err(err) => failed(action, FormEffect::Keep, err),
        },
        Action::DisableUpdate => match set_record_can_update(gateway, form, false).await {
            Ok(key) => ActionOutcome::success(
                FormEffect::Clear,
                format!("Updates disabled for product {}", key.product_id),
            ),
            Err(err) => failed(action, FormEffect::Keep, err),
        },
        Action::SearchAll => list(gateway, action, None).await,
        Action::SearchRestock => list(gateway, action, Some(Category::Restock)).await,
        Action::SearchNew => list(gateway, action, Some(Category::New)).await,
        Action::SearchOpenBox => list(gateway, action, Some(Category::OpenBox)).await,
        Action::SearchUsed => list(gateway, action, Some(Category::Used)).await,
    }
}

async fn list<G>(gateway: &G, action: Action, category: Option<Category>) -> ActionOutcome
where
    G: InventoryReader + ?Sized,
{
    match list_records(gateway, category).await {
        Ok(records) => {
            let rendered = render_results(records);
            let form = match rendered.first {
                Some(first) => FormEffect::Fill(first),
                None => FormEffect::Keep,
            };
            ActionOutcome {
                form,
                results: Some(rendered.table),
                flash: Some(Flash::success(SUCCESS_MESSAGE)),
            }
        }
        Err(err) => failed(action, FormEffect::Keep, err),
    }
}

fn failed(action: Action, form: FormEffect, err: ServiceError) -> ActionOutcome {
    log::warn!("Console action {action:?} failed: {err}");
    ActionOutcome::failure(form, &err)
}
