use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::catalog::{accept_created, apply_edit, apply_search, category_base_set, FieldErrors};
use crate::error::{CatalogError, SubmitAction};
use crate::media;
use crate::models::{CategoryFilter, ListingQuery, ProductDetail};
use crate::session::{DraftPatch, FormMode};
use crate::state::{lock, AppState};

type Data = web::Data<AppState>;

const JSON_LIMIT: usize = 8 * 1024 * 1024;

fn parse_filter(raw: Option<&str>) -> Result<CategoryFilter, CatalogError> {
    raw.unwrap_or("all").parse().map_err(|message| {
        let mut errors = FieldErrors::new();
        errors.insert("category".to_string(), message);
        CatalogError::Validation(errors)
    })
}

/// Selects category + query and recomputes the listing window.
async fn get_products(data: Data, query: web::Query<ListingQuery>) -> Result<HttpResponse, CatalogError> {
    let category = parse_filter(query.category.as_deref())?;
    let search = query.search.clone().unwrap_or_default();
    let generation = lock(&data.listing).select(category, &search);

    let fetched = match category {
        CategoryFilter::All => None,
        CategoryFilter::Only(category) => Some(category_base_set(&data.remote, &data.catalog, category).await),
    };

    let mut listing = lock(&data.listing);
    let base = fetched.unwrap_or_else(|| Ok(lock(&data.catalog).products().to_vec()));
    match base {
        Ok(base) => {
            let filtered = apply_search(base, &search);
            let total = filtered.len();
            if listing.apply(generation, filtered) {
                lock(&data.catalog).set_count(total);
            } else {
                debug!(generation, current = listing.generation(), "discarding superseded listing");
            }
            Ok(HttpResponse::Ok().json(listing.page()))
        }
        Err(err) => {
            listing.fail(generation, err.to_string());
            Err(err)
        }
    }
}

/// Re-derives the listing after the store changed `id`, then puts its size
/// in the header.
fn sync_listing(data: &AppState, id: i64) {
    let mut listing = lock(&data.listing);
    let mut catalog = lock(&data.catalog);
    listing.sync_record(&catalog, id);
    catalog.set_count(listing.total());
}

/// Grows the window by one page; ignored while one is in flight or when
/// nothing is left.
async fn load_more(data: Data) -> Result<HttpResponse, CatalogError> {
    if !lock(&data.listing).begin_load_more() {
        return Ok(HttpResponse::Ok().json(lock(&data.listing).page()));
    }

    let delay = data.settings.listing.load_more_delay_ms;
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let mut listing = lock(&data.listing);
    listing.finish_load_more();
    Ok(HttpResponse::Ok().json(listing.page()))
}

async fn get_product(data: Data, id: web::Path<i64>) -> Result<HttpResponse, CatalogError> {
    let id = id.into_inner();
    let catalog = lock(&data.catalog);
    let product = catalog.get(id).ok_or(CatalogError::NotFound(id))?;
    Ok(HttpResponse::Ok().json(product))
}

async fn get_count(data: Data) -> HttpResponse {
    HttpResponse::Ok().json(json!({"count": lock(&data.catalog).count()}))
}

async fn get_form(data: Data) -> HttpResponse {
    HttpResponse::Ok().json(&*lock(&data.form))
}

async fn new_form(data: Data) -> Result<HttpResponse, CatalogError> {
    let mut form = lock(&data.form);
    form.open_create()?;
    Ok(HttpResponse::Ok().json(&*form))
}

async fn edit_form(data: Data, id: web::Path<i64>) -> Result<HttpResponse, CatalogError> {
    let id = id.into_inner();
    let product = lock(&data.catalog).get(id).cloned().ok_or(CatalogError::NotFound(id))?;
    let mut form = lock(&data.form);
    form.open_edit(&product)?;
    Ok(HttpResponse::Ok().json(&*form))
}

async fn patch_form(data: Data, patch: web::Json<DraftPatch>) -> HttpResponse {
    let mut form = lock(&data.form);
    form.update(patch.into_inner());
    HttpResponse::Ok().json(&*form)
}

async fn reset_form(data: Data) -> Result<HttpResponse, CatalogError> {
    let mut form = lock(&data.form);
    form.reset()?;
    Ok(HttpResponse::Ok().json(&*form))
}

/// Multipart image upload into the draft's `image` field.
async fn upload_image(data: Data, payload: Multipart) -> Result<HttpResponse, CatalogError> {
    let settings = data.settings.images.clone();
    let encoded = match media::read_upload(payload, settings.max_upload_bytes).await {
        Ok(upload) => web::block(move || media::ingest(&upload, &settings))
            .await
            .map_err(|e| CatalogError::ImageProcessingFailed(e.to_string()))
            .and_then(|result| result),
        Err(err) => Err(err),
    };

    let mut form = lock(&data.form);
    match encoded {
        Ok(encoded) => {
            form.set_image(encoded.data_url);
            Ok(HttpResponse::Ok().json(&*form))
        }
        Err(err) => {
            error!(error = ?err, "Error compressing image");
            form.reject_image(err.to_string());
            Err(err)
        }
    }
}

/// Validates the draft, then creates remotely or edits locally.
async fn submit_form(data: Data) -> Result<HttpResponse, CatalogError> {
    let (mode, fields) = lock(&data.form).begin_submit()?;

    let outcome = match mode {
        FormMode::Edit(id) => apply_edit(&mut lock(&data.catalog), id, fields).map_err(|err| {
            CatalogError::SubmissionFailed {
                action: SubmitAction::Update,
                source: Box::new(err),
            }
        }),
        FormMode::Create => {
            let created = data.remote.create(&fields.clone().into_new_product()).await;
            created
                .and_then(|created| accept_created(&mut lock(&data.catalog), created, fields))
                .map_err(|err| CatalogError::SubmissionFailed {
                    action: SubmitAction::Add,
                    source: Box::new(err),
                })
        }
    };

    if let Ok(product) = &outcome {
        sync_listing(&data, product.id);
    }

    let mut form = lock(&data.form);
    match outcome {
        Ok(product) => {
            form.finish_submit();
            Ok(match mode {
                FormMode::Create => HttpResponse::Created().json(product),
                FormMode::Edit(_) => HttpResponse::Ok().json(product),
            })
        }
        Err(err) => {
            error!(error = ?err, "submission failed");
            form.fail_submit(err.to_string());
            Err(err)
        }
    }
}

async fn open_detail(data: Data, id: web::Path<i64>) -> Result<HttpResponse, CatalogError> {
    let id = id.into_inner();
    let product = lock(&data.catalog).get(id).cloned().ok_or(CatalogError::NotFound(id))?;
    lock(&data.dialogs).open_detail(id);
    Ok(HttpResponse::Ok().json(ProductDetail::from(product)))
}

async fn close_detail(data: Data, id: web::Path<i64>) -> HttpResponse {
    lock(&data.dialogs).close_detail(id.into_inner());
    HttpResponse::NoContent().finish()
}

async fn open_delete(data: Data, id: web::Path<i64>) -> Result<HttpResponse, CatalogError> {
    let id = id.into_inner();
    let title = lock(&data.catalog)
        .get(id)
        .map(|p| p.title.clone())
        .ok_or(CatalogError::NotFound(id))?;
    let dialog = lock(&data.dialogs).open_delete(id);
    Ok(HttpResponse::Ok().json(json!({
        "id": id,
        "product_title": title,
        "state": dialog.state,
        "confirm_text": dialog.confirm_text,
        "enabled": dialog.is_enabled(),
    })))
}

#[derive(Deserialize)]
struct ConfirmInput {
    confirm_text: String,
}

async fn type_delete(
    data: Data,
    id: web::Path<i64>,
    input: web::Json<ConfirmInput>,
) -> Result<HttpResponse, CatalogError> {
    let id = id.into_inner();
    let dialog = lock(&data.dialogs).type_confirmation(id, &input.confirm_text)?;
    Ok(HttpResponse::Ok().json(json!({
        "id": id,
        "state": dialog.state,
        "confirm_text": dialog.confirm_text,
        "enabled": dialog.is_enabled(),
    })))
}

async fn cancel_delete(data: Data, id: web::Path<i64>) -> HttpResponse {
    lock(&data.dialogs).cancel_delete(id.into_inner());
    HttpResponse::NoContent().finish()
}

/// Confirms an armed delete dialog and drops the record.
async fn delete_product(data: Data, id: web::Path<i64>) -> Result<HttpResponse, CatalogError> {
    let id = id.into_inner();
    {
        let mut dialogs = lock(&data.dialogs);
        dialogs.confirm_delete(id)?;
        dialogs.forget(id);
    }

    let removed = lock(&data.catalog).remove(id);
    info!(id, removed = removed.is_some(), "product deleted");
    sync_listing(&data, id);
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(JSON_LIMIT))
        .route("/api/get/products", web::get().to(get_products))
        .route("/api/post/products/load-more", web::post().to(load_more))
        .route("/api/get/products/{id}", web::get().to(get_product))
        .route("/api/get/count", web::get().to(get_count))
        .route("/api/get/form", web::get().to(get_form))
        .route("/api/post/form/new", web::post().to(new_form))
        .route("/api/post/form/edit/{id}", web::post().to(edit_form))
        .route("/api/patch/form", web::patch().to(patch_form))
        .route("/api/post/form/image", web::post().to(upload_image))
        .route("/api/post/form/submit", web::post().to(submit_form))
        .route("/api/post/form/reset", web::post().to(reset_form))
        .route("/api/post/dialogs/detail/{id}", web::post().to(open_detail))
        .route("/api/post/dialogs/detail/{id}/close", web::post().to(close_detail))
        .route("/api/post/dialogs/delete/{id}", web::post().to(open_delete))
        .route("/api/patch/dialogs/delete/{id}", web::patch().to(type_delete))
        .route("/api/post/dialogs/delete/{id}/cancel", web::post().to(cancel_delete))
        .route("/api/delete/products/{id}", web::delete().to(delete_product));
}
