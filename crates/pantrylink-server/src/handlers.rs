//! Operation handlers.
//!
//! Handlers are free async functions taking the shared state and the
//! request context; the two record-by-id operations additionally take the
//! matched path parameters. Each handler validates its own input and
//! returns either a response envelope or an [`ApiError`], which the
//! dispatch boundary converts to the error envelope.

use serde_json::{json, Value};

use pantrylink_core::{
    ApiError, ApiRequest, ApiResponse, ApiResult, BarcodeRecord, NewProduct, ScanRequest,
    TransactionMode,
};
use pantrylink_router::Params;

use crate::state::AppState;
use crate::{VERSION, VERSION_INT};

/// Default number of log entries returned by the log listing.
const DEFAULT_LOG_LIMIT: usize = 50;
/// Smallest accepted log limit.
const MIN_LOG_LIMIT: usize = 1;
/// Largest accepted log limit.
const MAX_LOG_LIMIT: usize = 200;

/// `GET|POST /api/action/scan`: barcode ingestion.
///
/// The barcode comes from the `barcode` body field, or the `add` or
/// `text` query parameters, in that order of precedence.
pub async fn scan(state: &AppState, request: &ApiRequest) -> ApiResult<ApiResponse> {
    let barcode = request
        .body_field("barcode")
        .or_else(|| request.query_param("add"))
        .or_else(|| request.query_param("text"))
        .unwrap_or_default();

    if barcode.is_empty() {
        return Err(ApiError::validation("No barcode supplied"));
    }

    let best_before_in_days = match request.body_field("bestBeforeInDays") {
        Some(raw) if !raw.is_empty() => Some(raw.parse::<i64>().map_err(|_| {
            ApiError::validation("Invalid parameter bestBeforeInDays: needs to be type int")
        })?),
        _ => None,
    };

    let price = match request.body_field("price") {
        Some(raw) if !raw.is_empty() => Some(raw.parse::<f64>().map_err(|_| {
            ApiError::validation("Invalid parameter price: needs to be type float")
        })?),
        _ => None,
    };

    let result = state
        .scanner
        .process(ScanRequest {
            barcode,
            best_before_in_days,
            price,
        })
        .await?;

    Ok(ApiResponse::ok(json!({ "result": result })))
}

/// `GET|POST /api/state/getmode`: transaction-mode readback.
pub async fn get_mode(state: &AppState, _request: &ApiRequest) -> ApiResult<ApiResponse> {
    let mode = state.store.transaction_mode()?;
    Ok(ApiResponse::ok(json!({ "mode": mode.value() })))
}

/// `GET|POST /api/state/setmode`: transaction-mode write.
///
/// The value must be numeric and inside the valid mode range.
pub async fn set_mode(state: &AppState, request: &ApiRequest) -> ApiResult<ApiResponse> {
    let raw = request
        .query_param("state")
        .or_else(|| request.body_field("state"));

    let mode = raw
        .and_then(|value| value.parse::<i64>().ok())
        .and_then(TransactionMode::from_value)
        .ok_or_else(|| ApiError::validation("Invalid state provided"))?;

    state.store.set_transaction_mode(mode)?;
    Ok(ApiResponse::ok_empty())
}

/// `GET /api/system/info`: version readback.
pub async fn system_info(_state: &AppState, _request: &ApiRequest) -> ApiResult<ApiResponse> {
    Ok(ApiResponse::ok(json!({
        "version": VERSION,
        "version_int": VERSION_INT,
    })))
}

/// `GET /api/system/barcodes`: command-barcode table readback.
pub async fn system_barcodes(state: &AppState, _request: &ApiRequest) -> ApiResult<ApiResponse> {
    let barcodes = &state.config.barcodes;
    Ok(ApiResponse::ok(json!({
        "BARCODE_C": barcodes.consume,
        "BARCODE_CS": barcodes.consume_spoiled,
        "BARCODE_P": barcodes.purchase,
        "BARCODE_O": barcodes.open,
        "BARCODE_GS": barcodes.get_stock,
        "BARCODE_Q": barcodes.quantity,
        "BARCODE_AS": barcodes.add_to_shopping_list,
        "BARCODE_CA": barcodes.consume_all,
    })))
}

/// Shapes one stored record for the unresolved listing.
fn record_json(record: &BarcodeRecord) -> Value {
    json!({
        "id": record.id,
        "barcode": record.barcode,
        "amount": record.amount,
        "name": record.name,
        "possibleMatch": record.possible_match,
        "isLookedUp": record.is_looked_up(),
        "bestBeforeInDays": record.best_before_in_days,
        "price": record.price,
        "altNames": record.alt_names,
    })
}

/// `GET /api/system/unknownbarcodes`: unresolved-record listing.
///
/// Known and unknown records are both unresolved (neither is linked to
/// an inventory product yet); tare barcodes are excluded. With
/// `lookup=true|1`, each record is enriched with third-party product
/// info.
pub async fn list_unknown_barcodes(
    state: &AppState,
    request: &ApiRequest,
) -> ApiResult<ApiResponse> {
    let stored = state.store.stored_barcodes()?;
    let mut unresolved = stored.known;
    unresolved.extend(stored.unknown);

    let do_lookup = matches!(
        request.query_param("lookup").as_deref(),
        Some("true") | Some("1")
    );

    let mut barcodes = Vec::with_capacity(unresolved.len());
    for record in &unresolved {
        let mut entry = record_json(record);
        if do_lookup {
            let product_info = state
                .lookup
                .lookup(&record.barcode)
                .await
                .map(|info| serde_json::to_value(info))
                .transpose()?;
            entry["product_info"] = product_info.unwrap_or(Value::Null);
        }
        barcodes.push(entry);
    }

    Ok(ApiResponse::ok(json!({
        "count": barcodes.len(),
        "barcodes": barcodes,
    })))
}

/// Parses a positive integer identifier, with a field-specific message.
fn parse_positive_id(raw: Option<&str>, message: &str) -> ApiResult<i64> {
    raw.and_then(|value| value.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::validation(message))
}

/// `DELETE /api/system/unknownbarcodes/{id}`: delete a record by id.
pub async fn delete_barcode_by_id(
    state: &AppState,
    _request: &ApiRequest,
    params: &Params,
) -> ApiResult<ApiResponse> {
    let id = parse_positive_id(
        params.get("id"),
        "Invalid barcode ID: must be a positive integer",
    )?;

    if state.store.barcode_by_id(id)?.is_none() {
        return Err(ApiError::not_found("Barcode not found"));
    }

    state.store.delete_barcode(id)?;
    Ok(ApiResponse::ok(json!({ "deleted": id })))
}

/// `POST /api/system/unknownbarcodes/{id}/associate`: associate a
/// record, addressed by id, with an existing product.
pub async fn associate_barcode_by_id(
    state: &AppState,
    request: &ApiRequest,
    params: &Params,
) -> ApiResult<ApiResponse> {
    let id = parse_positive_id(
        params.get("id"),
        "Invalid barcode ID: must be a positive integer",
    )?;
    let product_id = parse_positive_id(
        request.body_field("productId").as_deref(),
        "Invalid or missing productId: must be a positive integer",
    )?;

    let association = state.workflow.associate_record(id, product_id).await?;

    Ok(ApiResponse::ok(json!({
        "associated": true,
        "barcodeId": association.barcode_id,
        "barcode": association.barcode,
        "productId": association.product_id,
    })))
}

/// `GET /api/system/barcodelogs`: paginated log readback.
///
/// A numeric `limit` is clamped to `[1, 200]`; a missing or non-numeric
/// value falls back to the default of 50.
pub async fn barcode_logs(state: &AppState, request: &ApiRequest) -> ApiResult<ApiResponse> {
    let limit = request
        .query_param("limit")
        .and_then(|raw| raw.parse::<usize>().ok())
        .map_or(DEFAULT_LOG_LIMIT, |value| {
            value.clamp(MIN_LOG_LIMIT, MAX_LOG_LIMIT)
        });

    let logs = state.store.logs_with_id(limit)?;

    Ok(ApiResponse::ok(json!({
        "count": logs.len(),
        "logs": serde_json::to_value(logs)?,
    })))
}

/// `GET|POST /api/action/deleteunknown`: delete a record by barcode.
pub async fn delete_unknown(state: &AppState, request: &ApiRequest) -> ApiResult<ApiResponse> {
    let barcode = request
        .body_field("barcode")
        .or_else(|| request.query_param("barcode"))
        .unwrap_or_default();

    if barcode.is_empty() {
        return Err(ApiError::validation("No barcode supplied"));
    }

    if state.store.delete_unknown(&barcode)? {
        Ok(ApiResponse::ok(json!({ "deleted": true })))
    } else {
        Err(ApiError::not_found("Barcode not found in unknown list"))
    }
}

/// `POST /api/action/associatebarcode`: workflow: associate a stored
/// barcode with an existing product.
pub async fn associate_barcode(state: &AppState, request: &ApiRequest) -> ApiResult<ApiResponse> {
    let barcode = request.body_field("barcode").unwrap_or_default();
    if barcode.is_empty() {
        return Err(ApiError::validation("No barcode supplied"));
    }

    let product_id = request
        .body_field("product_id")
        .and_then(|value| value.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::validation("No valid product_id supplied"))?;

    let outcome = state.workflow.associate_existing(&barcode, product_id).await?;

    Ok(ApiResponse::ok(json!({
        "barcode": outcome.barcode,
        "product_id": outcome.product_id,
        "product_name": outcome.product_name,
        "stock_added": outcome.stock_added,
    })))
}

/// `POST /api/action/createandassociate`: workflow: create a product
/// and associate a stored barcode with it.
pub async fn create_and_associate(
    state: &AppState,
    request: &ApiRequest,
) -> ApiResult<ApiResponse> {
    let barcode = request.body_field("barcode").unwrap_or_default();
    if barcode.is_empty() {
        return Err(ApiError::validation("No barcode supplied"));
    }

    let name = request.body_field("name").unwrap_or_default();
    if name.is_empty() {
        return Err(ApiError::validation("No product name supplied"));
    }

    let mut product = NewProduct::named(name);
    // Non-numeric optional ids are ignored rather than rejected.
    if let Some(location_id) = request
        .body_field("location_id")
        .and_then(|value| value.parse::<i64>().ok())
    {
        product = product.with_location(location_id);
    }
    if let Some(product_group_id) = request
        .body_field("product_group_id")
        .and_then(|value| value.parse::<i64>().ok())
    {
        product = product.with_product_group(product_group_id);
    }

    let outcome = state.workflow.create_and_associate(&barcode, product).await?;

    Ok(ApiResponse::ok(json!({
        "barcode": outcome.barcode,
        "product_id": outcome.product_id,
        "product_name": outcome.product_name,
        "stock_added": outcome.stock_added,
    })))
}
