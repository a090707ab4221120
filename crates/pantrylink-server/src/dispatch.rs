//! The dispatch boundary.
//!
//! One function, [`dispatch`], takes every `/api` request from the
//! transport to an envelope: API-key check, route resolution, handler
//! invocation, and error/panic containment. Nothing past this point can
//! turn into a transport-level failure: unexpected faults become a 500
//! envelope.

use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use http::StatusCode;
use tracing::{debug, error};

use pantrylink_core::{ApiError, ApiRequest, ApiResponse, ApiResult};
use pantrylink_router::{Params, Router};

use crate::handlers;
use crate::operations::Operation;
use crate::state::AppState;

/// Routes one request to its handler and converts the result into the
/// response envelope.
pub async fn dispatch(
    state: &AppState,
    router: &Router<Operation>,
    request: &ApiRequest,
) -> ApiResponse {
    if state.config.auth.require_api_key && !is_authorized(state, request) {
        return ApiError::Unauthorized.to_envelope();
    }

    let Some(matched) = router.resolve(request.method(), request.path()) else {
        return ApiResponse::error("API call not found", StatusCode::NOT_FOUND);
    };
    let (operation, params) = matched.into_parts();

    let outcome = AssertUnwindSafe(invoke(state, *operation, request, &params))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => {
            if err.status_code().is_server_error() {
                error!(operation = ?operation, error = %err, "handler failed");
            } else {
                debug!(operation = ?operation, error = %err, "request rejected");
            }
            err.to_envelope()
        }
        Err(_) => {
            error!(operation = ?operation, "handler panicked");
            ApiResponse::error("Internal server error", StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Checks the API key from the `BBUDDY-API-KEY` header or the `apikey`
/// query parameter against the store.
fn is_authorized(state: &AppState, request: &ApiRequest) -> bool {
    let key = request
        .header("BBUDDY-API-KEY")
        .map(ToString::to_string)
        .or_else(|| request.query_param("apikey"))
        .unwrap_or_default();

    if key.is_empty() {
        return false;
    }

    state.store.is_valid_api_key(&key).unwrap_or(false)
}

/// Invokes the handler registered for an operation.
async fn invoke(
    state: &AppState,
    operation: Operation,
    request: &ApiRequest,
    params: &Params,
) -> ApiResult<ApiResponse> {
    match operation {
        Operation::Scan => handlers::scan(state, request).await,
        Operation::GetMode => handlers::get_mode(state, request).await,
        Operation::SetMode => handlers::set_mode(state, request).await,
        Operation::SystemInfo => handlers::system_info(state, request).await,
        Operation::SystemBarcodes => handlers::system_barcodes(state, request).await,
        Operation::ListUnknownBarcodes => handlers::list_unknown_barcodes(state, request).await,
        Operation::DeleteBarcodeById => {
            handlers::delete_barcode_by_id(state, request, params).await
        }
        Operation::AssociateBarcodeById => {
            handlers::associate_barcode_by_id(state, request, params).await
        }
        Operation::BarcodeLogs => handlers::barcode_logs(state, request).await,
        Operation::DeleteUnknown => handlers::delete_unknown(state, request).await,
        Operation::AssociateBarcode => handlers::associate_barcode(state, request).await,
        Operation::CreateAndAssociate => handlers::create_and_associate(state, request).await,
    }
}
