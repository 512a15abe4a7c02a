//! Cart Errors

use salvo::http::StatusError;
use tracing::error;

use versatil_app::domain::carts::CartsServiceError;

use crate::observability::observe_cart_operation;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be a positive integer")
        }
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::ItemNotFound => StatusError::not_found().brief("Cart item not found"),
        CartsServiceError::Storage(source) => {
            error!("cart storage error: {source}");

            StatusError::internal_server_error()
        }
        CartsServiceError::Catalog(source) => {
            error!("catalog lookup failed while handling cart: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Map a cart service result to HTTP and count it under `operation`.
pub(crate) fn observed<T>(
    operation: &str,
    result: Result<T, CartsServiceError>,
) -> Result<T, StatusError> {
    let result = result.map_err(into_status_error);

    observe_cart_operation(operation, outcome(result.as_ref().err()));

    result
}

/// Count a request the HTTP layer turned away before reaching the service.
pub(crate) fn rejected(operation: &str, status: StatusError) -> StatusError {
    observe_cart_operation(operation, outcome(Some(&status)));

    status
}

fn outcome(status: Option<&StatusError>) -> &'static str {
    match status {
        None => "ok",
        Some(status) if status.code.is_server_error() => "failed",
        Some(_) => "rejected",
    }
}
