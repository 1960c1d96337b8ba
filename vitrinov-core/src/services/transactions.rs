//! Sales transactions: filtered listing and mutations

use std::sync::Arc;

use crate::domain::result::ApiResult;
use crate::domain::transaction::resolve_image_url;
use crate::domain::{DateRange, ImageAttachment, NewSale, SaleUpdate, TransactionPage};
use crate::ports::{resource_path, ApiRequest};
use crate::services::api_client::{ApiClient, Operation};

const FILTER: Operation = Operation {
    name: "transactions.filter",
    success_message: "",
    failure_message: "No se obtuvieron resultado.",
};

const ADD: Operation = Operation {
    name: "transactions.add",
    success_message: "Transacción registrada exitosamente",
    failure_message: "No fue posible registrar la transacción.",
};

const UPDATE: Operation = Operation {
    name: "transactions.update",
    success_message: "Transacción actualizada exitosamente",
    failure_message: "No fue posible actualizar la transacción.",
};

const DELETE: Operation = Operation {
    name: "transactions.delete",
    success_message: "Transacción eliminada exitosamente",
    failure_message: "No fue posible eliminar la transacción.",
};

fn with_image(request: ApiRequest, image: Option<&ImageAttachment>) -> ApiRequest {
    match image {
        Some(image) => request.file_field(
            "image",
            image.path.clone(),
            &image.file_name,
            &image.mime_type,
        ),
        None => request,
    }
}

pub struct TransactionService {
    client: Arc<ApiClient>,
}

impl TransactionService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Sales in a civil date range, optionally for one entrepreneur name
    pub fn filter(&self, range: &DateRange, client_name: Option<&str>) -> ApiResult<TransactionPage> {
        let mut request = ApiRequest::get("/transactions/filter")
            .query("start_date", range.start_param())
            .query("end_date", range.end_param());
        if let Some(name) = client_name.map(str::trim).filter(|n| !n.is_empty()) {
            request = request.query("client_name", name);
        }

        self.client.execute(FILTER, request, TransactionPage::from_json)
    }

    pub fn add(&self, sale: &NewSale) -> ApiResult<()> {
        let request = ApiRequest::post("/transactions/add")
            .text_field("client_id", sale.client_id.as_str())
            .text_field("transaction_type", sale.transaction_type.as_str())
            .text_field("amount", sale.amount.to_wire())
            .text_field("notes", sale.notes.as_str())
            .text_field("transaction_date", sale.date_param());

        self.client
            .execute_message(ADD, with_image(request, sale.image.as_ref()))
    }

    pub fn update(&self, id: &str, update: &SaleUpdate) -> ApiResult<()> {
        let path = match resource_path("/transactions/update", id) {
            Ok(path) => path,
            Err(e) => return ApiResult::failure(e.to_string()),
        };
        let request = ApiRequest::put(path)
            .text_field("transaction_type", update.transaction_type.as_str())
            .text_field("amount", update.amount.to_wire())
            .text_field("notes", update.notes.as_str());

        self.client
            .execute_message(UPDATE, with_image(request, update.image.as_ref()))
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        let path = match resource_path("/transactions/delete", id) {
            Ok(path) => path,
            Err(e) => return ApiResult::failure(e.to_string()),
        };
        self.client.execute_message(DELETE, ApiRequest::delete(path))
    }

    /// Absolute URL of a stored receipt image
    pub fn image_url(&self, image_path: &str) -> Option<String> {
        resolve_image_url(self.client.base_url(), image_path)
    }
}
