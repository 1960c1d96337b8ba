//! Entrepreneurs CRUD

use std::sync::Arc;

use serde_json::{json, Value as JsonValue};

use crate::domain::result::ApiResult;
use crate::domain::{Client, ClientName, ClientUpdate};
use crate::ports::{resource_path, ApiRequest};
use crate::services::api_client::{ApiClient, Operation};

const LIST: Operation = Operation {
    name: "clients.list",
    success_message: "",
    failure_message: "No se obtuvieron resultado.",
};

const ADD: Operation = Operation {
    name: "clients.add",
    success_message: "Emprendedor agregado exitosamente",
    failure_message: "No fue posible agregar el emprendedor.",
};

const UPDATE: Operation = Operation {
    name: "clients.update",
    success_message: "Emprendedor actualizado exitosamente",
    failure_message: "No fue posible actualizar el emprendedor.",
};

const DELETE: Operation = Operation {
    name: "clients.delete",
    success_message: "Emprendedor eliminado exitosamente",
    failure_message: "No fue posible eliminar el emprendedor.",
};

/// Non-array bodies and malformed rows yield nothing
fn parse_clients(body: &JsonValue) -> Vec<Client> {
    body.as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| serde_json::from_value(row.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

pub struct ClientService {
    client: Arc<ApiClient>,
}

impl ClientService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn list(&self) -> ApiResult<Vec<Client>> {
        self.client
            .execute(LIST, ApiRequest::get("/clients/list"), parse_clients)
    }

    pub fn add(&self, name: &ClientName) -> ApiResult<()> {
        let request = ApiRequest::post("/clients/add").json(json!({ "name": name.as_str() }));
        self.client.execute_message(ADD, request)
    }

    pub fn update(&self, id: &str, update: &ClientUpdate) -> ApiResult<()> {
        let path = match resource_path("/clients/update", id) {
            Ok(path) => path,
            Err(e) => return ApiResult::failure(e.to_string()),
        };
        let request = ApiRequest::put(path).json(update.to_json());
        self.client.execute_message(UPDATE, request)
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        let path = match resource_path("/clients/delete", id) {
            Ok(path) => path,
            Err(e) => return ApiResult::failure(e.to_string()),
        };
        self.client.execute_message(DELETE, ApiRequest::delete(path))
    }
}
