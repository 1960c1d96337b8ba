//! Bank accounts per entrepreneur

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::domain::result::ApiResult;
use crate::domain::{BankAccount, BankAccountUpdate, NewBankAccount};
use crate::ports::{resource_path, ApiRequest};
use crate::services::api_client::{ApiClient, Operation};

const LIST: Operation = Operation {
    name: "bank_accounts.list",
    success_message: "",
    failure_message: "No se obtuvieron cuentas bancarias.",
};

const ADD: Operation = Operation {
    name: "bank_accounts.add",
    success_message: "Cuenta bancaria agregada exitosamente",
    failure_message: "No fue posible agregar la cuenta bancaria.",
};

const UPDATE: Operation = Operation {
    name: "bank_accounts.update",
    success_message: "Cuenta bancaria actualizada exitosamente",
    failure_message: "No fue posible actualizar la cuenta bancaria.",
};

const DELETE: Operation = Operation {
    name: "bank_accounts.delete",
    success_message: "Cuenta bancaria eliminada exitosamente",
    failure_message: "No fue posible eliminar la cuenta bancaria.",
};

fn parse_accounts(body: &JsonValue) -> Vec<BankAccount> {
    body.as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| serde_json::from_value(row.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

pub struct BankAccountService {
    client: Arc<ApiClient>,
}

impl BankAccountService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn list(&self, client_id: &str) -> ApiResult<Vec<BankAccount>> {
        let path = match resource_path("/bankaccount/list", client_id) {
            Ok(path) => path,
            Err(e) => return ApiResult::failure(e.to_string()),
        };
        let request = ApiRequest::get(path);
        self.client.execute(LIST, request, parse_accounts)
    }

    pub fn add(&self, account: &NewBankAccount) -> ApiResult<()> {
        let request = ApiRequest::post("/bankaccount/add").json(account.to_json());
        self.client.execute_message(ADD, request)
    }

    pub fn update(&self, id: &str, update: &BankAccountUpdate) -> ApiResult<()> {
        let path = match resource_path("/bankaccount/update", id) {
            Ok(path) => path,
            Err(e) => return ApiResult::failure(e.to_string()),
        };
        let request = ApiRequest::put(path).json(update.to_json());
        self.client.execute_message(UPDATE, request)
    }

    pub fn delete(&self, id: &str) -> ApiResult<()> {
        let path = match resource_path("/bankaccount/delete", id) {
            Ok(path) => path,
            Err(e) => return ApiResult::failure(e.to_string()),
        };
        self.client.execute_message(DELETE, ApiRequest::delete(path))
    }
}
