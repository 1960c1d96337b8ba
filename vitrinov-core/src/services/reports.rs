//! Reports: spreadsheet export, transfer notifications, classification

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::domain::report::{classification_rows, export_file_name};
use crate::domain::result::{ApiResult, Error, Result};
use crate::domain::{ClassificationRow, DateRange, ExportedReport, NotificationReport};
use crate::ports::ApiRequest;
use crate::services::api_client::{ApiClient, Operation};
use crate::services::logging::LogEvent;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const EXPORT: Operation = Operation {
    name: "reports.export",
    success_message: "Reporte generado exitosamente",
    failure_message: "No fue posible generar el reporte.",
};

const NOTIFICATIONS: Operation = Operation {
    name: "reports.notifications",
    success_message: "",
    failure_message: "No fue posible obtener el reporte de notificaciones.",
};

const CLASSIFICATION: Operation = Operation {
    name: "reports.classification",
    success_message: "",
    failure_message: "No fue posible obtener el reporte.",
};

const NOT_A_SPREADSHEET: &str = "El archivo descargado no es una hoja de cálculo válida.";

/// An xlsx file is a zip archive with a `[Content_Types].xml` entry
pub fn is_spreadsheet(bytes: &[u8]) -> bool {
    match zip::ZipArchive::new(Cursor::new(bytes)) {
        Ok(mut archive) => archive.by_name("[Content_Types].xml").is_ok(),
        Err(_) => false,
    }
}

/// Write through a temp file in the same directory, then rename
fn write_atomically(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    let path = dir.join(file_name);
    temp.persist(&path)
        .map_err(|e| Error::storage(format!("Failed to save report: {}", e.error)))?;
    Ok(path)
}

pub struct ReportService {
    client: Arc<ApiClient>,
    cache_dir: PathBuf,
}

impl ReportService {
    pub fn new(client: Arc<ApiClient>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Download the sales spreadsheet into the cache directory.
    ///
    /// Nothing is left under the final name unless the download succeeded
    /// and looks like a spreadsheet.
    pub fn export(&self, range: &DateRange, client_name: &str) -> ApiResult<ExportedReport> {
        let request = ApiRequest::get("/reports/export")
            .query("fechaIni", range.start_param())
            .query("fechaFin", range.end_param())
            .query("clientName", client_name.trim())
            .accept(XLSX_MIME);

        let (response, message) = match self.client.send(EXPORT, request) {
            ApiResult::Success { data, message } => (data, message),
            other => {
                return other
                    .forward()
                    .unwrap_or_else(|| ApiResult::failure(EXPORT.failure_message))
            }
        };

        if !is_spreadsheet(&response.body) {
            self.client.log(
                LogEvent::new("request_failed")
                    .with_operation(EXPORT.name)
                    .with_status(response.status)
                    .with_error(NOT_A_SPREADSHEET),
            );
            return ApiResult::failure(NOT_A_SPREADSHEET);
        }

        let file_name = export_file_name(client_name, range);
        match write_atomically(&self.cache_dir, &file_name, &response.body) {
            Ok(path) => {
                self.client
                    .log(LogEvent::new("report_exported").with_operation(EXPORT.name));
                ApiResult::success(
                    ExportedReport {
                        path,
                        file_name,
                        size_bytes: response.body.len() as u64,
                    },
                    message,
                )
            }
            Err(e) => {
                self.client.log(
                    LogEvent::new("request_failed")
                        .with_operation(EXPORT.name)
                        .with_error(e.to_string()),
                );
                ApiResult::failure(EXPORT.failure_message)
            }
        }
    }

    /// Pending transfer notifications for the logged-in user
    pub fn notifications(&self, range: &DateRange) -> ApiResult<NotificationReport> {
        let request = ApiRequest::get("/transfernoti/transfer/notify")
            .query("user_id", self.client.session().get_cached().user_id())
            .query("fecha_inicio", range.start_param())
            .query("fecha_fin", range.end_param());
        self.client
            .execute(NOTIFICATIONS, request, NotificationReport::from_json)
    }

    /// Transactions grouped by payment type, flattened and newest first
    pub fn classification(&self, range: &DateRange) -> ApiResult<Vec<ClassificationRow>> {
        let request = ApiRequest::get("/transfernoti/transaction/classification")
            .query("user_id", self.client.session().get_cached().user_id())
            .query("fecha_inicio", range.start_param())
            .query("fecha_fin", range.end_param());
        self.client
            .execute(CLASSIFICATION, request, classification_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemorySessionStorage;
    use crate::ports::Method;
    use crate::services::session::SessionStore;
    use crate::services::testing::{RecordingTransport, Reply};
    use crate::services::token_guard::DEFAULT_TOKEN_CHECK_PATH;
    use chrono::NaiveDate;
    use serde_json::json;
    use zip::write::SimpleFileOptions;

    fn service(transport: &Arc<RecordingTransport>, cache_dir: &Path) -> ReportService {
        let session = Arc::new(SessionStore::new(Arc::new(MemorySessionStorage::new())));
        session.save("tok", Some(json!({"user_id": "12"}))).unwrap();
        let client = Arc::new(ApiClient::new(
            transport.clone(),
            session,
            DEFAULT_TOKEN_CHECK_PATH,
        ));
        ReportService::new(client, cache_dir)
    }

    fn range() -> DateRange {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        DateRange::new(d(1), d(31)).unwrap()
    }

    fn fake_xlsx() -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("[Content_Types].xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<Types/>").unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    fn cache_entries(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_spreadsheet_detection() {
        assert!(is_spreadsheet(&fake_xlsx()));
        assert!(!is_spreadsheet(b"{\"message\":\"error\"}"));
        assert!(!is_spreadsheet(b""));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let transport = Arc::new(RecordingTransport::new());
        transport.on(Method::Get, "/reports/export", Reply::bytes(200, fake_xlsx()));

        let result = service(&transport, &cache).export(&range(), "Tienda Luna");
        let report = result.into_data().unwrap();
        assert_eq!(report.file_name, "reporte_Tienda_Luna_2024-05-01_2024-05-31.xlsx");
        assert_eq!(fs::read(&report.path).unwrap(), fake_xlsx());
        assert_eq!(cache_entries(&cache), vec![report.file_name.clone()]);

        let request = &transport.resource_requests()[0];
        assert_eq!(request.query_value("fechaIni"), Some("2024-05-01"));
        assert_eq!(request.query_value("fechaFin"), Some("2024-05-31"));
        assert_eq!(request.query_value("clientName"), Some("Tienda Luna"));
        assert_eq!(request.accept.as_deref(), Some(XLSX_MIME));
    }

    #[test]
    fn test_export_failure_extracts_message_and_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(RecordingTransport::new());
        transport.on(
            Method::Get,
            "/reports/export",
            Reply::json(400, json!({"message": "Sin datos en el rango"})),
        );

        let result = service(&transport, dir.path()).export(&range(), "");
        assert_eq!(result, ApiResult::failure("Sin datos en el rango"));
        assert!(cache_entries(dir.path()).is_empty());
    }

    #[test]
    fn test_export_rejects_non_spreadsheet_success() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(RecordingTransport::new());
        transport.on(Method::Get, "/reports/export", Reply::json(200, json!({"ok": true})));

        let result = service(&transport, dir.path()).export(&range(), "");
        assert_eq!(result, ApiResult::failure(NOT_A_SPREADSHEET));
        assert!(cache_entries(dir.path()).is_empty());
    }

    #[test]
    fn test_export_expired() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(RecordingTransport::new());
        transport.on_token_check(Reply::status(401));
        let result = service(&transport, dir.path()).export(&range(), "");
        assert!(result.token_expired());
        assert!(transport.resource_requests().is_empty());
    }

    #[test]
    fn test_notifications_and_classification_expired() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(RecordingTransport::new());
        transport.on_token_check(Reply::status(401));
        let svc = service(&transport, dir.path());

        assert!(svc.notifications(&range()).token_expired());
        assert!(svc.classification(&range()).token_expired());
        assert!(transport.resource_requests().is_empty());
    }

    #[test]
    fn test_notifications() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(RecordingTransport::new());
        transport.on(
            Method::Get,
            "/transfernoti/transfer/notify",
            Reply::json(200, json!({"cantidad": 2, "mensaje": "Tienes 2 transferencias"})),
        );

        let report = service(&transport, dir.path())
            .notifications(&range())
            .into_data()
            .unwrap();
        assert_eq!(report.cantidad, 2);

        let request = &transport.resource_requests()[0];
        assert_eq!(request.query_value("user_id"), Some("12"));
        assert_eq!(request.query_value("fecha_inicio"), Some("2024-05-01"));
        assert_eq!(request.query_value("fecha_fin"), Some("2024-05-31"));
    }

    #[test]
    fn test_classification() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(RecordingTransport::new());
        transport.on(
            Method::Get,
            "/transfernoti/transaction/classification",
            Reply::json(
                200,
                json!({"Efectivo": [{"emprendimiento": "luna", "fecha": "2024-05-02", "monto": 4}]}),
            ),
        );
        let rows = service(&transport, dir.path())
            .classification(&range())
            .into_data()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].emprendimiento, "LUNA");

        transport.on(Method::Get, "/transfernoti/transaction/classification", Reply::status(500));
        let failed = service(&transport, dir.path()).classification(&range());
        assert_eq!(failed.message(), "No fue posible obtener el reporte.");
    }
}
