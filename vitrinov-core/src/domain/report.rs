//! Report payloads: spreadsheet export, transfer notifications and the
//! transaction classification breakdown

use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::amount::{decimal_from_json, format_money};
use super::civil_date::DateRange;
use super::result::{Error, Result};

/// Category filter meaning "no filter"
pub const ALL_TYPES: &str = "Todas";

/// Categories the classification endpoint groups by, in display order
pub const CLASSIFICATION_TYPES: [&str; 4] = ["Efectivo", "Sin categorizar", "Tarjeta", "Transferencia"];

/// A spreadsheet written to the cache directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedReport {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
}

fn non_alphanumeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid file name pattern"))
}

/// `reporte_<client>_<start>_<end>.xlsx`
pub fn export_file_name(client_name: &str, range: &DateRange) -> String {
    let client = non_alphanumeric_re().replace_all(client_name.trim(), "_");
    let client = if client.is_empty() { "cliente" } else { client.as_ref() };
    format!(
        "reporte_{}_{}_{}.xlsx",
        client,
        range.start_param(),
        range.end_param()
    )
}

/// Result of `/transfernoti/transfer/notify`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationReport {
    pub cantidad: i64,
    pub mensaje: String,
}

impl NotificationReport {
    pub fn from_json(body: &JsonValue) -> Self {
        let cantidad = match body.get("cantidad") {
            Some(JsonValue::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .unwrap_or(0),
            Some(JsonValue::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        };
        let mensaje = body
            .get("mensaje")
            .and_then(|m| m.as_str())
            .unwrap_or_default()
            .to_string();
        Self { cantidad, mensaje }
    }
}

/// One transaction in the classification breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationRow {
    pub tipo: String,
    pub emprendimiento: String,
    pub fecha: String,
    pub monto: Decimal,
    pub notas: String,
}

impl ClassificationRow {
    fn matches(&self, term: &str) -> bool {
        self.tipo.to_lowercase().contains(term)
            || self.emprendimiento.to_lowercase().contains(term)
            || self.notas.to_lowercase().contains(term)
    }
}

/// Flatten `{ "<type>": [ {emprendimiento, fecha, monto, notas}, ... ] }`
/// into rows, most recent first. Non-array entries are ignored.
pub fn classification_rows(body: &JsonValue) -> Vec<ClassificationRow> {
    let text = |item: &JsonValue, key: &str| -> String {
        item.get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    let mut rows: Vec<ClassificationRow> = body
        .as_object()
        .into_iter()
        .flat_map(|map| map.iter())
        .filter_map(|(tipo, values)| values.as_array().map(|items| (tipo, items)))
        .flat_map(|(tipo, items)| {
            items.iter().map(move |item| ClassificationRow {
                tipo: tipo.clone(),
                emprendimiento: text(item, "emprendimiento").to_uppercase(),
                fecha: text(item, "fecha"),
                monto: item.get("monto").map(decimal_from_json).unwrap_or_default(),
                notas: text(item, "notas"),
            })
        })
        .collect();

    rows.sort_by(|a, b| b.fecha.cmp(&a.fecha));
    rows
}

/// Apply the category filter (`Todas` keeps everything) then a free-text search
pub fn filter_classification<'a>(
    rows: &'a [ClassificationRow],
    tipo: &str,
    search: &str,
) -> Vec<&'a ClassificationRow> {
    let tipo = tipo.trim();
    let term = search.trim().to_lowercase();
    rows.iter()
        .filter(|r| tipo.is_empty() || tipo == ALL_TYPES || r.tipo == tipo)
        .filter(|r| term.is_empty() || r.matches(&term))
        .collect()
}

/// Sum per known category; unknown categories are not counted
pub fn totals_by_type(rows: &[&ClassificationRow]) -> Vec<(&'static str, Decimal)> {
    CLASSIFICATION_TYPES
        .iter()
        .map(|t| {
            let total: Decimal = rows.iter().filter(|r| r.tipo == *t).map(|r| r.monto).sum();
            (*t, total)
        })
        .collect()
}

/// Write rows as CSV with a header line
pub fn write_classification_csv<W: Write>(rows: &[&ClassificationRow], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["tipo", "emprendimiento", "fecha", "monto", "notas"])
        .map_err(|e| Error::Other(format!("Failed to write CSV: {}", e)))?;
    for row in rows {
        csv.write_record([
            row.tipo.as_str(),
            row.emprendimiento.as_str(),
            row.fecha.as_str(),
            format_money(row.monto).as_str(),
            row.notas.as_str(),
        ])
        .map_err(|e| Error::Other(format!("Failed to write CSV: {}", e)))?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample() -> JsonValue {
        json!({
            "Efectivo": [
                {"emprendimiento": "tienda luna", "fecha": "2024-05-01", "monto": 10, "notas": "mesa"},
                {"emprendimiento": "pupuseria sol", "fecha": "2024-05-03", "monto": "2.50", "notas": null}
            ],
            "Tarjeta": [
                {"emprendimiento": "tienda luna", "fecha": "2024-05-02", "monto": 7.25}
            ],
            "resumen": "ignored"
        })
    }

    #[test]
    fn test_rows_are_normalized_and_sorted() {
        let rows = classification_rows(&sample());
        assert_eq!(rows.len(), 3);
        let dates: Vec<_> = rows.iter().map(|r| r.fecha.as_str()).collect();
        assert_eq!(dates, vec!["2024-05-03", "2024-05-02", "2024-05-01"]);
        assert_eq!(rows[0].emprendimiento, "PUPUSERIA SOL");
        assert_eq!(rows[0].monto, Decimal::new(250, 2));
        assert_eq!(rows[0].notas, "");
    }

    #[test]
    fn test_non_object_body_has_no_rows() {
        assert!(classification_rows(&json!([])).is_empty());
        assert!(classification_rows(&json!({})).is_empty());
    }

    #[test]
    fn test_filter_and_totals() {
        let rows = classification_rows(&sample());

        assert_eq!(filter_classification(&rows, ALL_TYPES, "").len(), 3);
        assert_eq!(filter_classification(&rows, "Tarjeta", "").len(), 1);
        assert_eq!(filter_classification(&rows, ALL_TYPES, "LUNA").len(), 2);
        assert_eq!(filter_classification(&rows, ALL_TYPES, "mesa").len(), 1);

        let all = filter_classification(&rows, ALL_TYPES, "");
        let totals = totals_by_type(&all);
        assert_eq!(totals[0], ("Efectivo", Decimal::new(1250, 2)));
        assert_eq!(totals[1], ("Sin categorizar", Decimal::ZERO));
        assert_eq!(totals[2], ("Tarjeta", Decimal::new(725, 2)));
    }

    #[test]
    fn test_csv_output() {
        let rows = classification_rows(&sample());
        let refs: Vec<_> = rows.iter().collect();
        let mut out = Vec::new();
        write_classification_csv(&refs, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("tipo,emprendimiento,fecha,monto,notas"));
        assert_eq!(lines.next(), Some("Efectivo,PUPUSERIA SOL,2024-05-03,2.50,"));
    }

    #[test]
    fn test_notification_report() {
        let report = NotificationReport::from_json(&json!({"cantidad": "3", "mensaje": "Hay 3"}));
        assert_eq!(report.cantidad, 3);
        assert_eq!(report.mensaje, "Hay 3");
        assert_eq!(NotificationReport::from_json(&json!({})), NotificationReport::default());
    }

    #[test]
    fn test_export_file_name() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        let range = DateRange::new(d(1), d(3)).unwrap();
        assert_eq!(
            export_file_name(" Tienda  Luna! ", &range),
            "reporte_Tienda_Luna__2024-05-01_2024-05-03.xlsx"
        );
        assert_eq!(
            export_file_name("  ", &range),
            "reporte_cliente_2024-05-01_2024-05-03.xlsx"
        );
    }
}
