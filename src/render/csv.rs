use anyhow::{Result, anyhow};
use serde_json::Value;

use crate::catalog::CsvTable;
use crate::types::Payload;

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "),
        Some(other) => other.to_string(),
    }
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// 把payload中的表格字段导出为CSV文本（含表头）
pub fn to_csv(table: &CsvTable, payload: &Payload) -> Result<String> {
    let rows = payload
        .get(table.field)
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("field `{}` is not an array", table.field))?;

    let mut out = String::new();
    out.push_str(&table.columns.join(","));
    out.push_str("\r\n");

    for row in rows {
        let object = row
            .as_object()
            .ok_or_else(|| anyhow!("rows of `{}` must be objects", table.field))?;
        let line = table
            .columns
            .iter()
            .map(|column| escape(&cell(object.get(*column))))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push_str("\r\n");
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductType;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_caption_rows() {
        let table = ProductType::CaptionBank.csv_table().unwrap();
        let data = payload(json!({
            "captions": [
                {"day": 1, "text": "Kopi pagi, semangat pagi", "hashtags": ["#kopi", "#pagi"]},
                {"day": 2, "text": "Katanya \"enak\"", "hashtags": []}
            ]
        }));

        let csv = to_csv(&table, &data).unwrap();
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(lines[0], "day,text,hashtags");
        assert_eq!(lines[1], "1,\"Kopi pagi, semangat pagi\",#kopi #pagi");
        assert_eq!(lines[2], "2,\"Katanya \"\"enak\"\"\",");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn test_missing_columns_are_blank() {
        let table = ProductType::CaptionBank.csv_table().unwrap();
        let data = payload(json!({"captions": [{"text": "hanya teks"}]}));

        let csv = to_csv(&table, &data).unwrap();
        assert!(csv.contains("\r\n,hanya teks,\r\n"));
    }

    #[test]
    fn test_non_array_field_is_an_error() {
        let table = ProductType::CaptionBank.csv_table().unwrap();

        assert!(to_csv(&table, &payload(json!({"captions": "oops"}))).is_err());
        assert!(to_csv(&table, &payload(json!({}))).is_err());
        assert!(to_csv(&table, &payload(json!({"captions": [1, 2]}))).is_err());
    }
}
