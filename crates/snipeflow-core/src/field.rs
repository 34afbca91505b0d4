//! ドット区切りパスによるフィールド解決
//!
//! レポート定義は `assigned_to.username` や `status_label.name` のように
//! ネストしたフィールドを文字列で参照する。解決できないパスはエラーに
//! せず「値なし」(`None`) として扱う。

use serde_json::Value;
use snipeflow_client::Record;
use std::cmp::Ordering;

/// `path` を `record` 上で解決する
///
/// - 途中で値が無い / `null` → `None`
/// - 末端がオブジェクト → `None`（より具体的なパスで参照する）
/// - 末端が配列 → 要素の表示形式を `", "` で連結した文字列
pub fn resolve(record: &Record, path: &str) -> Option<Value> {
    let mut segments = path.split('.');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }

    match current {
        Value::Null | Value::Object(_) => None,
        Value::Array(items) => Some(Value::String(
            items.iter().map(display).collect::<Vec<_>>().join(", "),
        )),
        scalar => Some(scalar.clone()),
    }
}

/// 値の表示形式（文字列は引用符なし）
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// ソート用の全順序
///
/// 値なしが先頭、以降 null < bool < 数値 < 文字列。
/// 文字列は辞書順なので `YYYY-MM-DD` はそのまま時系列順になる。
pub fn compare(a: &Option<Value>, b: &Option<Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => rank(a).cmp(&rank(b)).then_with(|| display(a).cmp(&display(b))),
    }
}
