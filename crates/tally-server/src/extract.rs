//! Request body extraction shared by every mutation route.
//!
//! HTML forms post `application/x-www-form-urlencoded`; everything else is
//! read as JSON. Form keys use bracket nesting, so
//! `attendance[Alice][0]=on` decodes to the same shape a JSON client sends
//! as `{"attendance": {"Alice": {"0": "on"}}}`:
//!
//! | key                | decoded as                         |
//! |--------------------|------------------------------------|
//! | `name`             | `{"name": value}`                  |
//! | `a[b][c]`          | `{"a": {"b": {"c": value}}}`       |
//! | `a[]`              | `{"a": [value, ...]}`              |
//! | repeated plain key | `{"key": [first, second, ...]}`    |
//!
//! All form values are strings.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::error::ServerError;

/// A request body accepted as either a urlencoded form or JSON.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_form(&req) {
            let Json(body) = Json::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self(body));
        }
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        serde_json::from_value(decode_pairs(pairs))
            .map(Self)
            .map_err(|e| ServerError::BadRequest(format!("invalid form body: {e}")).into_response())
    }
}

/// Fold urlencoded pairs into a JSON object following bracket nesting.
fn decode_pairs(pairs: Vec<(String, String)>) -> Value {
    let mut root = Map::new();
    for (key, value) in pairs {
        insert(&mut root, &key_path(&key), value);
    }
    Value::Object(root)
}

/// `a[b][c]` splits into `["a", "b", "c"]`; `a[]` ends in an empty segment.
fn key_path(key: &str) -> Vec<&str> {
    match key.find('[') {
        Some(open) if open > 0 && key.ends_with(']') => {
            let mut path = vec![&key[..open]];
            path.extend(key[open + 1..key.len() - 1].split("]["));
            path
        }
        _ => vec![key],
    }
}

fn insert(target: &mut Map<String, Value>, path: &[&str], value: String) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    match rest {
        [] => match target.entry(head.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(Value::String(value));
            }
            Entry::Occupied(mut slot) => append(slot.get_mut(), value),
        },
        [""] => append(
            target
                .entry(head.to_string())
                .or_insert_with(|| Value::Array(Vec::new())),
            value,
        ),
        _ => {
            let slot = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(map) = slot {
                insert(map, rest, value);
            }
        }
    }
}

fn append(slot: &mut Value, value: String) {
    match slot {
        Value::Array(items) => items.push(Value::String(value)),
        other => {
            let first = std::mem::take(other);
            *other = Value::Array(vec![first, Value::String(value)]);
        }
    }
}
