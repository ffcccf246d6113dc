use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use validator::{Validate, ValidationError, ValidationErrors};

/// JSON body extractor that runs `validator` rules before the handler sees it.
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let payload = json!({
                    "status": "error",
                    "message": format!("Invalid JSON: {}", rejection.body_text()),
                });
                (StatusCode::BAD_REQUEST, Json(payload))
            })?;

        value.validate().map_err(|errors| {
            let payload = json!({
                "status": "error",
                "message": summarize(&errors),
                "details": detailed(&errors),
            });
            (StatusCode::BAD_REQUEST, Json(payload))
        })?;

        Ok(Self(value))
    }
}

fn describe(field: &str, error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => match error.code.as_ref() {
            "length" => "Invalid length".to_string(),
            "range" => "Value out of range".to_string(),
            _ => format!("Invalid {field}"),
        },
    }
}

fn summarize(errors: &ValidationErrors) -> String {
    let messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors
                .iter()
                .map(move |e| format!("{field}: {}", describe(&field, e)))
        })
        .collect();

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    }
}

fn detailed(errors: &ValidationErrors) -> Value {
    let mut map = Map::new();

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors.iter().map(|e| describe(&field, e)).collect();
        map.insert(field.to_string(), json!(messages));
    }

    Value::Object(map)
}
