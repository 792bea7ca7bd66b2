//! Response envelope handling.
//!
//! Successful responses are wrapped as `{ "success": bool, "message": ..., "data": ... }`.

use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Unwrap the `data` member of a response envelope.
///
/// `success: false` becomes [`ApiError::Rejected`]. A body without `data`
/// yields `Value::Null`. A body that is not an object is returned unchanged.
pub fn unwrap_data(body: Value) -> ApiResult<Value> {
    let Value::Object(mut map) = body else {
        return Ok(body);
    };

    if map.get("success").and_then(Value::as_bool) == Some(false) {
        let message = map
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request was not successful")
            .to_string();
        return Err(ApiError::Rejected { message });
    }

    Ok(map.remove("data").unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_success() {
        let data = unwrap_data(json!({"success": true, "data": {"uploadId": "u1"}})).unwrap();
        assert_eq!(data, json!({"uploadId": "u1"}));
    }

    #[test]
    fn test_unwrap_rejected() {
        let err = unwrap_data(json!({"success": false, "message": "bad frame"})).unwrap_err();
        match err {
            ApiError::Rejected { message } => assert_eq!(message, "bad frame"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unwrap_missing_data() {
        assert_eq!(unwrap_data(json!({"success": true})).unwrap(), Value::Null);
        assert_eq!(unwrap_data(Value::Null).unwrap(), Value::Null);
    }
}
