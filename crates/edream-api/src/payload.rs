//! Request payload construction.
//!
//! Each phase carries a fixed set of members plus the optional fields the
//! resource profile enables for that phase. Unset optional values are omitted
//! rather than sent as `null`.

use edream_core::{
    CompleteUploadRequest, CreateUploadRequest, PayloadFields, RefreshPartRequest, ResourceType,
    UploadFields,
};
use serde_json::{Map, Value, json};

/// Body for the create-multipart-upload call.
pub fn create_payload(request: &CreateUploadRequest) -> Value {
    let target = &request.target;
    let mut body = Map::new();
    body.insert("parts".into(), json!(request.total_parts));
    body.insert("extension".into(), json!(target.extension));
    if let Some(id) = &target.resource_id {
        body.insert("uuid".into(), json!(id));
    }
    apply_fields(
        &mut body,
        target.resource_type.profile().create_fields,
        target.resource_type,
        &target.fields,
    );
    Value::Object(body)
}

/// Body for the part URL refresh call.
pub fn refresh_payload(request: &RefreshPartRequest) -> Value {
    let mut body = Map::new();
    body.insert("uploadId".into(), json!(request.upload_id));
    body.insert("part".into(), json!(request.part_number));
    body.insert("extension".into(), json!(request.extension));
    apply_fields(
        &mut body,
        request.resource_type.profile().refresh_fields,
        request.resource_type,
        &request.fields,
    );
    Value::Object(body)
}

/// Body for the complete-multipart-upload call.
pub fn complete_payload(request: &CompleteUploadRequest) -> Value {
    let mut body = Map::new();
    body.insert("uploadId".into(), json!(request.upload_id));
    body.insert("parts".into(), json!(request.parts));
    body.insert("extension".into(), json!(request.extension));
    apply_fields(
        &mut body,
        request.resource_type.profile().complete_fields,
        request.resource_type,
        &request.fields,
    );
    Value::Object(body)
}

fn apply_fields(
    body: &mut Map<String, Value>,
    mask: PayloadFields,
    resource_type: ResourceType,
    fields: &UploadFields,
) {
    if mask.contains(PayloadFields::TYPE) {
        body.insert("type".into(), json!(resource_type.as_str()));
    }
    if mask.contains(PayloadFields::NAME) {
        if let Some(name) = &fields.name {
            body.insert("name".into(), json!(name));
        }
    }
    if mask.contains(PayloadFields::NSFW) {
        if let Some(nsfw) = fields.nsfw {
            body.insert("nsfw".into(), json!(nsfw));
        }
    }
    if mask.contains(PayloadFields::PROCESSED) {
        if let Some(processed) = fields.processed {
            body.insert("processed".into(), json!(processed));
        }
    }
    if mask.contains(PayloadFields::FRAME_NUMBER) {
        if let Some(frame) = fields.frame_number {
            body.insert("frameNumber".into(), json!(frame));
        }
    }
}
