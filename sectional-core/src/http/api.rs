//! REST surface of the content engine
//!
//! One identical route set is mounted per configured namespace prefix
//! (`/sections`, `/kids-sections`, ...): the engine is generic over the
//! prefix instead of being deployed twice. Mutating routes require the
//! administrative bearer token when one is configured; with no token
//! configured the guard allows everything, which keeps local development
//! friction-free.

use std::sync::Arc;

use hyper::StatusCode;
use serde::Serialize;
use serde_json::json;

use super::router::{PathParams, Router};
use super::{ApiRequest, ApiResponse};
use crate::config::AuthConfig;
use crate::error::EngineError;
use crate::model::{EntryPayload, FieldDraft, SectionDraft, SectionPatch};
use crate::store::{new_stores, EntryStore, SchemaStore};

/// One independently-stored deployment of the engine
pub struct Namespace {
    pub prefix: String,
    pub schemas: SchemaStore,
    pub entries: EntryStore,
}

impl Namespace {
    pub fn new(prefix: &str) -> Self {
        let (schemas, entries) = new_stores();
        Self { prefix: prefix.trim_matches('/').to_string(), schemas, entries }
    }
}

/// Build the full route table: a health endpoint plus the section and
/// entry lifecycle for every namespace
pub fn build_router(namespaces: Vec<Arc<Namespace>>, auth: AuthConfig) -> Router {
    let mut router = Router::new().get("/health", |_req, _params| {
        ApiResponse::ok(json!({ "status": "ok" }))
    });
    for ns in namespaces {
        router = mount_namespace(router, ns, auth.clone());
    }
    router
}

fn mount_namespace(router: Router, ns: Arc<Namespace>, auth: AuthConfig) -> Router {
    let base = format!("/{}", ns.prefix);
    let by_id = format!("{}/:id", base);
    let fields = format!("{}/:id/fields", base);
    let field_by_index = format!("{}/:id/fields/:index", base);
    let data = format!("{}/:id/data", base);
    let data_by_id = format!("{}/:id/data/:entry_id", base);

    let list_ns = ns.clone();
    let create_ns = ns.clone();
    let get_ns = ns.clone();
    let update_ns = ns.clone();
    let delete_ns = ns.clone();
    let add_field_ns = ns.clone();
    let remove_field_ns = ns.clone();
    let list_data_ns = ns.clone();
    let create_data_ns = ns.clone();
    let update_data_ns = ns.clone();
    let delete_data_ns = ns;

    let create_auth = auth.clone();
    let update_auth = auth.clone();
    let delete_auth = auth.clone();
    let add_field_auth = auth.clone();
    let remove_field_auth = auth.clone();
    let create_data_auth = auth.clone();
    let update_data_auth = auth.clone();
    let delete_data_auth = auth;

    router
        .get(&base, move |req, _params| {
            // ?active=true narrows to the picker's view; default is all
            let include_inactive = req.query_param("active") != Some("true");
            respond(list_ns.schemas.list_sections(include_inactive), StatusCode::OK)
        })
        .post(&base, move |req, _params| {
            if let Some(denied) = require_admin(req, &create_auth) {
                return denied;
            }
            let draft: SectionDraft = match req.json_body() {
                Ok(draft) => draft,
                Err(resp) => return resp,
            };
            respond(create_ns.schemas.create_section(draft), StatusCode::CREATED)
        })
        .get(&by_id, move |_req, params| {
            respond(get_ns.schemas.get_section(param(params, "id")), StatusCode::OK)
        })
        .put(&by_id, move |req, params| {
            if let Some(denied) = require_admin(req, &update_auth) {
                return denied;
            }
            let patch: SectionPatch = match req.json_body() {
                Ok(patch) => patch,
                Err(resp) => return resp,
            };
            respond(update_ns.schemas.update_section(param(params, "id"), patch), StatusCode::OK)
        })
        .delete(&by_id, move |req, params| {
            if let Some(denied) = require_admin(req, &delete_auth) {
                return denied;
            }
            match delete_ns.schemas.delete_section(param(params, "id")) {
                Ok(()) => ApiResponse::no_content(),
                Err(err) => ApiResponse::from_engine_error(&err),
            }
        })
        .post(&fields, move |req, params| {
            if let Some(denied) = require_admin(req, &add_field_auth) {
                return denied;
            }
            let draft: FieldDraft = match req.json_body() {
                Ok(draft) => draft,
                Err(resp) => return resp,
            };
            respond(add_field_ns.schemas.add_field(param(params, "id"), draft), StatusCode::OK)
        })
        .delete(&field_by_index, move |req, params| {
            if let Some(denied) = require_admin(req, &remove_field_auth) {
                return denied;
            }
            let index: usize = match param(params, "index").parse() {
                Ok(index) => index,
                Err(_) => {
                    return ApiResponse::error(
                        StatusCode::BAD_REQUEST,
                        "bad_request",
                        "field index must be a non-negative integer",
                    )
                }
            };
            respond(
                remove_field_ns.schemas.remove_field(param(params, "id"), index),
                StatusCode::OK,
            )
        })
        .get(&data, move |_req, params| {
            respond(list_data_ns.entries.list_entries(param(params, "id")), StatusCode::OK)
        })
        .post(&data, move |req, params| {
            if let Some(denied) = require_admin(req, &create_data_auth) {
                return denied;
            }
            let payload: EntryPayload = match req.json_body() {
                Ok(payload) => payload,
                Err(resp) => return resp,
            };
            respond(
                create_data_ns.entries.create_entry(param(params, "id"), payload),
                StatusCode::CREATED,
            )
        })
        .put(&data_by_id, move |req, params| {
            if let Some(denied) = require_admin(req, &update_data_auth) {
                return denied;
            }
            let payload: EntryPayload = match req.json_body() {
                Ok(payload) => payload,
                Err(resp) => return resp,
            };
            respond(
                update_data_ns.entries.update_entry(
                    param(params, "id"),
                    param(params, "entry_id"),
                    payload,
                ),
                StatusCode::OK,
            )
        })
        .delete(&data_by_id, move |req, params| {
            if let Some(denied) = require_admin(req, &delete_data_auth) {
                return denied;
            }
            match delete_data_ns
                .entries
                .delete_entry(param(params, "id"), param(params, "entry_id"))
            {
                Ok(()) => ApiResponse::no_content(),
                Err(err) => ApiResponse::from_engine_error(&err),
            }
        })
}

/// Gate for mutating routes. No configured token means no gate; otherwise
/// the request's bearer token must match exactly.
fn require_admin(req: &ApiRequest, auth: &AuthConfig) -> Option<ApiResponse> {
    let expected = match auth.admin_token.as_deref() {
        Some(token) if !token.is_empty() => token,
        _ => return None,
    };
    match req.bearer_token.as_deref() {
        Some(token) if token == expected => None,
        _ => Some(ApiResponse::from_engine_error(&EngineError::Auth(
            "administrative bearer token required".to_string(),
        ))),
    }
}

fn param<'a>(params: &'a PathParams, name: &str) -> &'a str {
    params.get(name).map(|s| s.as_str()).unwrap_or("")
}

fn respond<T: Serialize>(result: crate::error::Result<T>, status: StatusCode) -> ApiResponse {
    match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(body) => ApiResponse { status, body: Some(body) },
            Err(e) => ApiResponse::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "serialization_error",
                &e.to_string(),
            ),
        },
        Err(err) => ApiResponse::from_engine_error(&err),
    }
}
