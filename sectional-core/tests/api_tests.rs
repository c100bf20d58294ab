//! End-to-end tests for the REST surface
//!
//! These drive the router directly with in-memory requests, covering the
//! full section and entry lifecycle across two namespaces.

use std::sync::Arc;

use hyper::{Method, StatusCode};
use serde_json::{json, Value};

use sectional_core::config::AuthConfig;
use sectional_core::http::{build_router, ApiRequest, ApiResponse, Namespace, Router};

fn open_router() -> Router {
    router_with_token(None)
}

fn router_with_token(token: Option<&str>) -> Router {
    let namespaces =
        vec![Arc::new(Namespace::new("sections")), Arc::new(Namespace::new("kids-sections"))];
    let auth = AuthConfig { admin_token: token.map(|t| t.to_string()) };
    build_router(namespaces, auth)
}

fn get(router: &Router, path: &str) -> ApiResponse {
    router.dispatch(&ApiRequest::new(Method::GET, path))
}

fn post(router: &Router, path: &str, body: Value) -> ApiResponse {
    router.dispatch(&ApiRequest::new(Method::POST, path).with_body(body.to_string()))
}

fn put(router: &Router, path: &str, body: Value) -> ApiResponse {
    router.dispatch(&ApiRequest::new(Method::PUT, path).with_body(body.to_string()))
}

fn delete(router: &Router, path: &str) -> ApiResponse {
    router.dispatch(&ApiRequest::new(Method::DELETE, path))
}

fn body(resp: &ApiResponse) -> &Value {
    resp.body.as_ref().expect("response should carry a body")
}

fn create_section(router: &Router, ns: &str, display_name: &str) -> String {
    let resp = post(router, &format!("/{}", ns), json!({ "displayName": display_name }));
    assert_eq!(resp.status, StatusCode::CREATED);
    body(&resp)["id"].as_str().unwrap().to_string()
}

fn add_field(router: &Router, ns: &str, section_id: &str, field: Value) {
    let resp = post(router, &format!("/{}/{}/fields", ns, section_id), field);
    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.body);
}

#[test]
fn section_create_derives_slug_and_defaults() {
    let router = open_router();
    let resp = post(&router, "/sections", json!({ "displayName": "Promo Banner" }));
    assert_eq!(resp.status, StatusCode::CREATED);
    let section = body(&resp);
    assert_eq!(section["name"], "promo-banner");
    assert_eq!(section["displayName"], "Promo Banner");
    assert_eq!(section["isActive"], true);
    assert_eq!(section["type"], "custom");
    assert_eq!(section["fields"], json!([]));
}

#[test]
fn duplicate_slug_is_422_and_not_stored() {
    let router = open_router();
    create_section(&router, "sections", "Promo Banner");
    let resp = post(&router, "/sections", json!({ "displayName": "promo   banner" }));
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body(&resp)["error"], "validation_error");

    let listed = get(&router, "/sections");
    assert_eq!(body(&listed).as_array().unwrap().len(), 1);
}

#[test]
fn listing_defaults_to_all_and_active_filter_narrows() {
    let router = open_router();
    create_section(&router, "sections", "Visible");
    let resp = post(
        &router,
        "/sections",
        json!({ "displayName": "Hidden", "isActive": false }),
    );
    assert_eq!(resp.status, StatusCode::CREATED);

    let all = get(&router, "/sections");
    assert_eq!(body(&all).as_array().unwrap().len(), 2);

    let active = get(&router, "/sections?active=true");
    let active = body(&active).as_array().unwrap().clone();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["displayName"], "Visible");
}

#[test]
fn section_get_update_and_404() {
    let router = open_router();
    let id = create_section(&router, "sections", "Promo");

    let fetched = get(&router, &format!("/sections/{}", id));
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(body(&fetched)["id"], json!(id));

    let updated = put(
        &router,
        &format!("/sections/{}", id),
        json!({ "description": "front page hero", "order": 5 }),
    );
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(body(&updated)["description"], "front page hero");
    assert_eq!(body(&updated)["order"], 5);

    let missing = get(&router, "/sections/no-such-id");
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(body(&missing)["error"], "not_found");
}

#[test]
fn field_lifecycle_over_http() {
    let router = open_router();
    let id = create_section(&router, "sections", "Products");

    add_field(&router, "sections", &id, json!({ "label": "Product Name", "required": true }));
    add_field(
        &router,
        "sections",
        &id,
        json!({ "label": "Price", "type": "number" }),
    );

    let section = get(&router, &format!("/sections/{}", id));
    let fields = body(&section)["fields"].as_array().unwrap().clone();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0]["name"], "product_name");
    assert_eq!(fields[1]["type"], "number");

    // Remove by index, then the out-of-range index is rejected
    let removed = delete(&router, &format!("/sections/{}/fields/0", id));
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(body(&removed)["fields"].as_array().unwrap().len(), 1);

    let oob = delete(&router, &format!("/sections/{}/fields/5", id));
    assert_eq!(oob.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn unknown_field_type_falls_back_to_text() {
    let router = open_router();
    let id = create_section(&router, "sections", "Misc");
    add_field(&router, "sections", &id, json!({ "label": "Weird", "type": "hologram" }));

    let section = get(&router, &format!("/sections/{}", id));
    assert_eq!(body(&section)["fields"][0]["type"], "text");
}

#[test]
fn entry_round_trip_with_coercion() {
    let router = open_router();
    let id = create_section(&router, "sections", "Products");
    add_field(&router, "sections", &id, json!({ "label": "Name", "required": true }));
    add_field(&router, "sections", &id, json!({ "label": "Price", "type": "number" }));
    add_field(
        &router,
        "sections",
        &id,
        json!({ "label": "Size", "type": "select", "options": ["S", "M", "L"] }),
    );

    // Number arrives as a string, select value is off the list
    let created = post(
        &router,
        &format!("/sections/{}/data", id),
        json!({ "data": { "name": "Shirt", "price": "19.5", "size": "XXL" } }),
    );
    assert_eq!(created.status, StatusCode::CREATED);
    let entry = body(&created);
    assert_eq!(entry["data"]["price"], json!(19.5));
    assert_eq!(entry["data"]["size"], json!("")); // off-list value collapses to empty
    let entry_id = entry["id"].as_str().unwrap().to_string();

    let listed = get(&router, &format!("/sections/{}/data", id));
    let listed = body(&listed).as_array().unwrap().clone();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], json!(entry_id));

    let updated = put(
        &router,
        &format!("/sections/{}/data/{}", id, entry_id),
        json!({ "data": { "name": "Shirt", "price": "not a number", "size": "M" } }),
    );
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(body(&updated)["data"]["price"], json!(0.0)); // garbage number coerces to zero
    assert_eq!(body(&updated)["data"]["size"], json!("M"));
    assert_eq!(body(&updated)["createdAt"], entry["createdAt"]);
}

#[test]
fn missing_required_field_is_422() {
    let router = open_router();
    let id = create_section(&router, "sections", "Promo");
    add_field(&router, "sections", &id, json!({ "label": "Headline", "required": true }));

    let resp = post(
        &router,
        &format!("/sections/{}/data", id),
        json!({ "data": { "headline": "" } }),
    );
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body(&resp)["error"], "validation_error");

    let listed = get(&router, &format!("/sections/{}/data", id));
    assert_eq!(body(&listed).as_array().unwrap().len(), 0);
}

#[test]
fn false_and_zero_satisfy_required() {
    let router = open_router();
    let id = create_section(&router, "sections", "Flags");
    add_field(
        &router,
        "sections",
        &id,
        json!({ "label": "Enabled", "type": "boolean", "required": true }),
    );
    add_field(
        &router,
        "sections",
        &id,
        json!({ "label": "Count", "type": "number", "required": true }),
    );

    let resp = post(
        &router,
        &format!("/sections/{}/data", id),
        json!({ "data": { "enabled": false, "count": 0 } }),
    );
    assert_eq!(resp.status, StatusCode::CREATED);
}

#[test]
fn section_delete_cascades_entries() {
    let router = open_router();
    let id = create_section(&router, "sections", "Promo");
    add_field(&router, "sections", &id, json!({ "label": "Headline" }));
    post(
        &router,
        &format!("/sections/{}/data", id),
        json!({ "data": { "headline": "Sale" } }),
    );

    let resp = delete(&router, &format!("/sections/{}", id));
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert!(resp.body.is_none());

    assert_eq!(get(&router, &format!("/sections/{}", id)).status, StatusCode::NOT_FOUND);
    // The entries list for a vanished section is empty, not an error
    let orphans = get(&router, &format!("/sections/{}/data", id));
    assert_eq!(orphans.status, StatusCode::OK);
    assert_eq!(body(&orphans), &json!([]));
}

#[test]
fn removed_field_leaves_orphaned_keys_in_entries() {
    let router = open_router();
    let id = create_section(&router, "sections", "Promo");
    add_field(&router, "sections", &id, json!({ "label": "Headline" }));
    add_field(&router, "sections", &id, json!({ "label": "Subtitle" }));
    post(
        &router,
        &format!("/sections/{}/data", id),
        json!({ "data": { "headline": "A", "subtitle": "B" } }),
    );

    delete(&router, &format!("/sections/{}/fields/1", id));

    let listed = get(&router, &format!("/sections/{}/data", id));
    assert_eq!(body(&listed)[0]["data"]["subtitle"], json!("B"));
}

#[test]
fn namespaces_are_isolated() {
    let router = open_router();
    let general = create_section(&router, "sections", "Promo");
    create_section(&router, "kids-sections", "Promo");

    // Same slug in both namespaces is fine; stores are independent
    let kids = get(&router, "/kids-sections");
    assert_eq!(body(&kids).as_array().unwrap().len(), 1);

    // Deleting in one namespace never touches the other
    assert_eq!(delete(&router, &format!("/sections/{}", general)).status, StatusCode::NO_CONTENT);
    assert_eq!(body(&get(&router, "/sections")).as_array().unwrap().len(), 0);
    assert_eq!(body(&get(&router, "/kids-sections")).as_array().unwrap().len(), 1);

    // A general-namespace id is unknown under the kids prefix
    let cross = get(&router, &format!("/kids-sections/{}", general));
    assert_eq!(cross.status, StatusCode::NOT_FOUND);
}

#[test]
fn configured_token_guards_mutations_only() {
    let router = router_with_token(Some("hunter2"));

    let denied = post(&router, "/sections", json!({ "displayName": "Promo" }));
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    assert_eq!(body(&denied)["error"], "auth_error");

    let allowed = router.dispatch(
        &ApiRequest::new(Method::POST, "/sections")
            .with_body(json!({ "displayName": "Promo" }).to_string())
            .with_bearer_token("hunter2"),
    );
    assert_eq!(allowed.status, StatusCode::CREATED);
    let id = body(&allowed)["id"].as_str().unwrap().to_string();

    // Reads stay open
    assert_eq!(get(&router, "/sections").status, StatusCode::OK);
    assert_eq!(get(&router, &format!("/sections/{}", id)).status, StatusCode::OK);

    // Entry mutations are guarded too
    let denied = delete(&router, &format!("/sections/{}", id));
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
}

#[test]
fn health_and_unknown_routes() {
    let router = open_router();
    assert_eq!(get(&router, "/health").status, StatusCode::OK);
    assert_eq!(body(&get(&router, "/health"))["status"], "ok");

    let missing = get(&router, "/galleries");
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[test]
fn unknown_keys_pass_through_untouched() {
    let router = open_router();
    let id = create_section(&router, "sections", "Promo");
    add_field(&router, "sections", &id, json!({ "label": "Headline" }));

    let created = post(
        &router,
        &format!("/sections/{}/data", id),
        json!({ "data": { "headline": "A", "legacy_key": { "nested": true } } }),
    );
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(body(&created)["data"]["legacy_key"], json!({ "nested": true }));
}
