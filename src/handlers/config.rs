use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/config - public client bootstrap values. These are the anon-key
/// pair the browser needs to talk to the store directly; nothing secret
/// lives here and the response is intentionally not enveloped.
pub async fn get(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "supabaseUrl": state.config.supabase_url,
        "supabaseAnonKey": state.config.supabase_anon_key,
    }))
}
