#![allow(clippy::result_large_err)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Extension, Query, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::{Json, extract::Path};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use studio::model::Record;

#[path = "studio_store/types.rs"]
mod types;
use self::types::*;
#[path = "studio_store/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "studio_store/identity_store.rs"]
mod identity_store;
use self::identity_store::*;
#[path = "studio_store/tables.rs"]
mod tables;
use self::tables::*;
#[path = "studio_store/access.rs"]
mod access;
use self::access::*;
#[path = "studio_store/handlers_collections.rs"]
mod handlers_collections;
use self::handlers_collections::*;
#[path = "studio_store/handlers_identity.rs"]
mod handlers_identity;
use self::handlers_identity::*;
#[path = "studio_store/routes.rs"]
mod routes;
use self::routes::*;
#[path = "studio_store/runtime.rs"]
mod runtime;

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
