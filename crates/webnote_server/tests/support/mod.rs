//! Shared integration-test server bootstrap helpers.

use axum::http::{header, HeaderValue};
use axum_test::{TestResponse, TestServer};
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;
use webnote_server::{create_app, AppState, Config, Stores};

const TEST_SECRET: &str = "integration-secret";

pub(crate) fn test_config_for_db_path(db_path: &Path, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("DB_PATH".to_string(), db_path.to_str().expect("db path").to_string()),
        ("PORT".to_string(), "0".to_string()),
        ("SECRET".to_string(), TEST_SECRET.to_string()),
        ("SALT".to_string(), "integration-salt".to_string()),
    ]);
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned())
}

pub(crate) fn test_server_for_config(config: Config) -> TestServer {
    let stores = Stores::redb(&config.db_path).expect("open store");
    let state = AppState::new(config, stores).expect("state");
    TestServer::new(create_app(state)).expect("server")
}

pub(crate) fn setup_test_server_with(extra: &[(&str, &str)]) -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("notes.redb");
    let config = test_config_for_db_path(&db_path, extra);
    (test_server_for_config(config), temp_dir)
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    setup_test_server_with(&[])
}

/// `Set-Cookie` header of a response as a string.
pub(crate) fn set_cookie(response: &TestResponse) -> String {
    response
        .header(header::SET_COOKIE)
        .to_str()
        .expect("ascii cookie")
        .to_string()
}

/// `Cookie` request header value echoing the `auth` cookie from `set_cookie`.
pub(crate) fn cookie_header_from(set_cookie: &str) -> HeaderValue {
    let pair = set_cookie.split(';').next().expect("cookie pair");
    HeaderValue::from_str(pair).expect("cookie header")
}
