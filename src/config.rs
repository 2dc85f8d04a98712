pub fn get_http_addr() -> String {
    std::env::var("HTTP_ADDR").unwrap_or_else(|_| {
        let default = "0.0.0.0:8080".to_string();
        tracing::trace!("HTTP_ADDR not set, using default: {default}");
        default
    })
}

/// Path to a JSON file of vehicles and routes used to seed the store.
pub fn get_fleet_path() -> Option<String> {
    match std::env::var("FLEET_PATH") {
        Ok(path) if !path.trim().is_empty() => Some(path.trim().to_string()),
        _ => {
            tracing::trace!("FLEET_PATH not set, starting with an empty fleet");
            None
        }
    }
}
