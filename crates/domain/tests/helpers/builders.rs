#![allow(dead_code)]
use dashlet_domain::{ExternalService, Service};

pub fn service(id: &str, url: &str) -> Service {
    Service {
        id: id.to_string(),
        url: url.to_string(),
        name: id.to_string(),
        icon: None,
        description: None,
    }
}

pub fn ext(id: Option<&str>, url: &str) -> ExternalService {
    let entry = ExternalService::new(url);
    match id {
        Some(id) => entry.with_id(id),
        None => entry,
    }
}

pub fn ids(list: &[Service]) -> Vec<&str> {
    list.iter().map(|s| s.id.as_str()).collect()
}
