pub mod mock_repositories;

#[allow(unused_imports)]
pub use mock_repositories::*;

use dashlet_domain::Service;

#[allow(dead_code)]
pub fn service(id: &str, url: &str) -> Service {
    Service {
        id: id.to_string(),
        url: url.to_string(),
        name: id.to_string(),
        icon: None,
        description: None,
    }
}

#[allow(dead_code)]
pub fn ids(list: &[Service]) -> Vec<String> {
    list.iter().map(|s| s.id.clone()).collect()
}
