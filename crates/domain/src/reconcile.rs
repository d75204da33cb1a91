//! Service list reconciliation between the local list and the external one.
//!
//! All three policies are pure functions over slices so they can be checked
//! without a store. Identity is the service `id`; an external entry without
//! an id falls back to its `url` for matching only.

use std::collections::{HashMap, HashSet};

use crate::service::{ExternalService, Service, ServiceList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePolicy {
    /// Local list is empty: take the external list as-is.
    FirstRun,
    /// Keep local order, append external entries not present locally.
    Merge,
    /// External list defines membership; survivors keep their local slot.
    Strict,
}

impl ReconcilePolicy {
    /// Prefix of the deterministic `<source>-<index>` fallback ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ReconcilePolicy::FirstRun => "config",
            ReconcilePolicy::Merge => "config-merge",
            ReconcilePolicy::Strict => "config-watch",
        }
    }
}

pub fn reconcile(
    local: &[Service],
    external: &[ExternalService],
    policy: ReconcilePolicy,
) -> ServiceList {
    match policy {
        ReconcilePolicy::FirstRun => first_run(external, policy.id_prefix()),
        ReconcilePolicy::Merge => merge(local, external, policy.id_prefix()),
        ReconcilePolicy::Strict => strict(local, external, policy.id_prefix()),
    }
}

/// Picks `<prefix>-<index>`, suffixing `-2`, `-3`, ... on collision.
fn fallback_id(prefix: &str, index: usize, taken: &HashSet<String>) -> String {
    let base = format!("{}-{}", prefix, index);
    if !taken.contains(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

fn explicit_ids(external: &[ExternalService]) -> HashSet<String> {
    external.iter().filter_map(|e| e.id.clone()).collect()
}

fn first_run(external: &[ExternalService], prefix: &str) -> ServiceList {
    let reserved = explicit_ids(external);
    let mut taken: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(external.len());

    for (index, entry) in external.iter().enumerate() {
        let id = match &entry.id {
            Some(id) if taken.contains(id) => continue,
            Some(id) => id.clone(),
            None => {
                let mut blocked = taken.clone();
                blocked.extend(reserved.iter().cloned());
                fallback_id(prefix, index, &blocked)
            }
        };
        taken.insert(id.clone());
        result.push(entry.to_service(id));
    }
    result
}

fn merge(local: &[Service], external: &[ExternalService], prefix: &str) -> ServiceList {
    let mut ids: HashSet<String> = local.iter().map(|s| s.id.clone()).collect();
    let mut urls: HashSet<String> = local.iter().map(|s| s.url.clone()).collect();
    let reserved = explicit_ids(external);
    let mut result = local.to_vec();

    for (index, entry) in external.iter().enumerate() {
        let known_id = entry.id.as_ref().is_some_and(|id| ids.contains(id));
        if known_id || urls.contains(&entry.url) {
            continue;
        }
        let id = match &entry.id {
            Some(id) => id.clone(),
            None => {
                let mut blocked = ids.clone();
                blocked.extend(reserved.iter().cloned());
                fallback_id(prefix, index, &blocked)
            }
        };
        ids.insert(id.clone());
        urls.insert(entry.url.clone());
        result.push(entry.to_service(id));
    }
    result
}

fn strict(local: &[Service], external: &[ExternalService], prefix: &str) -> ServiceList {
    // First occurrence of an explicit id wins; later duplicates are ignored.
    let mut by_id: HashMap<&str, usize> = HashMap::new();
    let mut duplicates: HashSet<usize> = HashSet::new();
    for (index, entry) in external.iter().enumerate() {
        if let Some(id) = entry.id.as_deref() {
            if by_id.contains_key(id) {
                duplicates.insert(index);
            } else {
                by_id.insert(id, index);
            }
        }
    }

    // local index -> external index
    let mut claims: HashMap<usize, usize> = HashMap::new();
    let mut covered: HashSet<usize> = duplicates;

    for (local_index, service) in local.iter().enumerate() {
        if let Some(&ext_index) = by_id.get(service.id.as_str()) {
            if covered.insert(ext_index) {
                claims.insert(local_index, ext_index);
            }
        }
    }

    // Entries without an id match by url against locals that no explicit
    // external id already names.
    for (ext_index, entry) in external.iter().enumerate() {
        if entry.id.is_some() || covered.contains(&ext_index) {
            continue;
        }
        let candidate = local.iter().enumerate().find(|(local_index, service)| {
            !claims.contains_key(local_index)
                && !by_id.contains_key(service.id.as_str())
                && service.url == entry.url
        });
        if let Some((local_index, _)) = candidate {
            claims.insert(local_index, ext_index);
            covered.insert(ext_index);
        }
    }

    let mut taken: HashSet<String> = by_id.keys().map(|id| id.to_string()).collect();
    let mut result = Vec::with_capacity(external.len());

    for (local_index, service) in local.iter().enumerate() {
        if let Some(&ext_index) = claims.get(&local_index) {
            taken.insert(service.id.clone());
            result.push(external[ext_index].to_service(service.id.clone()));
        }
    }

    for (ext_index, entry) in external.iter().enumerate() {
        if covered.contains(&ext_index) {
            continue;
        }
        let id = match &entry.id {
            Some(id) => id.clone(),
            None => fallback_id(prefix, ext_index, &taken),
        };
        taken.insert(id.clone());
        result.push(entry.to_service(id));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(id: &str, url: &str) -> Service {
        Service {
            id: id.to_string(),
            url: url.to_string(),
            name: id.to_string(),
            icon: None,
            description: None,
        }
    }

    fn ids(list: &[Service]) -> Vec<&str> {
        list.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_fallback_id_skips_taken() {
        let taken: HashSet<String> = ["config-0".to_string(), "config-0-2".to_string()]
            .into_iter()
            .collect();
        assert_eq!(fallback_id("config", 0, &taken), "config-0-3");
        assert_eq!(fallback_id("config", 1, &taken), "config-1");
    }

    #[test]
    fn test_first_run_drops_duplicate_explicit_ids() {
        let external = vec![
            ExternalService::new("a").with_id("x"),
            ExternalService::new("b").with_id("x"),
        ];
        let result = reconcile(&[], &external, ReconcilePolicy::FirstRun);
        assert_eq!(ids(&result), vec!["x"]);
        assert_eq!(result[0].url, "a");
    }

    #[test]
    fn test_strict_url_fallback_keeps_local_id() {
        let current = vec![local("u1", "https://a"), local("u2", "https://b")];
        let external = vec![ExternalService::new("https://b").with_name("B")];
        let result = reconcile(&current, &external, ReconcilePolicy::Strict);
        assert_eq!(ids(&result), vec!["u2"]);
        assert_eq!(result[0].name, "B");
    }

    #[test]
    fn test_strict_explicit_id_beats_url_fallback() {
        let current = vec![local("a", "https://x")];
        let external = vec![
            ExternalService::new("https://x"),
            ExternalService::new("https://y").with_id("a"),
        ];
        let result = reconcile(&current, &external, ReconcilePolicy::Strict);
        assert_eq!(ids(&result), vec!["a", "config-watch-0"]);
        assert_eq!(result[0].url, "https://y");
        assert_eq!(result[1].url, "https://x");
    }
}
