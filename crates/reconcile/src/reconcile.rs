use mapping_protocol::{
    normalize_path, CallSite, EndpointEntry, HttpMethod, ReconciliationRecord, Status,
};
use mapping_schema::SchemaIndex;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Status of one (path, method) pair.
///
/// `schema_methods` is `None` when the schema has no such path; `method` is
/// `None` when the front-end usage could not be observed.
pub fn classify(schema_methods: Option<&BTreeSet<String>>, method: Option<HttpMethod>) -> Status {
    match (schema_methods, method) {
        (None, _) => Status::NotFound,
        (Some(_), None) => Status::UnknownMethod,
        (Some(available), Some(method)) if available.contains(method.as_str()) => Status::Ok,
        (Some(_), Some(_)) => Status::MethodMismatch,
    }
}

/// Compare declared endpoints and detected calls with the schema.
///
/// Each endpoint yields one record per distinct method observed against its
/// path (first-seen order), or a single record with no method when no call
/// was found. Calls whose path matches no declared endpoint follow, one record
/// per distinct (path, method), with no key.
pub fn reconcile(
    entries: &[EndpointEntry],
    calls: &[CallSite],
    schema: &SchemaIndex,
) -> Vec<ReconciliationRecord> {
    let observed = observed_methods(calls);
    let mut records = Vec::with_capacity(entries.len());

    for entry in entries {
        let available = schema.methods_for(&entry.path);
        let methods = observed
            .get(normalize_path(&entry.path))
            .map(Vec::as_slice)
            .unwrap_or_default();

        if methods.is_empty() {
            records.push(record(Some(&entry.key_path), &entry.path, None, available));
            continue;
        }
        for &method in methods {
            records.push(record(
                Some(&entry.key_path),
                &entry.path,
                Some(method),
                available,
            ));
        }
    }

    let declared: HashSet<&str> = entries
        .iter()
        .map(|entry| normalize_path(&entry.path))
        .collect();
    let mut undeclared_seen: HashSet<(&str, HttpMethod)> = HashSet::new();
    let mut undeclared = 0usize;
    for call in calls {
        let normalized = normalize_path(&call.path);
        if declared.contains(normalized) || !undeclared_seen.insert((normalized, call.method)) {
            continue;
        }
        undeclared += 1;
        records.push(record(
            call.key_path.as_deref(),
            &call.path,
            Some(call.method),
            schema.methods_for(&call.path),
        ));
    }

    log::info!(
        "Reconciled {} endpoints and {} calls into {} records ({} undeclared)",
        entries.len(),
        calls.len(),
        records.len(),
        undeclared
    );
    records
}

/// Distinct methods per normalized path, in first-seen order
fn observed_methods(calls: &[CallSite]) -> HashMap<&str, Vec<HttpMethod>> {
    let mut observed: HashMap<&str, Vec<HttpMethod>> = HashMap::new();
    for call in calls {
        let methods = observed.entry(normalize_path(&call.path)).or_default();
        if !methods.contains(&call.method) {
            methods.push(call.method);
        }
    }
    observed
}

fn record(
    key_path: Option<&str>,
    path: &str,
    method: Option<HttpMethod>,
    available: Option<&BTreeSet<String>>,
) -> ReconciliationRecord {
    ReconciliationRecord {
        key_path: key_path.map(str::to_string),
        path: path.to_string(),
        method,
        status: classify(available, method),
        backend_available_methods: available
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default(),
    }
}
