use std::collections::BTreeMap;

use anyhow::Result;

use crate::models::{priority_rank, ServiceRequest, STATUSES};
use crate::store::RequestStore;

pub fn summary(store: &RequestStore) -> Result<()> {
    let all = store.list_all();
    let counts = status_counts(&all);
    let line = counts
        .iter()
        .map(|(status, n)| format!("{}: {}", label(status), n))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Total: {}, {}", all.len(), line);
    Ok(())
}

pub fn by_category(store: &RequestStore) -> Result<()> {
    let all = store.list_all();
    for (category, n) in category_counts(&all) {
        println!("{:<30} : {}", category, n);
    }
    Ok(())
}

pub fn by_priority(store: &RequestStore) -> Result<()> {
    let all = store.list_all();
    for (priority, n) in priority_counts(&all) {
        println!("{:<8} : {}", priority, n);
    }
    Ok(())
}

pub fn resolution_time(store: &RequestStore) -> Result<()> {
    match average_resolution_minutes(&store.list_all()) {
        Some(avg) => println!("Average resolution time: {:.1} minutes", avg),
        None => println!("No resolved requests."),
    }
    Ok(())
}

fn label(status: &str) -> String {
    // "IN_PROGRESS" reads as "In Progress" in the summary line.
    status
        .split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn status_counts(requests: &[ServiceRequest]) -> Vec<(&'static str, usize)> {
    STATUSES
        .iter()
        .map(|status| {
            let n = requests.iter().filter(|r| r.status == *status).count();
            (*status, n)
        })
        .collect()
}

pub fn category_counts(requests: &[ServiceRequest]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for req in requests {
        *counts.entry(req.category.clone()).or_insert(0) += 1;
    }
    counts
}

pub fn priority_counts(requests: &[ServiceRequest]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for req in requests {
        *counts.entry(req.priority.clone()).or_insert(0) += 1;
    }
    let mut out: Vec<(String, usize)> = counts.into_iter().collect();
    out.sort_by_key(|(priority, _)| priority_rank(priority));
    out
}

pub fn average_resolution_minutes(requests: &[ServiceRequest]) -> Option<f64> {
    let resolved: Vec<i64> = requests
        .iter()
        .filter_map(|r| r.resolved_date.map(|d| (d - r.created_date).num_minutes()))
        .collect();
    if resolved.is_empty() {
        return None;
    }
    Some(resolved.iter().sum::<i64>() as f64 / resolved.len() as f64)
}
