use std::collections::HashSet;

use anyhow::{bail, Result};
use chrono::NaiveDateTime;

use crate::models::{priority_rank, ServiceRequest, TS_FORMAT};
use crate::store::RequestStore;

pub struct Filters<'a> {
    pub status: Option<&'a str>,
    pub category: Option<&'a str>,
    pub priority: Option<&'a str>,
    pub user: Option<&'a str>,
    pub agent: Option<&'a str>,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
}

pub fn run(store: &RequestStore, filters: &Filters, sort: &str) -> Result<()> {
    let mut list = select(store, filters)?;
    sort_requests(&mut list, sort)?;

    if list.is_empty() {
        println!("No requests found.");
        return Ok(());
    }
    print_table(&list);
    Ok(())
}

fn select(store: &RequestStore, filters: &Filters) -> Result<Vec<ServiceRequest>> {
    let primary = [
        filters.status,
        filters.category,
        filters.priority,
        filters.user,
        filters.agent,
    ]
    .iter()
    .filter(|f| f.is_some())
    .count();
    if primary > 1 {
        bail!("Use at most one of --status, --category, --priority, --user, --agent");
    }

    let mut list = if let Some(status) = filters.status {
        store.filter_by_status(status)
    } else if let Some(category) = filters.category {
        store.filter_by_category(category)
    } else if let Some(priority) = filters.priority {
        store.filter_by_priority(priority)
    } else if let Some(user) = filters.user {
        store.list_by_user_email(user)
    } else if let Some(agent) = filters.agent {
        store.list_by_assigned_agent(agent)
    } else {
        store.list_all()
    };

    if filters.from.is_some() || filters.to.is_some() {
        let from = filters.from.map(|s| parse_bound(s, false)).transpose()?;
        let to = filters.to.map(|s| parse_bound(s, true)).transpose()?;
        // Bound semantics live in the store op; intersect with the primary
        // selection by ticket id.
        let in_range: HashSet<String> = store
            .filter_by_date_range(from, to)
            .into_iter()
            .map(|r| r.ticket_id)
            .collect();
        list.retain(|r| in_range.contains(&r.ticket_id));
    }
    Ok(list)
}

/// Accepts the full `yyyy-MM-dd HH:mm:ss` form or a bare date. A bare date
/// expands to start-of-day for lower bounds and end-of-day for upper bounds.
fn parse_bound(value: &str, upper: bool) -> Result<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, TS_FORMAT) {
        return Ok(ts);
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let (h, m, s) = if upper { (23, 59, 59) } else { (0, 0, 0) };
        if let Some(ts) = date.and_hms_opt(h, m, s) {
            return Ok(ts);
        }
    }
    bail!("Invalid date '{}'. Use yyyy-MM-dd or yyyy-MM-dd HH:mm:ss", value)
}

pub fn sort_requests(list: &mut [ServiceRequest], sort: &str) -> Result<()> {
    match sort {
        "created" => list.sort_by_key(|r| r.created_date),
        "priority" => list.sort_by_key(|r| priority_rank(&r.priority)),
        "status" => list.sort_by(|a, b| a.status.cmp(&b.status)),
        "none" => {}
        other => bail!("Unknown sort '{}'. Use created, priority, status or none", other),
    }
    Ok(())
}

pub fn print_table(list: &[ServiceRequest]) {
    println!(
        "{:<3} | {:<8} | {:<11} | {:<8} | {:<27} | {:<19} | {}",
        "#", "Ticket", "Status", "Priority", "Category", "Created", "Subject"
    );
    println!("{}", "-".repeat(110));
    for (i, req) in list.iter().enumerate() {
        println!(
            "{:<3} | {:<8} | {:<11} | {:<8} | {:<27} | {:<19} | {}",
            i + 1,
            req.ticket_id,
            req.status,
            req.priority,
            truncate(&req.category, 27),
            req.created_date.format(TS_FORMAT),
            truncate(&req.subject, 40)
        );
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_requests() -> RequestStore {
        let mut store = RequestStore::new();
        let user = store.find_or_create_user_by_email("a@x.com", "Ann", "IT", "USER", "1");
        store.create_request(Some(&user), "IT Support - Hardware", "LOW", "first", "d");
        store.create_request(Some(&user), "Facilities - Repairs", "CRITICAL", "second", "d");
        store.update_status("REQ-002", "IN_PROGRESS", "Tom");
        store
    }

    #[test]
    fn test_select_rejects_multiple_primary_filters() {
        let store = store_with_requests();
        let filters = Filters {
            status: Some("OPEN"),
            category: Some("Facilities - Repairs"),
            priority: None,
            user: None,
            agent: None,
            from: None,
            to: None,
        };
        assert!(select(&store, &filters).is_err());
    }

    #[test]
    fn test_select_by_status_with_date_range() {
        let store = store_with_requests();
        let filters = Filters {
            status: Some("OPEN"),
            category: None,
            priority: None,
            user: None,
            agent: None,
            from: Some("2000-01-01"),
            to: None,
        };
        let list = select(&store, &filters).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].ticket_id, "REQ-001");
    }

    #[test]
    fn test_parse_bound_expands_bare_dates() {
        let lower = parse_bound("2024-06-01", false).unwrap();
        let upper = parse_bound("2024-06-01", true).unwrap();
        assert_eq!(lower.format(TS_FORMAT).to_string(), "2024-06-01 00:00:00");
        assert_eq!(upper.format(TS_FORMAT).to_string(), "2024-06-01 23:59:59");
        let exact = parse_bound("2024-06-01 10:30:00", false).unwrap();
        assert_eq!(exact.format(TS_FORMAT).to_string(), "2024-06-01 10:30:00");
        assert!(parse_bound("June 1st", false).is_err());
    }

    #[test]
    fn test_sort_by_priority_puts_critical_first() {
        let store = store_with_requests();
        let mut list = store.list_all();
        sort_requests(&mut list, "priority").unwrap();
        assert_eq!(list[0].ticket_id, "REQ-002");
        assert!(sort_requests(&mut list, "subject").is_err());
    }

    #[test]
    fn test_truncate_keeps_short_strings() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long subject line", 10), "a very ...");
    }
}
