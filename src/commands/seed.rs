use anyhow::{bail, Result};

use crate::store::RequestStore;

/// Populates an empty catalog with a small sample data set.
pub fn run(store: &mut RequestStore) -> Result<()> {
    if !store.users().is_empty() || !store.requests().is_empty() {
        bail!("Catalog already has data; refusing to seed");
    }

    let admin = store.create_user("Alice Admin", "IT", "ADMIN", "admin@example.com", "100-000");
    let agent = store.create_user("Tom Wilson", "IT Support", "AGENT", "tom.wilson@example.com", "100-101");
    let user1 = store.create_user("Sarah Connor", "Marketing", "USER", "sarah.connor@example.com", "100-201");
    let user2 = store.create_user("John Smith", "Finance", "USER", "john.smith@example.com", "100-202");

    let r1 = store.create_request(
        Some(&user1),
        "IT Support - Software",
        "HIGH",
        "Laptop crashed",
        "Blue screen on startup, needs urgent fix",
    );
    store.update_status(&r1.ticket_id, "IN_PROGRESS", &agent.name);
    store.assign_agent(&r1.ticket_id, &agent.name);
    store.add_comment(&r1.ticket_id, &format!("{}: Investigating BSOD.", agent.name));

    let r2 = store.create_request(
        Some(&user2),
        "Facilities - Maintenance",
        "MEDIUM",
        "Air conditioner leaking",
        "Water dripping from AC unit in room 204",
    );
    store.update_status(&r2.ticket_id, "OPEN", &admin.name);

    let r3 = store.create_request(
        Some(&user1),
        "HR Services - Payroll",
        "LOW",
        "Payslip correction",
        "Incorrect tax calculation in June payslip",
    );
    store.update_status(&r3.ticket_id, "RESOLVED", &admin.name);
    store.set_resolution_notes(&r3.ticket_id, "Corrected payroll entry and reissued payslip");

    println!(
        "Seeded {} users and {} requests.",
        store.users().len(),
        store.requests().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_populates_empty_catalog() {
        let mut store = RequestStore::new();
        run(&mut store).unwrap();
        assert_eq!(store.users().len(), 4);
        assert_eq!(store.requests().len(), 3);
        let resolved = store.find_by_id("REQ-003").unwrap();
        assert_eq!(resolved.status, "RESOLVED");
        assert!(resolved.resolved_date.is_some());
    }

    #[test]
    fn test_seed_refuses_populated_catalog() {
        let mut store = RequestStore::new();
        store.create_user("Ann", "IT", "USER", "a@x.com", "1");
        assert!(run(&mut store).is_err());
        assert_eq!(store.users().len(), 1);
    }
}
