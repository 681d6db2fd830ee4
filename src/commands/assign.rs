use anyhow::{bail, Result};

use crate::store::RequestStore;

pub fn run(store: &mut RequestStore, ticket_id: &str, agent: &str) -> Result<()> {
    let ticket_id = ticket_id.trim().to_uppercase();
    if !store.assign_agent(&ticket_id, agent) {
        bail!("Ticket {} not found", ticket_id);
    }
    println!("Assigned {} to {}", ticket_id, agent);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_sets_agent() {
        let mut store = RequestStore::new();
        store.create_request(None, "IT Support - Hardware", "HIGH", "s", "d");
        run(&mut store, "req-001", "Tom Wilson").unwrap();
        let req = store.find_by_id("REQ-001").unwrap();
        assert_eq!(req.assigned_agent.as_deref(), Some("Tom Wilson"));
    }

    #[test]
    fn test_assign_missing_ticket_fails() {
        let mut store = RequestStore::new();
        assert!(run(&mut store, "REQ-404", "Tom").is_err());
    }
}
