use anyhow::{bail, Result};
use std::io::{self, Write};

use crate::store::RequestStore;

pub fn run(store: &mut RequestStore, ticket_id: &str, force: bool) -> Result<()> {
    let ticket_id = ticket_id.trim().to_uppercase();
    let req = match store.find_by_id(&ticket_id) {
        Some(r) => r,
        None => bail!("Ticket {} not found", ticket_id),
    };

    if !force {
        print!("Delete {} \"{}\"? [y/N] ", ticket_id, req.subject);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if store.delete_request(&ticket_id) {
        println!("Deleted {}", ticket_id);
    } else {
        bail!("Failed to delete {}", ticket_id);
    }
    Ok(())
}

/// Internal function for testing without stdin interaction
#[cfg(test)]
pub fn run_force(store: &mut RequestStore, ticket_id: &str) -> Result<()> {
    run(store, ticket_id, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_ticket() -> RequestStore {
        let mut store = RequestStore::new();
        let user = store.find_or_create_user_by_email("a@x.com", "Ann", "IT", "USER", "1");
        store.create_request(Some(&user), "IT Support - Hardware", "LOW", "To delete", "d");
        store
    }

    #[test]
    fn test_delete_existing_ticket_force() {
        let mut store = store_with_ticket();
        run_force(&mut store, "REQ-001").unwrap();
        assert!(store.find_by_id("REQ-001").is_none());
    }

    #[test]
    fn test_delete_nonexistent_ticket() {
        let mut store = RequestStore::new();
        let result = run_force(&mut store, "REQ-999");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_delete_purges_user_history() {
        let mut store = store_with_ticket();
        run_force(&mut store, "req-001").unwrap();
        let user = store.find_user_by_email("a@x.com").unwrap();
        assert!(user.request_history.is_empty());
    }

    #[test]
    fn test_deleted_id_is_not_reused() {
        let mut store = store_with_ticket();
        run_force(&mut store, "REQ-001").unwrap();
        let next = store.create_request(None, "IT Support - Hardware", "LOW", "s", "d");
        assert_eq!(next.ticket_id, "REQ-002");
    }
}
