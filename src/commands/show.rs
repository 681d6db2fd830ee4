use anyhow::{bail, Result};

use crate::store::RequestStore;

pub fn run(store: &RequestStore, ticket_id: &str) -> Result<()> {
    let ticket_id = ticket_id.trim().to_uppercase();
    let req = match store.find_by_id(&ticket_id) {
        Some(r) => r,
        None => bail!("Ticket {} not found", ticket_id),
    };
    print!("{}", req.detail_text());
    Ok(())
}
