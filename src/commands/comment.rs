use anyhow::{bail, Result};

use crate::store::RequestStore;

pub fn run(store: &mut RequestStore, ticket_id: &str, text: &str, author: &str) -> Result<()> {
    let ticket_id = ticket_id.trim().to_uppercase();
    if text.trim().is_empty() {
        println!("No comment entered. Cancelled.");
        return Ok(());
    }
    if !store.add_comment(&ticket_id, &format!("{}: {}", author, text)) {
        bail!("Ticket {} not found", ticket_id);
    }
    println!("Comment added to {}", ticket_id);
    Ok(())
}
