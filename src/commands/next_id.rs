use anyhow::Result;

use crate::store::RequestStore;

/// Prints the ticket id the next submission will receive without consuming it.
pub fn run(store: &RequestStore) -> Result<()> {
    println!("{}", store.preview_next_ticket_id());
    Ok(())
}
