use anyhow::{bail, Result};

use crate::models::{canonical_category, canonical_priority, CATEGORIES, PRIORITIES};
use crate::store::RequestStore;

#[allow(clippy::too_many_arguments)]
pub fn run(
    store: &mut RequestStore,
    email: &str,
    name: &str,
    department: &str,
    phone: &str,
    category: &str,
    priority: &str,
    subject: &str,
    description: &str,
) -> Result<()> {
    let category = match canonical_category(category) {
        Some(c) => c,
        None => bail!(
            "Invalid category '{}'. Must be one of: {}",
            category,
            CATEGORIES.join(", ")
        ),
    };
    let priority = match canonical_priority(priority) {
        Some(p) => p,
        None => bail!(
            "Invalid priority '{}'. Must be one of: {}",
            priority,
            PRIORITIES.join(", ")
        ),
    };

    let user = store.find_or_create_user_by_email(email, name, department, "USER", phone);
    let req = store.create_request(Some(&user), category, priority, subject, description);
    println!("Request submitted. Ticket ID: {}", req.ticket_id);
    println!();
    print!("{}", req.detail_text());
    Ok(())
}
