use anyhow::Result;

use crate::commands::list::print_table;
use crate::store::RequestStore;

/// Keyword search over subject and description. A query shaped like a ticket
/// id is treated as a direct lookup instead. `--user` narrows results to one
/// submitter's requests.
pub fn run(store: &RequestStore, query: &str, user: Option<&str>) -> Result<()> {
    let upper = query.trim().to_uppercase();
    if is_ticket_id(&upper) {
        match store.find_by_id(&upper) {
            Some(req)
                if user.map_or(true, |email| req.user_email.eq_ignore_ascii_case(email)) =>
            {
                print!("{}", req.detail_text());
            }
            _ => println!("No matching requests."),
        }
        return Ok(());
    }

    let mut list = store.search_by_keyword(query);
    if let Some(email) = user {
        list.retain(|r| r.user_email.eq_ignore_ascii_case(email));
    }
    if list.is_empty() {
        println!("No matching requests.");
        return Ok(());
    }
    print_table(&list);
    Ok(())
}

// Only a full REQ-<digits> shape is a direct lookup; keywords that merely
// start with "req-" stay on the search path.
fn is_ticket_id(query: &str) -> bool {
    query
        .strip_prefix("REQ-")
        .map_or(false, |rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}
