use anyhow::{bail, Result};

use crate::models::{canonical_role, ROLES};
use crate::store::RequestStore;

pub fn add(
    store: &mut RequestStore,
    name: &str,
    department: &str,
    role: &str,
    email: &str,
    phone: &str,
) -> Result<()> {
    let role = match canonical_role(role) {
        Some(r) => r,
        None => bail!("Invalid role '{}'. Must be one of: {}", role, ROLES.join(", ")),
    };
    let user = store.create_user(name, department, role, email, phone);
    println!("User created with ID: {}", user.user_id);
    Ok(())
}

pub fn list(store: &RequestStore) -> Result<()> {
    if store.users().is_empty() {
        println!("No users.");
        return Ok(());
    }
    for user in store.users() {
        println!("{}", user.summary_line());
    }
    Ok(())
}

pub fn delete(store: &mut RequestStore, email: &str) -> Result<()> {
    if !store.delete_user_by_email(email) {
        bail!("User not found or has requests: {}", email);
    }
    println!("Deleted user {}", email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rejects_invalid_role() {
        let mut store = RequestStore::new();
        let err = add(&mut store, "Ann", "IT", "MANAGER", "a@x.com", "1").unwrap_err();
        assert!(err.to_string().contains("Invalid role"));
        assert!(store.users().is_empty());
    }

    #[test]
    fn test_add_canonicalises_role() {
        let mut store = RequestStore::new();
        add(&mut store, "Tom", "IT Support", "agent", "tom@x.com", "2").unwrap();
        assert_eq!(store.users()[0].role, "AGENT");
    }

    #[test]
    fn test_delete_with_history_fails() {
        let mut store = RequestStore::new();
        let user = store.find_or_create_user_by_email("a@x.com", "Ann", "IT", "USER", "1");
        store.create_request(Some(&user), "IT Support - Hardware", "LOW", "s", "d");
        assert!(delete(&mut store, "a@x.com").is_err());
        assert!(store.find_user_by_email("a@x.com").is_some());
    }

    #[test]
    fn test_delete_without_history_succeeds() {
        let mut store = RequestStore::new();
        store.create_user("Ann", "IT", "USER", "a@x.com", "1");
        delete(&mut store, "a@x.com").unwrap();
        assert!(store.users().is_empty());
    }
}
