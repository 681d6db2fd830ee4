use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Display format for every timestamp the tracker renders or persists.
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const STATUSES: [&str; 4] = ["OPEN", "IN_PROGRESS", "RESOLVED", "CLOSED"];
pub const PRIORITIES: [&str; 4] = ["CRITICAL", "HIGH", "MEDIUM", "LOW"];
pub const ROLES: [&str; 3] = ["ADMIN", "AGENT", "USER"];

pub const CATEGORIES: [&str; 12] = [
    "IT Support - Hardware",
    "IT Support - Software",
    "IT Support - Network",
    "Facilities - Maintenance",
    "Facilities - Repairs",
    "Facilities - Access",
    "HR Services - Benefits",
    "HR Services - Payroll",
    "HR Services - Policies",
    "General Services - Supplies",
    "General Services - Equipment",
    "General Services - Other",
];

fn canonical(options: &'static [&'static str], value: &str) -> Option<&'static str> {
    options.iter().find(|o| o.eq_ignore_ascii_case(value)).copied()
}

pub fn canonical_status(value: &str) -> Option<&'static str> {
    canonical(&STATUSES, value)
}

pub fn canonical_priority(value: &str) -> Option<&'static str> {
    canonical(&PRIORITIES, value)
}

pub fn canonical_role(value: &str) -> Option<&'static str> {
    canonical(&ROLES, value)
}

pub fn canonical_category(value: &str) -> Option<&'static str> {
    canonical(&CATEGORIES, value)
}

/// Sort key for priorities, most urgent first. Unknown values sort last.
pub fn priority_rank(priority: &str) -> usize {
    match priority.to_ascii_uppercase().as_str() {
        "CRITICAL" => 0,
        "HIGH" => 1,
        "MEDIUM" => 2,
        _ => 3,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub department: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    /// Ticket ids this user has opened, in submission order.
    pub request_history: Vec<String>,
}

impl User {
    pub fn summary_line(&self) -> String {
        format!(
            "{} | {} | {} | {} | {} | {} | Tickets: {}",
            self.user_id,
            self.name,
            self.department,
            self.role,
            self.email,
            self.phone,
            self.request_history.len()
        )
    }
}

/// One helpdesk ticket. The `user_*` fields are a snapshot of the submitter
/// taken at creation time; later user edits do not touch past tickets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub ticket_id: String,
    pub user_name: String,
    pub user_dept: String,
    pub user_email: String,
    pub user_phone: String,
    pub category: String,
    pub priority: String,
    pub subject: String,
    pub description: String,
    pub status: String,
    pub assigned_agent: Option<String>,
    pub created_date: NaiveDateTime,
    pub last_updated: NaiveDateTime,
    /// Stamped the first time the ticket reaches RESOLVED or CLOSED, never
    /// cleared afterwards.
    pub resolved_date: Option<NaiveDateTime>,
    pub resolution_notes: Option<String>,
    /// Append-only log of timestamped comment strings.
    pub comments: Vec<String>,
}

impl ServiceRequest {
    /// Full display rendering, shared by `show` and the text exporter.
    pub fn detail_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Request Details ===\n");
        out.push_str(&format!("Ticket ID: {}\n", self.ticket_id));
        out.push_str(&format!("Status: {}\n", self.status));
        out.push_str(&format!("Created: {}\n", self.created_date.format(TS_FORMAT)));
        out.push_str(&format!("Priority: {}\n", self.priority));
        out.push('\n');
        out.push_str(&format!("User: {} ({})\n", self.user_name, self.user_dept));
        out.push_str(&format!("Email: {}\n", self.user_email));
        out.push('\n');
        out.push_str(&format!("Subject: {}\n", self.subject));
        out.push_str(&format!("Category: {}\n", self.category));
        out.push('\n');
        out.push_str(&format!("Description:\n{}\n", self.description));
        out.push('\n');
        out.push_str(&format!(
            "Assignment: {}\n",
            self.assigned_agent.as_deref().unwrap_or("")
        ));
        out.push_str(&format!("Last Update: {}\n", self.last_updated.format(TS_FORMAT)));
        if let Some(resolved) = self.resolved_date {
            out.push_str(&format!("Resolved: {}\n", resolved.format(TS_FORMAT)));
        }
        if let Some(notes) = &self.resolution_notes {
            if !notes.trim().is_empty() {
                out.push_str(&format!("Resolution Notes: {}\n", notes));
            }
        }
        out.push('\n');
        out.push_str("Comments:\n");
        if self.comments.is_empty() {
            out.push_str("(None)\n");
        } else {
            for comment in &self.comments {
                out.push_str(&format!("- {}\n", comment));
            }
        }
        out
    }
}
