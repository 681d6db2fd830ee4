use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::codec::format_ts;
use crate::models::{ServiceRequest, TS_FORMAT};
use crate::store::RequestStore;

pub const EXPORT_DIR: &str = "exports";

#[derive(Serialize, Deserialize)]
pub struct ExportedRequest {
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
    pub created_date: String,
    pub last_updated: String,
    pub resolved_date: Option<String>,
    pub resolution_notes: Option<String>,
    pub comments: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ExportData {
    pub version: i32,
    pub exported_at: String,
    pub requests: Vec<ExportedRequest>,
}

fn export_request(req: &ServiceRequest) -> ExportedRequest {
    ExportedRequest {
        ticket_id: req.ticket_id.clone(),
        user_name: req.user_name.clone(),
        user_dept: req.user_dept.clone(),
        user_email: req.user_email.clone(),
        user_phone: req.user_phone.clone(),
        category: req.category.clone(),
        priority: req.priority.clone(),
        subject: req.subject.clone(),
        description: req.description.clone(),
        status: req.status.clone(),
        assigned_agent: req.assigned_agent.clone(),
        created_date: format_ts(Some(req.created_date)),
        last_updated: format_ts(Some(req.last_updated)),
        resolved_date: req.resolved_date.map(|d| format_ts(Some(d))),
        resolution_notes: req.resolution_notes.clone(),
        comments: req.comments.clone(),
    }
}

pub fn run_csv(store: &RequestStore, output: Option<&Path>) -> Result<()> {
    let path = resolve_output(output, "requests.csv")?;
    let csv = render_csv(&store.list_all());
    fs::write(&path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Exported {} requests to {}", store.requests().len(), path.display());
    Ok(())
}

pub fn run_ticket(store: &RequestStore, ticket_id: &str, output: Option<&Path>) -> Result<()> {
    let ticket_id = ticket_id.trim().to_uppercase();
    let req = match store.find_by_id(&ticket_id) {
        Some(r) => r,
        None => bail!("Ticket {} not found", ticket_id),
    };
    let path = resolve_output(output, &format!("{}.txt", ticket_id))?;
    fs::write(&path, req.detail_text())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Exported {} to {}", ticket_id, path.display());
    Ok(())
}

pub fn run_json(store: &RequestStore, output: Option<&Path>) -> Result<()> {
    let data = ExportData {
        version: 1,
        exported_at: format_ts(Some(chrono::Utc::now().naive_utc())),
        requests: store.requests().iter().map(export_request).collect(),
    };
    let json = serde_json::to_string_pretty(&data)?;

    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Exported {} requests to {}", data.requests.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

fn resolve_output(output: Option<&Path>, default_name: &str) -> Result<PathBuf> {
    let path = match output {
        Some(p) => p.to_path_buf(),
        None => Path::new(EXPORT_DIR).join(default_name),
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Ok(path)
}

pub fn render_csv(requests: &[ServiceRequest]) -> String {
    let mut out = String::from(
        "TicketId,Status,Priority,Category,Created,User,Department,Email,Subject,AssignedAgent\n",
    );
    for r in requests {
        let row = [
            csv_escape(&r.ticket_id),
            csv_escape(&r.status),
            csv_escape(&r.priority),
            csv_escape(&r.category),
            csv_escape(&r.created_date.format(TS_FORMAT).to_string()),
            csv_escape(&r.user_name),
            csv_escape(&r.user_dept),
            csv_escape(&r.user_email),
            csv_escape(&r.subject),
            csv_escape(r.assigned_agent.as_deref().unwrap_or("")),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Quotes a field containing a comma, quote or newline, doubling any
/// embedded quotes.
fn csv_escape(field: &str) -> String {
    let doubled = field.replace('"', "\"\"");
    if doubled.contains(',') || doubled.contains('\n') || doubled.contains('"') {
        format!("\"{}\"", doubled)
    } else {
        doubled
    }
}
