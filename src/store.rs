//! In-memory catalog of users and service requests.
//!
//! The store owns every lifecycle rule: ticket id allocation and recovery,
//! status changes with their audit comments, first-resolution stamping, and
//! the referential link between a user's history and the tickets carrying
//! that user's email snapshot. Nothing here touches the filesystem; callers
//! flush through the persistence gateway when the dirty flag says so.

use chrono::{NaiveDateTime, Timelike, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::models::{ServiceRequest, User, TS_FORMAT};

/// Injectable time source so tests can pin exact timestamps.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        // The catalog format is second-granular; keep in-memory stamps the
        // same so a save/load round trip compares equal.
        let now = Utc::now().naive_utc();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

pub struct RequestStore {
    users: Vec<User>,
    requests: Vec<ServiceRequest>,
    next_seq: u32,
    dirty: bool,
    clock: Box<dyn Clock>,
}

impl Default for RequestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStore {
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        RequestStore {
            users: Vec::new(),
            requests: Vec::new(),
            next_seq: 1,
            dirty: false,
            clock,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn requests(&self) -> &[ServiceRequest] {
        &self.requests
    }

    /// The id the next submission will receive. Read-only: does not advance
    /// the sequence.
    pub fn preview_next_ticket_id(&self) -> String {
        format!("REQ-{:03}", self.next_seq)
    }

    // Recomputed from the catalog so a load after external edits never hands
    // out a colliding id. The counter never moves backwards.
    fn calibrate_next_seq(&mut self) {
        let max = self
            .requests
            .iter()
            .filter_map(|r| r.ticket_id.strip_prefix("REQ-"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        self.next_seq = self.next_seq.max(max + 1);
    }

    // ===== Users =====

    /// No uniqueness check on email: duplicates are allowed here and
    /// lookup-by-email returns the first match. Callers wanting find-or-create
    /// use [`RequestStore::find_or_create_user_by_email`].
    pub fn create_user(
        &mut self,
        name: &str,
        department: &str,
        role: &str,
        email: &str,
        phone: &str,
    ) -> User {
        let user = User {
            user_id: short_id(),
            name: name.to_string(),
            department: department.to_string(),
            role: role.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            request_history: Vec::new(),
        };
        debug!(user_id = %user.user_id, email = %user.email, "user created");
        self.users.push(user.clone());
        self.dirty = true;
        user
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn find_or_create_user_by_email(
        &mut self,
        email: &str,
        name: &str,
        department: &str,
        role: &str,
        phone: &str,
    ) -> User {
        if let Some(user) = self.find_user_by_email(email) {
            return user.clone();
        }
        self.create_user(name, department, role, email, phone)
    }

    /// Refuses to remove a user that still has ticket history.
    pub fn delete_user_by_email(&mut self, email: &str) -> bool {
        let pos = match self.users.iter().position(|u| u.email.eq_ignore_ascii_case(email)) {
            Some(p) => p,
            None => return false,
        };
        if !self.users[pos].request_history.is_empty() {
            return false;
        }
        self.users.remove(pos);
        self.dirty = true;
        true
    }

    // ===== Requests =====

    /// Assigns the next ticket id, snapshots the submitter's contact fields,
    /// and appends the id to the submitter's history if one was supplied.
    pub fn create_request(
        &mut self,
        user: Option<&User>,
        category: &str,
        priority: &str,
        subject: &str,
        description: &str,
    ) -> ServiceRequest {
        let ticket_id = format!("REQ-{:03}", self.next_seq);
        self.next_seq += 1;
        let now = self.clock.now();
        let req = ServiceRequest {
            ticket_id: ticket_id.clone(),
            user_name: user.map(|u| u.name.clone()).unwrap_or_default(),
            user_dept: user.map(|u| u.department.clone()).unwrap_or_default(),
            user_email: user.map(|u| u.email.clone()).unwrap_or_default(),
            user_phone: user.map(|u| u.phone.clone()).unwrap_or_default(),
            category: category.to_string(),
            priority: priority.to_string(),
            subject: subject.to_string(),
            description: description.to_string(),
            status: "OPEN".to_string(),
            assigned_agent: None,
            created_date: now,
            last_updated: now,
            resolved_date: None,
            resolution_notes: None,
            comments: Vec::new(),
        };
        debug!(ticket_id = %ticket_id, "request created");
        self.requests.push(req.clone());
        if let Some(u) = user {
            if let Some(stored) = self.users.iter_mut().find(|s| s.user_id == u.user_id) {
                stored.request_history.push(ticket_id);
            }
        }
        self.dirty = true;
        req
    }

    /// Sets the new status, refreshes `last_updated`, and appends an audit
    /// comment. Any status may be set from any other; the OPEN ->
    /// IN_PROGRESS -> RESOLVED -> CLOSED flow is a convention, not a rule.
    /// `resolved_date` is stamped only on first entry into RESOLVED/CLOSED.
    pub fn update_status(&mut self, ticket_id: &str, status: &str, actor: &str) -> bool {
        let now = self.clock.now();
        let req = match self.request_mut(ticket_id) {
            Some(r) => r,
            None => return false,
        };
        req.status = status.to_string();
        req.last_updated = now;
        let audit = if actor.is_empty() {
            format!("[STATUS] -> {}", status)
        } else {
            format!("[STATUS] -> {} by {}", status, actor)
        };
        push_comment(req, &audit, now);
        if (status == "RESOLVED" || status == "CLOSED") && req.resolved_date.is_none() {
            req.resolved_date = Some(now);
        }
        self.dirty = true;
        true
    }

    pub fn assign_agent(&mut self, ticket_id: &str, agent: &str) -> bool {
        let now = self.clock.now();
        let req = match self.request_mut(ticket_id) {
            Some(r) => r,
            None => return false,
        };
        req.assigned_agent = Some(agent.to_string());
        push_comment(req, &format!("[ASSIGN] Assigned to {}", agent), now);
        self.dirty = true;
        true
    }

    pub fn set_resolution_notes(&mut self, ticket_id: &str, note: &str) -> bool {
        let now = self.clock.now();
        let req = match self.request_mut(ticket_id) {
            Some(r) => r,
            None => return false,
        };
        req.resolution_notes = Some(note.to_string());
        push_comment(req, &format!("[RESOLVED] {}", note), now);
        self.dirty = true;
        true
    }

    /// Blank comments are silently dropped without refreshing `last_updated`.
    pub fn add_comment(&mut self, ticket_id: &str, text: &str) -> bool {
        let now = self.clock.now();
        let req = match self.request_mut(ticket_id) {
            Some(r) => r,
            None => return false,
        };
        if text.trim().is_empty() {
            return true;
        }
        push_comment(req, text, now);
        self.dirty = true;
        true
    }

    /// Removes the ticket and purges its id from every user's history.
    pub fn delete_request(&mut self, ticket_id: &str) -> bool {
        let pos = match self.requests.iter().position(|r| r.ticket_id == ticket_id) {
            Some(p) => p,
            None => return false,
        };
        self.requests.remove(pos);
        for user in &mut self.users {
            user.request_history.retain(|id| id != ticket_id);
        }
        debug!(ticket_id = %ticket_id, "request deleted");
        self.dirty = true;
        true
    }

    fn request_mut(&mut self, ticket_id: &str) -> Option<&mut ServiceRequest> {
        self.requests.iter_mut().find(|r| r.ticket_id == ticket_id)
    }

    // ===== Queries =====
    // All of these hand back owned copies; callers may sort or mutate the
    // result without touching the catalog.

    pub fn find_by_id(&self, ticket_id: &str) -> Option<ServiceRequest> {
        self.requests.iter().find(|r| r.ticket_id == ticket_id).cloned()
    }

    pub fn list_all(&self) -> Vec<ServiceRequest> {
        self.requests.clone()
    }

    pub fn list_by_user_email(&self, email: &str) -> Vec<ServiceRequest> {
        self.filtered(|r| r.user_email.eq_ignore_ascii_case(email))
    }

    pub fn list_by_assigned_agent(&self, agent: &str) -> Vec<ServiceRequest> {
        self.filtered(|r| {
            r.assigned_agent
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(agent))
        })
    }

    pub fn filter_by_status(&self, status: &str) -> Vec<ServiceRequest> {
        self.filtered(|r| r.status.eq_ignore_ascii_case(status))
    }

    pub fn filter_by_category(&self, category: &str) -> Vec<ServiceRequest> {
        self.filtered(|r| r.category.eq_ignore_ascii_case(category))
    }

    pub fn filter_by_priority(&self, priority: &str) -> Vec<ServiceRequest> {
        self.filtered(|r| r.priority.eq_ignore_ascii_case(priority))
    }

    /// Inclusive bounds on `created_date`; either end may be open.
    pub fn filter_by_date_range(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Vec<ServiceRequest> {
        self.filtered(|r| {
            from.map_or(true, |f| r.created_date >= f) && to.map_or(true, |t| r.created_date <= t)
        })
    }

    /// Case-insensitive substring match over subject and description.
    pub fn search_by_keyword(&self, keyword: &str) -> Vec<ServiceRequest> {
        let kw = keyword.to_lowercase();
        self.filtered(|r| {
            r.subject.to_lowercase().contains(&kw) || r.description.to_lowercase().contains(&kw)
        })
    }

    fn filtered(&self, keep: impl Fn(&ServiceRequest) -> bool) -> Vec<ServiceRequest> {
        self.requests.iter().filter(|r| keep(r)).cloned().collect()
    }

    // ===== Bulk load =====

    /// Replaces the whole catalog, recomputing the ticket sequence from the
    /// loaded ids and clearing the dirty flag.
    pub fn replace_all(&mut self, users: Vec<User>, requests: Vec<ServiceRequest>) {
        self.users = users;
        self.requests = requests;
        self.calibrate_next_seq();
        self.dirty = false;
    }
}

fn push_comment(req: &mut ServiceRequest, text: &str, now: NaiveDateTime) {
    if text.trim().is_empty() {
        return;
    }
    req.comments.push(format!("[{}] {}", now.format(TS_FORMAT), text));
    req.last_updated = now;
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}
