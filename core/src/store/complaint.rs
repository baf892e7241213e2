use super::DeskStore;
use crate::{
    error::{GrievanceError, GrievanceResult},
    lifecycle::{ActionEntry, ComplaintRecord},
    types::{ComplaintStatus, GeoPoint, Priority},
};
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, OptionalExtension};
use std::str::FromStr;

fn conversion_err(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_ts(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, e))
}

// Helper function for mapping complaint rows
fn complaint_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<ComplaintRecord> {
    let lat: Option<f64> = row.get(5)?;
    let lng: Option<f64> = row.get(6)?;
    let priority_raw: Option<String> = row.get(11)?;
    let status_raw: String = row.get(12)?;
    let actions_raw: String = row.get(13)?;
    let deadline_raw: Option<String> = row.get(15)?;
    Ok(ComplaintRecord {
        complaint_id: row.get(0)?,
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        mobile: row.get(3)?,
        description: row.get(4)?,
        location: match (lat, lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        },
        address: row.get(7)?,
        image_name: row.get(8)?,
        has_image: row.get::<_, i32>(9)? != 0,
        department: row.get(10)?,
        priority: priority_raw
            .map(|p| Priority::from_str(&p).map_err(|e| conversion_err(11, e)))
            .transpose()?,
        status: ComplaintStatus::from_str(&status_raw).map_err(|e| conversion_err(12, e))?,
        actions: serde_json::from_str::<Vec<ActionEntry>>(&actions_raw)
            .map_err(|e| conversion_err(13, e))?,
        created_at: parse_ts(14, row.get(14)?)?,
        deadline: deadline_raw.map(|d| parse_ts(15, d)).transpose()?,
        overdue: row.get::<_, i32>(16)? != 0,
        last_updated: parse_ts(17, row.get(17)?)?,
    })
}

impl DeskStore {
    // ── Complaint ──────────────────────────────────────────────────

    pub fn insert_complaint(&self, c: &ComplaintRecord) -> GrievanceResult<()> {
        let actions = serde_json::to_string(&c.actions)?;
        self.conn.execute(
            "INSERT INTO complaint (
                complaint_id, user_id, user_name, mobile, description, lat, lng,
                address, image_name, has_image, department, priority, status,
                actions, created_at, deadline, overdue, last_updated
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                       ?14, ?15, ?16, ?17, ?18)",
            params![
                &c.complaint_id,
                &c.user_id,
                &c.user_name,
                &c.mobile,
                &c.description,
                c.location.map(|p| p.lat),
                c.location.map(|p| p.lng),
                &c.address,
                c.image_name.as_deref(),
                if c.has_image { 1i32 } else { 0i32 },
                c.department.as_deref(),
                c.priority.map(|p| p.as_str()),
                c.status.as_str(),
                actions,
                c.created_at.to_rfc3339(),
                c.deadline.map(|d| d.to_rfc3339()),
                if c.overdue { 1i32 } else { 0i32 },
                c.last_updated.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_complaint(&self, complaint_id: &str) -> GrievanceResult<ComplaintRecord> {
        self.conn
            .query_row(
                "SELECT complaint_id, user_id, user_name, mobile, description, lat, lng,
                        address, image_name, has_image, department, priority, status,
                        actions, created_at, deadline, overdue, last_updated
                 FROM complaint WHERE complaint_id = ?1",
                params![complaint_id],
                complaint_row_mapper,
            )
            .optional()?
            .ok_or_else(|| GrievanceError::NotFound {
                complaint_id: complaint_id.to_string(),
            })
    }

    /// Persist a status transition: status, actions and last_updated only.
    pub fn update_status(&self, c: &ComplaintRecord) -> GrievanceResult<()> {
        let actions = serde_json::to_string(&c.actions)?;
        self.conn.execute(
            "UPDATE complaint SET status = ?1, actions = ?2, last_updated = ?3
             WHERE complaint_id = ?4",
            params![
                c.status.as_str(),
                actions,
                c.last_updated.to_rfc3339(),
                &c.complaint_id
            ],
        )?;
        Ok(())
    }

    /// Persist a classification: assignment fields plus the transition.
    pub fn apply_classification(&self, c: &ComplaintRecord) -> GrievanceResult<()> {
        let actions = serde_json::to_string(&c.actions)?;
        self.conn.execute(
            "UPDATE complaint SET department = ?1, priority = ?2, deadline = ?3,
             status = ?4, actions = ?5, last_updated = ?6
             WHERE complaint_id = ?7",
            params![
                c.department.as_deref(),
                c.priority.map(|p| p.as_str()),
                c.deadline.map(|d| d.to_rfc3339()),
                c.status.as_str(),
                actions,
                c.last_updated.to_rfc3339(),
                &c.complaint_id
            ],
        )?;
        Ok(())
    }

    pub fn mark_overdue(&self, complaint_id: &str) -> GrievanceResult<()> {
        self.conn.execute(
            "UPDATE complaint SET overdue = 1 WHERE complaint_id = ?1",
            params![complaint_id],
        )?;
        Ok(())
    }

    pub fn complaints_all(&self) -> GrievanceResult<Vec<ComplaintRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT complaint_id, user_id, user_name, mobile, description, lat, lng,
                    address, image_name, has_image, department, priority, status,
                    actions, created_at, deadline, overdue, last_updated
             FROM complaint ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([], complaint_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn complaints_for_user(&self, user_id: &str) -> GrievanceResult<Vec<ComplaintRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT complaint_id, user_id, user_name, mobile, description, lat, lng,
                    address, image_name, has_image, department, priority, status,
                    actions, created_at, deadline, overdue, last_updated
             FROM complaint WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id], complaint_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Degraded-mode variant: same set as `complaints_for_user`, no ordering.
    pub fn complaints_for_user_unordered(
        &self,
        user_id: &str,
    ) -> GrievanceResult<Vec<ComplaintRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT complaint_id, user_id, user_name, mobile, description, lat, lng,
                    address, image_name, has_image, department, priority, status,
                    actions, created_at, deadline, overdue, last_updated
             FROM complaint WHERE user_id = ?1",
        )?;
        let rows = stmt.query_map(params![user_id], complaint_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn complaint_count(&self) -> GrievanceResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM complaint", [], |row| row.get(0))
            .map_err(Into::into)
    }

    pub fn count_by_status(&self, status: ComplaintStatus) -> GrievanceResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM complaint WHERE status = ?1",
                params![status.as_str()],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}
