//! View Manager
//!
//! Registry of open views, kept in creation order and mirrored to SQLite so
//! they can be reopened on the next start.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rusqlite::Connection;
use std::sync::Arc;

use relais_storage::Database;

use crate::error::ViewError;
use crate::view::View;
use crate::Result;

pub struct ViewManager {
    /// Open views in creation order
    views: Arc<RwLock<Vec<View>>>,
    db: Database,
}

impl ViewManager {
    pub fn new(db: Database) -> Self {
        Self {
            views: Arc::new(RwLock::new(Vec::new())),
            db,
        }
    }

    /// Read persisted views, oldest first. Does not register them.
    pub fn load_saved(&self) -> Result<Vec<View>> {
        let views = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT label, url, title, pin, ignore_cursor, zoom_percent, alpha,
                        created_at, updated_at
                 FROM views ORDER BY created_at ASC",
            )?;

            let views: Vec<View> = stmt
                .query_map([], |row| {
                    let created_str: String = row.get(7)?;
                    let updated_str: String = row.get(8)?;

                    Ok(View {
                        label: row.get(0)?,
                        url: row.get(1)?,
                        title: row.get(2)?,
                        pin: row.get(3)?,
                        ignore_cursor: row.get(4)?,
                        zoom_percent: row.get(5)?,
                        alpha: row.get(6)?,
                        created_at: parse_timestamp(&created_str),
                        updated_at: parse_timestamp(&updated_str),
                    })
                })?
                .filter_map(|r| match r {
                    Ok(view) => Some(view),
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping unreadable saved view");
                        None
                    }
                })
                .collect();

            Ok(views)
        })?;

        Ok(views)
    }

    /// Add a view to the registry and persist it.
    pub fn register(&self, view: View) -> Result<View> {
        let mut views = self.views.write();
        if views.iter().any(|v| v.label == view.label) {
            return Err(ViewError::AlreadyExists(view.label));
        }

        self.save_view(&view)?;
        views.push(view.clone());

        tracing::info!(label = %view.label, url = %view.url, "Registered view");

        Ok(view)
    }

    pub fn get(&self, label: &str) -> Result<View> {
        self.views
            .read()
            .iter()
            .find(|v| v.label == label)
            .cloned()
            .ok_or_else(|| ViewError::NotFound(label.to_string()))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.views.read().iter().any(|v| v.label == label)
    }

    /// All open views in creation order
    pub fn list(&self) -> Vec<View> {
        self.views.read().clone()
    }

    /// Mutate a view in place and persist the result.
    ///
    /// The closure runs on a copy; nothing changes if it or the save fails.
    pub fn update<F, T>(&self, label: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut View) -> Result<T>,
    {
        let mut views = self.views.write();
        let slot = views
            .iter_mut()
            .find(|v| v.label == label)
            .ok_or_else(|| ViewError::NotFound(label.to_string()))?;

        let mut view = slot.clone();
        let out = f(&mut view)?;
        self.save_view(&view)?;
        *slot = view;

        Ok(out)
    }

    /// Mutate every open view and persist them in one transaction.
    ///
    /// The closure runs on copies; the registry only changes once every view
    /// has been updated and saved.
    pub fn update_all<F>(&self, mut f: F) -> Result<usize>
    where
        F: FnMut(&mut View) -> Result<()>,
    {
        let mut views = self.views.write();

        let mut updated = views.clone();
        for view in updated.iter_mut() {
            f(view)?;
        }

        self.db.transaction(|conn| {
            for view in &updated {
                write_view(conn, view)?;
            }
            Ok(())
        })?;

        let count = updated.len();
        *views = updated;

        Ok(count)
    }

    /// Unregister a view and delete its saved row.
    pub fn remove(&self, label: &str) -> Result<View> {
        let mut views = self.views.write();
        let idx = views
            .iter()
            .position(|v| v.label == label)
            .ok_or_else(|| ViewError::NotFound(label.to_string()))?;

        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM views WHERE label = ?1", [label])?;
            Ok(())
        })?;

        let view = views.remove(idx);

        tracing::info!(label = %label, "Removed view");

        Ok(view)
    }

    /// Delete a saved row without touching the registry.
    pub fn forget_saved(&self, label: &str) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM views WHERE label = ?1", [label])?;
            Ok(())
        })?;
        Ok(())
    }

    fn save_view(&self, view: &View) -> Result<()> {
        Ok(self.db.with_connection(|conn| Ok(write_view(conn, view)?))?)
    }
}

impl Clone for ViewManager {
    fn clone(&self) -> Self {
        Self {
            views: Arc::clone(&self.views),
            db: self.db.clone(),
        }
    }
}

fn write_view(conn: &Connection, view: &View) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO views
         (label, url, title, pin, ignore_cursor, zoom_percent, alpha,
          created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            view.label,
            view.url,
            view.title,
            view.pin,
            view.ignore_cursor,
            view.zoom_percent,
            view.alpha,
            view.created_at.to_rfc3339(),
            view.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
