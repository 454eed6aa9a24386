//! Per-view state for searches and detail pages
//!
//! Generated content arrives asynchronously and may outlive the view that
//! asked for it. Every request carries a [`Ticket`]; a view only accepts a
//! result whose ticket matches its own, so a superseded search can never
//! overwrite a newer one.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::catalog::{CatalogEntry, Review};
use crate::install::Installation;

/// Identifies one outstanding request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Monotonic source of tickets
#[derive(Debug, Default)]
pub struct RequestGeneration {
    counter: AtomicU64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh ticket, superseding every earlier one
    pub fn next(&self) -> Ticket {
        Ticket(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Asynchronously loaded section of a view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum Loadable<T> {
    Loading,
    Ready(Vec<T>),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Loading => &[],
            Self::Ready(items) => items,
        }
    }
}

/// Results for one query: local matches right away, AI suggestions later
#[derive(Debug, Clone, Serialize)]
pub struct SearchSession {
    pub query: String,
    pub local: Vec<CatalogEntry>,
    pub suggestions: Loadable<CatalogEntry>,
    #[serde(skip)]
    ticket: Ticket,
}

impl SearchSession {
    /// Blank queries get no suggestions section; it starts resolved and empty
    pub fn new(query: impl Into<String>, local: Vec<CatalogEntry>, ticket: Ticket) -> Self {
        let query = query.into();
        let suggestions = if query.trim().is_empty() {
            Loadable::Ready(Vec::new())
        } else {
            Loadable::Loading
        };
        Self {
            query,
            local,
            suggestions,
            ticket,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Whether a suggestion fetch still has to run for this session
    pub fn wants_suggestions(&self) -> bool {
        self.suggestions.is_loading()
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Fill in the suggestions if `ticket` belongs to this session.
    ///
    /// Returns `false` (and leaves the session untouched) for stale tickets
    /// or a session that already resolved.
    pub fn apply_suggestions(&mut self, ticket: Ticket, entries: Vec<CatalogEntry>) -> bool {
        if ticket != self.ticket || !self.suggestions.is_loading() {
            tracing::debug!(
                "Discarding {} stale suggestions for {:?}",
                entries.len(),
                self.query
            );
            return false;
        }
        self.suggestions = Loadable::Ready(entries);
        true
    }

    /// Look up a listing shown in this session, local or generated
    pub fn find(&self, id: &str) -> Option<&CatalogEntry> {
        self.local
            .iter()
            .chain(self.suggestions.items())
            .find(|e| e.id == id)
    }
}

/// Detail page for one listing
#[derive(Debug)]
pub struct DetailView {
    pub entry: CatalogEntry,
    pub reviews: Loadable<Review>,
    pub install: Installation,
    ticket: Ticket,
}

impl DetailView {
    /// Listings with reviews of their own start resolved
    pub fn new(entry: CatalogEntry, ticket: Ticket) -> Self {
        let reviews = if entry.reviews.is_empty() {
            Loadable::Loading
        } else {
            Loadable::Ready(entry.reviews.clone())
        };
        let install = Installation::new(entry.id.clone());
        Self {
            entry,
            reviews,
            install,
            ticket,
        }
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn needs_reviews(&self) -> bool {
        self.reviews.is_loading()
    }

    pub fn apply_reviews(&mut self, ticket: Ticket, reviews: Vec<Review>) -> bool {
        if ticket != self.ticket || !self.reviews.is_loading() {
            tracing::debug!("Discarding stale reviews for {}", self.entry.id);
            return false;
        }
        self.reviews = Loadable::Ready(reviews);
        true
    }
}
