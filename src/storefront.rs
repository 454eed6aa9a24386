//! Storefront facade - ties the catalog, local search and the generative
//! fetchers together behind one value the CLI drives.

use std::future::Future;
use std::sync::Arc;

use crate::catalog::{Catalog, CatalogEntry, Review};
use crate::config::GenAiConfig;
use crate::genai::TextGenerator;
use crate::reviews::generate_reviews;
use crate::search::filter_catalog;
use crate::session::{DetailView, RequestGeneration, SearchSession, Ticket};
use crate::suggest::suggest_apps;

pub struct Storefront<G: ?Sized> {
    catalog: &'static Catalog,
    config: GenAiConfig,
    generator: Arc<G>,
    generation: RequestGeneration,
}

impl<G: TextGenerator + ?Sized + 'static> Storefront<G> {
    pub fn new(config: GenAiConfig, generator: Arc<G>) -> Self {
        Self {
            catalog: Catalog::builtin(),
            config,
            generator,
            generation: RequestGeneration::new(),
        }
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn config(&self) -> &GenAiConfig {
        &self.config
    }

    pub fn ai_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Start a search: local matches are filled in now, suggestions are
    /// left loading until [`Self::suggestions_task`] resolves. Blank queries
    /// resolve with no suggestions and need no fetch.
    pub fn open_search(&self, query: &str) -> SearchSession {
        let local: Vec<CatalogEntry> = filter_catalog(query, self.catalog.entries())
            .into_iter()
            .cloned()
            .collect();
        tracing::debug!("Local search {:?}: {} matches", query, local.len());
        SearchSession::new(query, local, self.generation.next())
    }

    /// Detached suggestion fetch for a session, tagged with its ticket
    pub fn suggestions_task(
        &self,
        session: &SearchSession,
    ) -> impl Future<Output = (Ticket, Vec<CatalogEntry>)> + Send + 'static {
        let ticket = session.ticket();
        let query = session.query.clone();
        let config = self.config.clone();
        let generator = Arc::clone(&self.generator);
        async move {
            let entries = suggest_apps(&config, generator.as_ref(), &query).await;
            (ticket, entries)
        }
    }

    /// Run a search to completion
    pub async fn search(&self, query: &str) -> SearchSession {
        let mut session = self.open_search(query);
        if session.wants_suggestions() {
            let (ticket, entries) = self.suggestions_task(&session).await;
            session.apply_suggestions(ticket, entries);
        }
        session
    }

    /// Find a listing by id, checking the current search results first so
    /// generated listings can be opened too.
    pub fn lookup(&self, id: &str, session: Option<&SearchSession>) -> Option<CatalogEntry> {
        session
            .and_then(|s| s.find(id))
            .or_else(|| self.catalog.get(id))
            .cloned()
    }

    pub fn open_detail(&self, entry: CatalogEntry) -> DetailView {
        DetailView::new(entry, self.generation.next())
    }

    /// Detached review fetch for a detail view.
    ///
    /// Only meaningful when [`DetailView::needs_reviews`] is true; listings
    /// that carry reviews never get here.
    pub fn reviews_task(
        &self,
        view: &DetailView,
    ) -> impl Future<Output = (Ticket, Vec<Review>)> + Send + 'static {
        let ticket = view.ticket();
        let name = view.entry.name.clone();
        let config = self.config.clone();
        let generator = Arc::clone(&self.generator);
        async move {
            let reviews = generate_reviews(&config, generator.as_ref(), &name).await;
            (ticket, reviews)
        }
    }

    /// Open a detail view together with the review fetch it still needs,
    /// if any. Every path that navigates to a listing goes through here.
    pub fn navigate_detail(
        &self,
        entry: CatalogEntry,
    ) -> (
        DetailView,
        Option<impl Future<Output = (Ticket, Vec<Review>)> + Send + 'static>,
    ) {
        let view = self.open_detail(entry);
        let task = view.needs_reviews().then(|| self.reviews_task(&view));
        (view, task)
    }

    /// Open a detail view and load its reviews if it has none
    pub async fn detail(&self, entry: CatalogEntry) -> DetailView {
        let (mut view, task) = self.navigate_detail(entry);
        if let Some(task) = task {
            let (ticket, reviews) = task.await;
            view.apply_reviews(ticket, reviews);
        }
        view
    }
}
