use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::config::{CollectorConfig, ConfigError};
use crate::extract::facts::{self, FactsError, InfoEntry};
use crate::extract::releases::{self, ReleaseBlock};
use crate::extract::stability::{ReleaseStabilityClassifier, StabilityError};
use crate::extract::usage::{self, UsageError};
use crate::model::{ProjectReport, UsageTable};
use crate::traits::{FetchError, MarkupLocator, PageFetcher};

// Selectors are a contract with the source pages' layout.
pub const INFO_ENTRIES_SELECTOR: &str = ".project-info > li";
pub const INSTALLS_SELECTOR: &str = "strong";
pub const DOWNLOADS_SELECTOR: &str = "small";
pub const LINK_SELECTOR: &str = "a";
pub const NAME_SELECTOR: &str = "#page-subtitle";
pub const USAGE_HEADER_SELECTOR: &str = "#project-usage-project-api thead tr";
pub const USAGE_ROWS_SELECTOR: &str = "#project-usage-project-api tbody tr";
pub const USAGE_CELL_SELECTOR: &str = "th, td";
pub const RELEASES_SELECTOR: &str =
    ".view-id-drupalorg_project_downloads .view-content > div.release";
pub const DEV_RELEASE_LINK_SELECTOR: &str = ".release-info > p > a";
pub const TAGGED_RELEASE_LINK_SELECTOR: &str = "span > strong.field-content a";
pub const RECOMMENDED_SELECTOR: &str =
    ".view-id-drupalorg_project_downloads > .view-content table tbody tr";

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("Usage table: {0}")]
    Usage(#[from] UsageError),
    #[error("Project facts: {0}")]
    Facts(#[from] FactsError),
    #[error("Release patterns: {0}")]
    Stability(#[from] StabilityError),
    #[error("Configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Semaphore error: {0}")]
    Semaphore(String),
    #[error("Task join error: {0}")]
    Join(String),
}

/// Collects a [`ProjectReport`] per project from its project and usage pages.
///
/// Both collaborators are shared across calls; at most
/// `concurrency_limit` collections run at once.
pub struct ProjectStatsCollector<F, L> {
    fetcher: F,
    locator: L,
    config: CollectorConfig,
    classifier: ReleaseStabilityClassifier,
    semaphore: Arc<Semaphore>,
}

impl<F, L> ProjectStatsCollector<F, L>
where
    F: PageFetcher,
    L: MarkupLocator,
{
    pub fn new(fetcher: F, locator: L, config: CollectorConfig) -> Result<Self, CollectError> {
        config.validate()?;
        let classifier = ReleaseStabilityClassifier::new(config.target_major)?;

        Ok(Self {
            fetcher,
            locator,
            semaphore: Arc::new(Semaphore::new(config.concurrency_limit)),
            classifier,
            config,
        })
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    #[instrument(skip(self), fields(major = self.config.target_major))]
    pub async fn collect(&self, project: &str) -> Result<ProjectReport, CollectError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| CollectError::Semaphore(e.to_string()))?;

        info!("Starting collection for project: {}", project);

        let project_url = self.config.project_url(project);
        let usage_url = self.config.usage_url(project);
        let (page, usage_page) = tokio::try_join!(
            self.fetcher.fetch(&project_url),
            self.fetcher.fetch(&usage_url),
        )?;

        let usage = self.read_usage(&usage_page)?;
        let current_usage = usage.current_usage(&format!("{}.x", self.config.target_major));

        let release_ids = releases::release_identifiers(&self.read_release_blocks(&page));
        let stability = self.classifier.stability_map(&release_ids);
        let best_stability = self.classifier.rank_best(&release_ids);

        let recommended = self.read_recommended(&page);
        let recommended_release = self.classifier.recommended(&recommended).map(str::to_string);
        let has_full_release = self.classifier.has_full_release(&recommended);

        let entries = self.read_info_entries(&page);
        let maintenance_status = entries.first().and_then(|entry| entry.link.clone());
        let development_status = entries.get(1).and_then(|entry| entry.link.clone());
        let last_modified = facts::last_modified(&entries);
        let facts = match facts::extract(&entries) {
            Ok(facts) => Some(facts),
            Err(FactsError::NotFound) => {
                warn!(project, "Project page has no statistics entry");
                None
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            project,
            rows = usage.len(),
            current_usage,
            releases = stability.len(),
            best = %best_stability,
            "Finished collection"
        );

        Ok(ProjectReport {
            project: project.to_string(),
            name: self.locator.first_text(&page, NAME_SELECTOR),
            maintenance_status,
            development_status,
            last_modified,
            target_major: self.config.target_major,
            usage,
            current_usage,
            releases: stability,
            best_stability,
            recommended_release,
            has_full_release,
            facts,
        })
    }

    fn read_usage(&self, markup: &str) -> Result<UsageTable, UsageError> {
        let header = self
            .locator
            .select(markup, USAGE_HEADER_SELECTOR)
            .first()
            .map(|row| self.locator.texts(&row.markup, USAGE_CELL_SELECTOR))
            .unwrap_or_default();

        let rows: Vec<Vec<String>> = self
            .locator
            .select(markup, USAGE_ROWS_SELECTOR)
            .iter()
            .map(|row| self.locator.texts(&row.markup, USAGE_CELL_SELECTOR))
            .collect();

        debug!(columns = header.len(), rows = rows.len(), "Located usage table");
        usage::parse(&header, &rows)
    }

    fn read_info_entries(&self, markup: &str) -> Vec<InfoEntry> {
        self.locator
            .select(markup, INFO_ENTRIES_SELECTOR)
            .into_iter()
            .map(|node| InfoEntry {
                emphasis: self.locator.first_text(&node.markup, INSTALLS_SELECTOR),
                small_print: self.locator.first_text(&node.markup, DOWNLOADS_SELECTOR),
                link: self.locator.first_text(&node.markup, LINK_SELECTOR),
                text: node.text,
            })
            .collect()
    }

    fn read_release_blocks(&self, markup: &str) -> Vec<ReleaseBlock> {
        self.locator
            .select(markup, RELEASES_SELECTOR)
            .into_iter()
            .map(|node| ReleaseBlock {
                info_link: self.locator.first_text(&node.markup, DEV_RELEASE_LINK_SELECTOR),
                tagged_link: self
                    .locator
                    .first_text(&node.markup, TAGGED_RELEASE_LINK_SELECTOR),
                text: node.text,
            })
            .collect()
    }

    fn read_recommended(&self, markup: &str) -> Vec<String> {
        self.locator
            .select(markup, RECOMMENDED_SELECTOR)
            .iter()
            .filter_map(|row| self.locator.first_text(&row.markup, LINK_SELECTOR))
            .collect()
    }
}

impl<F, L> ProjectStatsCollector<F, L>
where
    F: PageFetcher + 'static,
    L: MarkupLocator + 'static,
{
    /// Collects every project, bounded by the concurrency limit.
    ///
    /// Results come back in input order; one project failing does not affect
    /// the others.
    pub async fn collect_all(
        self: Arc<Self>,
        projects: Vec<String>,
    ) -> Vec<(String, Result<ProjectReport, CollectError>)> {
        let mut tasks = JoinSet::new();
        for (index, project) in projects.iter().cloned().enumerate() {
            let collector = Arc::clone(&self);
            tasks.spawn(async move {
                let result = collector.collect(&project).await;
                (index, result)
            });
        }

        let mut results: Vec<Option<Result<ProjectReport, CollectError>>> =
            projects.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => warn!("Collection task failed: {}", e),
            }
        }

        projects
            .into_iter()
            .zip(results)
            .map(|(project, result)| {
                let result = result
                    .unwrap_or_else(|| Err(CollectError::Join("task did not complete".to_string())));
                (project, result)
            })
            .collect()
    }
}
