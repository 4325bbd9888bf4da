//! Cross-workspace aggregation.
//!
//! Every bulk operation enumerates a parent collection, calls one point query
//! per parent and concatenates the non-empty results, each row tagged with
//! its parent's context columns. Per-parent failures are logged and skipped;
//! only a failure to enumerate the parents reaches the caller.

use super::traits::PowerBiSource;
use super::types::{ChildKind, ParentKind};
use crate::AppError;
use crate::core::table::{Record, Table, record_text};
use crate::error::ApiError;
use crate::storage::config::{Config, DEFAULT_CONCURRENCY};
use futures::stream::{self, StreamExt};
use serde_json::Value;

const USAGE_METRICS_MARKER: &str = "Usage Metrics";

/// Identity and workspace context of one parent row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub kind: ParentKind,
    pub id: String,
    pub name: String,
    pub workspace_id: String,
    pub workspace_name: String,
}

impl ParentRef {
    /// Read a parent from its listing row; absent fields read as empty
    pub fn from_record(kind: ParentKind, record: &Record) -> Self {
        let text = |column: &str| record_text(record, column).unwrap_or_default();

        let id = text(kind.id_column());
        let name = text("name");
        let (workspace_id, workspace_name) = match kind {
            ParentKind::Workspace => (id.clone(), name.clone()),
            _ => (text("workspaceId"), text("workspaceName")),
        };

        Self {
            kind,
            id,
            name,
            workspace_id,
            workspace_name,
        }
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.id.is_empty() {
            return Err(ApiError::InvalidRequest {
                message: format!("{} row has no '{}'", self.kind, self.kind.id_column()),
            });
        }
        if self.workspace_id.is_empty() {
            return Err(ApiError::InvalidRequest {
                message: format!("{} {} has no workspaceId", self.kind, self.id),
            });
        }
        Ok(())
    }

    /// Inject the parent-context columns into every row of `table`
    pub fn annotate(&self, table: &mut Table) {
        if let Some(prefix) = self.kind.context_prefix() {
            table.set_column(&format!("{}Id", prefix), Value::String(self.id.clone()));
            table.set_column(&format!("{}Name", prefix), Value::String(self.name.clone()));
        }
        table.set_column("workspaceId", Value::String(self.workspace_id.clone()));
        table.set_column("workspaceName", Value::String(self.workspace_name.clone()));
    }
}

/// A parent skipped because its point query failed
#[derive(Debug)]
pub struct ParentFailure {
    pub parent: ParentRef,
    pub error: ApiError,
}

/// Result of one fan-out pass
#[derive(Debug, Default)]
pub struct FanOut {
    pub table: Table,
    pub failures: Vec<ParentFailure>,
}

enum Outcome {
    Rows(Table),
    Empty,
    Failed(ParentFailure),
}

/// Drop auto-generated usage metrics datasets
pub fn exclude_usage_metrics(datasets: &Table) -> Table {
    datasets.filter(|row| {
        !record_text(row, "name").is_some_and(|name| name.contains(USAGE_METRICS_MARKER))
    })
}

/// Keep datasets whose refreshable flag reads `True`
pub fn refreshable_only(datasets: &Table) -> Table {
    datasets.filter(|row| record_text(row, "isRefreshable").as_deref() == Some("True"))
}

fn select_ids<S: AsRef<str>>(datasets: &Table, ids: &[S]) -> Table {
    datasets.filter(|row| {
        record_text(row, "id").is_some_and(|id| ids.iter().any(|wanted| wanted.as_ref() == id))
    })
}

pub struct BulkService<S> {
    source: S,
    concurrency: usize,
}

impl<S: PowerBiSource> BulkService<S> {
    /// Sequential aggregation over `source`
    pub fn new(source: S) -> Self {
        Self {
            source,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn from_config(source: S, config: &Config) -> Self {
        Self::new(source).with_concurrency(config.get_concurrency())
    }

    /// Allow up to `concurrency` point queries in flight; output order is unchanged
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch `child` for every row of `parents` and merge the results
    pub async fn fan_out(&self, parents: &Table, child: ChildKind) -> FanOut {
        let kind = child.parent_kind();

        let outcomes: Vec<Outcome> = stream::iter(parents.iter())
            .map(|record| self.fetch_one(ParentRef::from_record(kind, record), child))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut result = FanOut::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Rows(table) => result.table.append(table),
                Outcome::Empty => {}
                Outcome::Failed(failure) => result.failures.push(failure),
            }
        }

        log::debug!(
            "Fetched {} {} row(s) from {} {}(s), {} failed",
            result.table.len(),
            child,
            parents.len(),
            kind,
            result.failures.len()
        );
        result
    }

    async fn fetch_one(&self, parent: ParentRef, child: ChildKind) -> Outcome {
        if let Err(error) = parent.check() {
            log::warn!("Skipping {} for {}: {}", child, parent.kind, error);
            return Outcome::Failed(ParentFailure { parent, error });
        }

        match self
            .source
            .fetch_children(child, &parent.workspace_id, &parent.id)
            .await
        {
            Ok(table) if table.is_empty() => {
                log::debug!("No {} for {} {}", child, parent.kind, parent.id);
                Outcome::Empty
            }
            Ok(mut table) => {
                parent.annotate(&mut table);
                Outcome::Rows(table)
            }
            Err(error) => {
                log::warn!("Error processing {} {}: {}", child, parent.id, error);
                Outcome::Failed(ParentFailure { parent, error })
            }
        }
    }

    async fn collect(&self, parents: &Table, child: ChildKind) -> Table {
        self.fan_out(parents, child).await.table
    }

    pub async fn get_all_workspaces(&self) -> Result<Table, AppError> {
        Ok(self.source.list_workspaces().await?)
    }

    pub async fn get_all_datasets(&self) -> Result<Table, AppError> {
        let workspaces = self.get_all_workspaces().await?;
        Ok(self.collect(&workspaces, ChildKind::Datasets).await)
    }

    pub async fn get_all_dataflows(&self) -> Result<Table, AppError> {
        let workspaces = self.get_all_workspaces().await?;
        Ok(self.collect(&workspaces, ChildKind::Dataflows).await)
    }

    pub async fn get_all_reports(&self) -> Result<Table, AppError> {
        let workspaces = self.get_all_workspaces().await?;
        Ok(self.collect(&workspaces, ChildKind::Reports).await)
    }

    /// Refresh history of every refreshable dataset
    pub async fn get_all_dataset_refresh_history(&self) -> Result<Table, AppError> {
        let datasets = refreshable_only(&self.get_all_datasets().await?);
        Ok(self.collect(&datasets, ChildKind::DatasetRefreshHistory).await)
    }

    pub async fn get_all_dataflow_refresh_history(&self) -> Result<Table, AppError> {
        let dataflows = self.get_all_dataflows().await?;
        Ok(self.collect(&dataflows, ChildKind::DataflowRefreshHistory).await)
    }

    pub async fn get_all_dataset_users(&self) -> Result<Table, AppError> {
        let datasets = exclude_usage_metrics(&self.get_all_datasets().await?);
        Ok(self.collect(&datasets, ChildKind::DatasetUsers).await)
    }

    pub async fn get_all_dataset_sources(&self) -> Result<Table, AppError> {
        let datasets = exclude_usage_metrics(&self.get_all_datasets().await?);
        Ok(self.collect(&datasets, ChildKind::DatasetSources).await)
    }

    pub async fn get_all_dataflow_sources(&self) -> Result<Table, AppError> {
        let dataflows = self.get_all_dataflows().await?;
        Ok(self.collect(&dataflows, ChildKind::DataflowSources).await)
    }

    pub async fn get_all_report_sources(&self) -> Result<Table, AppError> {
        let reports = self.get_all_reports().await?;
        Ok(self.collect(&reports, ChildKind::ReportSources).await)
    }

    pub async fn get_all_dataset_tables(&self) -> Result<Table, AppError> {
        let datasets = self.get_all_datasets().await?;
        Ok(self.collect(&datasets, ChildKind::DatasetTables).await)
    }

    pub async fn get_all_dataset_columns(&self) -> Result<Table, AppError> {
        let datasets = self.get_all_datasets().await?;
        Ok(self.collect(&datasets, ChildKind::DatasetColumns).await)
    }

    pub async fn get_all_dataset_measures(&self) -> Result<Table, AppError> {
        let datasets = self.get_all_datasets().await?;
        Ok(self.collect(&datasets, ChildKind::DatasetMeasures).await)
    }

    pub async fn get_all_dataset_calc_dependencies(&self) -> Result<Table, AppError> {
        let datasets = self.get_all_datasets().await?;
        Ok(self.collect(&datasets, ChildKind::DatasetCalcDependencies).await)
    }

    /// Measures of the listed datasets within one workspace
    pub async fn get_measures_for_datasets<T: AsRef<str>>(
        &self,
        workspace_id: &str,
        dataset_ids: &[T],
    ) -> Result<Table, AppError> {
        let workspace = self.source.get_workspace(workspace_id).await?;
        let datasets = self.collect(&workspace, ChildKind::Datasets).await;
        let selected = select_ids(&datasets, dataset_ids);
        Ok(self.collect(&selected, ChildKind::DatasetMeasures).await)
    }

    /// Measures of the listed datasets wherever they live
    pub async fn get_measures_for_dataset_ids_across_workspaces<T: AsRef<str>>(
        &self,
        dataset_ids: &[T],
    ) -> Result<Table, AppError> {
        let datasets = select_ids(&self.get_all_datasets().await?, dataset_ids);
        Ok(self.collect(&datasets, ChildKind::DatasetMeasures).await)
    }
}
