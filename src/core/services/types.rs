use std::fmt;

/// Kind of object a fan-out iterates over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentKind {
    Workspace,
    Dataset,
    Dataflow,
    Report,
}

impl ParentKind {
    /// Column holding the parent's identifier in its listing
    pub fn id_column(self) -> &'static str {
        match self {
            ParentKind::Dataflow => "objectId",
            _ => "id",
        }
    }

    /// Prefix of the injected `<prefix>Id` / `<prefix>Name` columns
    ///
    /// Workspaces have none: their context is always injected as
    /// `workspaceId` / `workspaceName`.
    pub fn context_prefix(self) -> Option<&'static str> {
        match self {
            ParentKind::Workspace => None,
            ParentKind::Dataset => Some("dataset"),
            ParentKind::Dataflow => Some("dataflow"),
            ParentKind::Report => Some("report"),
        }
    }
}

impl fmt::Display for ParentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParentKind::Workspace => "workspace",
            ParentKind::Dataset => "dataset",
            ParentKind::Dataflow => "dataflow",
            ParentKind::Report => "report",
        };
        f.write_str(name)
    }
}

/// Per-parent collection fetched during a fan-out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    Datasets,
    Dataflows,
    Reports,
    DatasetRefreshHistory,
    DatasetUsers,
    DatasetSources,
    DatasetTables,
    DatasetColumns,
    DatasetMeasures,
    DatasetCalcDependencies,
    DataflowRefreshHistory,
    DataflowSources,
    ReportSources,
}

impl ChildKind {
    pub fn parent_kind(self) -> ParentKind {
        match self {
            ChildKind::Datasets | ChildKind::Dataflows | ChildKind::Reports => {
                ParentKind::Workspace
            }
            ChildKind::DatasetRefreshHistory
            | ChildKind::DatasetUsers
            | ChildKind::DatasetSources
            | ChildKind::DatasetTables
            | ChildKind::DatasetColumns
            | ChildKind::DatasetMeasures
            | ChildKind::DatasetCalcDependencies => ParentKind::Dataset,
            ChildKind::DataflowRefreshHistory | ChildKind::DataflowSources => {
                ParentKind::Dataflow
            }
            ChildKind::ReportSources => ParentKind::Report,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChildKind::Datasets => "datasets",
            ChildKind::Dataflows => "dataflows",
            ChildKind::Reports => "reports",
            ChildKind::DatasetRefreshHistory => "dataset refresh history",
            ChildKind::DatasetUsers => "dataset users",
            ChildKind::DatasetSources => "dataset sources",
            ChildKind::DatasetTables => "dataset tables",
            ChildKind::DatasetColumns => "dataset columns",
            ChildKind::DatasetMeasures => "dataset measures",
            ChildKind::DatasetCalcDependencies => "dataset calc dependencies",
            ChildKind::DataflowRefreshHistory => "dataflow refresh history",
            ChildKind::DataflowSources => "dataflow sources",
            ChildKind::ReportSources => "report sources",
        }
    }
}

impl fmt::Display for ChildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_kind_columns() {
        assert_eq!(ParentKind::Workspace.id_column(), "id");
        assert_eq!(ParentKind::Dataset.id_column(), "id");
        assert_eq!(ParentKind::Dataflow.id_column(), "objectId");
        assert_eq!(ParentKind::Report.id_column(), "id");

        assert_eq!(ParentKind::Workspace.context_prefix(), None);
        assert_eq!(ParentKind::Report.context_prefix(), Some("report"));
    }

    #[test]
    fn test_child_parent_kind() {
        assert_eq!(ChildKind::Reports.parent_kind(), ParentKind::Workspace);
        assert_eq!(ChildKind::DatasetMeasures.parent_kind(), ParentKind::Dataset);
        assert_eq!(ChildKind::DataflowSources.parent_kind(), ParentKind::Dataflow);
        assert_eq!(ChildKind::ReportSources.parent_kind(), ParentKind::Report);
    }

    #[test]
    fn test_display() {
        assert_eq!(ChildKind::DatasetRefreshHistory.to_string(), "dataset refresh history");
        assert_eq!(ParentKind::Dataflow.to_string(), "dataflow");
    }
}
