//! Plan audit pipeline.
//!
//! This module wires discovery, extraction and consolidation together and
//! provides the removal gate evaluated once reports are prepared.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::analysis::{ConsolidatedResult, DecisionMaker};
use crate::collector::{PlanCollector, PlanExtractor, TerraformShow, locate};
use crate::config::{DefensePlan, Settings};
use crate::error::{CollectError, ReporterError, Result};

/// Runs the collection part of an audit.
pub struct Auditor<'a> {
    /// Validated settings.
    settings: &'a Settings,
    /// Extractor used for every plan.
    extractor: Arc<dyn PlanExtractor>,
    /// Concurrency override.
    parallelism: Option<usize>,
    /// Fail when no plan file is found.
    zero_plan_fail: bool,
}

impl<'a> Auditor<'a> {
    /// Creates an auditor running the configured `terraform` binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary cannot be resolved.
    pub fn new(settings: &'a Settings) -> Result<Self> {
        let extractor = TerraformShow::new(&settings.terraform_binary_file, settings.workdir_strategy())?;
        Ok(Self::with_extractor(settings, Arc::new(extractor)))
    }

    /// Creates an auditor with a custom extractor.
    #[must_use]
    pub fn with_extractor(settings: &'a Settings, extractor: Arc<dyn PlanExtractor>) -> Self {
        Self {
            settings,
            extractor,
            parallelism: None,
            zero_plan_fail: false,
        }
    }

    /// Overrides the number of concurrent extractions.
    #[must_use]
    pub const fn with_parallelism(mut self, parallelism: Option<usize>) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Makes an empty search an error.
    #[must_use]
    pub const fn fail_on_zero_plans(mut self, enabled: bool) -> Self {
        self.zero_plan_fail = enabled;
        self
    }

    /// Finds, extracts and consolidates every plan.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery or any extraction fails, or if no plan
    /// was found while failing on zero plans.
    pub async fn collect(&self) -> Result<ConsolidatedResult> {
        let basename = &self.settings.terraform_plan_file_basename;
        let root = &self.settings.terraform_plan_search_folder;
        let artifacts = locate(root, basename)?;

        if artifacts.is_empty() {
            if self.zero_plan_fail {
                return Err(CollectError::NoPlansFound {
                    basename: basename.clone(),
                    root: PathBuf::from(root),
                }
                .into());
            }
            warn!(basename = %basename, "No plan files found");
        }

        let mut collector = PlanCollector::new(Arc::clone(&self.extractor));
        if let Some(parallelism) = self.parallelism {
            collector = collector.with_parallelism(parallelism);
        }

        collector.collect(artifacts).await
    }

    /// Creates the decision maker for this run.
    #[must_use]
    pub fn decision_maker(&self) -> DecisionMaker {
        let plan = DefensePlan::from_settings(self.settings);
        info!(mode = plan.mode_label(), "Removal policy loaded");
        DecisionMaker::new(plan)
    }
}

/// Fails with [`ReporterError::CriticalRemovals`] if `decision` has seen a
/// forbidden removal.
///
/// # Errors
///
/// Returns the gate error carrying the number of forbidden deletions.
pub fn check_gate(result: &ConsolidatedResult, decision: &DecisionMaker) -> Result<()> {
    if !decision.critical_removals_found() {
        return Ok(());
    }

    let count = result
        .deleted
        .iter()
        .filter(|record| !decision.plan().permits_removal(&record.resource_type))
        .count();
    Err(ReporterError::CriticalRemovals { count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::TerraformPlan;
    use crate::report::build_sections;

    fn settings(critical: &[&str], allowed: &[&str]) -> Settings {
        Settings {
            terraform_binary_file: String::from("terraform"),
            terraform_plan_file_basename: String::from("plan.bin"),
            terraform_plan_search_folder: String::from("."),
            critical_resources: critical.iter().map(ToString::to_string).collect(),
            allowed_removals: allowed.iter().map(ToString::to_string).collect(),
            not_use_chdir: false,
        }
    }

    fn deletions(types: &[&str]) -> ConsolidatedResult {
        let entries: Vec<serde_json::Value> = types
            .iter()
            .map(|t| serde_json::json!({"type": t, "name": "r", "change": {"actions": ["delete"]}}))
            .collect();
        let plan: TerraformPlan = serde_json::from_value(serde_json::json!({ "resource_changes": entries }))
            .expect("plan should decode");
        ConsolidatedResult::from_plans([&plan])
    }

    #[test]
    fn test_gate_passes_without_critical_removals() {
        let settings = settings(&["all"], &["null_resource"]);
        let result = deletions(&["null_resource"]);
        let decision = DecisionMaker::new(DefensePlan::from_settings(&settings));

        let _ = build_sections(&result, &decision);
        assert!(check_gate(&result, &decision).is_ok());
    }

    #[test]
    fn test_gate_counts_forbidden_deletions() {
        let settings = settings(&["aws_instance"], &[]);
        let result = deletions(&["aws_instance", "null_resource", "AWS_INSTANCE"]);
        let decision = DecisionMaker::new(DefensePlan::from_settings(&settings));

        let _ = build_sections(&result, &decision);
        let err = check_gate(&result, &decision).expect_err("gate should trip");
        assert!(matches!(err, ReporterError::CriticalRemovals { count: 2 }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_gate_only_looks_at_evaluated_decisions() {
        let settings = settings(&["aws_instance"], &[]);
        let result = deletions(&["aws_instance"]);
        let decision = DecisionMaker::new(DefensePlan::from_settings(&settings));

        assert!(check_gate(&result, &decision).is_ok());
    }

    #[cfg(unix)]
    mod end_to_end {
        use super::*;
        use crate::collector::test_support::{fake_converter, write_plan};
        use tempfile::TempDir;

        fn fixture_settings(temp: &TempDir) -> Settings {
            Settings {
                terraform_binary_file: fake_converter().display().to_string(),
                terraform_plan_search_folder: temp.path().display().to_string(),
                ..settings(&["all"], &["null_resource"])
            }
        }

        #[tokio::test]
        async fn test_two_plans_consolidated() {
            let temp = TempDir::new().expect("Failed to create temp dir");
            write_plan(
                temp.path(),
                "live/network/plan.bin",
                &[("aws_vpc", "main", "create"), ("aws_instance", "old", "delete")],
            );
            write_plan(temp.path(), "live/iam/plan.bin", &[("aws_iam_role", "ci", "update")]);
            write_plan(temp.path(), "live/iam/notes.txt", &[("ignored", "x", "delete")]);

            let settings = fixture_settings(&temp);
            let auditor = Auditor::new(&settings)
                .expect("auditor should build")
                .with_parallelism(Some(2));

            let result = auditor.collect().await.expect("collect should succeed");
            assert_eq!(result.created.len(), 1);
            assert_eq!(result.deleted.len(), 1);
            assert_eq!(result.updated.len(), 1);
            assert!(result.unchanged.is_empty());
            assert_eq!(result.total_count(), 3);

            let decision = auditor.decision_maker();
            let _ = build_sections(&result, &decision);
            assert!(matches!(
                check_gate(&result, &decision),
                Err(ReporterError::CriticalRemovals { count: 1 })
            ));
        }

        #[tokio::test]
        async fn test_no_chdir_strategy() {
            let temp = TempDir::new().expect("Failed to create temp dir");
            write_plan(temp.path(), "a/plan.bin", &[("null_resource", "hook", "delete")]);

            let mut settings = fixture_settings(&temp);
            settings.not_use_chdir = true;

            let auditor = Auditor::new(&settings).expect("auditor should build");
            let result = auditor.collect().await.expect("collect should succeed");

            let decision = auditor.decision_maker();
            let _ = build_sections(&result, &decision);
            assert!(check_gate(&result, &decision).is_ok());
        }

        #[tokio::test]
        async fn test_zero_plans() {
            let temp = TempDir::new().expect("Failed to create temp dir");
            let settings = fixture_settings(&temp);

            let result = Auditor::new(&settings)
                .expect("auditor should build")
                .collect()
                .await
                .expect("an empty search is not an error by default");
            assert_eq!(result.total_count(), 0);

            let failing = Auditor::new(&settings)
                .expect("auditor should build")
                .fail_on_zero_plans(true)
                .collect()
                .await;
            assert!(matches!(
                failing,
                Err(ReporterError::Collect(CollectError::NoPlansFound { .. }))
            ));
        }

        #[tokio::test]
        async fn test_one_broken_plan_fails_the_run() {
            let temp = TempDir::new().expect("Failed to create temp dir");
            write_plan(temp.path(), "ok/plan.bin", &[("aws_vpc", "main", "create")]);
            let broken = temp.path().join("broken/plan.bin");
            std::fs::create_dir_all(temp.path().join("broken")).expect("Failed to create dir");
            std::fs::write(&broken, "not json").expect("Failed to write plan");

            let settings = fixture_settings(&temp);
            let result = Auditor::new(&settings)
                .expect("auditor should build")
                .collect()
                .await;
            assert!(matches!(
                result,
                Err(ReporterError::Collect(CollectError::Decode { .. }))
            ));
        }
    }
}
