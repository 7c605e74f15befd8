use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::color::CurvePalette;
use crate::config::AppConfig;
use crate::data::curve::{build_overlay, CurveOverlay};
use crate::data::derive::{derive_requirement, is_booster_category, AutoField, SiteInputs};
use crate::data::filter::{Choice, PowerRange, Requirement};
use crate::data::model::{Catalog, Table};
use crate::data::rank::{search, RankStrategy, SearchOutcome};
use crate::data::source::{load_catalog, FallbackSource, TableSource};
use crate::units::{FlowUnit, HeadUnit};

// ---------------------------------------------------------------------------
// Search form
// ---------------------------------------------------------------------------

/// Raw form values. Flow and head are held in the selected display units.
#[derive(Debug, Clone)]
pub struct SearchForm {
    pub frequency: Choice<f64>,
    pub phase: Choice<u8>,
    pub category: Choice<String>,
    pub flow_unit: FlowUnit,
    pub flow: AutoField,
    pub head_unit: HeadUnit,
    pub head: AutoField,
    pub particle_size_mm: f64,
    /// Enables the power window.
    pub advanced: bool,
    pub power_min_kw: f64,
    pub power_max_kw: f64,
    pub site: SiteInputs,
    pub strategy: RankStrategy,
    pub display_percent: u8,
}

impl SearchForm {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            frequency: Choice::Any,
            phase: Choice::Any,
            category: Choice::Any,
            flow_unit: FlowUnit::default(),
            flow: AutoField::default(),
            head_unit: HeadUnit::default(),
            head: AutoField::default(),
            particle_size_mm: 0.0,
            advanced: false,
            power_min_kw: 0.0,
            power_max_kw: 0.0,
            site: SiteInputs::default(),
            strategy: config.ranking,
            display_percent: config.display_percent,
        }
    }

    pub fn is_booster(&self) -> bool {
        matches!(&self.category, Choice::Only(c) if is_booster_category(c))
    }

    /// Suggested (flow, head) in the current display units.
    pub fn suggestions(&self) -> (f64, f64) {
        let derived = derive_requirement(&self.site, self.is_booster());
        (
            self.flow_unit.from_lpm(derived.flow_lpm),
            self.head_unit.from_meters(derived.head_m),
        )
    }

    /// Push fresh suggestions into fields that are still auto.
    pub fn refresh_suggestions(&mut self) {
        let (flow, head) = self.suggestions();
        self.flow.suggest(flow);
        self.head.suggest(head);
    }

    pub fn reset_flow(&mut self) {
        let (flow, _) = self.suggestions();
        self.flow.reset(flow);
    }

    pub fn reset_head(&mut self) {
        let (_, head) = self.suggestions();
        self.head.reset(head);
    }

    /// Build the normalised requirement for one search.
    pub fn requirement(&self) -> Requirement {
        Requirement {
            flow_lpm: self.flow_unit.to_lpm(self.flow.value),
            head_m: self.head_unit.to_meters(self.head.value),
            particle_size_mm: self.particle_size_mm,
            category: self.category.clone(),
            frequency: self.frequency.clone(),
            phase: self.phase.clone(),
            power: self.advanced.then_some(PowerRange {
                min_kw: self.power_min_kw,
                max_kw: self.power_max_kw,
            }),
        }
        .sanitized()
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded catalog snapshot (None until a load succeeds).
    pub catalog: Option<Catalog>,

    /// Loaded performance-curve table.
    pub curves: Option<Table>,

    pub form: SearchForm,

    /// Requirement used for the last search (drives the operating point).
    pub last_requirement: Option<Requirement>,

    /// Result of the last search; None before the first search.
    pub outcome: Option<SearchOutcome>,

    /// Models ticked for curve comparison.
    pub compare: BTreeSet<String>,

    /// Curves for `compare`, rebuilt whenever the selection changes.
    pub overlay: CurveOverlay,

    pub palette: CurvePalette,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            form: SearchForm::new(&config),
            config,
            catalog: None,
            curves: None,
            last_requirement: None,
            outcome: None,
            compare: BTreeSet::new(),
            overlay: CurveOverlay::default(),
            palette: CurvePalette::default(),
            status_message: None,
        }
    }

    /// Reload catalog and curves from the configured source chains.
    pub fn reload(&mut self) {
        let catalogs = FallbackSource::from_paths(&self.config.catalog_sources);
        let curves = FallbackSource::from_paths(&self.config.curve_sources);
        self.load_from(&catalogs, &curves);
    }

    pub fn load_from(&mut self, catalogs: &dyn TableSource, curves: &dyn TableSource) {
        let mut errors = Vec::new();

        match load_catalog(catalogs) {
            Ok(catalog) => self.set_catalog(catalog),
            Err(e) => {
                log::error!("Failed to load catalog: {e:#}");
                errors.push(format!("Catalog: {e:#}"));
            }
        }
        match curves.load() {
            Ok(table) => self.set_curves(table),
            Err(e) => {
                log::error!("Failed to load curves: {e:#}");
                errors.push(format!("Curves: {e:#}"));
            }
        }

        self.status_message = (!errors.is_empty()).then(|| errors.join("\n"));
    }

    /// Replace the catalog snapshot. Selections that no longer exist reset.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        if let Choice::Only(c) = &self.form.category {
            if !catalog.categories.contains(c) {
                self.form.category = Choice::Any;
            }
        }
        if let Choice::Only(f) = self.form.frequency {
            if !catalog.frequencies.contains(&f) {
                self.form.frequency = Choice::Any;
            }
        }
        if let Choice::Only(p) = self.form.phase {
            if !catalog.phases.contains(&p) {
                self.form.phase = Choice::Any;
            }
        }
        self.catalog = Some(catalog);
        self.outcome = None;
        self.compare.clear();
        self.rebuild_overlay();
        self.status_message = None;
    }

    pub fn set_curves(&mut self, table: Table) {
        self.curves = Some(table);
        self.rebuild_overlay();
    }

    /// Open a catalog file picked by the user, replacing the current one.
    pub fn open_catalog(&mut self, path: PathBuf) {
        let source = FallbackSource::from_paths(&[path]);
        match load_catalog(&source) {
            Ok(catalog) => self.set_catalog(catalog),
            Err(e) => {
                log::error!("Failed to load catalog: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn open_curves(&mut self, path: PathBuf) {
        let source = FallbackSource::from_paths(&[path]);
        match source.load() {
            Ok(table) => {
                self.set_curves(table);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load curves: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Run filter → rank → limit on the current form.
    pub fn run_search(&mut self) {
        let Some(catalog) = &self.catalog else {
            self.status_message = Some("No catalog loaded.".to_string());
            return;
        };
        let requirement = self.form.requirement();
        let outcome = search(
            catalog,
            &requirement,
            self.form.strategy,
            self.form.display_percent,
        );
        if let SearchOutcome::Matches(results) = &outcome {
            log::info!("Search returned {} pumps", results.len());
        } else {
            log::info!("Search returned no pumps");
        }
        self.last_requirement = Some(requirement);
        self.outcome = Some(outcome);
        self.rebuild_overlay();
    }

    pub fn set_compared(&mut self, model: &str, on: bool) {
        let changed = if on {
            self.compare.insert(model.to_string())
        } else {
            self.compare.remove(model)
        };
        if changed {
            self.rebuild_overlay();
        }
    }

    /// Recompute comparison curves and their colours.
    pub fn rebuild_overlay(&mut self) {
        let models: Vec<&String> = self.compare.iter().collect();
        self.palette = CurvePalette::new(&models);
        self.overlay = match &self.curves {
            Some(table) => build_overlay(table, &models, self.last_requirement.as_ref()),
            None => CurveOverlay::default(),
        };
    }

    /// Number of pumps in the last result set.
    pub fn match_count(&self) -> usize {
        match &self.outcome {
            Some(SearchOutcome::Matches(results)) => results.len(),
            _ => 0,
        }
    }
}
