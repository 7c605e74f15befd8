use super::model::{Catalog, PumpField, PumpRecord};

// ---------------------------------------------------------------------------
// Requirement – the normalised search target
// ---------------------------------------------------------------------------

/// A categorical selector: either "show all" or one exact value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Choice<T> {
    #[default]
    Any,
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    /// `true` when the selector is a wildcard or equals `value`.
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::Any => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

/// Inclusive power window applied by the advanced filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerRange {
    pub min_kw: f64,
    pub max_kw: f64,
}

/// The user's target, rebuilt from the form on every search.
///
/// Zero flow, head or particle size means "no constraint" for that field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Requirement {
    pub flow_lpm: f64,
    pub head_m: f64,
    pub particle_size_mm: f64,
    pub category: Choice<String>,
    pub frequency: Choice<f64>,
    pub phase: Choice<u8>,
    /// `Some` only while the advanced filter is switched on.
    pub power: Option<PowerRange>,
}

impl Requirement {
    /// Clamp negative or non-finite numbers to zero.
    pub fn sanitized(mut self) -> Self {
        self.flow_lpm = non_negative(self.flow_lpm);
        self.head_m = non_negative(self.head_m);
        self.particle_size_mm = non_negative(self.particle_size_mm);
        self
    }
}

pub(crate) fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return the pumps satisfying every active predicate, in catalog order.
///
/// Predicates run in a fixed order and each one is skipped when its
/// requirement field is a wildcard / zero, or when the catalog lacks the
/// column it depends on.
pub fn filter_catalog<'a>(catalog: &'a Catalog, requirement: &Requirement) -> Vec<&'a PumpRecord> {
    let req = requirement.clone().sanitized();

    let by_frequency = catalog.has(PumpField::Frequency);
    let by_phase = catalog.has(PumpField::Phase);
    let by_category = catalog.has(PumpField::Category);
    let by_particle = catalog.has(PumpField::ParticleSize) && req.particle_size_mm > 0.0;
    let power = req.power.filter(|_| catalog.has(PumpField::Power));

    catalog
        .pumps
        .iter()
        .filter(|pump| {
            if by_frequency && !req.frequency.admits(&pump.frequency_hz) {
                return false;
            }
            if by_phase && !req.phase.admits(&pump.phase) {
                return false;
            }
            if by_category && !req.category.admits(&pump.category) {
                return false;
            }
            if req.flow_lpm > 0.0 && pump.rated_flow_lpm < req.flow_lpm {
                return false;
            }
            if req.head_m > 0.0 && pump.rated_head_m < req.head_m {
                return false;
            }
            if by_particle && pump.particle_size_mm.unwrap_or(0.0) < req.particle_size_mm {
                return false;
            }
            if let Some(range) = power {
                let kw = pump.power_kw.unwrap_or(0.0);
                if kw < range.min_kw || kw > range.max_kw {
                    return false;
                }
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{catalog, mixed_catalog, pump};
    use std::collections::BTreeSet;

    fn models(subset: &[&PumpRecord]) -> Vec<String> {
        subset.iter().map(|p| p.model.clone()).collect()
    }

    #[test]
    fn zero_requirement_keeps_every_row() {
        let catalog = mixed_catalog();
        let subset = filter_catalog(&catalog, &Requirement::default());
        assert_eq!(subset.len(), catalog.len());
    }

    #[test]
    fn categorical_predicates() {
        let catalog = mixed_catalog();
        let req = Requirement {
            frequency: Choice::Only(50.0),
            phase: Choice::Only(1),
            ..Default::default()
        };
        assert_eq!(models(&filter_catalog(&catalog, &req)), vec!["SW-050", "BT-120"]);

        let req = Requirement {
            category: Choice::Only("Booster".to_string()),
            ..Default::default()
        };
        assert_eq!(models(&filter_catalog(&catalog, &req)), vec!["BT-120", "BT-120-60"]);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let catalog = mixed_catalog();
        let req = Requirement {
            flow_lpm: 120.0,
            head_m: 20.0,
            ..Default::default()
        };
        assert_eq!(models(&filter_catalog(&catalog, &req)), vec!["BT-120", "BT-120-60"]);
    }

    #[test]
    fn raising_thresholds_never_grows_the_subset() {
        let catalog = mixed_catalog();
        let mut previous = usize::MAX;
        for step in 0..20 {
            let req = Requirement {
                flow_lpm: step as f64 * 25.0,
                head_m: step as f64 * 2.0,
                ..Default::default()
            };
            let n = filter_catalog(&catalog, &req).len();
            assert!(n <= previous, "step {step}: {n} > {previous}");
            previous = n;
        }
    }

    #[test]
    fn particle_filter_needs_column_and_positive_size() {
        let catalog = mixed_catalog();
        let req = Requirement {
            particle_size_mm: 20.0,
            ..Default::default()
        };
        assert_eq!(models(&filter_catalog(&catalog, &req)), vec!["SW-200"]);

        let mut no_column = catalog.clone();
        no_column.present.remove(&PumpField::ParticleSize);
        assert_eq!(filter_catalog(&no_column, &req).len(), catalog.len());
    }

    #[test]
    fn power_range_only_when_enabled() {
        let catalog = mixed_catalog();
        let req = Requirement {
            power: Some(PowerRange { min_kw: 0.5, max_kw: 1.5 }),
            ..Default::default()
        };
        assert_eq!(
            models(&filter_catalog(&catalog, &req)),
            vec!["BT-120", "BT-120-60", "DW-30"]
        );

        let degenerate = Requirement {
            power: Some(PowerRange { min_kw: 3.0, max_kw: 1.0 }),
            ..Default::default()
        };
        assert!(filter_catalog(&catalog, &degenerate).is_empty());
    }

    #[test]
    fn missing_categorical_columns_disable_their_predicates() {
        let c = Catalog::from_pumps(
            vec![pump("X", "", 0.0, 0, 100.0, 10.0)],
            BTreeSet::from([PumpField::Model, PumpField::RatedFlow, PumpField::RatedHead]),
        );
        let req = Requirement {
            frequency: Choice::Only(50.0),
            phase: Choice::Only(3),
            category: Choice::Only("Booster".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_catalog(&c, &req).len(), 1);
    }

    #[test]
    fn unparsable_flow_never_meets_a_positive_requirement() {
        let c = catalog(vec![pump("BAD", "Booster", 50.0, 1, 0.0, 30.0)]);
        let req = Requirement {
            flow_lpm: 1.0,
            ..Default::default()
        };
        assert!(filter_catalog(&c, &req).is_empty());
    }

    #[test]
    fn negative_inputs_are_treated_as_unconstrained() {
        let catalog = mixed_catalog();
        let req = Requirement {
            flow_lpm: -10.0,
            head_m: f64::NAN,
            ..Default::default()
        };
        assert_eq!(filter_catalog(&catalog, &req).len(), catalog.len());
    }
}
