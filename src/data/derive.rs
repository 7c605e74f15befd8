use super::filter::non_negative;

/// Typical draw of one open faucet.
pub const LPM_PER_FAUCET: f64 = 15.0;
/// Head needed to lift water one storey.
pub const METERS_PER_FLOOR: f64 = 3.5;

// ---------------------------------------------------------------------------
// AutoField – a form value that may still follow its suggestion
// ---------------------------------------------------------------------------

/// A form field seeded from a derived suggestion until the user edits it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoField {
    pub value: f64,
    /// `true` while the value still tracks the suggestion.
    pub is_auto: bool,
}

impl Default for AutoField {
    fn default() -> Self {
        Self {
            value: 0.0,
            is_auto: true,
        }
    }
}

impl AutoField {
    /// Apply a fresh suggestion; ignored once the field is overridden.
    pub fn suggest(&mut self, suggestion: f64) {
        if self.is_auto {
            self.value = suggestion;
        }
    }

    /// Record a manual edit. From now on suggestions no longer apply.
    pub fn set_manual(&mut self, value: f64) {
        self.value = value;
        self.is_auto = false;
    }

    /// Return to tracking suggestions, taking `suggestion` immediately.
    pub fn reset(&mut self, suggestion: f64) {
        self.is_auto = true;
        self.value = suggestion;
    }
}

// ---------------------------------------------------------------------------
// Site inputs → derived (flow, head)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PondSpec {
    pub length_m: f64,
    pub width_m: f64,
    pub height_m: f64,
    pub drain_hours: f64,
}

impl PondSpec {
    pub fn volume_liters(&self) -> f64 {
        non_negative(self.length_m) * non_negative(self.width_m) * non_negative(self.height_m) * 1000.0
    }

    /// Flow needed to empty the pond in the drain time; 0 without a drain time.
    pub fn drain_lpm(&self) -> f64 {
        let minutes = self.drain_hours * 60.0;
        if minutes.is_nan() || minutes <= 0.0 {
            return 0.0;
        }
        non_negative(self.volume_liters() / minutes)
    }
}

/// Optional building / pond / burial inputs from the search form.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SiteInputs {
    pub floors: u32,
    pub faucets: u32,
    pub pond: PondSpec,
    pub underground_depth_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedRequirement {
    pub flow_lpm: f64,
    pub head_m: f64,
}

/// Booster categories are the ones where floors and faucets apply.
pub fn is_booster_category(category: &str) -> bool {
    category.to_ascii_lowercase().contains("booster")
}

/// Turn site inputs into a suggested (flow, head). Both outputs are ≥ 0.
///
/// Floor and faucet terms only count for booster categories. A burial depth
/// overrides every other head source.
pub fn derive_requirement(inputs: &SiteInputs, booster: bool) -> DerivedRequirement {
    let pond_flow = inputs.pond.drain_lpm();
    let pond_head = non_negative(inputs.pond.height_m);

    let (faucet_flow, floor_head) = if booster {
        (
            inputs.faucets as f64 * LPM_PER_FAUCET,
            inputs.floors as f64 * METERS_PER_FLOOR,
        )
    } else {
        (0.0, 0.0)
    };

    let depth = non_negative(inputs.underground_depth_m);
    let head_m = if depth > 0.0 { depth } else { floor_head.max(pond_head) };

    DerivedRequirement {
        flow_lpm: faucet_flow.max(pond_flow),
        head_m,
    }
}
