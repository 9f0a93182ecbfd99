//! Rule documents - modifier multipliers and absolute overrides
//!
//! Both documents are operator-edited and read once at startup. Only the
//! dispenser sections take part in rate derivation; the remaining sections
//! (pickups, survey charges, quarries, pump jacks, excavator) are carried as
//! data for the host, including their cadence fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::{EntityKind, ItemId, YieldCategory};

/// Key matching every item without an explicit multiplier
pub const WILDCARD: &str = "*";

/// Errors for rule documents that cannot be applied
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleValidationError {
    #[error("{section}[{key}] is not a finite number")]
    NonFinite { section: String, key: String },
    #[error("{section}[{key}] must not be negative")]
    Negative { section: String, key: String },
    #[error("{section}.{field} must be greater than zero")]
    NonPositiveCadence { section: String, field: String },
}

fn check_amount(section: &str, key: &str, value: f32) -> Result<(), RuleValidationError> {
    if !value.is_finite() {
        return Err(RuleValidationError::NonFinite {
            section: section.to_string(),
            key: key.to_string(),
        });
    }
    if value < 0.0 {
        return Err(RuleValidationError::Negative {
            section: section.to_string(),
            key: key.to_string(),
        });
    }
    Ok(())
}

fn check_cadence(section: &str, field: &str, value: f32) -> Result<(), RuleValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(RuleValidationError::NonPositiveCadence {
            section: section.to_string(),
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Per-item multipliers with a `"*"` fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierRule(BTreeMap<String, f32>);

impl Default for ModifierRule {
    fn default() -> Self {
        Self(BTreeMap::from([(WILDCARD.to_string(), 1.0)]))
    }
}

#[cfg(test)]
impl ModifierRule {
    /// A rule without any entries, not even the wildcard
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, key: impl Into<String>, multiplier: f32) -> Self {
        self.0.insert(key.into(), multiplier);
        self
    }
}

impl ModifierRule {
    /// Exact item first, then the wildcard, then 1.0
    pub fn multiplier_for(&self, item: &ItemId) -> f32 {
        self.0
            .get(item.as_str())
            .or_else(|| self.0.get(WILDCARD))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn validate(&self, section: &str) -> Result<(), RuleValidationError> {
        for (key, multiplier) in &self.0 {
            check_amount(section, key, *multiplier)?;
        }
        Ok(())
    }
}

/// Quarry-like producer options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct QuarryOptions {
    pub modifiers: ModifierRule,
    /// Seconds between production ticks, passed through to the host
    pub tick_rate: f32,
}

impl Default for QuarryOptions {
    fn default() -> Self {
        Self {
            modifiers: ModifierRule::default(),
            tick_rate: 5.0,
        }
    }
}

impl QuarryOptions {
    fn validate(&self, section: &str) -> Result<(), RuleValidationError> {
        self.modifiers.validate(&format!("{section}.Modifiers"))?;
        check_cadence(section, "TickRate", self.tick_rate)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct QuarriesOptions {
    pub stone: QuarryOptions,
    pub high_quality: QuarryOptions,
    pub sulfur: QuarryOptions,
    pub player_placed: QuarryOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PumpJacksOptions {
    pub monument: QuarryOptions,
    pub player_placed: QuarryOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExcavatorOptions {
    pub tick_rate: f32,
    pub time_for_full_resources: f32,
}

impl Default for ExcavatorOptions {
    fn default() -> Self {
        Self {
            tick_rate: 5.0,
            time_for_full_resources: 120.0,
        }
    }
}

/// The Modifiers document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ModifiersConfig {
    pub resource_dispensers: ModifierRule,
    pub resource_pickups: ModifierRule,
    pub survey_charge_explo: ModifierRule,
    pub mining_quarries: QuarriesOptions,
    pub pump_jacks: PumpJacksOptions,
    pub excavator: ExcavatorOptions,
}

impl ModifiersConfig {
    /// Check the multipliers used for rate derivation
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        self.resource_dispensers.validate("ResourceDispensers")
    }

    /// Problems in the sections that are only carried for the host
    pub fn pass_through_issues(&self) -> Vec<RuleValidationError> {
        let quarries = &self.mining_quarries;
        [
            self.resource_pickups.validate("ResourcePickups"),
            self.survey_charge_explo.validate("SurveyChargeExplo"),
            quarries.stone.validate("MiningQuarries.Stone"),
            quarries.high_quality.validate("MiningQuarries.HighQuality"),
            quarries.sulfur.validate("MiningQuarries.Sulfur"),
            quarries.player_placed.validate("MiningQuarries.PlayerPlaced"),
            self.pump_jacks.monument.validate("PumpJacks.Monument"),
            self.pump_jacks.player_placed.validate("PumpJacks.PlayerPlaced"),
            check_cadence("Excavator", "TickRate", self.excavator.tick_rate),
            check_cadence(
                "Excavator",
                "TimeForFullResources",
                self.excavator.time_for_full_resources,
            ),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }
}

/// Absolute amounts replacing a dispenser kind's baseline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DispenserOverride {
    pub contained_items: BTreeMap<ItemId, f32>,
    pub finish_bonus: BTreeMap<ItemId, f32>,
}

impl DispenserOverride {
    fn bucket(&self, category: &YieldCategory) -> Option<&BTreeMap<ItemId, f32>> {
        match category.as_str() {
            YieldCategory::CONTAINED_ITEMS => Some(&self.contained_items),
            YieldCategory::FINISH_BONUS => Some(&self.finish_bonus),
            _ => None,
        }
    }

    pub fn amount_for(&self, category: &YieldCategory, item: &ItemId) -> Option<f32> {
        self.bucket(category).and_then(|items| items.get(item)).copied()
    }

    /// Every (category, item, amount) this override lists
    pub fn entries(&self) -> impl Iterator<Item = (YieldCategory, &ItemId, f32)> {
        let contained = self
            .contained_items
            .iter()
            .map(|(item, amount)| (YieldCategory::contained_items(), item, *amount));
        let bonus = self
            .finish_bonus
            .iter()
            .map(|(item, amount)| (YieldCategory::finish_bonus(), item, *amount));
        contained.chain(bonus)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OverridesSection {
    pub dispensers: BTreeMap<EntityKind, DispenserOverride>,
    pub pickup: BTreeMap<EntityKind, BTreeMap<ItemId, f32>>,
    pub survey: BTreeMap<ItemId, f32>,
}

/// The Overrides document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OverridesConfig {
    pub overrides: OverridesSection,
}

impl OverridesConfig {
    /// Check the dispenser overrides used for rate derivation
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        for (kind, rule) in &self.overrides.dispensers {
            for (category, item, amount) in rule.entries() {
                check_amount(
                    &format!("Overrides.Dispensers[{kind}].{category}"),
                    item.as_str(),
                    amount,
                )?;
            }
        }
        Ok(())
    }

    /// Problems in the pickup and survey overrides, which are only carried
    pub fn pass_through_issues(&self) -> Vec<RuleValidationError> {
        let pickups = self.overrides.pickup.iter().flat_map(|(kind, items)| {
            items
                .iter()
                .map(move |(item, amount)| check_amount(&format!("Overrides.Pickup[{kind}]"), item.as_str(), *amount))
        });
        let survey = self
            .overrides
            .survey
            .iter()
            .map(|(item, amount)| check_amount("Overrides.Survey", item.as_str(), *amount));
        pickups.chain(survey).filter_map(Result::err).collect()
    }
}

/// The parts of the rule documents that decide derived dispenser rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleSnapshot {
    pub resource_dispensers: ModifierRule,
    pub dispenser_overrides: BTreeMap<EntityKind, DispenserOverride>,
}

/// Both rule documents together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub modifiers: ModifiersConfig,
    pub overrides: OverridesConfig,
}

impl RuleSet {
    pub fn new(modifiers: ModifiersConfig, overrides: OverridesConfig) -> Self {
        Self { modifiers, overrides }
    }

    /// Fails when derivation cannot use the rules
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        self.modifiers.validate()?;
        self.overrides.validate()
    }

    /// Bad values in pass-through sections; they never stop startup
    pub fn pass_through_issues(&self) -> Vec<RuleValidationError> {
        let mut issues = self.modifiers.pass_through_issues();
        issues.extend(self.overrides.pass_through_issues());
        issues
    }

    pub fn dispenser_modifiers(&self) -> &ModifierRule {
        &self.modifiers.resource_dispensers
    }

    pub fn dispenser_override(&self, kind: &EntityKind) -> Option<&DispenserOverride> {
        self.overrides.overrides.dispensers.get(kind)
    }

    pub fn snapshot(&self) -> RuleSnapshot {
        RuleSnapshot {
            resource_dispensers: self.modifiers.resource_dispensers.clone(),
            dispenser_overrides: self.overrides.overrides.dispensers.clone(),
        }
    }
}
