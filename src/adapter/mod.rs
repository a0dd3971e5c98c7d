//! Per-model signal adapters
//!
//! An adapter knows where a simulated model writes the physically meaningful
//! signal for each test variant, e.g. "pitch of body2" for the fore flap of
//! F3OF or "heave of body1" for the IEA sphere.
//!
//! ```text
//!  (ModelKind, TestVariant)
//!        │ table::resolve_strategy
//!        ▼
//!   Strategy::Single / Bundle ──► SignalTarget { body, quantity }
//!        │ SignalAdapter::sources(quantity)
//!        ▼
//!   probe::resolve  (ordered candidate paths, first hit wins)
//!        │
//!        ▼
//!   NamedSignal / SignalBundle
//! ```
//!
//! Adapters are compiled in and looked up through [`adapter_for`].

mod models;
pub mod orientation;
pub mod probe;
pub mod table;

pub use models::{F3ofAdapter, IeaSphereAdapter, OswecAdapter, Rm3Adapter};
pub use orientation::QuaternionDecode;
pub use probe::SignalSource;
pub use table::{resolve_strategy, SignalTarget, Strategy};

use crate::container::{open_container, ResultContainer};
use crate::error::{RegressError, Result};
use crate::series::{NamedSignal, SignalBundle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Simulated physical model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Floating three-body flap system (base + fore/aft flaps)
    F3of,
    /// Hinged oscillating surge wave energy converter
    Oswec,
    /// IEA single floating sphere
    #[serde(alias = "sphere")]
    IeaSphere,
    /// Two-body point absorber (float + plate)
    Rm3,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::IeaSphere,
        ModelKind::Oswec,
        ModelKind::Rm3,
        ModelKind::F3of,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::F3of => "f3of",
            ModelKind::Oswec => "oswec",
            ModelKind::IeaSphere => "iea_sphere",
            ModelKind::Rm3 => "rm3",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f3of" => Ok(ModelKind::F3of),
            "oswec" => Ok(ModelKind::Oswec),
            "iea_sphere" | "sphere" => Ok(ModelKind::IeaSphere),
            "rm3" => Ok(ModelKind::Rm3),
            other => Err(format!(
                "unknown model '{other}' (expected one of: f3of, oswec, iea_sphere, rm3)"
            )),
        }
    }
}

/// Physical quantity a signal target asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Surge,
    Heave,
    Pitch,
}

impl Quantity {
    pub const fn name(&self) -> &'static str {
        match self {
            Quantity::Surge => "surge",
            Quantity::Heave => "heave",
            Quantity::Pitch => "pitch",
        }
    }

    pub const fn unit_label(&self) -> &'static str {
        match self {
            Quantity::Surge => "Surge (m)",
            Quantity::Heave => "Heave (m)",
            Quantity::Pitch => "Pitch (rad)",
        }
    }

    /// Column of a position dataset holding this component
    pub const fn axis(&self) -> Option<usize> {
        match self {
            Quantity::Surge => Some(0),
            Quantity::Heave => Some(2),
            Quantity::Pitch => None,
        }
    }
}

/// Test sub-type such as `decay`, `decay_dt2`; stored lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TestVariant(String);

impl TestVariant {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TestVariant {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<TestVariant> for String {
    fn from(v: TestVariant) -> Self {
        v.0
    }
}

impl From<&str> for TestVariant {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for TestVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A (model, variant) pair, written `model/variant`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelVariant {
    pub model: ModelKind,
    pub variant: TestVariant,
}

impl ModelVariant {
    pub fn new(model: ModelKind, variant: impl Into<TestVariant>) -> Self {
        Self {
            model,
            variant: variant.into(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        resolve_strategy(self.model, self.variant.as_str())
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.model, self.variant)
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (model, variant) = s
            .split_once('/')
            .ok_or_else(|| format!("expected MODEL/VARIANT, got '{s}'"))?;
        if variant.trim().is_empty() {
            return Err(format!("empty variant in '{s}'"));
        }
        Ok(Self::new(model.parse()?, variant))
    }
}

/// Semantic signal extraction for one simulated model
pub trait SignalAdapter: Sync {
    fn model(&self) -> ModelKind;

    /// Ordered sources that yield `quantity`; empty if the model never
    /// reports it.
    fn sources(&self, quantity: Quantity) -> &'static [SignalSource];

    fn strategy(&self, variant: &TestVariant) -> Strategy {
        resolve_strategy(self.model(), variant.as_str())
    }

    /// The variant's signal, or its primary signal for bundle strategies
    fn extract(&self, container: &dyn ResultContainer, variant: &TestVariant) -> Result<NamedSignal> {
        let strategy = self.strategy(variant);
        let target = strategy
            .targets()
            .first()
            .copied()
            .ok_or_else(|| self.unsupported(variant))?;

        let time = probe::find_time(container)?;
        self.extract_target(container, &time, &target, variant)
    }

    /// Every signal of the variant, in strategy order
    ///
    /// Single-signal strategies give a one-entry bundle named after the
    /// quantity.
    fn extract_bundle(
        &self,
        container: &dyn ResultContainer,
        variant: &TestVariant,
    ) -> Result<SignalBundle> {
        let strategy = self.strategy(variant);
        if strategy.targets().is_empty() {
            return Err(self.unsupported(variant));
        }

        let time = probe::find_time(container)?;
        let mut bundle = SignalBundle::new();
        for target in strategy.targets() {
            let signal = self.extract_target(container, &time, target, variant)?;
            bundle.insert(target.name, signal);
        }
        Ok(bundle)
    }

    /// [`extract_bundle`](Self::extract_bundle) that leaves out members the
    /// container does not hold
    ///
    /// Used for references written by older runs. Fails only when no member
    /// is found at all.
    fn extract_available(
        &self,
        container: &dyn ResultContainer,
        variant: &TestVariant,
    ) -> Result<SignalBundle> {
        let strategy = self.strategy(variant);
        if strategy.targets().is_empty() {
            return Err(self.unsupported(variant));
        }

        let time = probe::find_time(container)?;
        let mut bundle = SignalBundle::new();
        let mut missing = None;
        for target in strategy.targets() {
            match self.extract_target(container, &time, target, variant) {
                Ok(signal) => bundle.insert(target.name, signal),
                Err(err @ RegressError::SignalNotFound { .. }) => {
                    tracing::debug!(body = target.body, signal = target.name, "signal absent; left out");
                    missing.get_or_insert(err);
                }
                Err(err) => return Err(err),
            }
        }

        match missing {
            Some(err) if bundle.is_empty() => Err(err),
            _ => Ok(bundle),
        }
    }

    fn extract_target(
        &self,
        container: &dyn ResultContainer,
        time: &[f64],
        target: &SignalTarget,
        variant: &TestVariant,
    ) -> Result<NamedSignal> {
        tracing::debug!(
            model = %self.model(),
            %variant,
            body = target.body,
            quantity = target.quantity.name(),
            "extracting signal"
        );
        probe::resolve(
            container,
            time,
            self.sources(target.quantity),
            target.body,
            variant.as_str(),
        )
    }

    fn unsupported(&self, variant: &TestVariant) -> RegressError {
        RegressError::UnsupportedVariant {
            model: self.model().to_string(),
            variant: variant.to_string(),
        }
    }
}

static F3OF: F3ofAdapter = F3ofAdapter;
static OSWEC: OswecAdapter = OswecAdapter;
static IEA_SPHERE: IeaSphereAdapter = IeaSphereAdapter;
static RM3: Rm3Adapter = Rm3Adapter;

/// Compiled adapter for `model`
pub fn adapter_for(model: ModelKind) -> &'static dyn SignalAdapter {
    match model {
        ModelKind::F3of => &F3OF,
        ModelKind::Oswec => &OSWEC,
        ModelKind::IeaSphere => &IEA_SPHERE,
        ModelKind::Rm3 => &RM3,
    }
}

/// Open `path` and extract the bundle for `case`
pub fn extract_bundle_from_file(path: &Path, case: &ModelVariant) -> Result<SignalBundle> {
    let container = open_container(path)?;
    adapter_for(case.model).extract_bundle(container.as_ref(), &case.variant)
}

/// Open a reference container and extract whichever bundle members it holds
pub fn extract_reference_from_file(path: &Path, case: &ModelVariant) -> Result<SignalBundle> {
    let container = open_container(path)?;
    adapter_for(case.model).extract_available(container.as_ref(), &case.variant)
}

#[cfg(test)]
mod tests;
