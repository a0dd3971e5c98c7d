//! Static (model, variant) → extraction strategy table
//!
//! Every model has a default strategy, so any variant not listed here still
//! resolves to exactly one strategy unless it is explicitly unsupported.

use super::{ModelKind, Quantity};

/// Which body and quantity a named signal comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalTarget {
    pub name: &'static str,
    pub body: &'static str,
    pub quantity: Quantity,
}

impl SignalTarget {
    /// Target named after its quantity ("surge", "heave", "pitch")
    pub const fn of(body: &'static str, quantity: Quantity) -> Self {
        Self {
            name: quantity.name(),
            body,
            quantity,
        }
    }

    pub const fn named(name: &'static str, body: &'static str, quantity: Quantity) -> Self {
        Self {
            name,
            body,
            quantity,
        }
    }
}

/// Extraction strategy for one (model, variant) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One signal compared on its own
    Single(SignalTarget),
    /// Several signals scored independently; the first is the primary one
    Bundle(&'static [SignalTarget]),
    /// The variant exists but has no decay signal to compare
    Unsupported,
}

impl Strategy {
    pub fn targets(&self) -> &[SignalTarget] {
        match self {
            Strategy::Single(target) => std::slice::from_ref(target),
            Strategy::Bundle(targets) => targets,
            Strategy::Unsupported => &[],
        }
    }

    pub fn is_bundle(&self) -> bool {
        matches!(self, Strategy::Bundle(_))
    }
}

struct Entry {
    model: ModelKind,
    variant: &'static str,
    strategy: Strategy,
}

const F3OF_FLAPS: &[SignalTarget] = &[
    SignalTarget::named("fore", "body2", Quantity::Pitch),
    SignalTarget::named("aft", "body3", Quantity::Pitch),
];

const RM3_BODIES: &[SignalTarget] = &[
    SignalTarget::named("float", "body1", Quantity::Heave),
    SignalTarget::named("plate", "body2", Quantity::Heave),
];

const TABLE: &[Entry] = &[
    Entry {
        model: ModelKind::F3of,
        variant: "decay_dt1",
        strategy: Strategy::Single(SignalTarget::of("body1", Quantity::Surge)),
    },
    Entry {
        model: ModelKind::F3of,
        variant: "decay_dt2",
        strategy: Strategy::Single(SignalTarget::of("body1", Quantity::Pitch)),
    },
    Entry {
        model: ModelKind::F3of,
        variant: "decay_dt3",
        strategy: Strategy::Bundle(F3OF_FLAPS),
    },
    Entry {
        model: ModelKind::Oswec,
        variant: "decay",
        strategy: Strategy::Single(SignalTarget::of("body1", Quantity::Pitch)),
    },
    Entry {
        model: ModelKind::IeaSphere,
        variant: "decay",
        strategy: Strategy::Single(SignalTarget::of("body1", Quantity::Heave)),
    },
    Entry {
        model: ModelKind::Rm3,
        variant: "decay",
        strategy: Strategy::Bundle(RM3_BODIES),
    },
];

/// Wave-excitation runs: no free-decay signal exists
const UNSUPPORTED_VARIANTS: &[&str] = &["regular_waves", "irregular_waves"];

/// Strategy for variants not listed in the table
pub fn default_strategy(model: ModelKind) -> Strategy {
    match model {
        ModelKind::F3of => Strategy::Single(SignalTarget::of("body1", Quantity::Surge)),
        ModelKind::Oswec => Strategy::Single(SignalTarget::of("body1", Quantity::Pitch)),
        ModelKind::IeaSphere | ModelKind::Rm3 => {
            Strategy::Single(SignalTarget::of("body1", Quantity::Heave))
        }
    }
}

/// Look up the strategy for a (model, variant) pair
pub fn resolve_strategy(model: ModelKind, variant: &str) -> Strategy {
    if UNSUPPORTED_VARIANTS.contains(&variant) {
        return Strategy::Unsupported;
    }
    TABLE
        .iter()
        .find(|e| e.model == model && e.variant == variant)
        .map(|e| e.strategy)
        .unwrap_or_else(|| {
            tracing::debug!(model = %model, variant, "no table entry, using default strategy");
            default_strategy(model)
        })
}

/// Variants listed explicitly for `model`
pub fn known_variants(model: ModelKind) -> impl Iterator<Item = &'static str> {
    TABLE
        .iter()
        .filter(move |e| e.model == model)
        .map(|e| e.variant)
}
