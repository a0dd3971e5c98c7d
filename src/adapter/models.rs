//! Candidate paths for each simulated model

use super::orientation::QuaternionDecode;
use super::probe::SignalSource;
use super::{ModelKind, Quantity, SignalAdapter};

const POSITION: &[&str] = &[
    "/results/model/bodies/{body}/position",
    "/results/bodies/{body}/position",
];

/// Position candidates plus the legacy single-column heave field
const POSITION_OR_Z: &[&str] = &[
    "/results/model/bodies/{body}/position",
    "/results/bodies/{body}/position",
    "/results/bodies/{body}/z",
];

const ORIENTATION_XYZ: &[&str] = &[
    "/results/model/bodies/{body}/orientation_xyz",
    "/results/bodies/{body}/orientation_xyz",
];

const ORIENTATION_QUATERNION: &[&str] = &[
    "/results/model/bodies/{body}/orientation_quaternion",
    "/results/bodies/{body}/orientation_quaternion",
];

const HEAVE: &[SignalSource] = &[SignalSource::Position {
    paths: POSITION_OR_Z,
    quantity: Quantity::Heave,
}];

/// Floating three-body flap system
///
/// DT1 looks at base surge, DT2 at base pitch and DT3 at both flap pitches.
#[derive(Debug, Clone, Copy, Default)]
pub struct F3ofAdapter;

const F3OF_PITCH: &[SignalSource] = &[
    SignalSource::AngleField {
        paths: ORIENTATION_XYZ,
    },
    SignalSource::Quaternion {
        paths: ORIENTATION_QUATERNION,
        decode: QuaternionDecode::Cardan,
    },
];

const F3OF_SURGE: &[SignalSource] = &[SignalSource::Position {
    paths: POSITION,
    quantity: Quantity::Surge,
}];

impl SignalAdapter for F3ofAdapter {
    fn model(&self) -> ModelKind {
        ModelKind::F3of
    }

    fn sources(&self, quantity: Quantity) -> &'static [SignalSource] {
        match quantity {
            Quantity::Pitch => F3OF_PITCH,
            Quantity::Surge => F3OF_SURGE,
            Quantity::Heave => &[],
        }
    }
}

/// Hinged flap
///
/// Flap pitch is preferred. Older exports only carry the full orientation
/// quaternion under `orientation`; when neither angle source exists the flap
/// heave is compared instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct OswecAdapter;

const OSWEC_PITCH: &[SignalSource] = &[
    SignalSource::AngleField {
        paths: &["/results/model/bodies/{body}/orientation_xyz"],
    },
    SignalSource::Quaternion {
        paths: &["/results/model/bodies/{body}/orientation"],
        decode: QuaternionDecode::RotationMatrix,
    },
    SignalSource::Position {
        paths: POSITION_OR_Z,
        quantity: Quantity::Heave,
    },
];

impl SignalAdapter for OswecAdapter {
    fn model(&self) -> ModelKind {
        ModelKind::Oswec
    }

    fn sources(&self, quantity: Quantity) -> &'static [SignalSource] {
        match quantity {
            Quantity::Pitch => OSWEC_PITCH,
            Quantity::Heave => HEAVE,
            Quantity::Surge => &[],
        }
    }
}

/// IEA floating sphere, heave only
#[derive(Debug, Clone, Copy, Default)]
pub struct IeaSphereAdapter;

impl SignalAdapter for IeaSphereAdapter {
    fn model(&self) -> ModelKind {
        ModelKind::IeaSphere
    }

    fn sources(&self, quantity: Quantity) -> &'static [SignalSource] {
        match quantity {
            Quantity::Heave => HEAVE,
            Quantity::Surge | Quantity::Pitch => &[],
        }
    }
}

/// Two-body point absorber: float (body1) and plate (body2) heave
#[derive(Debug, Clone, Copy, Default)]
pub struct Rm3Adapter;

impl SignalAdapter for Rm3Adapter {
    fn model(&self) -> ModelKind {
        ModelKind::Rm3
    }

    fn sources(&self, quantity: Quantity) -> &'static [SignalSource] {
        match quantity {
            Quantity::Heave => HEAVE,
            Quantity::Surge | Quantity::Pitch => &[],
        }
    }
}
