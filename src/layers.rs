use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Elastic properties of one rock unit: P-wave velocity (m/s) and bulk
/// density (g/cm³).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RockLayer {
    pub velocity: f64,
    pub density: f64,
}

impl RockLayer {
    pub fn new(velocity: f64, density: f64) -> Self {
        Self { velocity, density }
    }

    /// Acoustic impedance, velocity × density.
    pub fn impedance(&self) -> f64 {
        self.velocity * self.density
    }

    fn validate(&self, position: LayerLabel) -> Result<(), LayerError> {
        if !(self.velocity.is_finite() && self.velocity > 0.) {
            return Err(LayerError::InvalidVelocity(position, self.velocity));
        }
        if !(self.density.is_finite() && self.density > 0.) {
            return Err(LayerError::InvalidDensity(position, self.density));
        }
        Ok(())
    }
}

impl fmt::Display for RockLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vp={} m/s, rho={} g/cm3", self.velocity, self.density)
    }
}

/// Which of the three units a model cell belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerLabel {
    Upper,
    Wedge,
    Lower,
}

impl fmt::Display for LayerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerLabel::Upper => "upper",
            LayerLabel::Wedge => "wedge",
            LayerLabel::Lower => "lower",
        };
        write!(f, "{}", name)
    }
}

/// The upper half-space, the wedge and the lower half-space.
///
/// Only constructible through [`LayerStack::new`], so every stack in
/// circulation has strictly positive, finite velocities and densities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerStack {
    upper: RockLayer,
    wedge: RockLayer,
    lower: RockLayer,
}

impl LayerStack {
    pub fn new(upper: RockLayer, wedge: RockLayer, lower: RockLayer) -> Result<Self, LayerError> {
        upper.validate(LayerLabel::Upper)?;
        wedge.validate(LayerLabel::Wedge)?;
        lower.validate(LayerLabel::Lower)?;
        Ok(Self {
            upper,
            wedge,
            lower,
        })
    }

    pub fn layer(&self, label: LayerLabel) -> &RockLayer {
        match label {
            LayerLabel::Upper => &self.upper,
            LayerLabel::Wedge => &self.wedge,
            LayerLabel::Lower => &self.lower,
        }
    }

    pub fn upper(&self) -> &RockLayer {
        &self.upper
    }

    pub fn wedge(&self) -> &RockLayer {
        &self.wedge
    }

    pub fn lower(&self) -> &RockLayer {
        &self.lower
    }

    pub fn impedance(&self, label: LayerLabel) -> f64 {
        self.layer(label).impedance()
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum LayerError {
    #[error("{0} layer velocity must be positive and finite, but got {1}")]
    InvalidVelocity(LayerLabel, f64),
    #[error("{0} layer density must be positive and finite, but got {1}")]
    InvalidDensity(LayerLabel, f64),
}
