use crate::errors::{SizingError, SizingResult};

/// Division of the propellant cavity between fuel and oxidizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropellantSplit {
    pub fuel_volume: f64,     // m³
    pub oxidizer_volume: f64, // m³
    pub fuel_mass: f64,       // kg
    pub oxidizer_mass: f64,   // kg
}

impl PropellantSplit {
    pub fn compute(
        propellant_volume: f64,
        oxidizer_density: f64,
        fuel_density: f64,
        mixture_ratio: f64,
    ) -> SizingResult<Self> {
        if oxidizer_density <= 0.0 || fuel_density <= 0.0 {
            return Err(SizingError::InvalidParameter(format!(
                "propellant densities must be positive, got oxidizer {} and fuel {}",
                oxidizer_density, fuel_density
            )));
        }
        if mixture_ratio <= 0.0 {
            return Err(SizingError::InvalidParameter(format!(
                "mixture ratio must be positive, got {}",
                mixture_ratio
            )));
        }
        if propellant_volume < 0.0 {
            return Err(SizingError::InvalidDesign(format!(
                "propellant volume must be non-negative, got {}",
                propellant_volume
            )));
        }

        let fuel_volume =
            propellant_volume * oxidizer_density / (mixture_ratio * fuel_density + oxidizer_density);
        let oxidizer_volume = propellant_volume - fuel_volume;

        Ok(PropellantSplit {
            fuel_volume,
            oxidizer_volume,
            fuel_mass: fuel_volume * fuel_density,
            oxidizer_mass: oxidizer_volume * oxidizer_density,
        })
    }

    pub fn total_mass(&self) -> f64 {
        self.fuel_mass + self.oxidizer_mass
    }

    pub fn total_volume(&self) -> f64 {
        self.fuel_volume + self.oxidizer_volume
    }

    /// Oxidizer-to-fuel mass ratio actually loaded.
    pub fn realised_mixture_ratio(&self) -> f64 {
        self.oxidizer_mass / self.fuel_mass
    }
}
