use super::{geometry::Geometry, propellant::PropellantSplit};

/// Mass budget of one stage carrying its payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassBreakdown {
    pub structural: f64, // kg
    pub propellant: f64, // kg
    pub payload: f64,    // kg
    pub gross: f64,      // kg
}

impl MassBreakdown {
    pub fn compute(
        geometry: &Geometry,
        propellant: &PropellantSplit,
        structure_density: f64,
        payload_mass: f64,
    ) -> Self {
        let structural = geometry.shell_volume * structure_density;
        let propellant = propellant.total_mass();

        MassBreakdown {
            structural,
            propellant,
            payload: payload_mass,
            gross: structural + propellant + payload_mass,
        }
    }

    /// Mass left once the propellant is spent.
    pub fn burnout(&self) -> f64 {
        self.structural + self.payload
    }

    /// Gross over burnout mass, the ratio entering the rocket equation.
    pub fn mass_ratio(&self) -> f64 {
        self.gross / self.burnout()
    }

    /// Gross over payload mass; `None` for a stage flown without payload.
    pub fn payload_ratio(&self) -> Option<f64> {
        (self.payload > 0.0).then(|| self.gross / self.payload)
    }

    pub fn structural_coefficient(&self) -> f64 {
        self.structural / (self.structural + self.propellant)
    }
}
