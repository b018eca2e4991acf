use serde::{Deserialize, Serialize};

/// Soil classes commonly reported on Indian soil health cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoilClass {
    Sandy,
    Loamy,
    Clayey,
    Silty,
    Peaty,
    Black,
    Red,
    Alluvial,
}

/// Typical chemistry for a soil class, used to fill unmeasured fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilDefaults {
    pub ph: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub organic_carbon: f64,
}

impl SoilClass {
    pub const ALL: [SoilClass; 8] = [
        SoilClass::Sandy,
        SoilClass::Loamy,
        SoilClass::Clayey,
        SoilClass::Silty,
        SoilClass::Peaty,
        SoilClass::Black,
        SoilClass::Red,
        SoilClass::Alluvial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilClass::Sandy => "Sandy",
            SoilClass::Loamy => "Loamy",
            SoilClass::Clayey => "Clayey",
            SoilClass::Silty => "Silty",
            SoilClass::Peaty => "Peaty",
            SoilClass::Black => "Black",
            SoilClass::Red => "Red",
            SoilClass::Alluvial => "Alluvial",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sandy" | "sand" => Some(SoilClass::Sandy),
            "loamy" | "loam" => Some(SoilClass::Loamy),
            "clayey" | "clay" => Some(SoilClass::Clayey),
            "silty" | "silt" => Some(SoilClass::Silty),
            "peaty" | "peat" => Some(SoilClass::Peaty),
            "black" | "black cotton" => Some(SoilClass::Black),
            "red" => Some(SoilClass::Red),
            "alluvial" => Some(SoilClass::Alluvial),
            _ => None,
        }
    }

    pub fn typical_values(&self) -> SoilDefaults {
        let (ph, nitrogen, phosphorus, potassium, organic_carbon) = match self {
            SoilClass::Sandy => (6.0, 20.0, 10.0, 50.0, 0.3),
            SoilClass::Loamy => (6.8, 40.0, 20.0, 120.0, 0.8),
            SoilClass::Clayey => (7.2, 60.0, 30.0, 100.0, 1.1),
            SoilClass::Silty => (6.6, 45.0, 35.0, 130.0, 1.0),
            SoilClass::Peaty => (5.2, 80.0, 25.0, 40.0, 2.5),
            SoilClass::Black => (7.5, 50.0, 25.0, 150.0, 0.7),
            SoilClass::Red => (6.2, 30.0, 15.0, 60.0, 0.4),
            SoilClass::Alluvial => (7.0, 55.0, 30.0, 140.0, 0.9),
        };

        SoilDefaults {
            ph,
            nitrogen,
            phosphorus,
            potassium,
            organic_carbon,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SoilClass::Sandy => {
                "Well-draining soil with low water retention. Good for root crops and early season planting."
            }
            SoilClass::Loamy => {
                "Balanced drainage and nutrients. Suitable for most crops."
            }
            SoilClass::Clayey => {
                "High water and nutrient retention. Suits rice and water-intensive crops."
            }
            SoilClass::Silty => "Fine-textured, fertile soil with moderate drainage. Good for cereals.",
            SoilClass::Peaty => "High organic matter and water retention. Suits specialty crops.",
            SoilClass::Black => {
                "Cotton soil with high clay content and strong nutrient holding capacity."
            }
            SoilClass::Red => {
                "Well-drained soil from crystalline rock. Good for millets and drought-tolerant crops."
            }
            SoilClass::Alluvial => "Fertile riverine soil. Ideal for intensive agriculture.",
        }
    }
}

impl std::fmt::Display for SoilClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soil_class_from_str_valid() {
        assert_eq!(SoilClass::from_str("Loamy"), Some(SoilClass::Loamy));
        assert_eq!(SoilClass::from_str("loam"), Some(SoilClass::Loamy));
        assert_eq!(SoilClass::from_str("CLAYEY"), Some(SoilClass::Clayey));
        assert_eq!(SoilClass::from_str(" black "), Some(SoilClass::Black));
    }

    #[test]
    fn soil_class_from_str_invalid() {
        assert_eq!(SoilClass::from_str("laterite"), None);
        assert_eq!(SoilClass::from_str(""), None);
    }

    #[test]
    fn soil_class_round_trip() {
        for class in SoilClass::ALL {
            assert_eq!(
                SoilClass::from_str(class.as_str()),
                Some(class),
                "Round-trip failed for {:?}",
                class
            );
        }
    }

    #[test]
    fn every_class_is_described() {
        for class in SoilClass::ALL {
            assert!(!class.description().is_empty(), "{:?}", class);
        }
        assert!(SoilClass::Clayey.description().contains("rice"));
    }

    #[test]
    fn typical_values_are_plausible() {
        for class in SoilClass::ALL {
            let values = class.typical_values();
            assert!((4.0..=9.0).contains(&values.ph), "{:?} pH", class);
            assert!(values.nitrogen > 0.0);
            assert!(values.organic_carbon > 0.0);
        }
        // Peaty soils are the most acidic
        assert!(SoilClass::Peaty.typical_values().ph < SoilClass::Sandy.typical_values().ph);
    }
}
