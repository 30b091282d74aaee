//! ==============================================================================
//! agronomy.rs - crop recommendation, fertilizer, uptake and market prices
//! ==============================================================================
//!
//! purpose:
//!     picks the crop that suits the current month in pune and derives the
//!     recommendation fields of a reading from a static per-crop profile:
//!     - fertilizer label
//!     - nitrogen/phosphorus/potassium uptake ranges
//!     - harvest months and wholesale/retail price ranges (INR/kg)
//!
//!     lookups are by crop name. a name without a profile resolves to the
//!     default profile instead of failing.
//!
//! relationships:
//!     - reads: climate.rs (month names)
//!     - used by: generator.rs
//!
//! ==============================================================================

use crate::climate;
use crate::domain::HarvestMonth;
use crate::noise::uniform;

use rand::Rng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crop {
    Rice,
    Wheat,
    Corn,
    Soybean,
    Barley,
}

impl Crop {
    pub fn name(self) -> &'static str {
        match self {
            Crop::Rice => "rice",
            Crop::Wheat => "wheat",
            Crop::Corn => "corn",
            Crop::Soybean => "soybean",
            Crop::Barley => "barley",
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// best crop for a 0-based month
pub fn choose_crop<R: Rng + ?Sized>(month: u32, rng: &mut R) -> Crop {
    match month {
        6..=9 => Crop::Rice,            // kharif, monsoon
        10 | 11 | 0 | 1 => Crop::Wheat, // rabi
        2..=4 => Crop::Corn,            // summer
        // shoulder months
        _ => {
            if rng.gen_bool(0.5) {
                Crop::Soybean
            } else {
                Crop::Barley
            }
        }
    }
}

/// inclusive-exclusive (min, max)
pub type Range = (f64, f64);

#[derive(Debug, Clone, PartialEq)]
pub struct CropProfile {
    pub name: &'static str,
    pub fertilizer: &'static str,
    pub nitrogen: Range,
    pub phosphorus: Range,
    pub potassium: Range,
    /// 0-based harvest months, in order
    pub harvest_months: &'static [u32],
    pub wholesale: Range,
    pub retail: Range,
}

// ==============================================================================
// profile table
// ==============================================================================

static PROFILES: [CropProfile; 5] = [
    CropProfile {
        name: "rice",
        fertilizer: "NPK 20-20-20",
        nitrogen: (12.0, 22.0),
        phosphorus: (5.0, 10.0),
        potassium: (10.0, 18.0),
        harvest_months: &[10, 11],
        wholesale: (22.0, 32.0),
        retail: (35.0, 55.0),
    },
    CropProfile {
        name: "wheat",
        fertilizer: "NPK 10-10-10",
        nitrogen: (10.0, 18.0),
        phosphorus: (4.0, 9.0),
        potassium: (8.0, 14.0),
        harvest_months: &[1, 2, 3],
        wholesale: (20.0, 28.0),
        retail: (30.0, 45.0),
    },
    CropProfile {
        name: "soybean",
        fertilizer: "NPK 15-15-15",
        nitrogen: (8.0, 16.0),
        phosphorus: (4.0, 9.0),
        potassium: (7.0, 12.0),
        harvest_months: &[9, 10],
        wholesale: (35.0, 55.0),
        retail: (50.0, 80.0),
    },
    CropProfile {
        name: "barley",
        fertilizer: "NPK 10-10-10",
        nitrogen: (8.0, 14.0),
        phosphorus: (3.0, 7.0),
        potassium: (6.0, 10.0),
        harvest_months: &[2, 3],
        wholesale: (18.0, 26.0),
        retail: (28.0, 42.0),
    },
    CropProfile {
        name: "corn",
        fertilizer: "NPK 20-20-20",
        nitrogen: (14.0, 24.0),
        phosphorus: (6.0, 11.0),
        potassium: (12.0, 20.0),
        harvest_months: &[4, 5, 6],
        wholesale: (18.0, 25.0),
        retail: (28.0, 40.0),
    },
];

/// used for any crop without its own profile
pub static DEFAULT_PROFILE: CropProfile = CropProfile {
    name: "default",
    fertilizer: "NPK 15-15-15",
    nitrogen: (8.0, 20.0),
    phosphorus: (3.0, 10.0),
    potassium: (6.0, 18.0),
    harvest_months: &[],
    wholesale: (20.0, 30.0),
    retail: (30.0, 50.0),
};

/// harvest month reported when a profile lists none
pub const FALLBACK_HARVEST_MONTH: u32 = 9; // october

pub fn profile(crop_name: &str) -> &'static CropProfile {
    PROFILES
        .iter()
        .find(|p| p.name == crop_name)
        .unwrap_or(&DEFAULT_PROFILE)
}

pub fn fertilizer_for(crop_name: &str) -> &'static str {
    profile(crop_name).fertilizer
}

/// nitrogen/phosphorus/potassium uptake estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientUptake {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

pub fn nutrient_uptake<R: Rng + ?Sized>(crop_name: &str, rng: &mut R) -> NutrientUptake {
    let p = profile(crop_name);
    NutrientUptake {
        nitrogen: uniform(rng, p.nitrogen.0, p.nitrogen.1),
        phosphorus: uniform(rng, p.phosphorus.0, p.phosphorus.1),
        potassium: uniform(rng, p.potassium.0, p.potassium.1),
    }
}

/// named harvest months for a crop, never empty
pub fn harvest_month_names(crop_name: &str) -> Vec<&'static str> {
    let months = profile(crop_name).harvest_months;
    if months.is_empty() {
        return vec![climate::month_name(FALLBACK_HARVEST_MONTH)];
    }
    months.iter().map(|&m| climate::month_name(m)).collect()
}

/// harvest months with an independent wholesale/retail price draw each
pub fn harvestable_months<R: Rng + ?Sized>(crop_name: &str, rng: &mut R) -> Vec<HarvestMonth> {
    let p = profile(crop_name);
    harvest_month_names(crop_name)
        .into_iter()
        .map(|month| HarvestMonth {
            month: month.to_string(),
            wholesale_price: uniform(rng, p.wholesale.0, p.wholesale.1),
            retail_price: uniform(rng, p.retail.0, p.retail.1),
        })
        .collect()
}

/// everything the agronomy model contributes to one reading
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub crop: Crop,
    pub fertilizer: &'static str,
    pub uptake: NutrientUptake,
    pub harvest: Vec<HarvestMonth>,
}

pub fn recommend<R: Rng + ?Sized>(month: u32, rng: &mut R) -> Recommendation {
    let crop = choose_crop(month, rng);
    let name = crop.name();
    Recommendation {
        crop,
        fertilizer: fertilizer_for(name),
        uptake: nutrient_uptake(name, rng),
        harvest: harvestable_months(name, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_crop_by_season() {
        let mut rng = StdRng::seed_from_u64(1);
        for m in [6, 7, 8, 9] {
            assert_eq!(choose_crop(m, &mut rng), Crop::Rice);
        }
        for m in [10, 11, 0, 1] {
            assert_eq!(choose_crop(m, &mut rng), Crop::Wheat);
        }
        for m in [2, 3, 4] {
            assert_eq!(choose_crop(m, &mut rng), Crop::Corn);
        }
    }

    #[test]
    fn test_shoulder_month_is_a_coin_flip() {
        let mut rng = StdRng::seed_from_u64(2);
        let picks: Vec<_> = (0..400).map(|_| choose_crop(5, &mut rng)).collect();
        let soy = picks.iter().filter(|&&c| c == Crop::Soybean).count();
        let barley = picks.iter().filter(|&&c| c == Crop::Barley).count();
        assert_eq!(soy + barley, 400);
        assert!(soy > 150 && barley > 150);
    }

    #[test]
    fn test_fertilizer_lookup() {
        assert_eq!(fertilizer_for("rice"), "NPK 20-20-20");
        assert_eq!(fertilizer_for("wheat"), "NPK 10-10-10");
        assert_eq!(fertilizer_for("soybean"), "NPK 15-15-15");
        assert_eq!(fertilizer_for("millet"), "NPK 15-15-15");
    }

    #[test]
    fn test_uptake_within_profile() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let u = nutrient_uptake("corn", &mut rng);
            assert!((14.0..24.0).contains(&u.nitrogen));
            assert!((6.0..11.0).contains(&u.phosphorus));
            assert!((12.0..20.0).contains(&u.potassium));

            let d = nutrient_uptake("sorghum", &mut rng);
            assert!((8.0..20.0).contains(&d.nitrogen));
        }
    }

    #[test]
    fn test_harvest_months_and_prices() {
        let mut rng = StdRng::seed_from_u64(4);
        let rice = harvestable_months("rice", &mut rng);
        let names: Vec<_> = rice.iter().map(|h| h.month.as_str()).collect();
        assert_eq!(names, ["November", "December"]);
        for h in &rice {
            assert!((22.0..32.0).contains(&h.wholesale_price));
            assert!((35.0..55.0).contains(&h.retail_price));
        }

        let unknown = harvestable_months("quinoa", &mut rng);
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].month, "October");
        assert!((20.0..30.0).contains(&unknown[0].wholesale_price));
    }

    #[test]
    fn test_recommend_july() {
        let mut rng = StdRng::seed_from_u64(5);
        let rec = recommend(6, &mut rng);
        assert_eq!(rec.crop, Crop::Rice);
        assert_eq!(rec.fertilizer, "NPK 20-20-20");
        assert_eq!(rec.harvest.len(), 2);
    }
}
