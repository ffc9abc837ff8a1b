//! Country catalog — the pool the quiz draws its rounds from.
//!
//! The catalog is constructed by the composition root and passed by
//! reference; nothing here lives in a global.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

struct BuiltinCountry {
    name: &'static str,
    code: &'static str,
    continent: &'static str,
}

const BUILTIN_COUNTRIES: &[BuiltinCountry] = &[
    BuiltinCountry { name: "Kenya", code: "KE", continent: "Africa" },
    BuiltinCountry { name: "Nigeria", code: "NG", continent: "Africa" },
    BuiltinCountry { name: "South Africa", code: "ZA", continent: "Africa" },
    BuiltinCountry { name: "Morocco", code: "MA", continent: "Africa" },
    BuiltinCountry { name: "Egypt", code: "EG", continent: "Africa" },
    BuiltinCountry { name: "Senegal", code: "SN", continent: "Africa" },
    BuiltinCountry { name: "Japan", code: "JP", continent: "Asia" },
    BuiltinCountry { name: "Indonesia", code: "ID", continent: "Asia" },
    BuiltinCountry { name: "Thailand", code: "TH", continent: "Asia" },
    BuiltinCountry { name: "India", code: "IN", continent: "Asia" },
    BuiltinCountry { name: "Malaysia", code: "MY", continent: "Asia" },
    BuiltinCountry { name: "South Korea", code: "KR", continent: "Asia" },
    BuiltinCountry { name: "Philippines", code: "PH", continent: "Asia" },
    BuiltinCountry { name: "Sweden", code: "SE", continent: "Europe" },
    BuiltinCountry { name: "Norway", code: "NO", continent: "Europe" },
    BuiltinCountry { name: "France", code: "FR", continent: "Europe" },
    BuiltinCountry { name: "Italy", code: "IT", continent: "Europe" },
    BuiltinCountry { name: "Spain", code: "ES", continent: "Europe" },
    BuiltinCountry { name: "Portugal", code: "PT", continent: "Europe" },
    BuiltinCountry { name: "Greece", code: "GR", continent: "Europe" },
    BuiltinCountry { name: "Poland", code: "PL", continent: "Europe" },
    BuiltinCountry { name: "Romania", code: "RO", continent: "Europe" },
    BuiltinCountry { name: "United States", code: "US", continent: "North America" },
    BuiltinCountry { name: "Canada", code: "CA", continent: "North America" },
    BuiltinCountry { name: "Mexico", code: "MX", continent: "North America" },
    BuiltinCountry { name: "Guatemala", code: "GT", continent: "North America" },
    BuiltinCountry { name: "Brazil", code: "BR", continent: "South America" },
    BuiltinCountry { name: "Argentina", code: "AR", continent: "South America" },
    BuiltinCountry { name: "Chile", code: "CL", continent: "South America" },
    BuiltinCountry { name: "Colombia", code: "CO", continent: "South America" },
    BuiltinCountry { name: "Peru", code: "PE", continent: "South America" },
    BuiltinCountry { name: "Australia", code: "AU", continent: "Oceania" },
    BuiltinCountry { name: "New Zealand", code: "NZ", continent: "Oceania" },
];

/// A quiz country.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Country {
    pub name: String,
    /// ISO 3166-1 alpha-2.
    pub code: String,
    pub continent: String,
}

/// Owned country list with lookup and sampling.
pub struct CountryCatalog {
    countries: Vec<Country>,
}

impl CountryCatalog {
    /// Catalog backed by the built-in dataset.
    pub fn builtin() -> Self {
        let countries = BUILTIN_COUNTRIES
            .iter()
            .map(|c| Country {
                name: c.name.to_string(),
                code: c.code.to_string(),
                continent: c.continent.to_string(),
            })
            .collect();
        Self { countries }
    }

    /// Catalog over a custom dataset (tests, themed quizzes).
    pub fn from_countries(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    pub fn all(&self) -> &[Country] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Case-insensitive lookup by name or ISO code.
    pub fn find(&self, query: &str) -> Option<&Country> {
        let q = query.to_lowercase();
        self.countries
            .iter()
            .find(|c| c.name.to_lowercase() == q || c.code.to_lowercase() == q)
    }

    /// Up to `n` distinct countries, uniformly chosen.
    pub fn sample(&self, rng: &mut impl Rng, n: usize) -> Vec<&Country> {
        self.countries.choose_multiple(rng, n).collect()
    }
}
