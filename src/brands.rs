//! Known watch brands, in match-priority order.

/// Brand names recognised in post titles.
///
/// Matching walks this list front to back and stops at the first hit, so a
/// brand listed earlier wins over any later one found in the same title.
/// Multi-word names (`Grand Seiko`, `TAG Heuer`) sit ahead of the shorter
/// names they contain.
pub const WATCH_BRANDS: &[&str] = &[
    "Rolex",
    "Tudor",
    "Omega",
    "Grand Seiko",
    "King Seiko",
    "Seiko",
    "Cartier",
    "Patek Philippe",
    "Audemars Piguet",
    "Vacheron Constantin",
    "A. Lange & Söhne",
    "Jaeger-LeCoultre",
    "IWC",
    "Breitling",
    "TAG Heuer",
    "Heuer",
    "Panerai",
    "Zenith",
    "Longines",
    "Tissot",
    "Hamilton",
    "Oris",
    "Sinn",
    "Nomos",
    "Citizen",
    "G-Shock",
    "Casio",
    "Orient",
    "Bulova",
    "Doxa",
    "Glashütte Original",
    "Blancpain",
    "Breguet",
    "Hublot",
    "Chopard",
    "Montblanc",
    "Bell & Ross",
    "Christopher Ward",
    "Baltic",
    "Farer",
    "Halios",
    "Squale",
    "Mido",
    "Certina",
    "Rado",
    "Frederique Constant",
    "Junghans",
    "Stowa",
    "Laco",
    "Damasko",
    "Fortis",
    "Glycine",
    "Eterna",
    "Favre-Leuba",
    "Vostok",
    "Raketa",
    "Timex",
    "Swatch",
    "Mühle-Glashütte",
    "Marathon",
    "Luminox",
    "Victorinox",
    "Alpina",
    "Maurice Lacroix",
    "Raymond Weil",
    "Bremont",
    "Kurono",
    "Lorier",
    "Monta",
    "Nodus",
    "Zodiac",
    "Universal Genève",
    "Girard-Perregaux",
    "Ulysse Nardin",
    "Richard Mille",
    "F.P. Journe",
    "H. Moser & Cie",
    "Tutima",
    "Steinhart",
    "Benrus",
    "Formex",
    "Unimatic",
    "Zelos",
    "Ball",
];

/// An ordered list of brand names used for substring matching.
#[derive(Debug, Clone)]
pub struct BrandCatalog {
    brands: Vec<Brand>,
}

#[derive(Debug, Clone)]
struct Brand {
    name: String,
    lowered: String,
}

impl BrandCatalog {
    /// Build a catalog from names in priority order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let brands = names
            .into_iter()
            .map(Into::into)
            .map(|name: String| Brand {
                lowered: name.to_lowercase(),
                name,
            })
            .collect();
        Self { brands }
    }

    /// Brand names in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.brands.iter().map(|b| b.name.as_str())
    }

    /// The first brand, in catalog order, appearing anywhere in
    /// `lowered_title`. The caller lowercases the title.
    #[must_use]
    pub fn first_match(&self, lowered_title: &str) -> Option<&str> {
        self.brands
            .iter()
            .find(|b| lowered_title.contains(&b.lowered))
            .map(|b| b.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.brands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}

impl Default for BrandCatalog {
    fn default() -> Self {
        Self::new(WATCH_BRANDS.iter().copied())
    }
}
