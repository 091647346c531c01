use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Allergen number as printed after dish names (e.g. `어묵국(5,6,13)`).
pub type AllergenCode = u32;

/// Name shown for codes missing from [`ALLERGENS`].
pub const UNKNOWN_ALLERGEN: &str = "?";

/// The 19 allergen categories used by school meal menus.
pub const ALLERGENS: [(AllergenCode, &str); 19] = [
    (1, "난류"),
    (2, "우유"),
    (3, "메밀"),
    (4, "땅콩"),
    (5, "대두"),
    (6, "밀"),
    (7, "고등어"),
    (8, "게"),
    (9, "새우"),
    (10, "돼지고기"),
    (11, "복숭아"),
    (12, "토마토"),
    (13, "아황산류"),
    (14, "호두"),
    (15, "닭고기"),
    (16, "소고기"),
    (17, "오징어"),
    (18, "조개류(굴·전복·홍합 등)"),
    (19, "잣"),
];

pub fn allergen_name(code: AllergenCode) -> &'static str {
    ALLERGENS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_ALLERGEN)
}

pub fn is_known(code: AllergenCode) -> bool {
    ALLERGENS.iter().any(|(c, _)| *c == code)
}

/// `5(대두)`
pub fn allergen_label(code: AllergenCode) -> String {
    format!("{code}({})", allergen_name(code))
}

/// Comma separated [`allergen_label`]s in ascending code order.
pub fn format_codes<'a>(codes: impl IntoIterator<Item = &'a AllergenCode>) -> String {
    let mut codes: Vec<AllergenCode> = codes.into_iter().copied().collect();
    codes.sort_unstable();
    codes.dedup();

    codes
        .into_iter()
        .map(allergen_label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Label used by the profile selector: `15. 닭고기`
pub fn option_label(code: AllergenCode) -> String {
    format!("{code}. {}", allergen_name(code))
}

/// Reads the code back out of an [`option_label`]. A bare number is accepted too.
pub fn parse_option_label(label: &str) -> Option<AllergenCode> {
    label.split('.').next()?.trim().parse().ok()
}

/// The set of allergens a user wants to be warned about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllergenProfile(BTreeSet<AllergenCode>);

impl AllergenProfile {
    pub fn new(codes: impl IntoIterator<Item = AllergenCode>) -> Self {
        Self(codes.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, code: AllergenCode) -> bool {
        self.0.contains(&code)
    }

    pub fn codes(&self) -> &BTreeSet<AllergenCode> {
        &self.0
    }

    pub fn overlap(&self, codes: &BTreeSet<AllergenCode>) -> BTreeSet<AllergenCode> {
        self.0.intersection(codes).copied().collect()
    }

    /// An item is risky only when a profile exists and shares at least one code
    /// with the item. An empty profile never flags anything.
    pub fn is_risky(&self, codes: &BTreeSet<AllergenCode>) -> bool {
        !self.0.is_empty() && !self.0.is_disjoint(codes)
    }

    /// `1(난류), 5(대두)` or `None` when empty.
    pub fn summary(&self) -> Option<String> {
        (!self.is_empty()).then(|| format_codes(&self.0))
    }
}

impl FromIterator<AllergenCode> for AllergenProfile {
    fn from_iter<T: IntoIterator<Item = AllergenCode>>(iter: T) -> Self {
        Self::new(iter)
    }
}
