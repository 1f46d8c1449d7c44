//! Nature classification.
//!
//! Maps free-text incident natures to the canonical
//! [`NatureGroup`] taxonomy using ordered keyword rules. Rule order is
//! significant: categories are not mutually exclusive by keyword (a nature
//! mentioning both "THEFT" and "ASSAULT" must resolve deterministically),
//! so the first matching rule wins.

use poky_incident_models::NatureGroup;

/// Classifies an uppercased nature string into a [`NatureGroup`].
///
/// Keyword match is substring-based. Callers pass the nature already
/// trimmed and uppercased (the loader guarantees this). Natures matching
/// no rule classify as [`NatureGroup::Other`].
#[must_use]
pub fn nature_group(nature: &str) -> NatureGroup {
    if contains_any(
        nature,
        &["THEFT", "BURGLARY", "LARCENY", "SHOPLIFT", "ROBBERY"],
    ) {
        return NatureGroup::Property;
    }
    if contains_any(nature, &["ASSAULT", "BATTERY", "WEAPON", "DOMESTIC", "SEX"]) {
        return NatureGroup::Violent;
    }
    if contains_any(nature, &["DISTURBANCE", "DISORDERLY", "HARASS", "NOISE"]) {
        return NatureGroup::Disorder;
    }
    if contains_any(nature, &["DUI", "CRASH", "TRAFFIC", "ABANDONED VEHIC"]) {
        return NatureGroup::Traffic;
    }
    if contains_any(nature, &["WELFARE CHECK", "MENTAL", "SUICIDE", "MISSING"]) {
        return NatureGroup::Service;
    }
    NatureGroup::Other
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
