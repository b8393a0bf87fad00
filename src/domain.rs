use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::natural::{natural_case_cmp, natural_cmp};

pub const BLAST_FORMAT: &str = "blast";

pub const FLAT_FORMAT: &str = "flat";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectionMap {
    entries: Vec<(String, String)>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, section: impl Into<String>, leaf: impl Into<String>) {
        let section = section.into();
        let leaf = leaf.into();
        if let Some(entry) = self.entries.iter_mut().find(|(key, _)| *key == section) {
            entry.1 = leaf;
            return;
        }
        let position = self
            .entries
            .partition_point(|(key, _)| natural_case_cmp(key, &section).is_le());
        self.entries.insert(position, (section, leaf));
    }

    pub fn extend(&mut self, other: SectionMap) {
        for (section, leaf) in other.entries {
            self.insert(section, leaf);
        }
    }

    pub fn get(&self, section: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == section)
            .map(|(_, leaf)| leaf.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(section, leaf)| (section.as_str(), leaf.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn without_all_sections(&self) -> SectionMap {
        SectionMap {
            entries: self
                .entries
                .iter()
                .filter(|(section, _)| !section.contains("All"))
                .cloned()
                .collect(),
        }
    }
}

impl<S: Into<String>, L: Into<String>> FromIterator<(S, L)> for SectionMap {
    fn from_iter<I: IntoIterator<Item = (S, L)>>(iter: I) -> Self {
        let mut map = SectionMap::new();
        for (section, leaf) in iter {
            map.insert(section, leaf);
        }
        map
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    pub name: String,
    pub root_dir: String,
    pub is_current: bool,
    pub formats: Vec<String>,
    pub format_sections: Vec<(String, SectionMap)>,
}

impl Release {
    pub fn format_dir(&self, format: &str) -> String {
        let format = if format.is_empty() { FLAT_FORMAT } else { format };
        format!("{}/{}", self.root_dir, format)
    }

    pub fn flat_dir(&self) -> String {
        self.format_dir(FLAT_FORMAT)
    }

    pub fn sections(&self, format: &str) -> Option<&SectionMap> {
        self.format_sections
            .iter()
            .find(|(id, _)| id == format)
            .map(|(_, sections)| sections)
    }

    pub fn format_sections(&self, filter_all: bool) -> Vec<(String, SectionMap)> {
        if !filter_all {
            return self.format_sections.clone();
        }
        self.format_sections
            .iter()
            .map(|(format, sections)| (format.clone(), sections.without_all_sections()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bank {
    pub name: String,
    pub last_update: String,
    pub db_type: String,
    pub current_release: String,
    pub releases: Vec<Release>,
}

impl Bank {
    pub fn new(
        name: String,
        last_update: String,
        db_type: String,
        current_release: String,
        mut releases: Vec<Release>,
    ) -> Self {
        releases.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        Self {
            name,
            last_update,
            db_type,
            current_release,
            releases,
        }
    }

    pub fn release(&self, name: &str) -> Option<&Release> {
        let by_name = |wanted: &str| self.releases.iter().find(|release| release.name == wanted);
        if !name.is_empty() {
            if let Some(release) = by_name(name) {
                return Some(release);
            }
        }
        by_name(&self.current_release)
    }

    pub fn current(&self) -> Option<&Release> {
        self.release("")
    }

    pub fn dir(&self, release: &str) -> Option<&str> {
        self.release(release).map(|release| release.root_dir.as_str())
    }

    pub fn format_dir(&self, format: &str, release: &str) -> Option<String> {
        self.release(release)
            .map(|release| release.format_dir(format))
    }

    pub fn flat_dir(&self, release: &str) -> Option<String> {
        self.format_dir(FLAT_FORMAT, release)
    }

    pub fn formats(&self, release: &str) -> &[String] {
        self.release(release)
            .map(|release| release.formats.as_slice())
            .unwrap_or_default()
    }

    pub fn format_sections(&self, release: &str, filter_all: bool) -> Vec<(String, SectionMap)> {
        self.release(release)
            .map(|release| release.format_sections(filter_all))
            .unwrap_or_default()
    }

    pub fn current_sections(&self, format: &str) -> Option<&SectionMap> {
        self.current().and_then(|release| release.sections(format))
    }

    // substring match, so `protein` also matches `nucleic_protein`
    pub fn is_of_type(&self, tag: &str) -> bool {
        self.db_type.contains(tag)
    }

    pub fn is_nucleic(&self) -> bool {
        self.is_of_type("nucleic")
    }

    pub fn is_proteic(&self) -> bool {
        self.is_of_type("proteic")
    }

    pub fn is_genomic(&self) -> bool {
        self.is_of_type("genome")
    }

    pub fn tags(&self) -> Vec<&str> {
        self.db_type
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect()
    }

    pub fn last_update_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_update.trim();
        if let Ok(value) = raw.parse::<i64>() {
            // BioMaj session ids are millisecond stamps
            if value > 100_000_000_000 {
                return DateTime::from_timestamp_millis(value);
            }
            return DateTime::from_timestamp(value, 0);
        }
        if let Ok(value) = raw.parse::<f64>()
            && value.is_finite()
        {
            return DateTime::from_timestamp_millis((value * 1000.0) as i64);
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|value| value.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    banks: Vec<Bank>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bank: Bank) {
        if let Some(existing) = self.banks.iter_mut().find(|b| b.name == bank.name) {
            *existing = bank;
            return;
        }
        let position = self
            .banks
            .partition_point(|b| natural_case_cmp(&b.name, &bank.name).is_le());
        self.banks.insert(position, bank);
    }

    pub fn get(&self, name: &str) -> Option<&Bank> {
        self.banks.iter().find(|bank| bank.name == name)
    }

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.banks.iter().map(|bank| bank.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    pub fn into_banks(self) -> Vec<Bank> {
        self.banks
    }
}
