use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ethnicity {
    #[serde(rename = "Not Hisp/Latino")]
    NotHispanicLatino,
    #[serde(rename = "Hisp/Latino")]
    HispanicLatino,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Race {
    White,
    Black,
    Asian,
}

/// APOE allele code. The classifier expects it as a string (`"2"`, `"3"`, `"4"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApoeAllele {
    #[serde(rename = "2")]
    E2,
    #[serde(rename = "3")]
    E3,
    #[serde(rename = "4")]
    E4,
}

/// The 12 fields the tabular model was trained on. Field names on the wire are
/// the dataset's column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularInput {
    #[serde(rename = "RID")]
    pub rid: i64,
    #[serde(rename = "Visit")]
    pub visit: i64,
    #[serde(rename = "AGE")]
    pub age: f64,
    #[serde(rename = "PTGENDER")]
    pub gender: Gender,
    #[serde(rename = "PTEDUCAT")]
    pub education_years: i64,
    #[serde(rename = "PTETHCAT")]
    pub ethnicity: Ethnicity,
    #[serde(rename = "PTRACCAT")]
    pub race: Race,
    #[serde(rename = "APOE4")]
    pub apoe4: u8,
    #[serde(rename = "MMSE")]
    pub mmse: i64,
    pub imputed_genotype: bool,
    #[serde(rename = "APOE1")]
    pub apoe1: ApoeAllele,
    #[serde(rename = "APOE2")]
    pub apoe2: ApoeAllele,
}

impl Default for TabularInput {
    fn default() -> Self {
        Self {
            rid: 5,
            visit: 1,
            age: 73.7,
            gender: Gender::Male,
            education_years: 16,
            ethnicity: Ethnicity::NotHispanicLatino,
            race: Race::White,
            apoe4: 0,
            mmse: 29,
            imputed_genotype: true,
            apoe1: ApoeAllele::E3,
            apoe2: ApoeAllele::E3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TabularField {
    #[serde(rename = "RID")]
    Rid,
    Visit,
    #[serde(rename = "AGE")]
    Age,
    #[serde(rename = "PTGENDER")]
    Gender,
    #[serde(rename = "PTEDUCAT")]
    Education,
    #[serde(rename = "PTETHCAT")]
    Ethnicity,
    #[serde(rename = "PTRACCAT")]
    Race,
    #[serde(rename = "APOE4")]
    Apoe4,
    #[serde(rename = "MMSE")]
    Mmse,
    #[serde(rename = "imputed_genotype")]
    ImputedGenotype,
    #[serde(rename = "APOE1")]
    Apoe1,
    #[serde(rename = "APOE2")]
    Apoe2,
}

impl TabularField {
    pub const ALL: [TabularField; 12] = [
        Self::Rid,
        Self::Visit,
        Self::Age,
        Self::Gender,
        Self::Education,
        Self::Ethnicity,
        Self::Race,
        Self::Apoe4,
        Self::Mmse,
        Self::ImputedGenotype,
        Self::Apoe1,
        Self::Apoe2,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rid => "RID",
            Self::Visit => "Visit",
            Self::Age => "AGE",
            Self::Gender => "PTGENDER",
            Self::Education => "PTEDUCAT",
            Self::Ethnicity => "PTETHCAT",
            Self::Race => "PTRACCAT",
            Self::Apoe4 => "APOE4",
            Self::Mmse => "MMSE",
            Self::ImputedGenotype => "imputed_genotype",
            Self::Apoe1 => "APOE1",
            Self::Apoe2 => "APOE2",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Rid => {
                "Research ID: A unique, anonymous number assigned to each participant in the study."
            }
            Self::Visit => {
                "Visit Code: A number representing the specific study visit (e.g., 1 for baseline, 2 for 6-month follow-up)."
            }
            Self::Age => "Age: The participant's age in years at the time of the study visit.",
            Self::Gender => "Participant Gender: The participant's reported gender (Male or Female).",
            Self::Education => {
                "Education (Years): The total number of years the participant spent in formal education."
            }
            Self::Ethnicity => {
                "Ethnicity: The participant's ethnicity, categorized as Hispanic/Latino or Not Hispanic/Latino."
            }
            Self::Race => "Race: The participant's race category (e.g., White, Black, Asian).",
            Self::Apoe4 => {
                "APOE4 Allele Count: The number of 'e4' variants (0, 1, or 2) for the APOE gene. This is a significant genetic risk factor for Alzheimer's Disease."
            }
            Self::Mmse => {
                "Mini-Mental State Exam: A 30-point test to measure cognitive impairment. A lower score indicates more severe impairment."
            }
            Self::ImputedGenotype => {
                "Imputed Genotype: A boolean (True/False) indicating if the genetic data was statistically inferred (True) or directly sequenced (False)."
            }
            Self::Apoe1 => {
                "APOE Allele 1: The first of two alleles for the Apolipoprotein E (APOE) gene, inherited from one parent."
            }
            Self::Apoe2 => {
                "APOE Allele 2: The second of two alleles for the Apolipoprotein E (APOE) gene, inherited from the other parent."
            }
        }
    }
}

impl fmt::Display for TabularField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TabularField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| Error::validation(format!("Unknown field: {s}")))
    }
}

impl TabularInput {
    /// Applies one form edit. Values arrive as the text a form control holds.
    /// A rejected edit leaves the record unchanged.
    pub fn set_field(&mut self, field: TabularField, raw: &str) -> Result<()> {
        let raw = raw.trim();
        let mut next = self.clone();
        match field {
            TabularField::Rid => next.rid = parse_number(field, raw)?,
            TabularField::Visit => next.visit = parse_number(field, raw)?,
            TabularField::Age => next.age = parse_number(field, raw)?,
            TabularField::Gender => next.gender = parse_option(field, raw)?,
            TabularField::Education => next.education_years = parse_number(field, raw)?,
            TabularField::Ethnicity => next.ethnicity = parse_option(field, raw)?,
            TabularField::Race => next.race = parse_option(field, raw)?,
            TabularField::Apoe4 => next.apoe4 = parse_number(field, raw)?,
            TabularField::Mmse => next.mmse = parse_number(field, raw)?,
            TabularField::ImputedGenotype => next.imputed_genotype = raw == "true",
            TabularField::Apoe1 => next.apoe1 = parse_option(field, raw)?,
            TabularField::Apoe2 => next.apoe2 = parse_option(field, raw)?,
        }

        if next.out_of_range(field).is_some() {
            return Err(invalid(field, raw));
        }
        *self = next;
        Ok(())
    }

    /// Range checks for a whole record, as submitted without going through
    /// the form.
    pub fn validate(&self) -> Result<()> {
        match TabularField::ALL
            .into_iter()
            .find_map(|field| self.out_of_range(field).map(|value| (field, value)))
        {
            Some((field, value)) => Err(invalid(field, &value)),
            None => Ok(()),
        }
    }

    /// The offending value, when `field` holds one outside its allowed range.
    fn out_of_range(&self, field: TabularField) -> Option<String> {
        match field {
            TabularField::Age if !self.age.is_finite() || self.age < 0.0 => {
                Some(self.age.to_string())
            }
            TabularField::Apoe4 if self.apoe4 > 2 => Some(self.apoe4.to_string()),
            TabularField::Mmse if !(0..=30).contains(&self.mmse) => Some(self.mmse.to_string()),
            _ => None,
        }
    }
}

fn invalid(field: TabularField, raw: &str) -> Error {
    Error::validation(format!("Invalid value for {field}: '{raw}'"))
}

fn parse_number<T: FromStr>(field: TabularField, raw: &str) -> Result<T> {
    raw.parse().map_err(|_| invalid(field, raw))
}

// Categorical options share their wire spelling with serde.
fn parse_option<T: serde::de::DeserializeOwned>(field: TabularField, raw: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| invalid(field, raw))
}
