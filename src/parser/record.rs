use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use std::fmt;

/// A single scalar value from a legacy export
///
/// The exports mix strings, numbers and booleans freely for the same key,
/// so every field is kept as a `Scalar` until the mapper decides what to do
/// with it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// String form of the value (`true` renders as `True`)
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Scalar::Bool(true) => Cow::Borrowed("True"),
            Scalar::Bool(false) => Cow::Borrowed("False"),
            Scalar::Number(n) => Cow::Owned(n.to_string()),
            Scalar::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }

    /// Borrow the value if it was a JSON string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Empty strings, zero and `false` are falsy, everything else is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            Scalar::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// Truthiness of an optional value; a missing value is falsy
pub fn truthy(value: Option<&Scalar>) -> bool {
    value.map(Scalar::is_truthy).unwrap_or(false)
}

/// Owned string form of an optional value
pub fn text(value: Option<&Scalar>) -> Option<String> {
    value.map(|v| v.as_text().into_owned())
}

/// Legacy company code as used for lookups
///
/// Both a missing key and an explicit `null` give `""`. The legacy importer
/// stringified a `null` code to `"None"`; that placeholder is not kept.
pub fn company_code(value: Option<&Scalar>) -> String {
    text(value).unwrap_or_default()
}

/// Keeps "key absent" (`None`) apart from "key present but null" (`Some(None)`)
fn present<'de, D>(deserializer: D) -> Result<Option<Option<Scalar>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Scalar>::deserialize(deserializer).map(Some)
}

/// One company from the `Empresa` export
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawEmpresaRecord {
    #[serde(rename = "ECODIG")]
    pub code: Option<Scalar>,
    #[serde(rename = "ECGC")]
    pub tax_id: Option<Scalar>,
    #[serde(rename = "ENOME")]
    pub name: Option<Scalar>,
    #[serde(rename = "EEND")]
    pub address: Option<Scalar>,
    #[serde(rename = "EBAIRRO")]
    pub district: Option<Scalar>,
    #[serde(rename = "ECEP")]
    pub postal_code: Option<Scalar>,
    #[serde(rename = "ECID")]
    pub city_state: Option<Scalar>,
    #[serde(rename = "EFONE1")]
    pub phone1: Option<Scalar>,
    #[serde(rename = "EFONE2")]
    pub phone2: Option<Scalar>,
    #[serde(rename = "EFAX")]
    pub fax: Option<Scalar>,
    #[serde(rename = "ENFUNC")]
    pub employee_count: Option<Scalar>,
    #[serde(rename = "EDTCON")]
    pub contribution_date: Option<Scalar>,
    #[serde(rename = "EVALOR")]
    pub contribution_amount: Option<Scalar>,
    #[serde(rename = "EOBS")]
    pub notes: Option<Scalar>,
}

impl RawEmpresaRecord {
    pub fn code(&self) -> String {
        company_code(self.code.as_ref())
    }
}

/// One member from the `Socio` export
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawSocioRecord {
    #[serde(rename = "SNOME")]
    pub name: Option<Scalar>,
    #[serde(rename = "SIDENT")]
    pub identity: Option<Scalar>,
    #[serde(rename = "SDNASC")]
    pub birth_date: Option<Scalar>,
    #[serde(rename = "SNATURAL")]
    pub birthplace: Option<Scalar>,
    #[serde(rename = "SSEXO")]
    pub sex: Option<Scalar>,
    #[serde(rename = "SESTCIVIL")]
    pub marital_status: Option<Scalar>,
    #[serde(rename = "SEND")]
    pub address: Option<Scalar>,
    #[serde(rename = "SBAIRRO")]
    pub district: Option<Scalar>,
    #[serde(rename = "SCEP")]
    pub postal_code: Option<Scalar>,
    #[serde(rename = "SPAI")]
    pub father: Option<Scalar>,
    #[serde(rename = "SMAE")]
    pub mother: Option<Scalar>,
    #[serde(rename = "SDTC")]
    pub registered_on: Option<Scalar>,
    /// `None` when the key is missing, `Some(None)` when it is `null`
    #[serde(rename = "SATIV", deserialize_with = "present")]
    pub active: Option<Option<Scalar>>,
    #[serde(rename = "SMAT")]
    pub enrollment: Option<Scalar>,
    #[serde(rename = "SDATMEN")]
    pub dues_date: Option<Scalar>,
    #[serde(rename = "SVALORME")]
    pub dues_amount: Option<Scalar>,
    #[serde(rename = "SDTADMS")]
    pub admission_date: Option<Scalar>,
    #[serde(rename = "SCTPS")]
    pub ctps: Option<Scalar>,
    #[serde(rename = "SFUNCAO")]
    pub function: Option<Scalar>,
    #[serde(rename = "SDTDEM")]
    pub dismissal_date: Option<Scalar>,
    #[serde(rename = "SMOTDEM")]
    pub dismissal_reason: Option<Scalar>,
    #[serde(rename = "SCARTA")]
    pub letter_issued: Option<Scalar>,
    #[serde(rename = "SCARTEIRA")]
    pub card_issued: Option<Scalar>,
    #[serde(rename = "SFICHA")]
    pub file_issued: Option<Scalar>,
    #[serde(rename = "SOBS")]
    pub notes: Option<Scalar>,
    #[serde(rename = "SFONE")]
    pub phone: Option<Scalar>,
    #[serde(rename = "ECODIG")]
    pub company_code: Option<Scalar>,
}

impl RawSocioRecord {
    pub fn company_code(&self) -> String {
        company_code(self.company_code.as_ref())
    }
}

/// Top-level document of the company export: `{"Empresa": [...]}`
#[derive(Debug, Default, Deserialize)]
pub struct EmpresaExport {
    #[serde(rename = "Empresa", default)]
    pub records: Vec<RawEmpresaRecord>,
}

/// Top-level document of the member export: `{"Socio": [...]}`
#[derive(Debug, Default, Deserialize)]
pub struct SocioExport {
    #[serde(rename = "Socio", default)]
    pub records: Vec<RawSocioRecord>,
}
