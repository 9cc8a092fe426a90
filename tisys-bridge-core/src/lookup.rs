//! Company id to customer code table.
//!
//! Lookup is total: an id with no entry resolves to [`UNKNOWN_CUSTOMER`]
//! instead of failing, so a new tenant never blocks a booking import.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const UNKNOWN_CUSTOMER: &str = "UNKNOWN";

const BUILT_IN: &[(i64, &str)] = &[(271565, "SE"), (222387, "KR")];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerTable {
    codes: BTreeMap<i64, String>,
}

impl Default for CustomerTable {
    fn default() -> Self {
        Self {
            codes: BUILT_IN
                .iter()
                .map(|(id, code)| (*id, (*code).to_string()))
                .collect(),
        }
    }
}

impl CustomerTable {
    /// Built-in entries with `extra` layered on top; `extra` wins on collision.
    pub fn with_overrides<I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (i64, String)>,
    {
        let mut table = Self::default();
        table.codes.extend(extra);
        table
    }

    pub fn customer_code(&self, company_id: i64) -> &str {
        self.codes
            .get(&company_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CUSTOMER)
    }

    /// Resolves the raw `company_id` text from a source document.
    /// Absent or non-numeric ids take the sentinel path too.
    pub fn resolve(&self, raw_company_id: Option<&str>) -> &str {
        match raw_company_id.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
            Some(id) => self.customer_code(id),
            None => UNKNOWN_CUSTOMER,
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
