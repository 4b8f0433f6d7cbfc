use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A customer record as supplied by the directory. Filtering never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    pub total_spend: f64,
    pub visits: u64,
    /// Months since the last visit.
    #[serde(default, rename = "lastVisitDate")]
    pub last_visit_months: Option<f64>,
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
}

impl Customer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            age: None,
            total_spend: 0.0,
            visits: 0,
            last_visit_months: None,
            join_date: None,
        }
    }

    pub fn with_spend(mut self, total_spend: f64) -> Self {
        self.total_spend = total_spend;
        self
    }

    pub fn with_visits(mut self, visits: u64) -> Self {
        self.visits = visits;
        self
    }

    pub fn with_last_visit_months(mut self, months: f64) -> Self {
        self.last_visit_months = Some(months);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Numeric value of a filterable attribute, `None` when the record has no value for it.
    pub fn field_value(&self, field: CustomerField) -> Option<f64> {
        match field {
            CustomerField::TotalSpend => Some(self.total_spend),
            CustomerField::Visits => Some(self.visits as f64),
            CustomerField::LastVisitMonths => self.last_visit_months,
        }
    }
}

/// Filterable numeric attributes of a [`Customer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerField {
    #[serde(rename = "totalSpend")]
    TotalSpend,
    #[serde(rename = "visits")]
    Visits,
    #[serde(rename = "lastVisitDate")]
    LastVisitMonths,
}

impl CustomerField {
    pub const ALL: [CustomerField; 3] = [
        CustomerField::TotalSpend,
        CustomerField::Visits,
        CustomerField::LastVisitMonths,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CustomerField::TotalSpend => "totalSpend",
            CustomerField::Visits => "visits",
            CustomerField::LastVisitMonths => "lastVisitDate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CustomerField::TotalSpend => "Net Spend",
            CustomerField::Visits => "Visits",
            CustomerField::LastVisitMonths => "Last Visit (months ago)",
        }
    }

    /// Resolve a wire key such as `totalSpend`. Matching ignores ASCII case.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl std::fmt::Display for CustomerField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
