use crate::error::DashError;
use stockdash_client::Company;

pub const LOAD_FAILED: &str = "Failed to load companies.";

/// A row of the directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub company: Company,
    pub active: bool,
}

impl Entry {
    pub fn label(&self) -> String {
        self.company.label()
    }
}

/// The loaded companies and which one of them is active.
///
/// The active symbol, when set, is always one of `companies`.
#[derive(Debug, Default)]
pub struct CompanyDirectory {
    companies: Vec<Company>,
    active: Option<String>,
    error: Option<String>,
}

impl CompanyDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly loaded list, clear any error, and make the first company active.
    /// Returns the default selection, if the list was non-empty.
    pub fn loaded(&mut self, companies: Vec<Company>) -> Option<&str> {
        self.active = companies.first().map(|c| c.symbol.clone());
        self.companies = companies;
        self.error = None;
        self.active()
    }

    /// Leave the directory empty with an error; nothing stays selectable.
    pub fn failed(&mut self, message: &str) {
        self.companies.clear();
        self.active = None;
        self.error = Some(message.to_string());
    }

    pub fn select(&mut self, symbol: &str) -> Result<(), DashError> {
        if !self.contains(symbol) {
            return Err(DashError::InvalidSelection(symbol.to_string()));
        }
        self.active = Some(symbol.to_string());
        Ok(())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.companies.iter().any(|c| c.symbol == symbol)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Look a company up by symbol, or by its 1-based row in the listing.
    pub fn resolve(&self, input: &str) -> Option<&Company> {
        let input = input.trim();
        if let Ok(row) = input.parse::<usize>() {
            return row.checked_sub(1).and_then(|i| self.companies.get(i));
        }
        self.companies
            .iter()
            .find(|c| c.symbol.eq_ignore_ascii_case(input))
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.companies
            .iter()
            .map(|company| Entry {
                active: self.active.as_deref() == Some(company.symbol.as_str()),
                company: company.clone(),
            })
            .collect()
    }
}
