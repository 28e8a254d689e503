//! Header-name to column-position resolution.

use crate::error::{EnrichmentError, Result};

pub const IDENTIFIER_HEADER: &str = "siren";
pub const DIRECTOR_HEADER: &str = "Nom_dirigeant";
pub const REVENUE_HEADER: &str = "Chiffre_daffaire";
pub const COMPANY_NAME_HEADER: &str = "nom_entreprise";
pub const COMPANY_LINKEDIN_HEADER: &str = "url_linkedin_entreprise";
pub const DIRECTOR_LINKEDIN_HEADER: &str = "url_linkedin_dirigeant";

/// Zero-based column position of each logical field.
///
/// Built once at startup and passed by reference into the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub identifier: usize,
    pub director_name: usize,
    pub revenue: usize,
    pub company_name: usize,
    pub company_linkedin_url: usize,
    pub director_linkedin_url: usize,
}

impl ColumnMap {
    /// Resolve every expected header. Fails on the first one that is absent.
    pub fn from_headers(headers: &[String]) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| EnrichmentError::MissingHeader(name.to_string()))
        };

        Ok(Self {
            identifier: find(IDENTIFIER_HEADER)?,
            director_name: find(DIRECTOR_HEADER)?,
            revenue: find(REVENUE_HEADER)?,
            company_name: find(COMPANY_NAME_HEADER)?,
            company_linkedin_url: find(COMPANY_LINKEDIN_HEADER)?,
            director_linkedin_url: find(DIRECTOR_LINKEDIN_HEADER)?,
        })
    }

    /// 1-based sheet column for a zero-based position.
    pub fn sheet_column(position: usize) -> usize {
        position + 1
    }
}
