//! Lead kinds, their field whitelists and storage-ready records.

use std::fmt;

use crate::params::RequestParams;

/// Column carrying the lead kind discriminator.
pub const LEAD_TYPE_COLUMN: &str = "LEAD_TYPE";

/// Entity variants accepted by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadKind {
    /// Inquiry about a specific product.
    Product,
    /// General contact request.
    Contact,
    /// Request to be called back by a consultant.
    Consultant,
}

impl LeadKind {
    /// Every lead kind.
    pub const ALL: [Self; 3] = [Self::Product, Self::Contact, Self::Consultant];

    /// Discriminator stored alongside the record.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Contact => "contact",
            Self::Consultant => "consultant",
        }
    }

    /// Name of the `method` parameter that selects this kind.
    pub const fn method(self) -> &'static str {
        match self {
            Self::Product => "product_lead",
            Self::Contact => "contact_lead",
            Self::Consultant => "consultant_lead",
        }
    }

    /// Fields that must be present and non-empty.
    pub const fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Product => &["domain", "name", "telephone", "product"],
            Self::Contact => &["domain", "name", "telephone"],
            Self::Consultant => &["domain", "name", "telephone", "email"],
        }
    }

    /// Fields stored when supplied but never required.
    pub const fn optional_fields(self) -> &'static [&'static str] {
        match self {
            Self::Product | Self::Contact => &["email", "message"],
            Self::Consultant => &["message"],
        }
    }

    /// Required followed by optional fields, in storage order.
    pub fn candidate_fields(self) -> Vec<&'static str> {
        self.required_fields().iter().chain(self.optional_fields()).copied().collect()
    }
}

impl fmt::Display for LeadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage-ready projection of the request parameters.
///
/// Keys are upper-cased field names and values are trimmed. The record is
/// ordered by the candidate list it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadRecord {
    fields: Vec<(String, String)>,
}

impl LeadRecord {
    /// True when no candidate field qualified.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Value stored under an upper-cased key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Columns handed to the store: the record plus the kind discriminator.
    pub fn tagged(&self, kind: LeadKind) -> Vec<(String, String)> {
        let mut columns = self.fields.clone();
        columns.push((LEAD_TYPE_COLUMN.to_string(), kind.as_str().to_string()));
        columns
    }
}

/// Projects whitelisted fields from `params` into a [`LeadRecord`].
///
/// A field is kept when present and non-empty; its key is upper-cased and
/// its value trimmed. The result may be empty.
pub fn build_record(candidates: &[&str], params: &RequestParams) -> LeadRecord {
    let fields = candidates
        .iter()
        .filter_map(|field| {
            params
                .non_empty(field)
                .map(|value| (field.to_ascii_uppercase(), value.trim().to_string()))
        })
        .collect();

    LeadRecord { fields }
}
