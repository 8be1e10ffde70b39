//! Record addresses and the fixed routing table.
//!
//! # Responsibility
//! - Parse, render and compare `content://` record addresses.
//! - Match addresses against the two registered shapes: the drink
//!   collection and a single record inside it.
//!
//! # Invariants
//! - The routing table is immutable after construction.
//! - Matching is exact; unknown shapes yield no match, never a partial one.
//! - Content-type strings are computed once and stay stable for the
//!   table's lifetime.

use crate::model::drink::RecordId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Scheme prefix every canonical address starts with.
const SCHEME_PREFIX: &str = "content://";

/// Base of the content-type string for collection addresses.
pub const CONTENT_TYPE_BASE_LIST: &str = "vnd.records.dir";

/// Base of the content-type string for single-record addresses.
pub const CONTENT_TYPE_BASE_ITEM: &str = "vnd.records.item";

static AUTHORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:[.-][a-z0-9]+)*$").expect("valid authority regex"));

static SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]*$").expect("valid segment regex"));

pub type AddressResult<T> = Result<T, AddressParseError>;

/// Failure while building or parsing an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    /// Input text does not start with `content://`.
    MissingScheme(String),
    InvalidAuthority(String),
    InvalidSegment(String),
    /// Addresses always carry at least one path segment.
    EmptyPath,
}

impl Display for AddressParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingScheme(text) => {
                write!(f, "address `{text}` must start with `{SCHEME_PREFIX}`")
            }
            Self::InvalidAuthority(authority) => {
                write!(f, "invalid address authority `{authority}`")
            }
            Self::InvalidSegment(segment) => {
                write!(f, "invalid address path segment `{segment}`")
            }
            Self::EmptyPath => write!(f, "address path cannot be empty"),
        }
    }
}

impl Error for AddressParseError {}

/// Hierarchical name of a data resource: an authority plus path segments.
///
/// Addresses are plain names. Whether one resolves to anything is decided
/// by the routing table, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    authority: String,
    segments: Vec<String>,
}

impl Address {
    /// Builds an address from an authority and non-empty path segments.
    pub fn new(authority: &str, segments: &[&str]) -> AddressResult<Self> {
        if !AUTHORITY_RE.is_match(authority) {
            return Err(AddressParseError::InvalidAuthority(authority.to_string()));
        }
        if segments.is_empty() {
            return Err(AddressParseError::EmptyPath);
        }
        let mut parts = Vec::with_capacity(segments.len());
        for segment in segments {
            if !SEGMENT_RE.is_match(segment) {
                return Err(AddressParseError::InvalidSegment((*segment).to_string()));
            }
            parts.push((*segment).to_string());
        }
        Ok(Self {
            authority: authority.to_string(),
            segments: parts,
        })
    }

    /// Parses canonical address text, e.g. `content://app.drinklog/drinks/7`.
    pub fn parse(text: &str) -> AddressResult<Self> {
        let Some(rest) = text.strip_prefix(SCHEME_PREFIX) else {
            return Err(AddressParseError::MissingScheme(text.to_string()));
        };
        let mut pieces = rest.split('/');
        let authority = pieces.next().unwrap_or("");
        let segments: Vec<&str> = pieces.collect();
        Self::new(authority, &segments)
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Path below the authority, segments joined with `/`.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Child address with the decimal record id appended.
    pub fn with_record_id(&self, id: RecordId) -> Address {
        let mut segments = self.segments.clone();
        segments.push(id.to_string());
        Address {
            authority: self.authority.clone(),
            segments,
        }
    }

    /// Trailing path segment read as a record id.
    ///
    /// Only plain decimal digits qualify; anything else, including values
    /// that overflow the id range, yields `None`.
    pub fn record_id(&self) -> Option<RecordId> {
        let last = self.segments.last()?;
        if last.is_empty() || !last.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        last.parse().ok()
    }

    /// True when `self` names data strictly below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &Address) -> bool {
        self.authority == ancestor.authority
            && self.segments.len() > ancestor.segments.len()
            && self.segments.starts_with(&ancestor.segments)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{SCHEME_PREFIX}{}/{}", self.authority, self.path())
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(text: &str) -> AddressResult<Self> {
        Self::parse(text)
    }
}

/// Outcome of matching an address against the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMatch {
    /// The whole drink collection.
    Collection,
    /// Exactly one record, selected by its storage id.
    Record(RecordId),
}

/// Immutable two-pattern routing table for one collection.
///
/// Registered shapes are `authority/path` for the collection and
/// `authority/path/{id}` for a single record.
#[derive(Debug, Clone)]
pub struct AddressTable {
    collection: Address,
    list_content_type: String,
    record_content_type: String,
}

impl AddressTable {
    /// Builds the table for a collection living directly under `authority`.
    pub fn new(authority: &str, collection_path: &str) -> AddressResult<Self> {
        let collection = Address::new(authority, &[collection_path])?;
        let list_content_type = format!("{CONTENT_TYPE_BASE_LIST}/{authority}/{collection_path}");
        let record_content_type =
            format!("{CONTENT_TYPE_BASE_ITEM}/{authority}/{collection_path}");
        Ok(Self {
            collection,
            list_content_type,
            record_content_type,
        })
    }

    /// Address of the whole collection.
    pub fn collection(&self) -> &Address {
        &self.collection
    }

    /// Address of one record inside the collection.
    pub fn record(&self, id: RecordId) -> Address {
        self.collection.with_record_id(id)
    }

    /// Matches `address` against the two registered shapes.
    pub fn match_address(&self, address: &Address) -> Option<AddressMatch> {
        if address.authority() != self.collection.authority() {
            return None;
        }
        let base = self.collection.segments();
        let segments = address.segments();
        if segments == base {
            return Some(AddressMatch::Collection);
        }
        if segments.len() == base.len() + 1 && segments.starts_with(base) {
            // The trailing segment must be a plain decimal id; any other
            // shape is unknown, not an error.
            return address.record_id().map(AddressMatch::Record);
        }
        None
    }

    /// Content-type string returned for collection addresses.
    pub fn list_content_type(&self) -> &str {
        &self.list_content_type
    }

    /// Content-type string returned for single-record addresses.
    pub fn record_content_type(&self) -> &str {
        &self.record_content_type
    }
}
