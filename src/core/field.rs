//! Queryable fields and their values
//!
//! `Field` names every attribute the query layer touches, together with its
//! dotted path inside the stored document. Backends translate a `Field` to
//! whatever addressing they use; the in-memory store reads values straight
//! off the record through [`Field::value_of`].

use crate::core::transaction::Transaction;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;

/// A field the query layer can filter, sort, or facet on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    CustomerName,
    CustomerPhone,
    CustomerGender,
    CustomerAge,
    CustomerRegion,
    ProductCategory,
    ProductTags,
    SalesQuantity,
    MetaDate,
    MetaPaymentMethod,
}

impl Field {
    /// Dotted document path of the field
    pub const fn path(self) -> &'static str {
        match self {
            Field::CustomerName => "customer.name",
            Field::CustomerPhone => "customer.phone",
            Field::CustomerGender => "customer.gender",
            Field::CustomerAge => "customer.age",
            Field::CustomerRegion => "customer.region",
            Field::ProductCategory => "product.category",
            Field::ProductTags => "product.tags",
            Field::SalesQuantity => "sales.quantity",
            Field::MetaDate => "meta.date",
            Field::MetaPaymentMethod => "meta.paymentMethod",
        }
    }

    /// Borrow the value of this field from a record
    pub fn value_of(self, tx: &Transaction) -> FieldValue<'_> {
        match self {
            Field::CustomerName => FieldValue::Text(&tx.customer.name),
            Field::CustomerPhone => FieldValue::Text(&tx.customer.phone),
            Field::CustomerGender => FieldValue::Text(&tx.customer.gender),
            Field::CustomerAge => FieldValue::Integer(tx.customer.age),
            Field::CustomerRegion => FieldValue::Text(&tx.customer.region),
            Field::ProductCategory => FieldValue::Text(&tx.product.category),
            Field::ProductTags => FieldValue::TextList(&tx.product.tags),
            Field::SalesQuantity => FieldValue::Integer(tx.sales.quantity),
            Field::MetaDate => FieldValue::DateTime(tx.meta.date),
            Field::MetaPaymentMethod => FieldValue::Text(&tx.meta.payment_method),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A value borrowed from a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    TextList(&'a [String]),
    Integer(i64),
    DateTime(DateTime<Utc>),
}

impl<'a> FieldValue<'a> {
    /// Get the value as a string if possible
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Every string this value holds: one for text, all items for a list
    pub fn texts(&self) -> Vec<&'a str> {
        match self {
            FieldValue::Text(s) => vec![*s],
            FieldValue::TextList(items) => items.iter().map(String::as_str).collect(),
            FieldValue::Integer(_) | FieldValue::DateTime(_) => Vec::new(),
        }
    }

    /// Total order between values of the same field
    ///
    /// Values of different kinds never come from the same field; they
    /// compare equal so a mixed comparison cannot reorder anything.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::TextList(a), FieldValue::TextList(b)) => a.cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}
