//! Form state of the inventory console.
//!
//! The console page has one field group holding a full record and two
//! duplicated key groups used by the retrieve/delete and enable/disable
//! buttons. Fields are addressed through explicit binding tables rather than
//! by ad hoc name lookups; the page is rendered from the same tables that
//! parse submitted fields back.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::inventory::{InventoryPayload, InventoryRecord, LooseValue, RecordKey};

/// Attribute of an inventory record bound to a form field.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    ProductId,
    Condition,
    Quantity,
    RestockLevel,
    LastUpdatedOn,
    CanUpdate,
}

impl Attribute {
    /// Column header used by the result table and the form labels.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::ProductId => "Product_ID",
            Attribute::Condition => "Condition",
            Attribute::Quantity => "Quantity",
            Attribute::RestockLevel => "Restock_Level",
            Attribute::LastUpdatedOn => "Last_Updated_On",
            Attribute::CanUpdate => "Can_Update",
        }
    }

    /// Text shown for this attribute of `record`; empty when omitted.
    pub fn text_of(self, record: &InventoryRecord) -> String {
        match self {
            Attribute::ProductId => record.product_id.map(|v| v.to_string()),
            Attribute::Condition => record.condition.map(|v| v.as_str().to_string()),
            Attribute::Quantity => record.quantity.map(|v| v.to_string()),
            Attribute::RestockLevel => record.restock_level.map(|v| v.to_string()),
            Attribute::LastUpdatedOn => record.last_updated_on.clone(),
            Attribute::CanUpdate => record.can_update.map(|v| v.to_string()),
        }
        .unwrap_or_default()
    }
}

/// Named group of fields on the console page.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    /// The full record edited by create and update.
    Record,
    /// Key fields used by retrieve and delete.
    Lookup,
    /// Key fields used by enable and disable.
    Toggle,
}

impl FieldGroup {
    pub fn bindings(self) -> &'static [FieldBinding] {
        match self {
            FieldGroup::Record => &RECORD_BINDINGS,
            FieldGroup::Lookup => &LOOKUP_BINDINGS,
            FieldGroup::Toggle => &TOGGLE_BINDINGS,
        }
    }
}

const ALL_GROUPS: [FieldGroup; 3] = [FieldGroup::Record, FieldGroup::Lookup, FieldGroup::Toggle];

/// Binding of one form field name to one record attribute.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct FieldBinding {
    /// Name of the HTML input.
    pub field: &'static str,
    /// Attribute the field carries.
    pub attribute: Attribute,
    /// The operator cannot type into read-only fields.
    pub readonly: bool,
}

const fn bind(field: &'static str, attribute: Attribute) -> FieldBinding {
    FieldBinding {
        field,
        attribute,
        readonly: false,
    }
}

pub const RECORD_BINDINGS: [FieldBinding; 6] = [
    bind("inventory_product_id", Attribute::ProductId),
    bind("inventory_condition", Attribute::Condition),
    bind("inventory_quantity", Attribute::Quantity),
    bind("inventory_restock_level", Attribute::RestockLevel),
    FieldBinding {
        field: "inventory_last_updated_on",
        attribute: Attribute::LastUpdatedOn,
        readonly: true,
    },
    bind("inventory_can_update", Attribute::CanUpdate),
];

pub const LOOKUP_BINDINGS: [FieldBinding; 2] = [
    bind("lookup_product_id", Attribute::ProductId),
    bind("lookup_condition", Attribute::Condition),
];

pub const TOGGLE_BINDINGS: [FieldBinding; 2] = [
    bind("toggle_product_id", Attribute::ProductId),
    bind("toggle_condition", Attribute::Condition),
];

/// A field prepared for the template.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub readonly: bool,
}

/// Current values of every field on the console page.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: HashMap<&'static str, String>,
}

impl FormState {
    /// Form with every field empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the form from submitted name/value pairs. Unknown names are ignored
    /// and missing ones stay empty.
    pub fn from_submitted(submitted: &HashMap<String, String>) -> Self {
        let mut form = Self::new();
        for binding in ALL_GROUPS.iter().flat_map(|group| group.bindings()) {
            if let Some(value) = submitted.get(binding.field) {
                form.values.insert(binding.field, value.clone());
            }
        }
        form
    }

    /// Value of a bound field; empty for unknown names.
    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// Set a bound field. Names outside the binding tables are ignored.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        if let Some(binding) = find_binding(field) {
            self.values.insert(binding.field, value.into());
        }
    }

    fn attribute(&self, group: FieldGroup, attribute: Attribute) -> &str {
        group
            .bindings()
            .iter()
            .find(|binding| binding.attribute == attribute)
            .map(|binding| self.value(binding.field))
            .unwrap_or("")
    }

    /// Write all six attributes of `record` into the record group.
    pub fn fill(&mut self, record: &InventoryRecord) {
        for binding in &RECORD_BINDINGS {
            self.values
                .insert(binding.field, binding.attribute.text_of(record));
        }
    }

    /// Reset every field of every group to empty.
    pub fn clear(&mut self) {
        for binding in ALL_GROUPS.iter().flat_map(|group| group.bindings()) {
            self.values.insert(binding.field, String::new());
        }
    }

    /// Extract the record group as a request body.
    ///
    /// Numeric fields go through [`parse_int`]; text that is not a number is
    /// passed on as `None` without complaint.
    pub fn read(&self) -> InventoryPayload {
        let group = FieldGroup::Record;
        InventoryPayload {
            product_id: LooseValue::from_text(self.attribute(group, Attribute::ProductId)),
            condition: non_empty(self.attribute(group, Attribute::Condition)),
            quantity: parse_int(self.attribute(group, Attribute::Quantity)),
            restock_level: parse_int(self.attribute(group, Attribute::RestockLevel)),
            last_updated_on: non_empty(self.attribute(group, Attribute::LastUpdatedOn)),
            can_update: LooseValue::from_text(self.attribute(group, Attribute::CanUpdate)),
        }
    }

    /// Composite key held by `group`.
    ///
    /// The key groups fall back to the record group when their product id field
    /// is empty, so a record loaded into the main form can be addressed directly.
    pub fn key(&self, group: FieldGroup) -> RecordKey {
        let source = if group != FieldGroup::Record
            && self.attribute(group, Attribute::ProductId).trim().is_empty()
        {
            FieldGroup::Record
        } else {
            group
        };
        RecordKey::new(
            self.attribute(source, Attribute::ProductId).trim(),
            self.attribute(source, Attribute::Condition).trim(),
        )
    }

    /// Fields of `group` in binding order, ready for rendering.
    pub fn fields(&self, group: FieldGroup) -> Vec<FieldView> {
        group
            .bindings()
            .iter()
            .map(|binding| FieldView {
                name: binding.field,
                label: binding.attribute.label(),
                value: self.value(binding.field).to_string(),
                readonly: binding.readonly,
            })
            .collect()
    }
}

fn find_binding(field: &str) -> Option<&'static FieldBinding> {
    ALL_GROUPS
        .iter()
        .flat_map(|group| group.bindings())
        .find(|binding| binding.field == field)
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Leading-digits integer parse.
///
/// Skips surrounding whitespace, accepts one sign and then as many decimal
/// digits as follow; trailing text is ignored. Returns `None` ("not a number")
/// when no digit is found or the value does not fit in an `i64`.
pub fn parse_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    let text = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    text.parse().ok()
}
