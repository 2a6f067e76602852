//! Typed field constraints and composable object schemas.
//!
//! A `Schema` is an ordered set of named `FieldConstraint`s plus the list of
//! required field names. Schemas are combined with `Schema::merge` rather than
//! by mutating loose property bags, and serialise to a JSON-Schema-like shape
//! so a form-rendering client can build per-type inputs from them.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use serde_json::{Map as JsonMap, Value as JsonValue};

use catalog_core::Violations;

/// Primitive JSON type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Integer,
}

impl FieldKind {
    fn article_name(&self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Number => "a number",
            Self::Integer => "an integer",
        }
    }
}

/// Constraints on a single payload field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConstraint {
    #[serde(rename = "type")]
    kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maximum: Option<f64>,
    #[serde(skip_serializing_if = "is_false")]
    exclusive_minimum: bool,
    #[serde(skip_serializing_if = "is_false")]
    exclusive_maximum: bool,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    allowed: Option<Vec<String>>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl FieldConstraint {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
            exclusive_minimum: false,
            exclusive_maximum: false,
            allowed: None,
        }
    }

    pub fn string() -> Self {
        Self::of(FieldKind::String)
    }

    pub fn number() -> Self {
        Self::of(FieldKind::Number)
    }

    pub fn integer() -> Self {
        Self::of(FieldKind::Integer)
    }

    /// Inclusive character-count bounds.
    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub fn minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }

    pub fn maximum(mut self, max: f64) -> Self {
        self.maximum = Some(max);
        self
    }

    /// Make the configured minimum exclusive (`value > minimum`).
    pub fn exclusive_minimum(mut self) -> Self {
        self.exclusive_minimum = true;
        self
    }

    /// Make the configured maximum exclusive (`value < maximum`).
    pub fn exclusive_maximum(mut self) -> Self {
        self.exclusive_maximum = true;
        self
    }

    /// Restrict a string field to a fixed set of values.
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn allowed_values(&self) -> Option<&[String]> {
        self.allowed.as_deref()
    }

    /// Check one present value; returns the first failing reason.
    pub fn check(&self, value: &JsonValue) -> Result<(), String> {
        match self.kind {
            FieldKind::String => {
                let s = value.as_str().ok_or_else(|| self.type_mismatch(value))?;
                self.check_string(s)
            }
            FieldKind::Number => {
                let n = value.as_f64().ok_or_else(|| self.type_mismatch(value))?;
                self.check_range(n)
            }
            FieldKind::Integer => {
                if !(value.is_i64() || value.is_u64()) {
                    return Err(self.type_mismatch(value));
                }
                let n = value.as_f64().ok_or_else(|| self.type_mismatch(value))?;
                self.check_range(n)
            }
        }
    }

    fn type_mismatch(&self, value: &JsonValue) -> String {
        format!(
            "{} value found, but {} is required",
            json_kind_name(value),
            self.kind.article_name()
        )
    }

    fn check_string(&self, s: &str) -> Result<(), String> {
        if let Some(allowed) = &self.allowed {
            if !allowed.iter().any(|a| a == s) {
                let quoted = allowed
                    .iter()
                    .map(|a| format!("{a:?}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(format!("Does not have a value in the enumeration [{quoted}]"));
            }
        }

        let chars = s.chars().count();
        if let Some(min) = self.min_length {
            if chars < min {
                return Err(format!("Must be at least {min} characters long"));
            }
        }
        if let Some(max) = self.max_length {
            if chars > max {
                return Err(format!("Must be at most {max} characters long"));
            }
        }
        Ok(())
    }

    fn check_range(&self, n: f64) -> Result<(), String> {
        if let Some(min) = self.minimum {
            if self.exclusive_minimum && n <= min {
                return Err(format!(
                    "Must have a minimum value greater than {}",
                    format_bound(min)
                ));
            }
            if n < min {
                return Err(format!("Must have a minimum value of {}", format_bound(min)));
            }
        }
        if let Some(max) = self.maximum {
            if self.exclusive_maximum && n >= max {
                return Err(format!(
                    "Must have a maximum value less than {}",
                    format_bound(max)
                ));
            }
            if n > max {
                return Err(format!("Must have a maximum value of {}", format_bound(max)));
            }
        }
        Ok(())
    }
}

fn json_kind_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "NULL",
        JsonValue::Bool(_) => "Boolean",
        JsonValue::Number(n) if n.is_f64() => "Number",
        JsonValue::Number(_) => "Integer",
        JsonValue::String(_) => "String",
        JsonValue::Array(_) => "Array",
        JsonValue::Object(_) => "Object",
    }
}

fn format_bound(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else if v.abs() >= 1e15 {
        format!("{v:e}")
    } else {
        format!("{v}")
    }
}

/// Ordered set of field constraints plus required-ness.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<(String, FieldConstraint)>,
    required: Vec<String>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a required field.
    pub fn required(mut self, name: impl Into<String>, constraint: FieldConstraint) -> Self {
        let name = name.into();
        self.put(name.clone(), constraint);
        if !self.required.contains(&name) {
            self.required.push(name);
        }
        self
    }

    /// Add (or replace) an optional field.
    pub fn optional(mut self, name: impl Into<String>, constraint: FieldConstraint) -> Self {
        self.put(name.into(), constraint);
        self
    }

    fn put(&mut self, name: String, constraint: FieldConstraint) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = constraint,
            None => self.fields.push((name, constraint)),
        }
    }

    /// Compose two schemas: `other`'s fields are appended (replacing same-named
    /// fields) and its required names are added to this schema's.
    pub fn merge(mut self, other: &Schema) -> Self {
        for (name, constraint) in &other.fields {
            self.put(name.clone(), constraint.clone());
        }
        for name in &other.required {
            if !self.required.contains(name) {
                self.required.push(name.clone());
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldConstraint> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldConstraint)> {
        self.fields.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate a payload, collecting every violation (never short-circuits).
    pub fn validate(&self, payload: &JsonValue) -> Violations {
        match payload.as_object() {
            Some(obj) => self.validate_map(obj),
            None => {
                let mut violations = Violations::new();
                violations.insert(
                    "payload",
                    format!("{} value found, but an object is required", json_kind_name(payload)),
                );
                violations
            }
        }
    }

    pub fn validate_map(&self, obj: &JsonMap<String, JsonValue>) -> Violations {
        let mut violations = Violations::new();
        for (name, constraint) in &self.fields {
            match obj.get(name) {
                Some(value) => {
                    if let Err(msg) = constraint.check(value) {
                        violations.insert(name.clone(), msg);
                    }
                }
                None if self.is_required(name) => {
                    violations.insert(name.clone(), format!("The property {name} is required"));
                }
                None => {}
            }
        }
        violations
    }
}

/// `{"type": "object", "properties": {...}, "required": [...]}`
impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Properties<'a>(&'a [(String, FieldConstraint)]);

        impl Serialize for Properties<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (name, constraint) in self.0 {
                    map.serialize_entry(name, constraint)?;
                }
                map.end()
            }
        }

        let mut s = serializer.serialize_struct("Schema", 3)?;
        s.serialize_field("type", "object")?;
        s.serialize_field("properties", &Properties(&self.fields))?;
        s.serialize_field("required", &self.required)?;
        s.end()
    }
}
