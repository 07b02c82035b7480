use serde::{Deserialize, Deserializer};

/// Represents optional field semantics in PATCH requests for nullable columns.
///
/// - `Unchanged` → field absent from the payload
/// - `SetToNull` → field explicitly `null`
/// - `SetToValue` → set to provided value
///
/// Use together with `#[serde(default)]` so an absent field stays `Unchanged`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OptionField<T> {
    #[default]
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the key is present.
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => OptionField::SetToValue(value),
            None => OptionField::SetToNull,
        })
    }
}

impl<T> OptionField<T> {
    /// If `SetToValue`, returns a reference to inner value.
    pub fn value_ref(&self) -> Option<&T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

impl OptionField<String> {
    /// Blank strings collapse to `SetToNull`, other values are trimmed.
    pub fn normalize_blank(self) -> Self {
        match self {
            Self::SetToValue(v) if v.trim().is_empty() => Self::SetToNull,
            Self::SetToValue(v) => Self::SetToValue(v.trim().to_string()),
            other => other,
        }
    }

    /// `(touched, value)` pair for `CASE WHEN $touched THEN $value ELSE col END` updates.
    pub fn as_sql_patch(&self) -> (bool, Option<&str>) {
        match self {
            Self::Unchanged => (false, None),
            Self::SetToNull => (true, None),
            Self::SetToValue(v) => (true, Some(v.as_str())),
        }
    }
}
