//! Data bag naming and item document rules.

use serde_json::Value;

/// Longest accepted bag or item name.
pub const MAX_NAME_LEN: usize = 255;

/// Check a name used as a URL path segment (bags, items, cookbook names and
/// versions): non-empty, `[A-Za-z0-9_.:-]` only.
pub fn validate_name(name: &str) -> crate::Result<()> {
    if name.is_empty() {
        return Err(crate::Error::InvalidName("name is empty".to_string()));
    }
    if name == "." || name == ".." {
        return Err(crate::Error::InvalidName(format!("{name} is reserved")));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(crate::Error::InvalidName(format!(
            "name exceeds {MAX_NAME_LEN} characters"
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')))
    {
        return Err(crate::Error::InvalidName(format!(
            "invalid character {c:?} in {name}"
        )));
    }
    Ok(())
}

/// Extract the item name from a data bag item document.
///
/// The document must be a JSON object with a string `id` that is itself a
/// valid name.
pub fn item_id(document: &Value) -> crate::Result<&str> {
    let object = document
        .as_object()
        .ok_or_else(|| crate::Error::InvalidItem("item must be a JSON object".to_string()))?;
    let id = object
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| crate::Error::InvalidItem("missing 'id' in data bag item".to_string()))?;
    validate_name(id)?;
    Ok(id)
}

/// Check that an updated document still names the item it replaces.
pub fn check_item_id(item_name: &str, document: &Value) -> crate::Result<()> {
    let id = item_id(document)?;
    if id != item_name {
        return Err(crate::Error::InvalidItem(format!(
            "name mismatch in data bag item: {id} != {item_name}"
        )));
    }
    Ok(())
}
