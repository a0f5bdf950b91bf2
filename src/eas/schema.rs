//! EAS schema encoding.
//!
//! An EAS schema is a comma-separated list of `type name` pairs, e.g.
//! `"address badge, bytes payload"`. Tuple fields may name their
//! components, as in `"(address token, uint256 id)[] items"`. Attestation
//! data is the ABI encoding of the values in schema order.

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{Address, Bytes};

use crate::eas::types::{EasError, EasResult};

/// One parsed schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub ty: DynSolType,
}

/// A value supplied for a schema field.
#[derive(Debug, Clone)]
pub struct SchemaItem {
    pub name: String,
    pub ty: String,
    pub value: DynSolValue,
}

impl SchemaItem {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, value: DynSolValue) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            value,
        }
    }
}

/// Encoder bound to a single schema definition.
#[derive(Debug, Clone)]
pub struct SchemaEncoder {
    fields: Vec<SchemaField>,
}

/// Split at commas outside parentheses.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Split `"<type> <name>"` at the last top-level space.
fn split_named(raw: &str) -> Option<(&str, &str)> {
    let raw = raw.trim();
    if raw.ends_with(')') || raw.ends_with(']') {
        return None;
    }
    let (ty, name) = raw.rsplit_once(char::is_whitespace)?;
    let ty = ty.trim();
    (!ty.is_empty() && !name.contains(['(', ')'])).then_some((ty, name))
}

/// Drop component names from tuple types: `(address a, uint8 b)[]`
/// becomes `(address,uint8)[]`.
fn canonical_type(ty: &str) -> String {
    let ty = ty.trim();
    if !ty.starts_with('(') {
        return ty.to_string();
    }

    let mut depth = 0usize;
    let mut close = None;
    for (i, c) in ty.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let Some(close) = close else {
        return ty.to_string();
    };

    let components: Vec<String> = split_top_level(&ty[1..close])
        .into_iter()
        .map(|component| {
            let component = split_named(component).map_or(component, |(ty, _)| ty);
            canonical_type(component)
        })
        .collect();
    format!("({}){}", components.join(","), ty[close + 1..].trim())
}

fn parse_type(ty: &str) -> EasResult<DynSolType> {
    DynSolType::parse(&canonical_type(ty))
        .map_err(|e| EasError::Schema(format!("invalid type \"{}\": {}", ty, e)))
}

impl SchemaEncoder {
    /// Parse a schema definition.
    pub fn new(schema: &str) -> EasResult<Self> {
        let mut fields = Vec::new();

        for raw in split_top_level(schema) {
            let Some((ty, name)) = split_named(raw) else {
                return Err(EasError::Schema(format!(
                    "invalid schema field \"{}\", expected \"<type> <name>\"",
                    raw.trim()
                )));
            };

            let ty = parse_type(ty)?;

            if fields.iter().any(|f: &SchemaField| f.name == name) {
                return Err(EasError::Schema(format!("duplicate field \"{}\"", name)));
            }

            fields.push(SchemaField {
                name: name.to_string(),
                ty,
            });
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// ABI-encode `items`, which must match the schema field for field.
    pub fn encode_data(&self, items: &[SchemaItem]) -> EasResult<Bytes> {
        if items.len() != self.fields.len() {
            return Err(EasError::Schema(format!(
                "expected {} values, got {}",
                self.fields.len(),
                items.len()
            )));
        }

        let mut values = Vec::with_capacity(items.len());
        for (field, item) in self.fields.iter().zip(items) {
            if field.name != item.name {
                return Err(EasError::Schema(format!(
                    "expected field \"{}\", got \"{}\"",
                    field.name, item.name
                )));
            }

            let ty = parse_type(&item.ty)?;
            if ty != field.ty {
                return Err(EasError::Schema(format!(
                    "field \"{}\" has type {}, got {}",
                    field.name,
                    field.ty.sol_type_name(),
                    item.ty
                )));
            }
            if !field.ty.matches(&item.value) {
                return Err(EasError::Schema(format!(
                    "value for \"{}\" is not a {}",
                    field.name,
                    field.ty.sol_type_name()
                )));
            }

            values.push(item.value.clone());
        }

        Ok(DynSolValue::Tuple(values).abi_encode_params().into())
    }

    /// Encode the standard badge payload: `(address badge, bytes payload)`.
    pub fn encode_badge(&self, badge: Address, payload: Bytes) -> EasResult<Bytes> {
        self.encode_data(&[
            SchemaItem::new("badge", "address", DynSolValue::Address(badge)),
            SchemaItem::new("payload", "bytes", DynSolValue::Bytes(payload.to_vec())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DEFAULT_BADGE_SCHEMA;
    use alloy::primitives::{address, bytes, U256};
    use alloy::sol_types::SolValue;

    #[test]
    fn test_parse_badge_schema() {
        let encoder = SchemaEncoder::new(DEFAULT_BADGE_SCHEMA).unwrap();
        let fields = encoder.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "badge");
        assert_eq!(fields[0].ty, DynSolType::Address);
        assert_eq!(fields[1].name, "payload");
        assert_eq!(fields[1].ty, DynSolType::Bytes);
    }

    #[test]
    fn test_rejects_malformed_schema() {
        assert!(SchemaEncoder::new("address").is_err());
        assert!(SchemaEncoder::new("").is_err());
        assert!(SchemaEncoder::new("notatype badge").is_err());
        assert!(SchemaEncoder::new("address badge, bytes badge").is_err());
    }

    #[test]
    fn test_badge_encoding_matches_abi_encode() {
        let encoder = SchemaEncoder::new(DEFAULT_BADGE_SCHEMA).unwrap();
        let badge = address!("0xA51c1fc2f0D1a1b8494Ed1FE312d7C3a78Ed91C0");

        let empty = encoder.encode_badge(badge, Bytes::new()).unwrap();
        assert_eq!(empty.to_vec(), (badge, Bytes::new()).abi_encode_params());
        // head (address, offset) + length word
        assert_eq!(empty.len(), 96);

        let payload = bytes!("deadbeef");
        let encoded = encoder.encode_badge(badge, payload.clone()).unwrap();
        assert_eq!(encoded.to_vec(), (badge, payload).abi_encode_params());
    }

    #[test]
    fn test_tuple_field_with_named_components() {
        let encoder = SchemaEncoder::new("(address token, uint256 id) item, bool ok").unwrap();
        let fields = encoder.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "item");
        assert_eq!(
            fields[0].ty,
            DynSolType::Tuple(vec![DynSolType::Address, DynSolType::Uint(256)])
        );

        let token = address!("0xA51c1fc2f0D1a1b8494Ed1FE312d7C3a78Ed91C0");
        let encoded = encoder
            .encode_data(&[
                SchemaItem::new(
                    "item",
                    "(address,uint256)",
                    DynSolValue::Tuple(vec![
                        DynSolValue::Address(token),
                        DynSolValue::Uint(U256::from(7), 256),
                    ]),
                ),
                SchemaItem::new("ok", "bool", DynSolValue::Bool(true)),
            ])
            .unwrap();
        assert_eq!(encoded.to_vec(), ((token, U256::from(7)), true).abi_encode_params());
    }

    #[test]
    fn test_nested_tuple_array_type() {
        let encoder = SchemaEncoder::new("(uint8 kind, (address a, bytes b) inner)[] entries").unwrap();
        assert_eq!(
            encoder.fields()[0].ty,
            DynSolType::Array(Box::new(DynSolType::Tuple(vec![
                DynSolType::Uint(8),
                DynSolType::Tuple(vec![DynSolType::Address, DynSolType::Bytes]),
            ])))
        );
        assert!(SchemaEncoder::new("(address a, uint256 b)").is_err());
    }

    #[test]
    fn test_value_mismatch() {
        let encoder = SchemaEncoder::new("uint256 score, address owner").unwrap();

        let wrong_order = encoder.encode_data(&[
            SchemaItem::new("owner", "address", DynSolValue::Address(Address::ZERO)),
            SchemaItem::new("score", "uint256", DynSolValue::Uint(U256::from(1), 256)),
        ]);
        assert!(wrong_order.is_err());

        let wrong_value = encoder.encode_data(&[
            SchemaItem::new("score", "uint256", DynSolValue::Bool(true)),
            SchemaItem::new("owner", "address", DynSolValue::Address(Address::ZERO)),
        ]);
        assert!(wrong_value.unwrap_err().to_string().contains("score"));

        let too_few = encoder.encode_data(&[SchemaItem::new(
            "score",
            "uint256",
            DynSolValue::Uint(U256::from(1), 256),
        )]);
        assert!(too_few.is_err());
    }
}
