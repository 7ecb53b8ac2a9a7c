//! Identifier rules for the Avro schema parser.
//!
//! `apache-avro` validates record, field and enum symbol names against the
//! Avro name grammar, which has no room for the `.` that encoded names keep.
//! The validators here accept the encoded-name alphabet instead: ASCII
//! letters, digits, `_` and `.`, not starting with a digit. Validators are
//! process-wide in `apache-avro`, so they are installed once, before the
//! first schema is parsed.

use apache_avro::Error;
use apache_avro::validator::{
    EnumSymbolNameValidator, RecordFieldNameValidator, SchemaNameValidator,
    set_enum_symbol_name_validator, set_record_field_name_validator, set_schema_name_validator,
};
use log::{debug, warn};
use once_cell::sync::Lazy;

static INSTALLED: Lazy<bool> = Lazy::new(|| {
    let names = set_schema_name_validator(Box::new(EncodedNames)).is_ok();
    let fields = set_record_field_name_validator(Box::new(EncodedNames)).is_ok();
    let symbols = set_enum_symbol_name_validator(Box::new(EncodedNames)).is_ok();
    let installed = names && fields && symbols;
    if installed {
        debug!("Installed encoded-name validators for Avro schemas");
    } else {
        warn!("Avro name validators were set before Harmony's; names containing '.' may be rejected");
    }
    installed
});

/// Make `apache-avro` accept encoded names in schemas.
///
/// Called by the container writer before it parses a schema. Readers in the
/// same process that parse a container with dotted names should call it
/// first as well. Returns `false` when other validators were already in
/// place (or the stock ones were already used), in which case dotted names
/// are rejected by the parser.
pub fn install_name_validators() -> bool {
    *INSTALLED
}

/// Whether `name` can appear as a container identifier.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '.' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

struct EncodedNames;

impl SchemaNameValidator for EncodedNames {
    // The whole string is the name; dots are part of it, not a namespace.
    fn validate(&self, schema_name: &str) -> Result<(String, Option<String>), Error> {
        if is_valid_name(schema_name) {
            Ok((schema_name.to_string(), None))
        } else {
            Err(Error::InvalidSchemaName(
                schema_name.to_string(),
                "[A-Za-z_.][A-Za-z0-9_.]*",
            ))
        }
    }
}

impl RecordFieldNameValidator for EncodedNames {
    fn validate(&self, name: &str) -> Result<(), Error> {
        if is_valid_name(name) {
            Ok(())
        } else {
            Err(Error::FieldName(name.to_string()))
        }
    }
}

impl EnumSymbolNameValidator for EncodedNames {
    fn validate(&self, name: &str) -> Result<(), Error> {
        if is_valid_name(name) {
            Ok(())
        } else {
            Err(Error::EnumSymbolName(name.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::naming::encode;

    #[test]
    fn test_encoded_names_are_valid() {
        for raw in ["color", "body.mass", "sample id", "1st visit", "Red_NCIT", "µg/L"] {
            assert!(is_valid_name(&encode(raw)), "{raw}");
        }
        assert!(is_valid_name("color_enum"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("1st"));
        assert!(!is_valid_name("a b"));
        assert!(!is_valid_name("a-b"));
    }

    #[test]
    fn test_validator_keeps_dots_in_name() {
        let (name, namespace) = SchemaNameValidator::validate(&EncodedNames, "body.mass_enum").unwrap();
        assert_eq!(name, "body.mass_enum");
        assert_eq!(namespace, None);
        assert!(RecordFieldNameValidator::validate(&EncodedNames, "body.mass").is_ok());
        assert!(EnumSymbolNameValidator::validate(&EncodedNames, "").is_err());
    }
}
