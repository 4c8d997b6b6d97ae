// crates/alarmlink-rs-csv/src/binder.rs

//! The value binder: classifies a textual property value as a typed
//! literal, an alias reference, an indexed/bit-addressed reference, or a
//! plain variable reference, and applies the corresponding binding.

use crate::error::BindWarning;
use alarmlink_rs::{Duration, DynamicLink, NodeClass, NodeId, NodeStore, ScalarValue, StoreError};

/// Binds one textual property value onto a variable slot.
///
/// Classification order:
/// 1. `*Shelved*` property names parse as duration literals.
/// 2. Slots with a coercible declared kind parse the text as exactly that
///    kind; a parse failure is not an error — the text is treated as a
///    path expression instead.
/// 3. Brace-prefixed values bind as alias references, kept verbatim.
/// 4. Values with an array-index or trailing bit-index suffix bind to the
///    base variable, the suffixes re-appended to the reference text.
/// 5. Anything else binds to the variable at that path. When no such
///    variable exists, string-like slots keep the raw text as a plain
///    value and typed scalar slots are left unset.
///
/// Returns `Err` for warning-level outcomes. The binder has then already
/// applied the specified fallback (e.g. kept the literal text); the caller
/// only needs to log and collect the warning.
pub fn bind_property(
    store: &mut dyn NodeStore,
    variable: NodeId,
    property: &str,
    text: &str,
) -> Result<(), BindWarning> {
    if property.contains("Shelved") {
        return match Duration::parse(text) {
            Ok(duration) => store
                .write_value(variable, ScalarValue::Duration(duration))
                .map_err(|e| rejected(property, e)),
            Err(_) => Err(BindWarning::InvalidDuration {
                property: property.to_string(),
                value: text.to_string(),
            }),
        };
    }

    if let Some(kind) = store.variable_kind(variable) {
        if kind.is_coercible() {
            if let Ok(value) = ScalarValue::parse(kind, text) {
                return store
                    .write_value(variable, value)
                    .map_err(|e| rejected(property, e));
            }
        }
    }

    bind_reference(store, variable, property, text)
}

fn bind_reference(
    store: &mut dyn NodeStore,
    variable: NodeId,
    property: &str,
    text: &str,
) -> Result<(), BindWarning> {
    if is_alias_token(text) {
        return store
            .set_link(variable, DynamicLink::alias(text))
            .map_err(|e| rejected(property, e));
    }

    let (base, array, bit) = split_address(text);
    if array.is_some() || bit.is_some() {
        let Some(target) = lookup_variable(store, base) else {
            return Err(BindWarning::UnresolvedReference {
                property: property.to_string(),
                target: base.to_string(),
            });
        };
        // Re-append the stripped suffixes so the addressing survives
        // resolution: array index first, then bit index.
        let mut path = base.to_string();
        if let Some(a) = array {
            path.push_str(a);
        }
        if let Some(b) = bit {
            path.push_str(b);
        }
        return store
            .set_link(variable, DynamicLink::to_variable(target, path))
            .map_err(|e| rejected(property, e));
    }

    match lookup_variable(store, text) {
        Some(target) => store
            .set_link(variable, DynamicLink::to_variable(target, text))
            .map_err(|e| rejected(property, e)),
        None => {
            // A typed scalar slot is left untouched: the text was neither a
            // parsable literal nor a known node. String-like slots keep the
            // raw text as a plain, non-bound value.
            let coercible = store
                .variable_kind(variable)
                .is_some_and(|kind| kind.is_coercible());
            if coercible {
                return Err(BindWarning::UnresolvedReference {
                    property: property.to_string(),
                    target: text.to_string(),
                });
            }
            store
                .write_value(variable, ScalarValue::String(text.to_string()))
                .map_err(|e| rejected(property, e))?;
            Err(BindWarning::LiteralFallback {
                property: property.to_string(),
                target: text.to_string(),
            })
        }
    }
}

/// Renders a bound property back to field text: the verbatim alias token,
/// the reverse-resolved browse path with its suffixes re-attached, the
/// stored literal, or the empty string when the slot is empty.
pub fn render_property(store: &dyn NodeStore, variable: NodeId) -> String {
    if let Some(link) = store.read_link(variable) {
        if link.is_alias() {
            return link.path;
        }
        let Some(target) = link.target else {
            return String::new();
        };
        let Some(mut path) = store.browse_path(target) else {
            return String::new();
        };
        let (_, array, bit) = split_address(&link.path);
        if let Some(a) = array {
            path.push_str(a);
        }
        if let Some(b) = bit {
            path.push_str(b);
        }
        return path;
    }
    if let Some(value) = store.read_value(variable) {
        return value.render();
    }
    String::new()
}

/// An alias token is a brace-delimited prefix, e.g. `{Alias}/Speed`.
fn is_alias_token(text: &str) -> bool {
    text.starts_with('{') && text[1..].contains('}')
}

/// Splits addressing suffixes off a reference text.
///
/// Two independent lexical rules, scanned from the end: a trailing bit
/// index is a `.` followed by one or more digits, and an array index is a
/// single bracketed all-digit index before it. A final path segment that is
/// all digits after a dot is always read as a bit index; browse paths are
/// `/`-separated, so a dot only ever appears inside a segment name.
fn split_address(text: &str) -> (&str, Option<&str>, Option<&str>) {
    let mut base = text;
    let mut bit = None;
    if let Some(pos) = base.rfind('.') {
        let digits = &base[pos + 1..];
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            bit = Some(&base[pos..]);
            base = &base[..pos];
        }
    }

    let mut array = None;
    if base.ends_with(']') {
        if let Some(open) = base.rfind('[') {
            let digits = &base[open + 1..base.len() - 1];
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                array = Some(&base[open..]);
                base = &base[..open];
            }
        }
    }

    (base, array, bit)
}

fn lookup_variable(store: &dyn NodeStore, path: &str) -> Option<NodeId> {
    store
        .find(path)
        .filter(|&node| store.node_class(node) == Some(NodeClass::Variable))
}

fn rejected(property: &str, error: StoreError) -> BindWarning {
    BindWarning::Rejected {
        property: property.to_string(),
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alarmlink_rs::{AddressSpace, ScalarKind};

    #[test]
    fn test_split_address() {
        assert_eq!(split_address("TagA"), ("TagA", None, None));
        assert_eq!(split_address("TagA[2]"), ("TagA", Some("[2]"), None));
        assert_eq!(split_address("TagB.3"), ("TagB", None, Some(".3")));
        assert_eq!(split_address("TagA[2].3"), ("TagA", Some("[2]"), Some(".3")));
        assert_eq!(
            split_address("Plant/Line1/TagA[10].15"),
            ("Plant/Line1/TagA", Some("[10]"), Some(".15"))
        );
        // No digits, no suffix.
        assert_eq!(split_address("TagA[]"), ("TagA[]", None, None));
        assert_eq!(split_address("TagA."), ("TagA.", None, None));
        assert_eq!(split_address("Tag.Name"), ("Tag.Name", None, None));
        // Non-trailing brackets are not an array suffix.
        assert_eq!(split_address("Tag[2]x"), ("Tag[2]x", None, None));
    }

    #[test]
    fn test_alias_token_detection() {
        assert!(is_alias_token("{Alias}/Speed"));
        assert!(is_alias_token("{A}"));
        assert!(!is_alias_token("Alias/Speed"));
        assert!(!is_alias_token("{Unclosed"));
    }

    /// Space with one root-level tag and one alarm variable slot to bind.
    fn harness(kind: ScalarKind) -> (AddressSpace, NodeId, NodeId) {
        let mut space = AddressSpace::new();
        let tag = space.make_variable("TagA", ScalarKind::Double);
        let root = space.root();
        space.add_child(root, tag).unwrap();
        let slot = space.make_variable("InputValue", kind);
        (space, tag, slot)
    }

    #[test]
    fn test_typed_literal_binding() {
        let (mut space, _, slot) = harness(ScalarKind::Double);
        bind_property(&mut space, slot, "InputValue", "42.5").unwrap();
        assert_eq!(space.read_value(slot), Some(ScalarValue::Double(42.5)));
        assert_eq!(space.read_link(slot), None);
    }

    #[test]
    fn test_alias_binding_is_kept_verbatim() {
        let (mut space, _, slot) = harness(ScalarKind::Double);
        bind_property(&mut space, slot, "InputValue", "{Alias}/Speed").unwrap();
        let link = space.read_link(slot).unwrap();
        assert!(link.is_alias());
        assert_eq!(link.path, "{Alias}/Speed");
        assert_eq!(link.target, None);
        assert_eq!(render_property(&space, slot), "{Alias}/Speed");
    }

    #[test]
    fn test_array_suffix_preserved() {
        let (mut space, tag, slot) = harness(ScalarKind::Double);
        bind_property(&mut space, slot, "InputValue", "TagA[2]").unwrap();
        let link = space.read_link(slot).unwrap();
        assert_eq!(link.target, Some(tag));
        assert_eq!(link.path, "TagA[2]");
        assert_eq!(render_property(&space, slot), "TagA[2]");
    }

    #[test]
    fn test_bit_suffix_preserved() {
        let (mut space, tag, slot) = harness(ScalarKind::UInt32);
        bind_property(&mut space, slot, "InputValue", "TagA.3").unwrap();
        assert_eq!(space.read_link(slot).unwrap().target, Some(tag));
        assert_eq!(render_property(&space, slot), "TagA.3");
    }

    #[test]
    fn test_combined_suffixes_keep_their_order() {
        let (mut space, _, slot) = harness(ScalarKind::UInt32);
        bind_property(&mut space, slot, "InputValue", "TagA[2].3").unwrap();
        assert_eq!(space.read_link(slot).unwrap().path, "TagA[2].3");
        assert_eq!(render_property(&space, slot), "TagA[2].3");
    }

    #[test]
    fn test_failed_bool_coercion_falls_through_to_reference() {
        let (mut space, _, slot) = harness(ScalarKind::Bool);
        // "abc" is not a boolean and not a variable: warn, leave unset.
        let warning = bind_property(&mut space, slot, "Enabled", "abc").unwrap_err();
        assert!(matches!(warning, BindWarning::UnresolvedReference { .. }));
        assert_eq!(space.read_value(slot), None);
        assert_eq!(space.read_link(slot), None);
    }

    #[test]
    fn test_string_slot_keeps_unresolved_text_as_plain_value() {
        let (mut space, _, slot) = harness(ScalarKind::String);
        let warning = bind_property(&mut space, slot, "Description", "NoSuchNode").unwrap_err();
        assert!(matches!(warning, BindWarning::LiteralFallback { .. }));
        assert_eq!(
            space.read_value(slot),
            Some(ScalarValue::String("NoSuchNode".into()))
        );
    }

    #[test]
    fn test_failed_coercion_resolving_to_variable_binds_link() {
        let (mut space, tag, slot) = harness(ScalarKind::Double);
        bind_property(&mut space, slot, "InputValue", "TagA").unwrap();
        assert_eq!(space.read_link(slot).unwrap().target, Some(tag));
        assert_eq!(space.read_value(slot), None);
    }

    #[test]
    fn test_unresolved_suffixed_reference_stays_unbound() {
        let (mut space, _, slot) = harness(ScalarKind::Double);
        let warning = bind_property(&mut space, slot, "InputValue", "Missing[1]").unwrap_err();
        assert_eq!(
            warning,
            BindWarning::UnresolvedReference {
                property: "InputValue".into(),
                target: "Missing".into(),
            }
        );
        assert_eq!(space.read_value(slot), None);
        assert_eq!(space.read_link(slot), None);
    }

    #[test]
    fn test_shelved_duration_parsing() {
        let (mut space, _, slot) = harness(ScalarKind::Duration);
        bind_property(&mut space, slot, "MaxTimeShelved", "0.00:00:05").unwrap();
        match space.read_value(slot) {
            Some(ScalarValue::Duration(d)) => assert_eq!(d.as_millis(), 5_000.0),
            other => panic!("unexpected value {other:?}"),
        }

        let warning =
            bind_property(&mut space, slot, "MaxTimeShelved", "not a duration").unwrap_err();
        assert!(matches!(warning, BindWarning::InvalidDuration { .. }));
    }

    #[test]
    fn test_render_of_unset_slot_is_empty() {
        let (space, _, slot) = harness(ScalarKind::Double);
        assert_eq!(render_property(&space, slot), "");
    }

    #[test]
    fn test_render_rebuilds_path_from_tree() {
        // The link stores the import-time text; rendering reconstructs the
        // path from the tree so renames are reflected.
        let mut space = AddressSpace::new();
        let root = space.root();
        let folder = space.ensure_folder(root, "Plant").unwrap();
        let tag = space.make_variable("TagA", ScalarKind::Double);
        space.add_child(folder, tag).unwrap();
        let slot = space.make_variable("InputValue", ScalarKind::Double);

        bind_property(&mut space, slot, "InputValue", "Plant/TagA[7]").unwrap();
        assert_eq!(render_property(&space, slot), "Plant/TagA[7]");
    }
}
