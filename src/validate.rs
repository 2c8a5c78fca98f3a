//! Admission-time validation engine
//!
//! Before a lens joins the version graph, the complete operation history
//! from the origin schema through the new lens is replayed against a
//! synthetic [`Shape`] document. The per-operation semantics are the ones
//! the runtime engine uses, but under strict preconditions: every field a
//! step touches must exist (or, for `Add`/`Copy` destinations, must not),
//! and every declared type must match what the accumulated shape actually
//! stores. Failures are descriptive [`Configuration`](LensError::Configuration)
//! errors; nothing is admitted on failure.

use crate::error::{LensError, Result};
use crate::op::{Operation, TypeConversion, TypeTag, TypedMapping};
use crate::shape::Shape;
use crate::tree::{self, TreeNode};

/// Replay an operation history against a fresh shape document, returning
/// the shape it produces.
pub fn check(ops: &[Operation]) -> Result<Shape> {
    let mut shape = Shape::empty_object();
    check_ops(&mut shape, ops)?;
    Ok(shape)
}

fn check_ops(shape: &mut Shape, ops: &[Operation]) -> Result<()> {
    for op in ops {
        check_op(shape, op)?;
    }
    Ok(())
}

fn check_op(shape: &mut Shape, op: &Operation) -> Result<()> {
    match op {
        Operation::Rename { from, to } => {
            require_field(shape, from, "rename")?;
            tree::rename(shape, from, to)
        }

        Operation::Add { name, tag, default } => {
            if shape.fields()?.contains_key(name) {
                return Err(LensError::Configuration(format!(
                    "cannot add field '{name}': it already exists"
                )));
            }
            if let Some(default) = default {
                if default.tag() != *tag {
                    return Err(LensError::Configuration(format!(
                        "cannot add field '{name}': the default is {} but the declared type is {tag}",
                        default.tag()
                    )));
                }
            }
            shape
                .fields_mut()?
                .insert(name.clone(), Shape::for_tag(*tag));
            Ok(())
        }

        Operation::Remove { name, tag, .. } => {
            let stored = stored_tag(shape, name, "remove")?;
            if stored != *tag {
                return Err(LensError::Configuration(format!(
                    "cannot remove field '{name}': the declared type {tag} does not match the stored type {stored}"
                )));
            }
            shape.fields_mut()?.shift_remove(name);
            Ok(())
        }

        Operation::Copy { from, to } => {
            require_field(shape, from, "copy")?;
            if shape.fields()?.contains_key(to) {
                return Err(LensError::Configuration(format!(
                    "cannot copy to field '{to}': it already exists"
                )));
            }
            tree::copy(shape, from, to)
        }

        Operation::Hoist { target, from } => {
            require_field(shape, from, "hoist out of")?;
            tree::hoist(shape, target, from)
        }

        Operation::Plunge { target, to } => {
            require_field(shape, to, "plunge into")?;
            tree::plunge(shape, target, to)
        }

        Operation::Wrap { name } => {
            require_field(shape, name, "wrap")?;
            tree::wrap(shape, name)
        }

        Operation::Head { name } => {
            require_field(shape, name, "take the head of")?;
            tree::head(shape, name)
        }

        Operation::Convert {
            name,
            mapping,
            reverse_mapping,
            conversion,
        } => {
            check_conversion_types(name, mapping, reverse_mapping, *conversion)?;
            let stored = stored_tag(shape, name, "convert")?;
            if stored != conversion.from {
                return Err(LensError::Configuration(format!(
                    "cannot convert field '{name}': the stored type {stored} does not match the conversion input {}",
                    conversion.from
                )));
            }
            shape
                .fields_mut()?
                .insert(name.clone(), Shape::Scalar(conversion.to));
            Ok(())
        }

        Operation::ApplyIn { target, ops } => {
            require_field(shape, target, "apply nested operations to")?;
            let child = shape
                .fields_mut()?
                .get_mut(target)
                .ok_or_else(|| LensError::missing_node(target))?;
            check_ops(child, ops)
        }

        Operation::ApplyMap { ops } => {
            for item in shape.items_mut()? {
                check_ops(item, ops)?;
            }
            Ok(())
        }
    }
}

/// The declared tags on both mappings must agree with the conversion, which
/// also makes them agree with each other. Only scalar types convert.
fn check_conversion_types(
    name: &str,
    mapping: &TypedMapping,
    reverse_mapping: &TypedMapping,
    conversion: TypeConversion,
) -> Result<()> {
    if !conversion.from.is_scalar() {
        return Err(LensError::UnsupportedType(conversion.from));
    }
    if !conversion.to.is_scalar() {
        return Err(LensError::UnsupportedType(conversion.to));
    }
    if mapping.input != conversion.from || mapping.output != conversion.to {
        return Err(LensError::Configuration(format!(
            "convert field '{name}': the mapping is declared {} -> {} but the conversion is {} -> {}",
            mapping.input, mapping.output, conversion.from, conversion.to
        )));
    }
    if reverse_mapping.input != conversion.to || reverse_mapping.output != conversion.from {
        return Err(LensError::Configuration(format!(
            "convert field '{name}': the reverse mapping is declared {} -> {} but the conversion reverses {} -> {}",
            reverse_mapping.input, reverse_mapping.output, conversion.to, conversion.from
        )));
    }
    Ok(())
}

fn require_field(shape: &Shape, name: &str, action: &str) -> Result<()> {
    if shape.fields()?.contains_key(name) {
        Ok(())
    } else {
        Err(LensError::Configuration(format!(
            "cannot {action} field '{name}': it does not exist"
        )))
    }
}

fn stored_tag(shape: &Shape, name: &str, action: &str) -> Result<TypeTag> {
    let fields = shape.fields()?;
    let field = fields.get(name).ok_or_else(|| {
        LensError::Configuration(format!("cannot {action} field '{name}': it does not exist"))
    })?;
    field.type_tag().ok_or_else(|| {
        LensError::Configuration(format!(
            "cannot {action} field '{name}': the stored shape has no declared type"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::OperationsBuilder;
    use crate::document::Scalar;
    use crate::op::TypeTag;

    fn text_to_number() -> (TypedMapping, TypedMapping) {
        (
            TypedMapping::new(TypeTag::Text, TypeTag::Number, Ok),
            TypedMapping::new(TypeTag::Number, TypeTag::Text, Ok),
        )
    }

    #[test]
    fn a_consistent_history_produces_the_expected_shape() {
        let ops = OperationsBuilder::new()
            .add("user_id", TypeTag::Text, Some(Scalar::from("")))
            .add("preferences", TypeTag::Object, None)
            .add("theme", TypeTag::Text, None)
            .plunge("theme", "preferences")
            .rename("user_id", "id")
            .build();

        let shape = check(&ops).unwrap();
        let Shape::Object(fields) = shape else {
            panic!("history did not produce an object shape");
        };
        assert_eq!(fields["id"], Shape::Scalar(TypeTag::Text));
        assert_eq!(
            fields["preferences"],
            Shape::Object(
                [("theme".to_string(), Shape::Scalar(TypeTag::Text))]
                    .into_iter()
                    .collect()
            )
        );
    }

    #[test]
    fn adding_an_existing_field_is_rejected() {
        let ops = OperationsBuilder::new()
            .add("x", TypeTag::Number, None)
            .add("x", TypeTag::Number, None)
            .build();
        let err = check(&ops).unwrap_err();
        assert!(matches!(err, LensError::Configuration(_)), "{err}");
    }

    #[test]
    fn a_default_of_the_wrong_kind_is_rejected() {
        let ops = OperationsBuilder::new()
            .add("x", TypeTag::Number, Some(Scalar::from("not a number")))
            .build();
        assert!(matches!(
            check(&ops).unwrap_err(),
            LensError::Configuration(_)
        ));
    }

    #[test]
    fn renaming_an_absent_field_is_rejected() {
        let ops = OperationsBuilder::new().rename("ghost", "real").build();
        let err = check(&ops).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid lens configuration: cannot rename field 'ghost': it does not exist"
        );
    }

    #[test]
    fn remove_checks_the_declared_type_against_the_stored_one() {
        let ops = OperationsBuilder::new()
            .add("x", TypeTag::Text, None)
            .remove("x", TypeTag::Number, None)
            .build();
        assert!(matches!(
            check(&ops).unwrap_err(),
            LensError::Configuration(_)
        ));

        let ops = OperationsBuilder::new()
            .add("x", TypeTag::Text, None)
            .remove("x", TypeTag::Text, None)
            .build();
        assert!(check(&ops).is_ok());
    }

    #[test]
    fn remove_of_a_container_field_compares_container_tags() {
        let ops = OperationsBuilder::new()
            .add("prefs", TypeTag::Object, None)
            .remove("prefs", TypeTag::Object, None)
            .build();
        assert!(check(&ops).is_ok());
    }

    #[test]
    fn copy_to_an_existing_field_is_rejected() {
        let ops = OperationsBuilder::new()
            .add("a", TypeTag::Text, None)
            .add("b", TypeTag::Text, None)
            .copy("a", "b")
            .build();
        assert!(matches!(
            check(&ops).unwrap_err(),
            LensError::Configuration(_)
        ));
    }

    #[test]
    fn convert_requires_the_stored_type_to_match() {
        let (mapping, reverse) = text_to_number();
        let ops = OperationsBuilder::new()
            .add("n", TypeTag::Boolean, None)
            .convert(
                "n",
                TypeConversion::new(TypeTag::Text, TypeTag::Number),
                mapping,
                reverse,
            )
            .build();
        assert!(matches!(
            check(&ops).unwrap_err(),
            LensError::Configuration(_)
        ));
    }

    #[test]
    fn convert_updates_the_stored_type() {
        let (mapping, reverse) = text_to_number();
        let ops = OperationsBuilder::new()
            .add("n", TypeTag::Text, None)
            .convert(
                "n",
                TypeConversion::new(TypeTag::Text, TypeTag::Number),
                mapping,
                reverse,
            )
            .remove("n", TypeTag::Number, None)
            .build();
        assert!(check(&ops).is_ok());
    }

    #[test]
    fn convert_rejects_disagreeing_mapping_declarations() {
        // forward mapping declares boolean output, conversion says number
        let mapping = TypedMapping::new(TypeTag::Text, TypeTag::Boolean, Ok);
        let reverse = TypedMapping::new(TypeTag::Number, TypeTag::Text, Ok);
        let ops = OperationsBuilder::new()
            .add("n", TypeTag::Text, None)
            .convert(
                "n",
                TypeConversion::new(TypeTag::Text, TypeTag::Number),
                mapping,
                reverse,
            )
            .build();
        assert!(matches!(
            check(&ops).unwrap_err(),
            LensError::Configuration(_)
        ));
    }

    #[test]
    fn convert_to_a_container_type_is_unsupported() {
        let mapping = TypedMapping::new(TypeTag::Text, TypeTag::Object, Ok);
        let reverse = TypedMapping::new(TypeTag::Object, TypeTag::Text, Ok);
        let ops = OperationsBuilder::new()
            .add("n", TypeTag::Text, None)
            .convert(
                "n",
                TypeConversion::new(TypeTag::Text, TypeTag::Object),
                mapping,
                reverse,
            )
            .build();
        assert!(matches!(
            check(&ops).unwrap_err(),
            LensError::UnsupportedType(TypeTag::Object)
        ));
    }

    #[test]
    fn plunge_requires_the_destination_to_exist() {
        let ops = OperationsBuilder::new()
            .add("x", TypeTag::Text, None)
            .plunge("x", "o")
            .build();
        assert!(matches!(
            check(&ops).unwrap_err(),
            LensError::Configuration(_)
        ));
    }

    #[test]
    fn wrap_then_head_validates() {
        let ops = OperationsBuilder::new()
            .add("tags", TypeTag::Text, None)
            .wrap("tags")
            .head("tags")
            .remove("tags", TypeTag::Text, None)
            .build();
        assert!(check(&ops).is_ok());
    }

    #[test]
    fn head_of_a_scalar_field_is_a_structural_error() {
        let ops = OperationsBuilder::new()
            .add("tags", TypeTag::Text, None)
            .head("tags")
            .build();
        assert!(matches!(
            check(&ops).unwrap_err(),
            LensError::StructuralType(_)
        ));
    }

    #[test]
    fn apply_in_requires_the_target_field() {
        let ops = OperationsBuilder::new()
            .apply_in("prefs", |ops| ops.rename("a", "b"))
            .build();
        assert!(matches!(
            check(&ops).unwrap_err(),
            LensError::Configuration(_)
        ));
    }

    #[test]
    fn nested_operations_validate_against_the_nested_shape() {
        let ops = OperationsBuilder::new()
            .add("prefs", TypeTag::Object, None)
            .apply_in("prefs", |ops| ops.rename("theme", "color"))
            .build();
        // prefs exists but has no 'theme' field yet
        assert!(matches!(
            check(&ops).unwrap_err(),
            LensError::Configuration(_)
        ));

        let ops = OperationsBuilder::new()
            .add("prefs", TypeTag::Object, None)
            .apply_in("prefs", |ops| {
                ops.add("theme", TypeTag::Text, None).rename("theme", "color")
            })
            .build();
        assert!(check(&ops).is_ok());
    }
}
