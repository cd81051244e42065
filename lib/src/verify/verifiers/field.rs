use super::FieldVerifier;
use crate::jvm::model::{Class, Field};
use crate::jvm::{BinaryName, FieldType, Name, ParseDescriptor};
use crate::verify::{FieldLocation, Location, VerificationContext};

/// Resolves the class named in a field's declared type
pub struct FieldTypeVerifier;

impl FieldVerifier for FieldTypeVerifier {
    fn verify_field(&self, class: &Class, field: &Field, context: &VerificationContext) {
        let field_type = match FieldType::<BinaryName>::parse(&field.descriptor) {
            Ok(field_type) => field_type,
            Err(err) => {
                log::warn!(
                    "Undecodable descriptor '{}' on {}.{}: {}",
                    field.descriptor,
                    class.name.as_str(),
                    field.name.as_str(),
                    err
                );
                return;
            }
        };

        if let Some(field_class) = field_type.object_class() {
            let usage = Location::Field(FieldLocation::of(class, field));
            context.resolve_class_or_problem(field_class, &usage);
        }
    }
}
