use super::MethodVerifier;
use crate::jvm::model::{Class, Method};
use crate::jvm::{BinaryName, MethodDescriptor, Name, ParseDescriptor};
use crate::verify::{
    ClassLocation, ClassParentsVisitor, CompatibilityProblem, Location, MethodLocation,
    VerificationContext,
};

/// Flags overrides of methods that are final in an ancestor
///
/// Climbs the superclass chain only. A non-final method with the same name
/// and descriptor does not stop the climb; the nearest final match is
/// reported and ends it.
pub struct OverrideFinalMethodVerifier;

impl MethodVerifier for OverrideFinalMethodVerifier {
    fn verify_method(&self, class: &Class, method: &Method, context: &VerificationContext) {
        if method.is_private()
            || method.is_static()
            || method.is_constructor()
            || method.is_class_initializer()
        {
            return;
        }
        let super_name = match &class.super_class {
            Some(super_name) => super_name,
            None => return,
        };
        if context.is_external(super_name) {
            return;
        }

        let visitor = ClassParentsVisitor::new(context, false);
        visitor.visit_class(class, false, |ancestor| {
            match ancestor.method(&method.name, &method.descriptor) {
                Some(overridden) if overridden.is_final() => {
                    context.register_problem(CompatibilityProblem::OverridingFinalMethod {
                        final_method: MethodLocation::of(ancestor, overridden),
                        invalid_class: ClassLocation::new(class.name.clone()),
                    });
                    false
                }
                _ => true,
            }
        });
    }
}

/// Resolves the classes named in a method's parameter types
pub struct MethodArgumentTypesVerifier;

impl MethodVerifier for MethodArgumentTypesVerifier {
    fn verify_method(&self, class: &Class, method: &Method, context: &VerificationContext) {
        let descriptor = match parse_descriptor(class, method) {
            Some(descriptor) => descriptor,
            None => return,
        };

        let usage = Location::Method(MethodLocation::of(class, method));
        for parameter in &descriptor.parameters {
            if let Some(parameter_class) = parameter.object_class() {
                context.resolve_class_or_problem(parameter_class, &usage);
            }
        }
    }
}

/// Resolves the class named in a method's return type
pub struct MethodReturnTypeVerifier;

impl MethodVerifier for MethodReturnTypeVerifier {
    fn verify_method(&self, class: &Class, method: &Method, context: &VerificationContext) {
        let descriptor = match parse_descriptor(class, method) {
            Some(descriptor) => descriptor,
            None => return,
        };

        if let Some(return_class) = descriptor
            .return_type
            .as_ref()
            .and_then(|return_type| return_type.object_class())
        {
            let usage = Location::Method(MethodLocation::of(class, method));
            context.resolve_class_or_problem(return_class, &usage);
        }
    }
}

fn parse_descriptor(class: &Class, method: &Method) -> Option<MethodDescriptor<BinaryName>> {
    match MethodDescriptor::parse(&method.descriptor) {
        Ok(descriptor) => Some(descriptor),
        Err(err) => {
            log::warn!(
                "Undecodable descriptor '{}' on {}.{}: {}",
                method.descriptor,
                class.name.as_str(),
                method.name.as_str(),
                err
            );
            None
        }
    }
}
