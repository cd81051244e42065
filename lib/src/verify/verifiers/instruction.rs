use super::InstructionVerifier;
use crate::jvm::model::{Class, Instruction, Method, MethodOperation};
use crate::resolve::Resolution;
use crate::verify::{
    CompatibilityProblem, DeprecatedMethodUsage, Location, MethodLocation, MethodReference,
    VerificationContext,
};

/// Resolves classes named by `new`, array creations, `checkcast` and
/// `instanceof`
pub struct TypeInstructionVerifier;

impl InstructionVerifier for TypeInstructionVerifier {
    fn verify_instruction(
        &self,
        class: &Class,
        method: &Method,
        instruction: &Instruction,
        context: &VerificationContext,
    ) {
        let class_ref = match instruction {
            Instruction::Type { class: class_ref, .. } => class_ref,
            _ => return,
        };
        if let Some(named_class) = class_ref.object_class() {
            let usage = Location::Method(MethodLocation::of(class, method));
            context.resolve_class_or_problem(named_class, &usage);
        }
    }
}

/// Resolves invocation owners and flags `invokeinterface` against classes
pub struct InvokeInstructionVerifier;

impl InstructionVerifier for InvokeInstructionVerifier {
    fn verify_instruction(
        &self,
        class: &Class,
        method: &Method,
        instruction: &Instruction,
        context: &VerificationContext,
    ) {
        let (kind, owner, name, descriptor) = match instruction {
            Instruction::Method {
                kind,
                owner,
                name,
                descriptor,
            } => (kind, owner, name, descriptor),
            _ => return,
        };

        // Invocations on primitive array types (`int[].clone()`) name no class
        let owner_class = match owner.object_class() {
            Some(owner_class) => owner_class,
            None => return,
        };

        let usage = Location::Method(MethodLocation::of(class, method));
        let found = match context.resolve_class_or_problem(owner_class, &usage) {
            Some(found) => found,
            None => return,
        };

        if *kind == MethodOperation::InvokeInterface && !found.class.is_interface() {
            context.register_problem(CompatibilityProblem::InvokeInterfaceOnClass {
                method_reference: MethodReference {
                    host: owner_class.clone(),
                    method_name: name.clone(),
                    descriptor: descriptor.clone(),
                },
                caller: MethodLocation::of(class, method),
            });
        }
    }
}

/// Reports invocations of methods their declaring class marks deprecated
///
/// Only the named owner is consulted; deprecation inherited from an ancestor
/// declaration is not chased down. Owners that fail to resolve are left to
/// [`InvokeInstructionVerifier`].
pub struct DeprecatedMethodUsageVerifier;

impl InstructionVerifier for DeprecatedMethodUsageVerifier {
    fn verify_instruction(
        &self,
        class: &Class,
        method: &Method,
        instruction: &Instruction,
        context: &VerificationContext,
    ) {
        let (owner, name, descriptor) = match instruction {
            Instruction::Method {
                owner,
                name,
                descriptor,
                ..
            } => (owner, name, descriptor),
            _ => return,
        };
        let owner_class = match owner.object_class() {
            Some(owner_class) => owner_class,
            None => return,
        };
        let found = match context.resolve(owner_class) {
            Resolution::Found(found) => found,
            _ => return,
        };

        if let Some(invoked) = found.class.method(name, descriptor) {
            if invoked.is_deprecated {
                context.register_deprecated_usage(DeprecatedMethodUsage {
                    deprecated_method: MethodLocation::of(&found.class, invoked),
                    usage: MethodLocation::of(class, method),
                });
            }
        }
    }
}

/// Resolves the owners of field reads and writes
pub struct FieldAccessVerifier;

impl InstructionVerifier for FieldAccessVerifier {
    fn verify_instruction(
        &self,
        class: &Class,
        method: &Method,
        instruction: &Instruction,
        context: &VerificationContext,
    ) {
        let owner = match instruction {
            Instruction::Field { owner, .. } => owner,
            _ => return,
        };
        if let Some(owner_class) = owner.object_class() {
            let usage = Location::Method(MethodLocation::of(class, method));
            context.resolve_class_or_problem(owner_class, &usage);
        }
    }
}
