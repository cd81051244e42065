//! Pluggable compatibility checks
//!
//! Checks come in four granularities: whole classes, declared methods,
//! declared fields, and single instructions. [`VerifierPipeline::standard`]
//! bundles the full built-in set; custom pipelines can mix in their own
//! implementations of the verifier traits.

mod class;
mod field;
mod instruction;
mod method;

pub use class::*;
pub use field::*;
pub use instruction::*;
pub use method::*;

use super::VerificationContext;
use crate::jvm::model::{Class, Field, Instruction, Method};

/// Check that runs once per class
pub trait ClassVerifier: Send + Sync {
    fn verify_class(&self, class: &Class, context: &VerificationContext);
}

/// Check that runs once per declared method
pub trait MethodVerifier: Send + Sync {
    fn verify_method(&self, class: &Class, method: &Method, context: &VerificationContext);
}

/// Check that runs once per declared field
pub trait FieldVerifier: Send + Sync {
    fn verify_field(&self, class: &Class, field: &Field, context: &VerificationContext);
}

/// Check that runs once per reference-bearing instruction
pub trait InstructionVerifier: Send + Sync {
    fn verify_instruction(
        &self,
        class: &Class,
        method: &Method,
        instruction: &Instruction,
        context: &VerificationContext,
    );
}

/// Ordered collection of verifiers at every granularity
pub struct VerifierPipeline {
    class_verifiers: Vec<Box<dyn ClassVerifier>>,
    method_verifiers: Vec<Box<dyn MethodVerifier>>,
    field_verifiers: Vec<Box<dyn FieldVerifier>>,
    instruction_verifiers: Vec<Box<dyn InstructionVerifier>>,
}

impl VerifierPipeline {
    /// Pipeline that checks nothing
    pub fn empty() -> VerifierPipeline {
        VerifierPipeline {
            class_verifiers: vec![],
            method_verifiers: vec![],
            field_verifiers: vec![],
            instruction_verifiers: vec![],
        }
    }

    /// The full built-in set of compatibility checks
    pub fn standard() -> VerifierPipeline {
        let mut pipeline = VerifierPipeline::empty();
        pipeline.add_class_verifier(Box::new(SuperClassVerifier));
        pipeline.add_class_verifier(Box::new(InheritFromFinalClassVerifier));
        pipeline.add_class_verifier(Box::new(AbstractMethodVerifier));
        pipeline.add_method_verifier(Box::new(OverrideFinalMethodVerifier));
        pipeline.add_method_verifier(Box::new(MethodArgumentTypesVerifier));
        pipeline.add_method_verifier(Box::new(MethodReturnTypeVerifier));
        pipeline.add_field_verifier(Box::new(FieldTypeVerifier));
        pipeline.add_instruction_verifier(Box::new(TypeInstructionVerifier));
        pipeline.add_instruction_verifier(Box::new(InvokeInstructionVerifier));
        pipeline.add_instruction_verifier(Box::new(FieldAccessVerifier));
        pipeline.add_instruction_verifier(Box::new(DeprecatedMethodUsageVerifier));
        pipeline
    }

    pub fn add_class_verifier(&mut self, verifier: Box<dyn ClassVerifier>) {
        self.class_verifiers.push(verifier);
    }

    pub fn add_method_verifier(&mut self, verifier: Box<dyn MethodVerifier>) {
        self.method_verifiers.push(verifier);
    }

    pub fn add_field_verifier(&mut self, verifier: Box<dyn FieldVerifier>) {
        self.field_verifiers.push(verifier);
    }

    pub fn add_instruction_verifier(&mut self, verifier: Box<dyn InstructionVerifier>) {
        self.instruction_verifiers.push(verifier);
    }

    /// Run every verifier over one class
    pub fn verify_class(&self, class: &Class, context: &VerificationContext) {
        for verifier in &self.class_verifiers {
            verifier.verify_class(class, context);
        }
        for method in &class.methods {
            for verifier in &self.method_verifiers {
                verifier.verify_method(class, method, context);
            }
            for instruction in &method.instructions {
                for verifier in &self.instruction_verifiers {
                    verifier.verify_instruction(class, method, instruction, context);
                }
            }
        }
        for field in &class.fields {
            for verifier in &self.field_verifiers {
                verifier.verify_field(class, field, context);
            }
        }
    }
}
