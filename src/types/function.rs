//! Descriptor types for catalogue functions.
//!
//! A `FunctionDescriptor` is documentation-only: it records how a remote
//! operation is called and what it returns, for hover, completion and help
//! pages. Invocation itself happens on the remote platform.

use std::fmt;

/// A named positional parameter of one overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name as shown in call signatures (e.g. "Samples")
    pub name: String,
    /// What the caller is expected to pass
    pub description: String,
}

impl Param {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// The documented result of one overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnDesc {
    /// Name of the returned value (e.g. "Protocol")
    pub name: String,
    /// What the returned value represents
    pub description: String,
}

impl ReturnDesc {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Whether both the name and the description carry text.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.description.trim().is_empty()
    }
}

/// One documented overload of a catalogue function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Positional parameters, in call order.
    pub params: Vec<Param>,
    /// Whether trailing `Option -> value` rules are accepted.
    pub accepts_options: bool,
    /// The documented return value.
    pub returns: ReturnDesc,
}

impl Signature {
    /// Create an overload that accepts options, as every platform function does.
    pub fn new(params: Vec<Param>, returns: ReturnDesc) -> Self {
        Self {
            params,
            accepts_options: true,
            returns,
        }
    }

    /// Mark this overload as taking no options.
    pub fn without_options(mut self) -> Self {
        self.accepts_options = false;
        self
    }

    /// Number of positional parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Render the call form for `function`, e.g. `ExperimentPCR[Samples, Options]`.
    pub fn call_form(&self, function: &str) -> String {
        let mut args: Vec<&str> = self.params.iter().map(|p| p.name.as_str()).collect();
        if self.accepts_options {
            args.push("Options");
        }
        format!("{}[{}]", function, args.join(", "))
    }

    /// Render the call form followed by its return name.
    pub fn label(&self, function: &str) -> String {
        format!("{} -> {}", self.call_form(function), self.returns.name)
    }
}

/// Documentation record for one remote-callable operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDescriptor {
    /// Globally unique function name (e.g. "ExperimentPCR")
    pub name: String,
    /// Overloads, in the order they were documented
    pub signatures: Vec<Signature>,
    /// Link to the full help page
    pub help_url: String,
    /// One-line description of what the function does
    pub summary: Option<String>,
    /// Family the function belongs to (e.g. "Experiment")
    pub category: Option<String>,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, help_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signatures: Vec::new(),
            help_url: help_url.into(),
            summary: None,
            category: None,
        }
    }

    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signatures.push(signature);
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Overloads taking exactly `positional` positional arguments.
    pub fn overloads_with_arity(&self, positional: usize) -> impl Iterator<Item = &Signature> {
        self.signatures
            .iter()
            .filter(move |sig| sig.arity() == positional)
    }

    /// Sorted, deduplicated positional arities across all overloads.
    pub fn arities(&self) -> Vec<usize> {
        let mut arities: Vec<usize> = self.signatures.iter().map(Signature::arity).collect();
        arities.sort_unstable();
        arities.dedup();
        arities
    }
}

impl fmt::Display for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(summary) = &self.summary {
            write!(f, ": {}", summary)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcr() -> FunctionDescriptor {
        FunctionDescriptor::new("ExperimentPCR", "https://example.org/experimentpcr")
            .with_signature(Signature::new(
                vec![Param::new("Samples", "The samples to amplify.")],
                ReturnDesc::new("Protocol", "The PCR protocol."),
            ))
            .with_signature(Signature::new(
                vec![
                    Param::new("Samples", "The samples to amplify."),
                    Param::new("PrimerPairs", "The primer pairs to use."),
                ],
                ReturnDesc::new("Protocol", "The PCR protocol."),
            ))
    }

    #[test]
    fn call_form_includes_options() {
        let desc = pcr();
        assert_eq!(
            desc.signatures[1].call_form(&desc.name),
            "ExperimentPCR[Samples, PrimerPairs, Options]"
        );
    }

    #[test]
    fn call_form_without_options() {
        let sig = Signature::new(vec![], ReturnDesc::new("Null", "Nothing.")).without_options();
        assert_eq!(sig.call_form("Logout"), "Logout[]");
        assert_eq!(sig.label("Logout"), "Logout[] -> Null");
    }

    #[test]
    fn arities_are_sorted_and_unique() {
        let desc = pcr().with_signature(Signature::new(
            vec![Param::new("Samples", "More samples.")],
            ReturnDesc::new("Protocol", "Again."),
        ));
        assert_eq!(desc.arities(), vec![1, 2]);
        assert_eq!(desc.overloads_with_arity(1).count(), 2);
        assert_eq!(desc.overloads_with_arity(3).count(), 0);
    }

    #[test]
    fn incomplete_return_desc() {
        assert!(!ReturnDesc::new("Protocol", "  ").is_complete());
        assert!(!ReturnDesc::new("", "text").is_complete());
        assert!(ReturnDesc::new("Protocol", "text").is_complete());
    }

    #[test]
    fn display_uses_summary() {
        let desc = pcr().with_summary("Amplifies DNA.");
        assert_eq!(desc.to_string(), "ExperimentPCR: Amplifies DNA.");
    }
}
